use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jokebox_api::JokeboxApi;
use jokebox_core::JokeDraft;
use serde_json::Value;

const CLI_CONTRACT_VERSION: &str = "cli.v1";

#[derive(Debug, Parser)]
#[command(name = "jokebox")]
#[command(about = "Jokebox CLI")]
struct Cli {
    #[arg(long, default_value = "./jokes.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Liveness and collection size.
    Status,
    /// One uniformly random joke.
    Random,
    /// Random sample of jokes matching a query.
    Search(SearchArgs),
    /// Fetch one joke by id.
    Get(IdArgs),
    /// Validate and store a new joke.
    Add(AddArgs),
    /// Remove one joke by id.
    Delete(IdArgs),
    /// Dump the whole collection.
    List,
}

#[derive(Debug, Args)]
struct SearchArgs {
    #[arg(long)]
    query: String,
    #[arg(long, default_value_t = 1)]
    count: usize,
}

#[derive(Debug, Args)]
struct IdArgs {
    #[arg(long)]
    id: u64,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    text: String,
    #[arg(long = "topic", required = true)]
    topics: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let api = JokeboxApi::new(cli.data);

    match cli.command {
        Command::Status => {
            let status = api.status()?;
            emit_json(serde_json::to_value(status).context("failed to serialize status")?)
        }
        Command::Random => {
            let joke = api.random_joke()?;
            emit_json(serde_json::to_value(joke).context("failed to serialize joke")?)
        }
        Command::Search(args) => {
            let jokes = api.search(&args.query, args.count)?;
            emit_json(serde_json::json!({ "jokes": jokes }))
        }
        Command::Get(args) => {
            let joke = api.joke_by_id(args.id)?;
            emit_json(serde_json::to_value(joke).context("failed to serialize joke")?)
        }
        Command::Add(args) => {
            let created =
                api.create_joke(JokeDraft { joke: args.text, topics: args.topics })?;
            emit_json(serde_json::to_value(created).context("failed to serialize joke")?)
        }
        Command::Delete(args) => {
            let confirmation = api.delete_joke(args.id)?;
            emit_json(
                serde_json::to_value(confirmation).context("failed to serialize confirmation")?,
            )
        }
        Command::List => {
            let jokes = api.list_jokes()?;
            emit_json(serde_json::json!({ "jokes": jokes }))
        }
    }
}

fn emit_json(value: Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&with_contract_version(value))?);
    Ok(())
}

fn with_contract_version(value: Value) -> Value {
    match value {
        Value::Object(mut object) => {
            object.insert(
                "contract_version".to_string(),
                Value::String(CLI_CONTRACT_VERSION.to_string()),
            );
            Value::Object(object)
        }
        other => serde_json::json!({
            "contract_version": CLI_CONTRACT_VERSION,
            "result": other,
        }),
    }
}
