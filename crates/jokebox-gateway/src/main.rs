mod address;
mod client;
#[cfg(test)]
mod test_upstream;

use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use jokebox_core::Joke;
use serde::Deserialize;
use serde_json::Value;

use crate::address::ResourceAddress;
use crate::client::{ApiClient, ClientError};

#[derive(Clone)]
struct GatewayState {
    client: ApiClient,
}

#[derive(Debug, Parser)]
#[command(name = "jokebox-gateway")]
#[command(about = "Resource/action gateway in front of the jokebox service")]
struct Args {
    #[arg(long, default_value = "127.0.0.1:8100")]
    bind: SocketAddr,
    /// Base URL of the joke service this gateway forwards to.
    #[arg(long, env = "JOKEBOX_API_URL", default_value = "http://127.0.0.1:8000")]
    api_url: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AddJokeArgs {
    joke_text: String,
    topics: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DeleteJokeArgs {
    joke_id: u64,
}

fn app(state: GatewayState) -> Router {
    Router::new()
        .route("/resource/*address", get(read_resource))
        .route("/action/add_joke", post(add_joke))
        .route("/action/delete_joke", post(delete_joke))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let state = GatewayState { client: ApiClient::new(args.api_url) };
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!("jokebox gateway listening on {}", args.bind);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Resource reads always answer 200 with an inline payload; upstream and
/// transport failures never escape to the caller.
async fn read_resource(
    State(state): State<GatewayState>,
    Path(address): Path<String>,
) -> Json<Value> {
    Json(resolve_resource(&state.client, &address))
}

async fn add_joke(
    State(state): State<GatewayState>,
    Json(args): Json<AddJokeArgs>,
) -> Json<Value> {
    let payload = match state.client.add_joke(&args.joke_text, &args.topics) {
        Ok(created) => text_payload(&format!("Added joke with ID {}", created.id)),
        Err(err) => failure_payload(&err),
    };
    Json(payload)
}

async fn delete_joke(
    State(state): State<GatewayState>,
    Json(args): Json<DeleteJokeArgs>,
) -> Json<Value> {
    let payload = match state.client.delete_joke(args.joke_id) {
        Ok(message) => text_payload(&message),
        Err(err) => failure_payload(&err),
    };
    Json(payload)
}

/// One address, one outbound call, one reshaped payload. Only the joke text
/// is surfaced for joke reads; the status body is forwarded unchanged.
fn resolve_resource(client: &ApiClient, address: &str) -> Value {
    let parsed = match ResourceAddress::parse(address) {
        Ok(parsed) => parsed,
        Err(err) => return error_payload(&err.to_string()),
    };

    match parsed {
        ResourceAddress::Status => match client.status() {
            Ok(body) => body,
            Err(err) => failure_payload(&err),
        },
        ResourceAddress::RandomJoke => shape_joke(client.random_joke()),
        ResourceAddress::JokeById(id) => shape_joke(client.joke_by_id(id)),
        ResourceAddress::Search { query, count } => match client.search(&query, count) {
            Ok(jokes) => {
                let texts =
                    jokes.iter().map(|joke| joke.joke.as_str()).collect::<Vec<_>>();
                text_payload(&texts.join("\n"))
            }
            Err(err) => failure_payload(&err),
        },
    }
}

fn shape_joke(result: Result<Joke, ClientError>) -> Value {
    match result {
        Ok(joke) => text_payload(&joke.joke),
        Err(err) => failure_payload(&err),
    }
}

/// Upstream 404 details are part of the surface: the caller sees the
/// not-found text inline. Everything else becomes an error payload.
fn failure_payload(err: &ClientError) -> Value {
    match err {
        ClientError::NotFound(detail) => text_payload(detail),
        other => {
            tracing::warn!("joke api call failed: {other}");
            error_payload(&other.to_string())
        }
    }
}

fn text_payload(text: &str) -> Value {
    serde_json::json!({ "text": text })
}

fn error_payload(detail: &str) -> Value {
    serde_json::json!({ "error": detail })
}
