use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use jokebox_api::{ApiError, DeleteResponse, JokeboxApi, StatusResponse};
use jokebox_core::{Joke, JokeDraft};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
struct ServiceState {
    api: JokeboxApi,
}

#[derive(Debug, Clone, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
struct ServiceError(ApiError);

impl From<ApiError> for ServiceError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(err) => {
                tracing::error!("store failure: {err:#}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

#[derive(Debug, Parser)]
#[command(name = "jokebox-service")]
#[command(about = "HTTP service for the jokebox collection")]
struct Args {
    #[arg(long, default_value = "./jokes.json")]
    data: PathBuf,
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: SocketAddr,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchParams {
    q: String,
    #[serde(default = "default_search_count")]
    count: usize,
}

fn default_search_count() -> usize {
    1
}

fn app(state: ServiceState) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/joke", get(random_joke).post(create_joke))
        .route("/joke/search", get(search_jokes))
        .route("/joke/:id", get(joke_by_id).delete(delete_joke))
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
    let state = ServiceState { api: JokeboxApi::new(args.data) };
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!("jokebox service listening on {}", args.bind);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

async fn status(
    State(state): State<ServiceState>,
) -> Result<Json<StatusResponse>, ServiceError> {
    Ok(Json(state.api.status()?))
}

async fn random_joke(State(state): State<ServiceState>) -> Result<Json<Joke>, ServiceError> {
    Ok(Json(state.api.random_joke()?))
}

async fn search_jokes(
    State(state): State<ServiceState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Joke>>, ServiceError> {
    Ok(Json(state.api.search(&params.q, params.count)?))
}

async fn joke_by_id(
    State(state): State<ServiceState>,
    Path(id): Path<u64>,
) -> Result<Json<Joke>, ServiceError> {
    Ok(Json(state.api.joke_by_id(id)?))
}

async fn create_joke(
    State(state): State<ServiceState>,
    Json(draft): Json<JokeDraft>,
) -> Result<(StatusCode, Json<Joke>), ServiceError> {
    let created = state.api.create_joke(draft)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_joke(
    State(state): State<ServiceState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>, ServiceError> {
    Ok(Json(state.api.delete_joke(id)?))
}
