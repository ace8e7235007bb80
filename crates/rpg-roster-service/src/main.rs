use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use rpg_roster_api::{MigrateResult, PlayerQuery, RosterApi, API_CONTRACT_VERSION};
use rpg_roster_core::{PlayerRecord, RosterError};
use rpg_roster_store_sqlite::SchemaStatus;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

const SERVICE_CONTRACT_VERSION: &str = "service.v1";
const OPENAPI_YAML: &str = include_str!("../../../openapi/openapi.yaml");

#[derive(Debug, Clone)]
struct ServiceState {
    api: RosterApi,
}

#[derive(Debug, Clone, Serialize)]
struct ServiceEnvelope<T>
where
    T: Serialize,
{
    service_contract_version: &'static str,
    api_contract_version: &'static str,
    data: T,
}

#[derive(Debug, Clone, Serialize)]
struct ServiceError {
    #[serde(skip)]
    status: StatusCode,
    service_contract_version: &'static str,
    kind: &'static str,
    error: String,
}

#[derive(Debug, Clone, Deserialize)]
struct MigrateRequest {
    dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Parser)]
#[command(name = "rpg-roster-service")]
#[command(about = "HTTP service for the RPG player roster")]
struct Args {
    #[arg(long, env = "ROSTER_DB", default_value = "./rpg_roster.sqlite3")]
    db: PathBuf,
    #[arg(long, env = "ROSTER_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
    /// Tracing filter directives, e.g. `info,rpg_roster_api=debug`.
    #[arg(long, env = "RUST_LOG")]
    log_filter: Option<String>,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl From<RosterError> for ServiceError {
    fn from(err: RosterError) -> Self {
        let status = match err {
            RosterError::BadRequest(_) | RosterError::Validation { .. } => StatusCode::BAD_REQUEST,
            RosterError::NotFound(_) => StatusCode::NOT_FOUND,
            RosterError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ServiceError {
            status,
            service_contract_version: SERVICE_CONTRACT_VERSION,
            kind: err.kind(),
            error: err.to_string(),
        }
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::from(RosterError::BadRequest(rejection.body_text()))
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::from(RosterError::BadRequest(rejection.body_text()))
    }
}

fn envelope<T>(data: T) -> ServiceEnvelope<T>
where
    T: Serialize,
{
    ServiceEnvelope {
        service_contract_version: SERVICE_CONTRACT_VERSION,
        api_contract_version: API_CONTRACT_VERSION,
        data,
    }
}

fn json_body(body: &Bytes) -> Result<serde_json::Value, ServiceError> {
    serde_json::from_slice(body).map_err(|err| {
        ServiceError::from(RosterError::BadRequest(format!("request body is not valid JSON: {err}")))
    })
}

fn app(state: ServiceState) -> Router {
    Router::new()
        .route("/rest/health", get(health))
        .route("/rest/openapi", get(openapi))
        .route("/rest/db/schema-version", post(db_schema_version))
        .route("/rest/db/migrate", post(db_migrate))
        .route("/rest/players", get(players_list).post(player_create))
        .route("/rest/players/count", get(players_count))
        .route(
            "/rest/players/:id",
            get(player_show).post(player_update).delete(player_delete),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter = args.log_filter.as_deref().map_or_else(|| EnvFilter::new("info"), EnvFilter::new);
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = ServiceState { api: RosterApi::new(args.db.clone()) };
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!(bind = %args.bind, db = %args.db.display(), "rpg roster service listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

async fn health() -> Json<ServiceEnvelope<HealthResponse>> {
    Json(envelope(HealthResponse { status: "ok" }))
}

async fn openapi() -> impl IntoResponse {
    (StatusCode::OK, [("content-type", "application/yaml; charset=utf-8")], OPENAPI_YAML)
}

async fn db_schema_version(
    State(state): State<ServiceState>,
) -> Result<Json<ServiceEnvelope<SchemaStatus>>, ServiceError> {
    let status = state.api.schema_status()?;
    Ok(Json(envelope(status)))
}

async fn db_migrate(
    State(state): State<ServiceState>,
    request: Result<Json<MigrateRequest>, JsonRejection>,
) -> Result<Json<ServiceEnvelope<MigrateResult>>, ServiceError> {
    let Json(request) = request?;
    let result = state.api.migrate(request.dry_run)?;
    Ok(Json(envelope(result)))
}

async fn players_list(
    State(state): State<ServiceState>,
    query: Result<Query<PlayerQuery>, QueryRejection>,
) -> Result<Json<Vec<PlayerRecord>>, ServiceError> {
    let Query(query) = query?;
    Ok(Json(state.api.list_players(&query)?))
}

async fn players_count(
    State(state): State<ServiceState>,
    query: Result<Query<PlayerQuery>, QueryRejection>,
) -> Result<Json<usize>, ServiceError> {
    let Query(query) = query?;
    Ok(Json(state.api.count_players(&query)?))
}

async fn player_create(
    State(state): State<ServiceState>,
    body: Bytes,
) -> Result<Json<PlayerRecord>, ServiceError> {
    let body = json_body(&body)?;
    Ok(Json(state.api.create_player(&body)?))
}

async fn player_show(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<Json<PlayerRecord>, ServiceError> {
    Ok(Json(state.api.get_player(&id)?))
}

async fn player_update(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<PlayerRecord>, ServiceError> {
    let body = json_body(&body)?;
    Ok(Json(state.api.update_player(&id, &body)?))
}

async fn player_delete(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    state.api.delete_player(&id)?;
    Ok(StatusCode::OK)
}
