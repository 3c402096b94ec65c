// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::session::{SessionUser, bearer_token};
use securo_case_api::{
    ApiError, CaseDetailResponse, CaseListResponse, ClientResponse, CreateCaseRequest,
    CreateClientRequest, HistoryEntryResponse, ListCasesQuery, LoginRequest, LoginResponse,
    StatusInfo, UpdateCaseRequest, UserInfo,
};
use securo_case_persistence::Persistence;

/// SecuroHelp Case Server - HTTP server for the case-management backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a mutex; together with the
/// re-reads inside each transition transaction this serializes writers,
/// so two racing status changes cannot both capture the same previous
/// status.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer for cases, the catalog, and the ledger.
    pub persistence: Arc<Mutex<Persistence>>,
}

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
struct HistoryQuery {
    /// `asc` for chronological, anything else for most-recent-first.
    order: Option<String>,
}

/// Response body for deletions.
#[derive(Debug, Clone, Serialize)]
struct DeleteResponse {
    message: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::ValidationFailed { .. } | ApiError::InvalidStatus { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(email = %req.email, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = securo_case_api::login(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let token: String = bearer_token(&headers)
        .map_err(|_| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Missing Authorization header"),
        })?
        .to_string();

    let mut persistence = app_state.persistence.lock().await;
    securo_case_api::logout(&mut persistence, &token)?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/auth/me`.
async fn handle_whoami(SessionUser(_, data): SessionUser) -> Json<UserInfo> {
    Json(securo_case_api::whoami(&data))
}

/// Handler for GET `/case-statuses`.
///
/// Returns the active status catalog ordered by `sort_order`.
async fn handle_list_statuses(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
) -> Result<Json<Vec<StatusInfo>>, HttpError> {
    info!(email = %user.email, "Handling list_statuses request");

    let mut persistence = app_state.persistence.lock().await;
    let statuses: Vec<StatusInfo> = securo_case_api::list_statuses(&mut persistence)?;
    drop(persistence);

    Ok(Json(statuses))
}

/// Handler for GET `/cases`.
async fn handle_list_cases(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Query(query): Query<ListCasesQuery>,
) -> Result<Json<CaseListResponse>, HttpError> {
    info!(email = %user.email, "Handling list_cases request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CaseListResponse = securo_case_api::list_cases(&mut persistence, &query)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases`.
///
/// Creates a case; the initial ledger entry is written atomically with
/// the row.
async fn handle_create_case(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Json(req): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<CaseDetailResponse>), HttpError> {
    info!(email = %user.email, "Handling create_case request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CaseDetailResponse =
        securo_case_api::create_case(&mut persistence, &req, &user)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/cases/{id}`.
///
/// The response includes the full `statusHistory`, most recent first.
async fn handle_get_case(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(case_id): Path<i64>,
) -> Result<Json<CaseDetailResponse>, HttpError> {
    info!(email = %user.email, case_id, "Handling get_case request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CaseDetailResponse = securo_case_api::get_case(&mut persistence, case_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/cases/{id}`.
///
/// A `statusId` differing from the stored value runs the transition
/// controller before the remaining field edits are persisted.
async fn handle_update_case(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(case_id): Path<i64>,
    Json(req): Json<UpdateCaseRequest>,
) -> Result<Json<CaseDetailResponse>, HttpError> {
    info!(email = %user.email, case_id, "Handling update_case request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CaseDetailResponse =
        securo_case_api::update_case(&mut persistence, case_id, &req, &user)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/cases/{id}`.
async fn handle_delete_case(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(case_id): Path<i64>,
) -> Result<Json<DeleteResponse>, HttpError> {
    info!(email = %user.email, case_id, "Handling delete_case request");

    let mut persistence = app_state.persistence.lock().await;
    securo_case_api::delete_case(&mut persistence, case_id, &user)?;
    drop(persistence);

    Ok(Json(DeleteResponse {
        message: String::from("Sprawa została usunięta"),
    }))
}

/// Handler for GET `/cases/{id}/history`.
async fn handle_case_history(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(case_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntryResponse>>, HttpError> {
    info!(email = %user.email, case_id, "Handling case_history request");

    let descending: bool = query.order.as_deref() != Some("asc");

    let mut persistence = app_state.persistence.lock().await;
    let history: Vec<HistoryEntryResponse> =
        securo_case_api::get_case_history(&mut persistence, case_id, descending)?;
    drop(persistence);

    Ok(Json(history))
}

/// Handler for GET `/clients`.
async fn handle_list_clients(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
) -> Result<Json<Vec<ClientResponse>>, HttpError> {
    info!(email = %user.email, "Handling list_clients request");

    let mut persistence = app_state.persistence.lock().await;
    let clients: Vec<ClientResponse> = securo_case_api::list_clients(&mut persistence)?;
    drop(persistence);

    Ok(Json(clients))
}

/// Handler for POST `/clients`.
async fn handle_create_client(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Json(req): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), HttpError> {
    info!(email = %user.email, "Handling create_client request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ClientResponse =
        securo_case_api::create_client(&mut persistence, &req, &user)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/me", get(handle_whoami))
        .route("/case-statuses", get(handle_list_statuses))
        .route("/cases", get(handle_list_cases))
        .route("/cases", post(handle_create_case))
        .route(
            "/cases/{case_id}",
            put(handle_update_case)
                .get(handle_get_case)
                .delete(handle_delete_case),
        )
        .route("/cases/{case_id}/history", get(handle_case_history))
        .route("/clients", get(handle_list_clients))
        .route("/clients", post(handle_create_client))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing SecuroHelp Case Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence and a
    /// seeded agent and client.
    async fn create_test_app() -> Router {
        let mut persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        persistence
            .create_user(
                "agent@securohelp.pl",
                "Anna",
                "Agentka",
                "tajnehaslo123",
                "AGENT",
            )
            .expect("Failed to seed user");
        let user_id = persistence
            .get_user_by_email("agent@securohelp.pl")
            .expect("query succeeds")
            .expect("user exists")
            .user_id;
        persistence
            .create_client("Jan", "Kowalski", None, None, Some("Warszawa"), user_id)
            .expect("Failed to seed client");

        let app_state: AppState = AppState {
            persistence: Arc::new(Mutex::new(persistence)),
        };
        build_router(app_state)
    }

    /// Sends a JSON request and returns the status and parsed body.
    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (HttpStatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = if let Some(body) = body {
            builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Logs in as the seeded agent and returns the session token.
    async fn login_token(app: &Router) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/auth/login",
            None,
            Some(json!({
                "email": "agent@securohelp.pl",
                "password": "tajnehaslo123",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        body["token"].as_str().expect("token present").to_string()
    }

    /// Creates a case for client 1 and returns its id.
    async fn create_case(app: &Router, token: &str) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/cases",
            Some(token),
            Some(json!({
                "clientId": 1,
                "incidentDate": "2026-07-15",
                "incidentDescription": "Kolizja na skrzyżowaniu",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CREATED);
        body["caseId"].as_i64().expect("caseId present")
    }

    #[tokio::test]
    async fn test_login_returns_token_and_user() {
        let app = create_test_app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({
                "email": "agent@securohelp.pl",
                "password": "tajnehaslo123",
            })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert!(body["token"].as_str().is_some());
        assert_eq!(body["user"]["email"], "agent@securohelp.pl");
        assert_eq!(body["user"]["role"], "AGENT");
    }

    #[tokio::test]
    async fn test_bad_credentials_are_unauthorized() {
        let app = create_test_app().await;

        let (status, _) = send(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({
                "email": "agent@securohelp.pl",
                "password": "zlehaslo",
            })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_requests_without_token_are_unauthorized() {
        let app = create_test_app().await;

        for uri in ["/cases", "/case-statuses", "/clients", "/auth/me"] {
            let (status, _) = send(&app, "GET", uri, None, None).await;
            assert_eq!(status, HttpStatusCode::UNAUTHORIZED, "uri {uri}");
        }
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let app = create_test_app().await;

        let (status, _) = send(&app, "GET", "/cases", Some("wrong-token"), None).await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_whoami_returns_profile() {
        let app = create_test_app().await;
        let token = login_token(&app).await;

        let (status, body) = send(&app, "GET", "/auth/me", Some(&token), None).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["firstName"], "Anna");
        assert_eq!(body["lastName"], "Agentka");
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let app = create_test_app().await;
        let token = login_token(&app).await;

        let (status, _) = send(&app, "POST", "/auth/logout", Some(&token), None).await;
        assert_eq!(status, HttpStatusCode::NO_CONTENT);

        let (status, _) = send(&app, "GET", "/auth/me", Some(&token), None).await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_case_statuses_are_ordered() {
        let app = create_test_app().await;
        let token = login_token(&app).await;

        let (status, body) = send(&app, "GET", "/case-statuses", Some(&token), None).await;

        assert_eq!(status, HttpStatusCode::OK);
        let statuses = body.as_array().expect("array body");
        assert_eq!(statuses.len(), 8);
        assert_eq!(statuses[0]["code"], "NEW");
        assert_eq!(statuses[7]["code"], "CLOSED");
        assert_eq!(statuses[7]["isFinal"], true);
    }

    #[tokio::test]
    async fn test_create_case_returns_201_with_initial_history() {
        let app = create_test_app().await;
        let token = login_token(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/cases",
            Some(&token),
            Some(json!({
                "clientId": 1,
                "incidentDate": "2026-07-15",
            })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::CREATED);
        assert_eq!(body["status"]["code"], "NEW");
        assert!(
            body["caseNumber"]
                .as_str()
                .expect("caseNumber present")
                .starts_with("SH/")
        );
        let history = body["statusHistory"].as_array().expect("history present");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["fromStatusId"], Value::Null);
        assert_eq!(history[0]["comment"], "Sprawa utworzona");
    }

    #[tokio::test]
    async fn test_create_case_without_client_is_bad_request() {
        let app = create_test_app().await;
        let token = login_token(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/cases",
            Some(&token),
            Some(json!({ "incidentDate": "2026-07-15" })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_put_status_change_appends_history_and_milestones() {
        let app = create_test_app().await;
        let token = login_token(&app).await;
        let case_id = create_case(&app, &token).await;

        // The wire format tolerates string status ids.
        let (status, body) = send(
            &app,
            "PUT",
            &format!("/cases/{case_id}"),
            Some(&token),
            Some(json!({
                "statusId": "3",
                "statusComment": "dokumenty wysłane",
            })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["status"]["code"], "SENT_TO_INSURER");
        assert!(body["documentsSentDate"].as_str().is_some());

        let history = body["statusHistory"].as_array().expect("history present");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["comment"], "dokumenty wysłane");
        assert_eq!(history[0]["toStatusName"], "Wysłana do ubezpieczyciela");
    }

    #[tokio::test]
    async fn test_put_with_unknown_status_is_bad_request() {
        let app = create_test_app().await;
        let token = login_token(&app).await;
        let case_id = create_case(&app, &token).await;

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/cases/{case_id}"),
            Some(&token),
            Some(json!({ "statusId": 9999 })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_missing_case_is_not_found() {
        let app = create_test_app().await;
        let token = login_token(&app).await;

        let (status, _) = send(&app, "GET", "/cases/4242", Some(&token), None).await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_hides_case_but_keeps_history() {
        let app = create_test_app().await;
        let token = login_token(&app).await;
        let case_id = create_case(&app, &token).await;

        let (status, _) = send(
            &app,
            "DELETE",
            &format!("/cases/{case_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, _) = send(&app, "GET", &format!("/cases/{case_id}"), Some(&token), None).await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            "GET",
            &format!("/cases/{case_id}/history"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body.as_array().expect("array body").len(), 1);
    }

    #[tokio::test]
    async fn test_history_endpoint_supports_ascending_order() {
        let app = create_test_app().await;
        let token = login_token(&app).await;
        let case_id = create_case(&app, &token).await;

        send(
            &app,
            "PUT",
            &format!("/cases/{case_id}"),
            Some(&token),
            Some(json!({ "statusId": 3 })),
        )
        .await;

        let (status, body) = send(
            &app,
            "GET",
            &format!("/cases/{case_id}/history?order=asc"),
            Some(&token),
            None,
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        let history = body.as_array().expect("array body");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["fromStatusId"], Value::Null);
        assert_eq!(history[1]["fromStatusId"], 1);
    }

    #[tokio::test]
    async fn test_case_listing_paginates() {
        let app = create_test_app().await;
        let token = login_token(&app).await;
        for _ in 0..3 {
            create_case(&app, &token).await;
        }

        let (status, body) = send(&app, "GET", "/cases?page=1&limit=2", Some(&token), None).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["cases"].as_array().expect("array").len(), 2);
        assert_eq!(body["pagination"]["total"], 3);
        assert_eq!(body["pagination"]["totalPages"], 2);
    }

    #[tokio::test]
    async fn test_client_endpoints_round_trip() {
        let app = create_test_app().await;
        let token = login_token(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/clients",
            Some(&token),
            Some(json!({
                "firstName": "Anna",
                "lastName": "Nowak",
                "city": "Kraków",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CREATED);
        assert_eq!(body["lastName"], "Nowak");

        let (status, body) = send(&app, "GET", "/clients", Some(&token), None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body.as_array().expect("array body").len(), 2);
    }
}
