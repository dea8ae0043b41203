//! Session API handlers.
//!
//! ```text
//! POST   /api/v1/sessions {"username":"admin","password":"password"}
//! GET    /api/v1/sessions/current
//! DELETE /api/v1/sessions/current
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{LoginCredentials, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{PASSWORD, USERNAME, map_credentials_error, required};

/// Login request body for `POST /api/v1/sessions`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: Option<String>,
    #[schema(example = "password")]
    pub password: Option<String>,
}

fn parse_login_request(payload: LoginRequest) -> ApiResult<LoginCredentials> {
    let username = required(payload.username, USERNAME)?;
    let password = required(payload.password, PASSWORD)?;
    LoginCredentials::try_from_parts(&username, &password)
        .map_err(|err| map_credentials_error(&err))
}

/// Authenticate and establish a session.
///
/// Unknown usernames and wrong passwords are indistinguishable to the
/// client.
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "login",
    security([])
)]
#[post("/sessions")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<User>> {
    let credentials = parse_login_request(payload.into_inner())?;
    let user = state.login.login(&credentials).await?;
    session.persist_user(&user)?;
    info!(username = %user.username(), role = %user.role(), "session established");
    Ok(web::Json(user))
}

/// Return the account behind the current session.
#[utoipa::path(
    get,
    path = "/api/v1/sessions/current",
    responses(
        (status = 200, description = "Current user", body = UserSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "currentSession"
)]
#[get("/sessions/current")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let caller = session.require_caller()?;
    let user = state
        .accounts_query
        .get_user(&caller, caller.username())
        .await?;
    Ok(web::Json(user))
}

/// End the current session.
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/current",
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "logout"
)]
#[delete("/sessions/current")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    session.clear();
    info!(username = %caller.username(), "session ended");
    Ok(HttpResponse::NoContent().finish())
}
