//! Users API handlers.
//!
//! ```text
//! POST   /api/v1/users {"username":"mario","name":"Mario","surname":"Rossi",
//!                       "password":"secret","role":"Customer"}
//! GET    /api/v1/users
//! GET    /api/v1/users/roles/Manager
//! GET    /api/v1/users/mario
//! PATCH  /api/v1/users/mario {"name":"Mario","surname":"Rossi","birthdate":"1990-05-17"}
//! DELETE /api/v1/users/mario
//! DELETE /api/v1/users
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Registration, User, UserProfile, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ADDRESS, NAME, PASSWORD, ROLE, SURNAME, USERNAME, map_credentials_error,
    map_user_validation_error, non_blank_optional, parse_optional_birthdate, parse_role, required,
};

/// Registration body for `POST /api/v1/users`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "mario")]
    pub username: Option<String>,
    #[schema(example = "Mario")]
    pub name: Option<String>,
    #[schema(example = "Rossi")]
    pub surname: Option<String>,
    #[schema(example = "secret")]
    pub password: Option<String>,
    /// One of `Customer`, `Manager`, or `Admin`.
    #[schema(example = "Customer")]
    pub role: Option<String>,
}

/// Profile update body for `PATCH /api/v1/users/{username}`.
///
/// Omitting `address` or `birthdate` clears the stored value.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[schema(example = "Mario")]
    pub name: Option<String>,
    #[schema(example = "Rossi")]
    pub surname: Option<String>,
    #[schema(example = "Via Roma 1, Milano")]
    pub address: Option<String>,
    /// Calendar date formatted `YYYY-MM-DD`.
    #[schema(example = "1990-05-17")]
    pub birthdate: Option<String>,
}

fn parse_create_request(payload: CreateUserRequest) -> ApiResult<Registration> {
    let username = required(payload.username, USERNAME)?;
    let name = required(payload.name, NAME)?;
    let surname = required(payload.surname, SURNAME)?;
    let password = required(payload.password, PASSWORD)?;
    let role = parse_role(&required(payload.role, ROLE)?)?;
    Registration::try_new(&username, &name, &surname, &password, role)
        .map_err(|err| map_credentials_error(&err))
}

fn parse_update_request(payload: UpdateUserRequest) -> ApiResult<UserProfile> {
    let name = required(payload.name, NAME)?;
    let surname = required(payload.surname, SURNAME)?;
    let address = non_blank_optional(payload.address, ADDRESS)?;
    let birthdate = parse_optional_birthdate(payload.birthdate.as_deref())?;

    let mut profile = UserProfile::new(name.trim(), surname.trim())
        .map_err(|err| map_user_validation_error(&err))?;
    if let Some(address) = address {
        profile = profile.with_address(address);
    }
    if let Some(birthdate) = birthdate {
        profile = profile.with_birthdate(birthdate);
    }
    Ok(profile)
}

fn parse_username(raw: &str) -> ApiResult<Username> {
    Username::new(raw).map_err(|err| map_user_validation_error(&err))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username already taken", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let registration = parse_create_request(payload.into_inner())?;
    state.accounts.create_user(&registration).await?;
    let created = User::new(
        registration.username().clone(),
        registration.role(),
        registration.profile().clone(),
    );
    Ok(HttpResponse::Created().json(created))
}

/// List every account. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users ordered by username", body = [UserSchema]),
        (status = 401, description = "Login required or caller is not an admin", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<User>>> {
    session.require_admin()?;
    Ok(web::Json(state.accounts_query.list_users().await?))
}

/// List accounts holding `role`. Admin only.
///
/// Unknown role names yield an empty list.
#[utoipa::path(
    get,
    path = "/api/v1/users/roles/{role}",
    params(("role" = String, Path, description = "Role name", example = "Manager")),
    responses(
        (status = 200, description = "Users with the role", body = [UserSchema]),
        (status = 401, description = "Login required or caller is not an admin", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsersByRole"
)]
#[get("/users/roles/{role}")]
pub async fn list_users_by_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<User>>> {
    session.require_admin()?;
    let role = path.into_inner();
    Ok(web::Json(
        state.accounts_query.list_users_by_role(&role).await?,
    ))
}

/// Fetch a single account.
///
/// Admins may read anyone; other callers only themselves.
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}",
    params(("username" = String, Path, description = "Account username")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Invalid username", body = ErrorSchema),
        (status = 401, description = "Login required or not permitted", body = ErrorSchema),
        (status = 404, description = "Unknown username", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{username}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let caller = session.require_caller()?;
    let target = parse_username(&path.into_inner())?;
    Ok(web::Json(
        state.accounts_query.get_user(&caller, &target).await?,
    ))
}

/// Delete a single account.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{username}",
    params(("username" = String, Path, description = "Account username")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Invalid username", body = ErrorSchema),
        (status = 401, description = "Login required, not permitted, or target is another admin", body = ErrorSchema),
        (status = 404, description = "Unknown username", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{username}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let target = parse_username(&path.into_inner())?;
    state.accounts.delete_user(&caller, &target).await?;
    if caller.is(&target) {
        session.clear();
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Delete every non-admin account. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/users",
    responses(
        (status = 204, description = "Non-admin accounts deleted"),
        (status = 401, description = "Login required or caller is not an admin", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteAllUsers"
)]
#[delete("/users")]
pub async fn delete_all_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    state.accounts.delete_all().await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Replace the editable profile of an account.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{username}",
    params(("username" = String, Path, description = "Account username")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid request or future birthdate", body = ErrorSchema),
        (status = 401, description = "Login required, not permitted, or target is another admin", body = ErrorSchema),
        (status = 404, description = "Unknown username", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{username}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let caller = session.require_caller()?;
    let target = parse_username(&path.into_inner())?;
    let profile = parse_update_request(payload.into_inner())?;
    Ok(web::Json(
        state
            .accounts
            .update_user_info(&caller, &target, profile)
            .await?,
    ))
}

#[cfg(test)]
mod tests;
