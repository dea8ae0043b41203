//! HTTP inbound adapter exposing the account REST endpoints.

pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod sessions;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` endpoint on `cfg`.
///
/// `/users/roles/{role}` is registered before `/users/{username}` so the
/// literal segment wins.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(sessions::login)
            .service(sessions::current_session)
            .service(sessions::logout)
            .service(users::create_user)
            .service(users::list_users)
            .service(users::delete_all_users)
            .service(users::list_users_by_role)
            .service(users::get_user)
            .service(users::delete_user)
            .service(users::update_user),
    );
}
