//! Wiring of the account service onto the HTTP ports.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use accounts::domain::UserService;
use accounts::inbound::http::state::HttpState;
use accounts::outbound::persistence::{DbPool, DieselUserRepository};

/// Build the shared HTTP state backed by PostgreSQL.
pub(crate) fn build_http_state(pool: DbPool) -> web::Data<HttpState> {
    let repository = Arc::new(DieselUserRepository::new(pool));
    let service = UserService::new(repository, Arc::new(DefaultClock));
    web::Data::new(HttpState::from_service(service))
}
