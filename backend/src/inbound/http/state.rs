//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::UserService;
use crate::domain::ports::{LoginService, UserAccountsCommand, UserAccountsQuery, UserRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn UserAccountsCommand>,
    pub accounts_query: Arc<dyn UserAccountsQuery>,
}

impl HttpState {
    /// Construct state from individual port implementations.
    pub fn new(
        login: Arc<dyn LoginService>,
        accounts: Arc<dyn UserAccountsCommand>,
        accounts_query: Arc<dyn UserAccountsQuery>,
    ) -> Self {
        Self {
            login,
            accounts,
            accounts_query,
        }
    }

    /// Wire every port to a single [`UserService`].
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use accounts::domain::UserService;
    /// use accounts::inbound::http::state::HttpState;
    /// use accounts::test_support::InMemoryUserRepository;
    /// use mockable::DefaultClock;
    ///
    /// let service = UserService::new(
    ///     Arc::new(InMemoryUserRepository::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// let state = HttpState::from_service(service);
    /// let _login = state.login.clone();
    /// ```
    pub fn from_service<R>(service: UserService<R>) -> Self
    where
        R: UserRepository + 'static,
    {
        let service = Arc::new(service);
        Self::new(service.clone(), service.clone(), service)
    }
}
