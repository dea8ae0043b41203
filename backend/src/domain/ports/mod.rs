//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`LoginService`], [`UserAccountsCommand`],
//! [`UserAccountsQuery`]) are called by inbound adapters. The driven
//! [`UserRepository`] port is implemented by persistence adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod user_accounts_command;
mod user_accounts_query;
mod user_repository;

#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use user_accounts_command::MockUserAccountsCommand;
pub use user_accounts_command::UserAccountsCommand;
#[cfg(test)]
pub use user_accounts_query::MockUserAccountsQuery;
pub use user_accounts_query::UserAccountsQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewAccount, StoredAccount, UserPersistenceError, UserRepository};
