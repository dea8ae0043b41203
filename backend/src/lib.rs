//! Role-based user account service.
//!
//! The crate is laid out hexagonally: [`domain`] holds account types,
//! authorisation rules and the [`domain::UserService`]; [`outbound`] adapts
//! PostgreSQL to the repository port; [`inbound`] exposes the service over
//! HTTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
