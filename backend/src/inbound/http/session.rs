//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The signed cookie session records the authenticated username and role.
//! Handlers turn it into a domain [`Caller`] and never touch raw keys.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde_json::json;
use tracing::warn;

use crate::domain::{Caller, Error, Role, User, Username};

pub(crate) const USERNAME_KEY: &str = "username";
pub(crate) const ROLE_KEY: &str = "role";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record `user` as the authenticated caller.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USERNAME_KEY, user.username().as_ref())
            .and_then(|()| self.0.insert(ROLE_KEY, user.role().as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop all session state.
    pub fn clear(&self) {
        self.0.purge();
    }

    fn read(&self, key: &str) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// The authenticated caller, if the session holds a valid one.
    ///
    /// Entries that no longer parse are treated as a missing login.
    pub fn caller(&self) -> Result<Option<Caller>, Error> {
        let (Some(username), Some(role)) = (self.read(USERNAME_KEY)?, self.read(ROLE_KEY)?) else {
            return Ok(None);
        };
        let username = match Username::new(username) {
            Ok(username) => username,
            Err(error) => {
                warn!("invalid username in session cookie: {error}");
                return Ok(None);
            }
        };
        match role.parse::<Role>() {
            Ok(role) => Ok(Some(Caller::new(username, role))),
            Err(error) => {
                warn!("invalid role in session cookie: {error}");
                Ok(None)
            }
        }
    }

    /// Require a logged-in caller or return `401 Unauthorized`.
    pub fn require_caller(&self) -> Result<Caller, Error> {
        self.caller()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require a logged-in Admin.
    ///
    /// Other roles get `401 Unauthorized` with the `user_not_admin` detail.
    pub fn require_admin(&self) -> Result<Caller, Error> {
        let caller = self.require_caller()?;
        if caller.is_admin() {
            Ok(caller)
        } else {
            Err(Error::unauthorized("user is not an admin")
                .with_details(json!({ "code": "user_not_admin" })))
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
