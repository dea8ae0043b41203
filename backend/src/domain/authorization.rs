//! Access rules for account operations.
//!
//! Each rule is a pure function of the caller's identity and role and the
//! target account, so services can evaluate it before touching storage.

use super::user::{Role, User, Username};

/// Authenticated principal issuing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    username: Username,
    role: Role,
}

impl Caller {
    /// Build a caller from session data.
    pub fn new(username: Username, role: Role) -> Self {
        Self { username, role }
    }

    /// Caller's username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Caller's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the caller holds [`Role::Admin`].
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether `username` names the caller's own account.
    pub fn is(&self, username: &Username) -> bool {
        &self.username == username
    }
}

/// Reason an operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    /// Caller may only act on their own account.
    #[error("caller is not authorized")]
    NotOwner,
    /// Target is an Admin account owned by someone else.
    #[error("caller is not authorized to change an admin")]
    ProtectedAdmin,
}

/// Admins read anyone; everyone else reads only themselves.
///
/// # Examples
/// ```
/// use accounts::domain::{AccessDenied, Caller, Role, Username, authorize_read};
///
/// let caller = Caller::new(Username::new("user1").unwrap(), Role::Customer);
/// let other = Username::new("user2").unwrap();
/// assert_eq!(authorize_read(&caller, &other), Err(AccessDenied::NotOwner));
/// ```
pub fn authorize_read(caller: &Caller, target: &Username) -> Result<(), AccessDenied> {
    if caller.is_admin() || caller.is(target) {
        Ok(())
    } else {
        Err(AccessDenied::NotOwner)
    }
}

/// Admin accounts may only be deleted by themselves, even by other Admins.
/// Non-admins may only delete themselves.
pub fn authorize_delete(caller: &Caller, target: &User) -> Result<(), AccessDenied> {
    let own_account = caller.is(target.username());
    if target.role().is_admin() && !own_account {
        return Err(AccessDenied::ProtectedAdmin);
    }
    if !caller.is_admin() && !own_account {
        return Err(AccessDenied::NotOwner);
    }
    Ok(())
}

/// Admins may edit anyone except a different Admin. Non-admins may only edit
/// themselves.
pub fn authorize_update(caller: &Caller, target: &User) -> Result<(), AccessDenied> {
    let own_account = caller.is(target.username());
    if caller.is_admin() && target.role().is_admin() && !own_account {
        return Err(AccessDenied::ProtectedAdmin);
    }
    if !caller.is_admin() && !own_account {
        return Err(AccessDenied::NotOwner);
    }
    Ok(())
}
