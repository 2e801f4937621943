//! Identity context and role-based action gating.
//!
//! The identity is an explicit value established at the boundary and passed
//! where it is needed; nothing reads ambient global state. Gating is a pure
//! function of (action, role), mirroring the service's own authorization
//! rules, so the client can tell a user up front what the server will allow.

use anyhow::{Context, Result};

use crate::api::InspectionApi;
use crate::schema::{Role, UserRecord};

/// Actions whose availability depends on the user's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListAllInspections,
    ViewInspection,
    CreateInspection,
    DeleteInspection,
    TransitionInspection,
    EditSteps,
}

/// Pure role gate, matching the service's authorization rules: listing,
/// creating, and deleting inspections are admin-only; viewing, transitions,
/// and step edits are open to inspectors as well.
pub fn permits(role: Role, action: Action) -> bool {
    match action {
        Action::ListAllInspections | Action::CreateInspection | Action::DeleteInspection => {
            role == Role::Admin
        }
        Action::ViewInspection | Action::TransitionInspection | Action::EditSteps => {
            matches!(role, Role::Admin | Role::Inspector)
        }
    }
}

/// Authenticated identity for one client session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: UserRecord,
}

impl Session {
    /// Validate credentials against the service and capture the identity.
    pub fn establish(api: &dyn InspectionApi, username: &str, password: &str) -> Result<Self> {
        let user = api
            .login(username, password)
            .with_context(|| format!("login for user '{username}'"))?;
        tracing::info!(user = %user.username, role = ?user.role, "login successful");
        Ok(Session { user })
    }

    pub fn permits(&self, action: Action) -> bool {
        permits(self.user.role, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_may_do_everything() {
        for action in [
            Action::ListAllInspections,
            Action::ViewInspection,
            Action::CreateInspection,
            Action::DeleteInspection,
            Action::TransitionInspection,
            Action::EditSteps,
        ] {
            assert!(permits(Role::Admin, action));
        }
    }

    #[test]
    fn inspector_is_limited_to_execution() {
        assert!(permits(Role::Inspector, Action::ViewInspection));
        assert!(permits(Role::Inspector, Action::TransitionInspection));
        assert!(permits(Role::Inspector, Action::EditSteps));
        assert!(!permits(Role::Inspector, Action::ListAllInspections));
        assert!(!permits(Role::Inspector, Action::CreateInspection));
        assert!(!permits(Role::Inspector, Action::DeleteInspection));
    }
}
