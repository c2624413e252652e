//! Role type definitions

use crate::catalog::Permission;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role name (unique)
    pub name: String,
    /// Whether the role is built-in or administrator-defined
    pub kind: RoleKind,
    /// Permissions granted by this role
    pub permissions: BTreeSet<Permission>,
}

/// Role kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    /// Shipped with the engine, content re-asserted on every reconciliation
    Builtin,
    /// Administrator-defined, freely editable, never auto-reconciled
    Custom,
}

impl Role {
    /// Whether this role is built-in
    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, RoleKind::Builtin)
    }

    /// Whether this role grants the given permission
    pub fn grants(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}
