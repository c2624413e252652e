//! Role registry
//!
//! Roles are named, reusable sets of permissions. Built-in roles ship with
//! the engine and are re-asserted by reconciliation on every startup; custom
//! roles are administrator-defined and never auto-reconciled.

mod builtin;
mod registry;
mod types;

pub use builtin::BuiltinRole;
pub use registry::{ReconcileReport, RoleRegistry};
pub use types::{Role, RoleKind};
