//! # polyglot-acl
//!
//! Permission-resolution engine for localization platforms. Given a user, a
//! permission and a target (project, component or a translation into one
//! language), the engine decides whether the action is allowed, based on
//! team membership, role assignment and scoped targeting rules.
//!
//! ## Features
//!
//! - **Static permission catalog**: atomic capabilities tagged with the
//!   scope category they apply to (instance, project, component,
//!   translation)
//! - **Built-in and custom roles**: shipped roles are reconciled on every
//!   startup; custom roles are administrator-defined
//! - **Scoped teams**: component-list, component and project selectors with
//!   strict precedence, plus optional language restrictions
//! - **Access modes**: Public/Protected/Private projects carry a default
//!   team family; Custom projects are governed only by explicit teams
//! - **Lock-free read path**: checks run against a consistent snapshot and
//!   never block on writers
//! - **Guarded administration**: every mutation is permission-checked
//!   through the resolver itself
//!
//! ## Quick start
//!
//! ```rust
//! use polyglot_acl::{AccessEngine, AccessMode, Permission, Target};
//!
//! fn main() -> polyglot_acl::Result<()> {
//!     let engine = AccessEngine::with_defaults()?;
//!     engine.register_language("es", "Spanish")?;
//!     let project = engine.create_project("fusion", AccessMode::Public)?;
//!     let component = engine.register_component(project, "ui", false)?;
//!
//!     // The default team family was provisioned with the project.
//!     let translators = engine.snapshot().team_by_name("fusion/Translate").unwrap().id;
//!
//!     let root = engine.register_user("root", "root@example.com")?;
//!     engine.set_superuser(root, true)?;
//!     let user = engine.register_user("ana", "ana@example.com")?;
//!     engine.admin(root).add_member(translators, user)?;
//!
//!     assert!(engine.has_permission(
//!         user,
//!         Permission::StringsEdit,
//!         &Target::translation(component, "es"),
//!     ));
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod resolver;
pub mod roles;
pub mod scope;
pub mod store;
pub mod utils;

// Re-export main types
pub use catalog::{Permission, ScopeCategory};
pub use config::EngineConfig;
pub use engine::{AccessEngine, AdminApi};
pub use resolver::Target;
pub use roles::{BuiltinRole, ReconcileReport, Role, RoleKind, RoleRegistry};
pub use scope::{
    AccessMode, Component, ComponentList, EffectiveScope, Language, LanguageRestriction, Project,
    ProjectPredicate, Selector, SelectorKind, TeamScope,
};
pub use store::{
    AccessModeTransition, AutoAssignRule, IdentityAttribute, Team, User, World,
    DEFAULT_TEAM_FAMILY, TEAM_USERS, TEAM_VIEWERS,
};
pub use utils::error::{AccessError, Result};
