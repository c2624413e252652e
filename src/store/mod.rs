//! Team store
//!
//! Users, teams, membership, role assignment, selector editing and
//! automatic-assignment rules, plus the authoritative in-memory [`World`]
//! the resolver reads.

mod auto_assign;
mod types;
mod world;

pub use types::{AutoAssignRule, IdentityAttribute, Team, User};
pub use world::{AccessModeTransition, World, DEFAULT_TEAM_FAMILY, TEAM_USERS, TEAM_VIEWERS};
