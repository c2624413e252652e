//! Scope model
//!
//! The object graph a team's grants apply to: projects, components,
//! component lists and languages, plus the selector types a team can carry
//! and the per-project access mode.

mod selector;
mod types;

pub use selector::{
    EffectiveScope, LanguageRestriction, ProjectPredicate, Selector, SelectorKind, TeamScope,
};
pub use types::{AccessMode, Component, ComponentList, Language, Project};
