//! Content entity types
//!
//! These objects are owned by the content-management subsystem and mirrored
//! into the engine; the engine only reads the fields relevant to access
//! resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Per-project access mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Browsable by everyone through the instance-wide default teams
    Public,
    /// Browsable only through explicit membership; web-layer read-only
    /// exposure is handled outside the engine
    Protected,
    /// Browsable only through explicit membership
    Private,
    /// No default teams at all; only explicitly created teams govern access
    Custom,
}

impl AccessMode {
    /// Whether this mode provisions the per-project default-team family
    pub fn provisions_default_teams(self) -> bool {
        !matches!(self, AccessMode::Custom)
    }
}

/// Project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project ID
    pub id: Uuid,
    /// URL slug (unique)
    pub slug: String,
    /// Access mode
    pub access_mode: AccessMode,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project
    pub fn new(slug: impl Into<String>, access_mode: AccessMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug: slug.into(),
            access_mode,
            created_at: Utc::now(),
        }
    }
}

/// Component, belonging to exactly one project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Component ID
    pub id: Uuid,
    /// Owning project
    pub project: Uuid,
    /// URL slug (unique within the project)
    pub slug: String,
    /// Restricted components require explicit selector coverage; project
    /// selectors never reach them
    pub restricted: bool,
}

impl Component {
    /// Create a new component
    pub fn new(project: Uuid, slug: impl Into<String>, restricted: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            project,
            slug: slug.into(),
            restricted,
        }
    }
}

/// Named, administrator-curated set of components
///
/// Purely a selector convenience, not an ownership relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentList {
    /// List ID
    pub id: Uuid,
    /// List name (unique)
    pub name: String,
    /// Member components
    pub components: BTreeSet<Uuid>,
}

impl ComponentList {
    /// Create a new component list
    pub fn new(name: impl Into<String>, components: BTreeSet<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            components,
        }
    }
}

/// Language catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Language code, e.g. `es` or `pt_BR`
    pub code: String,
    /// English name
    pub name: String,
}

impl Language {
    /// Create a new language entry
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}
