//! Store entity types

use crate::scope::{LanguageRestriction, TeamScope};
use crate::utils::error::{AccessError, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// User identity, mirrored from the authentication subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: Uuid,
    /// Username (unique)
    pub username: String,
    /// E-mail address
    pub email: String,
    /// Superusers bypass every permission check
    pub is_superuser: bool,
    /// Deactivated users resolve to no access
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new active, non-privileged user
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            is_superuser: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// Identity attribute an automatic-assignment rule matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityAttribute {
    /// Match against the e-mail address
    Email,
    /// Match against the username
    Username,
}

/// Automatic-assignment rule attached to a team
///
/// The regular expression is compiled once, when the rule is defined;
/// a pattern that fails to compile never enters live state. Rules are
/// evaluated exactly once, at account creation, and never re-evaluated
/// on later profile edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RuleSpec", into = "RuleSpec")]
pub struct AutoAssignRule {
    attribute: IdentityAttribute,
    pattern: String,
    regex: Regex,
}

#[derive(Serialize, Deserialize)]
struct RuleSpec {
    attribute: IdentityAttribute,
    pattern: String,
}

impl TryFrom<RuleSpec> for AutoAssignRule {
    type Error = AccessError;

    fn try_from(spec: RuleSpec) -> Result<Self> {
        AutoAssignRule::new(spec.attribute, &spec.pattern)
    }
}

impl From<AutoAssignRule> for RuleSpec {
    fn from(rule: AutoAssignRule) -> Self {
        RuleSpec {
            attribute: rule.attribute,
            pattern: rule.pattern,
        }
    }
}

impl AutoAssignRule {
    /// Compile a new rule, rejecting malformed patterns
    pub fn new(attribute: IdentityAttribute, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|err| {
            AccessError::validation(format!("invalid assignment pattern `{pattern}`: {err}"))
        })?;
        Ok(Self {
            attribute,
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The attribute this rule inspects
    pub fn attribute(&self) -> IdentityAttribute {
        self.attribute
    }

    /// The source pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the rule matches the given user
    pub fn matches(&self, user: &User) -> bool {
        let value = match self.attribute {
            IdentityAttribute::Email => &user.email,
            IdentityAttribute::Username => &user.username,
        };
        self.regex.is_match(value)
    }
}

/// Team: the central grouping of users, roles and a scope selector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Team ID
    pub id: Uuid,
    /// Team name (unique)
    pub name: String,
    /// Project-scoped teams cascade away with their project
    pub defining_project: Option<Uuid>,
    /// Engine-managed teams (per-project default family, instance-wide
    /// Users/Viewers) cannot be deleted by administrators
    pub is_system: bool,
    /// Member users
    pub members: BTreeSet<Uuid>,
    /// Assigned roles, by registry name
    pub roles: BTreeSet<String>,
    /// Scope selector slots
    pub scope: TeamScope,
    /// Optional language restriction on translation-category permissions
    pub language_restriction: LanguageRestriction,
    /// Automatic-assignment rules
    pub auto_assign: Vec<AutoAssignRule>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new empty team
    pub fn new(name: impl Into<String>, defining_project: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            defining_project,
            is_system: false,
            members: BTreeSet::new(),
            roles: BTreeSet::new(),
            scope: TeamScope::empty(),
            language_restriction: LanguageRestriction::All,
            auto_assign: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user is a member
    pub fn has_member(&self, user: Uuid) -> bool {
        self.members.contains(&user)
    }

    /// Record a mutation
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
