//! Team scope selectors
//!
//! A team carries up to three selector slots. Only the highest-precedence
//! populated slot is evaluated (component list > components > projects); the
//! others stay inert but are retained for display and audit. Selector edits
//! report which slots are shadowed so administrators are not surprised by
//! the precedence rule.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use super::types::{AccessMode, Project};

/// Selector slot kinds, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKind {
    /// Component-list selector (highest precedence)
    ComponentList,
    /// Explicit component selector
    Components,
    /// Project selector, explicit or predicate-based (lowest precedence)
    Projects,
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SelectorKind::ComponentList => "component list",
            SelectorKind::Components => "components",
            SelectorKind::Projects => "projects",
        };
        f.write_str(label)
    }
}

/// Project selection predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPredicate {
    /// An explicit set of projects
    Explicit(BTreeSet<Uuid>),
    /// Every project, regardless of access mode
    All,
    /// Every project in Public mode; this is how the instance-wide default
    /// teams stay away from Protected, Private and Custom projects
    AllPublic,
}

impl ProjectPredicate {
    /// Whether the predicate selects the given project
    pub fn matches(&self, project: &Project) -> bool {
        match self {
            ProjectPredicate::Explicit(ids) => ids.contains(&project.id),
            ProjectPredicate::All => true,
            ProjectPredicate::AllPublic => project.access_mode == AccessMode::Public,
        }
    }
}

/// Language restriction on a team's translation-category permissions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageRestriction {
    /// No restriction
    #[default]
    All,
    /// Restricted to the given language codes
    Only(BTreeSet<String>),
}

impl LanguageRestriction {
    /// Whether translation actions in the given language pass the restriction
    ///
    /// A target without a language (component or project targets) passes only
    /// when the team is unrestricted.
    pub fn permits(&self, language: Option<&str>) -> bool {
        match self {
            LanguageRestriction::All => true,
            LanguageRestriction::Only(codes) => {
                language.is_some_and(|code| codes.contains(code))
            }
        }
    }
}

/// Selector edit payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// Point the team at a component list
    ComponentList(Uuid),
    /// Point the team at explicit components
    Components(BTreeSet<Uuid>),
    /// Point the team at projects
    Projects(ProjectPredicate),
}

impl Selector {
    /// Which slot this edit populates
    pub fn kind(&self) -> SelectorKind {
        match self {
            Selector::ComponentList(_) => SelectorKind::ComponentList,
            Selector::Components(_) => SelectorKind::Components,
            Selector::Projects(_) => SelectorKind::Projects,
        }
    }
}

/// The selector slots a team carries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScope {
    /// Component-list slot
    pub component_list: Option<Uuid>,
    /// Explicit-components slot; empty means unset
    pub components: BTreeSet<Uuid>,
    /// Projects slot
    pub projects: Option<ProjectPredicate>,
}

impl TeamScope {
    /// Scope with no populated selector
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scope selecting the given projects explicitly
    pub fn projects(ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            projects: Some(ProjectPredicate::Explicit(ids.into_iter().collect())),
            ..Self::default()
        }
    }

    /// The slot that will actually be evaluated, if any
    pub fn active_selector(&self) -> Option<SelectorKind> {
        if self.component_list.is_some() {
            Some(SelectorKind::ComponentList)
        } else if !self.components.is_empty() {
            Some(SelectorKind::Components)
        } else if self.projects.is_some() {
            Some(SelectorKind::Projects)
        } else {
            None
        }
    }

    /// Populated slots shadowed by a higher-precedence one
    pub fn shadowed_selectors(&self) -> Vec<SelectorKind> {
        let mut shadowed = Vec::new();
        match self.active_selector() {
            Some(SelectorKind::ComponentList) => {
                if !self.components.is_empty() {
                    shadowed.push(SelectorKind::Components);
                }
                if self.projects.is_some() {
                    shadowed.push(SelectorKind::Projects);
                }
            }
            Some(SelectorKind::Components) => {
                if self.projects.is_some() {
                    shadowed.push(SelectorKind::Projects);
                }
            }
            _ => {}
        }
        shadowed
    }

    /// Apply a selector edit, retaining the other slots
    pub fn apply(&mut self, selector: Selector) {
        match selector {
            Selector::ComponentList(id) => self.component_list = Some(id),
            Selector::Components(ids) => self.components = ids,
            Selector::Projects(predicate) => self.projects = Some(predicate),
        }
    }

    /// Clear one selector slot
    pub fn clear(&mut self, kind: SelectorKind) {
        match kind {
            SelectorKind::ComponentList => self.component_list = None,
            SelectorKind::Components => self.components.clear(),
            SelectorKind::Projects => self.projects = None,
        }
    }
}

/// A team's resolved scope: the concrete components and projects its grants
/// apply to, under the selector precedence rule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveScope {
    /// Concrete components (component-list and component selectors only)
    pub components: BTreeSet<Uuid>,
    /// Concrete projects: owners of the effective components, or the
    /// predicate matches for project selectors
    pub projects: BTreeSet<Uuid>,
}

impl EffectiveScope {
    /// Whether the scope covers nothing
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.projects.is_empty()
    }
}
