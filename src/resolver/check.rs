//! Permission check implementation

use crate::catalog::{Permission, ScopeCategory};
use crate::scope::Component;
use crate::store::{Team, World};
use std::collections::BTreeSet;
use tracing::warn;
use uuid::Uuid;

/// Target of a permission or browse check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The instance itself; used for instance-category permissions
    Instance,
    /// A whole project
    Project(Uuid),
    /// A component
    Component(Uuid),
    /// A translation of a component into one language
    Translation {
        /// The component being translated
        component: Uuid,
        /// Language code of the translation
        language: String,
    },
}

impl Target {
    /// Translation target shorthand
    pub fn translation(component: Uuid, language: impl Into<String>) -> Self {
        Target::Translation {
            component,
            language: language.into(),
        }
    }
}

/// A target decomposed against the world
struct ResolvedTarget<'w> {
    component: Option<&'w Component>,
    project: Option<Uuid>,
    language: Option<&'w str>,
}

fn resolve_target<'w>(world: &'w World, target: &'w Target) -> Option<ResolvedTarget<'w>> {
    match target {
        Target::Instance => Some(ResolvedTarget {
            component: None,
            project: None,
            language: None,
        }),
        Target::Project(id) => world.project(*id).map(|p| ResolvedTarget {
            component: None,
            project: Some(p.id),
            language: None,
        }),
        Target::Component(id) => resolve_component(world, *id, None),
        Target::Translation {
            component,
            language,
        } => resolve_component(world, *component, Some(language.as_str())),
    }
}

fn resolve_component<'w>(
    world: &'w World,
    id: Uuid,
    language: Option<&'w str>,
) -> Option<ResolvedTarget<'w>> {
    let component = world.component(id)?;
    if world.project(component.project).is_none() {
        // The owning project vanished under the component: inconsistent
        // state resolves to no-match instead of failing the check.
        warn!(
            component = %component.slug,
            project = %component.project,
            "component belongs to a missing project; denying access"
        );
        return None;
    }
    Some(ResolvedTarget {
        component: Some(component),
        project: Some(component.project),
        language,
    })
}

/// Whether the team's effective scope covers the resolved target
///
/// A restricted component is only covered by explicit component or
/// component-list selection; project-level coverage never reaches it.
fn team_matches(world: &World, team: &Team, resolved: &ResolvedTarget<'_>) -> bool {
    match (resolved.component, resolved.project) {
        (Some(component), _) => {
            let scope = world.effective_scope(team);
            scope.components.contains(&component.id)
                || (!component.restricted && scope.projects.contains(&component.project))
        }
        (None, Some(project)) => world.effective_scope(team).projects.contains(&project),
        // Instance targets: scope selectors scope content objects, so every
        // team the user belongs to participates.
        (None, None) => true,
    }
}

fn language_gate(team: &Team, permission: Permission, resolved: &ResolvedTarget<'_>) -> bool {
    permission.category() != ScopeCategory::Translation
        || team.language_restriction.permits(resolved.language)
}

/// Decide whether the user may exercise the permission on the target
pub fn has_permission(
    world: &World,
    user_id: Uuid,
    permission: Permission,
    target: &Target,
) -> bool {
    let Some(user) = world.user(user_id) else {
        return false;
    };
    if !user.is_active {
        return false;
    }
    let Some(resolved) = resolve_target(world, target) else {
        return false;
    };
    if user.is_superuser {
        return true;
    }

    world.teams_of(user_id).any(|team| {
        team_matches(world, team, &resolved)
            && language_gate(team, permission, &resolved)
            && world.team_permissions(team).contains(&permission)
    })
}

/// Decide whether the user may see the target at all
///
/// A team with an empty role set still makes its scope browsable.
pub fn can_browse(world: &World, user_id: Uuid, target: &Target) -> bool {
    let Some(user) = world.user(user_id) else {
        return false;
    };
    if !user.is_active {
        return false;
    }
    let Some(resolved) = resolve_target(world, target) else {
        return false;
    };
    if user.is_superuser {
        return true;
    }

    world
        .teams_of(user_id)
        .any(|team| team_matches(world, team, &resolved))
}

/// Every permission the user may exercise on the target, unioned across all
/// qualifying teams
pub fn effective_permissions(
    world: &World,
    user_id: Uuid,
    target: &Target,
) -> BTreeSet<Permission> {
    let Some(user) = world.user(user_id) else {
        return BTreeSet::new();
    };
    if !user.is_active {
        return BTreeSet::new();
    }
    let Some(resolved) = resolve_target(world, target) else {
        return BTreeSet::new();
    };
    if user.is_superuser {
        return Permission::ALL.iter().copied().collect();
    }

    let mut permissions = BTreeSet::new();
    for team in world.teams_of(user_id) {
        if !team_matches(world, team, &resolved) {
            continue;
        }
        for permission in world.team_permissions(team) {
            if language_gate(team, permission, &resolved) {
                permissions.insert(permission);
            }
        }
    }
    permissions
}

/// Projects the user can browse, ordered by slug
pub fn browsable_projects(world: &World, user_id: Uuid) -> Vec<Uuid> {
    let Some(user) = world.user(user_id) else {
        return Vec::new();
    };
    if !user.is_active {
        return Vec::new();
    }

    let mut projects: Vec<(&str, Uuid)> = world
        .projects
        .values()
        .filter(|p| user.is_superuser || can_browse(world, user_id, &Target::Project(p.id)))
        .map(|p| (p.slug.as_str(), p.id))
        .collect();
    projects.sort();
    projects.into_iter().map(|(_, id)| id).collect()
}
