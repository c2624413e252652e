//! Authoritative in-memory state
//!
//! `World` holds everything the resolver reads: users, teams, the mirrored
//! content graph and the role registry. All mutations are transactional at
//! the engine layer (clone, mutate, swap), so methods here mutate `self`
//! directly and return early on error.

use crate::catalog::Permission;
use crate::roles::{BuiltinRole, ReconcileReport, Role, RoleRegistry};
use crate::scope::{
    AccessMode, Component, ComponentList, EffectiveScope, Language, LanguageRestriction, Project,
    ProjectPredicate, Selector, SelectorKind, TeamScope,
};
use crate::utils::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::types::{AutoAssignRule, IdentityAttribute, Team, User};

/// The per-project default-team family and the builtin role each team gets
///
/// Provisioned for Public, Protected and Private projects; suppressed in
/// Custom mode. Membership of each team is an ordinary role assignment, not
/// hardcoded logic.
pub const DEFAULT_TEAM_FAMILY: &[(&str, BuiltinRole)] = &[
    ("Administration", BuiltinRole::Administration),
    ("Review", BuiltinRole::ReviewStrings),
    ("Translate", BuiltinRole::Translate),
    ("Sources", BuiltinRole::ManageSources),
    ("Languages", BuiltinRole::ManageLanguages),
    ("Glossary", BuiltinRole::ManageGlossary),
    ("Memory", BuiltinRole::ManageMemory),
    ("Screenshots", BuiltinRole::ManageScreenshots),
    ("Automatic translation", BuiltinRole::AutomaticTranslation),
    ("VCS", BuiltinRole::ManageRepository),
    ("Billing", BuiltinRole::Billing),
];

/// Instance-wide default team granting signed-in users translation rights on
/// public projects
pub const TEAM_USERS: &str = "Users";

/// Instance-wide default team granting bare visibility of public projects
pub const TEAM_VIEWERS: &str = "Viewers";

/// Audit record of a default-team transition caused by an access-mode change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessModeTransition {
    /// Names of default teams created
    pub created: Vec<String>,
    /// Names of default teams removed
    pub removed: Vec<String>,
}

/// Authoritative engine state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    pub(crate) users: HashMap<Uuid, User>,
    pub(crate) teams: HashMap<Uuid, Team>,
    pub(crate) projects: HashMap<Uuid, Project>,
    pub(crate) components: HashMap<Uuid, Component>,
    pub(crate) component_lists: HashMap<Uuid, ComponentList>,
    pub(crate) languages: HashMap<String, Language>,
    pub(crate) roles: RoleRegistry,
}

impl World {
    /// Create an empty world with an unreconciled role registry
    pub fn new() -> Self {
        Self::default()
    }

    // Read accessors

    /// Get a user by ID
    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.get(&id)
    }

    /// Get a team by ID
    pub fn team(&self, id: Uuid) -> Option<&Team> {
        self.teams.get(&id)
    }

    /// Get a team by name
    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.values().find(|t| t.name == name)
    }

    /// Get a project by ID
    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects.get(&id)
    }

    /// Get a project by slug
    pub fn project_by_slug(&self, slug: &str) -> Option<&Project> {
        self.projects.values().find(|p| p.slug == slug)
    }

    /// Get a component by ID
    pub fn component(&self, id: Uuid) -> Option<&Component> {
        self.components.get(&id)
    }

    /// Get a component by `project/component` path
    pub fn component_by_path(&self, path: &str) -> Option<&Component> {
        let (project_slug, component_slug) = path.split_once('/')?;
        let project = self.project_by_slug(project_slug)?;
        self.components
            .values()
            .find(|c| c.project == project.id && c.slug == component_slug)
    }

    /// Get a component list by ID
    pub fn component_list(&self, id: Uuid) -> Option<&ComponentList> {
        self.component_lists.get(&id)
    }

    /// Get a language by code
    pub fn language(&self, code: &str) -> Option<&Language> {
        self.languages.get(code)
    }

    /// The role registry
    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    /// Teams the user is a member of
    pub fn teams_of(&self, user: Uuid) -> impl Iterator<Item = &Team> {
        self.teams.values().filter(move |t| t.has_member(user))
    }

    fn team_mut(&mut self, id: Uuid) -> Result<&mut Team> {
        self.teams
            .get_mut(&id)
            .ok_or_else(|| AccessError::not_found(format!("team {id}")))
    }

    // Role registry

    /// Re-assert built-in role definitions (startup/migration pass)
    pub fn reconcile_builtins(&mut self) -> ReconcileReport {
        self.roles.reconcile_builtins()
    }

    /// Define a custom role from permission codes
    pub fn define_custom_role<S: AsRef<str>>(&mut self, name: &str, codes: &[S]) -> Result<&Role> {
        self.roles.define_custom_role(name, codes)
    }

    /// Replace the permission set of a custom role
    pub fn update_custom_role<S: AsRef<str>>(&mut self, name: &str, codes: &[S]) -> Result<()> {
        self.roles.update_custom_role(name, codes)
    }

    /// Delete a custom role and revoke it from every team
    pub fn delete_custom_role(&mut self, name: &str) -> Result<()> {
        self.roles.delete_custom_role(name)?;
        for team in self.teams.values_mut() {
            if team.roles.remove(name) {
                team.touch();
            }
        }
        Ok(())
    }

    // Content sync (trusted surface, fed by the content-management subsystem)

    /// Create a project, provisioning its default teams unless the mode is
    /// Custom
    pub fn create_project(&mut self, slug: &str, access_mode: AccessMode) -> Result<Uuid> {
        if slug.trim().is_empty() {
            return Err(AccessError::validation("project slug must not be empty"));
        }
        if self.project_by_slug(slug).is_some() {
            return Err(AccessError::conflict(format!(
                "project `{slug}` already exists"
            )));
        }

        let project = Project::new(slug, access_mode);
        let id = project.id;
        self.projects.insert(id, project);
        info!(project = slug, ?access_mode, "project created");

        if access_mode.provisions_default_teams() {
            self.provision_default_teams(id)?;
        }
        Ok(id)
    }

    /// Change a project's access mode, creating or removing its default
    /// teams as a side effect
    ///
    /// The returned transition record makes the derived-state change
    /// auditable independent of the resolver.
    pub fn set_access_mode(
        &mut self,
        project_id: Uuid,
        access_mode: AccessMode,
    ) -> Result<AccessModeTransition> {
        let project = self
            .projects
            .get_mut(&project_id)
            .ok_or_else(|| AccessError::not_found(format!("project {project_id}")))?;

        let previous = project.access_mode;
        if previous == access_mode {
            return Ok(AccessModeTransition::default());
        }
        project.access_mode = access_mode;
        let slug = project.slug.clone();

        let mut transition = AccessModeTransition::default();
        if access_mode.provisions_default_teams() && !previous.provisions_default_teams() {
            transition.created = self.provision_default_teams(project_id)?;
        } else if !access_mode.provisions_default_teams() && previous.provisions_default_teams() {
            transition.removed = self.remove_default_teams(project_id);
        }
        info!(
            project = %slug,
            from = ?previous,
            to = ?access_mode,
            created = transition.created.len(),
            removed = transition.removed.len(),
            "access mode changed"
        );
        Ok(transition)
    }

    /// Delete a project, cascading its components and project-scoped teams
    pub fn delete_project(&mut self, project_id: Uuid) -> Result<()> {
        let project = self
            .projects
            .remove(&project_id)
            .ok_or_else(|| AccessError::not_found(format!("project {project_id}")))?;

        let component_ids: Vec<Uuid> = self
            .components
            .values()
            .filter(|c| c.project == project_id)
            .map(|c| c.id)
            .collect();
        for id in component_ids {
            self.components.remove(&id);
            for list in self.component_lists.values_mut() {
                list.components.remove(&id);
            }
        }
        self.teams
            .retain(|_, team| team.defining_project != Some(project_id));
        info!(project = %project.slug, "project deleted");
        Ok(())
    }

    /// Mirror a component into the engine
    pub fn register_component(
        &mut self,
        project_id: Uuid,
        slug: &str,
        restricted: bool,
    ) -> Result<Uuid> {
        if !self.projects.contains_key(&project_id) {
            return Err(AccessError::not_found(format!("project {project_id}")));
        }
        let duplicate = self
            .components
            .values()
            .any(|c| c.project == project_id && c.slug == slug);
        if duplicate {
            return Err(AccessError::conflict(format!(
                "component `{slug}` already exists in project"
            )));
        }

        let component = Component::new(project_id, slug, restricted);
        let id = component.id;
        self.components.insert(id, component);
        Ok(id)
    }

    /// Update a component's restricted flag
    pub fn set_component_restricted(&mut self, component_id: Uuid, restricted: bool) -> Result<()> {
        let component = self
            .components
            .get_mut(&component_id)
            .ok_or_else(|| AccessError::not_found(format!("component {component_id}")))?;
        component.restricted = restricted;
        Ok(())
    }

    /// Remove a component, pruning it from component lists
    ///
    /// Team selectors naming the component are left in place; the resolver
    /// treats them as no-match and logs a data-integrity warning.
    pub fn remove_component(&mut self, component_id: Uuid) -> Result<()> {
        self.components
            .remove(&component_id)
            .ok_or_else(|| AccessError::not_found(format!("component {component_id}")))?;
        for list in self.component_lists.values_mut() {
            list.components.remove(&component_id);
        }
        Ok(())
    }

    /// Create a component list
    pub fn create_component_list(
        &mut self,
        name: &str,
        components: BTreeSet<Uuid>,
    ) -> Result<Uuid> {
        if self.component_lists.values().any(|l| l.name == name) {
            return Err(AccessError::conflict(format!(
                "component list `{name}` already exists"
            )));
        }
        for id in &components {
            if !self.components.contains_key(id) {
                return Err(AccessError::validation(format!("unknown component {id}")));
            }
        }
        let list = ComponentList::new(name, components);
        let id = list.id;
        self.component_lists.insert(id, list);
        Ok(id)
    }

    /// Delete a component list
    ///
    /// Teams still pointing at the list resolve to an empty scope from now
    /// on, with a data-integrity warning.
    pub fn delete_component_list(&mut self, list_id: Uuid) -> Result<()> {
        self.component_lists
            .remove(&list_id)
            .ok_or_else(|| AccessError::not_found(format!("component list {list_id}")))?;
        Ok(())
    }

    /// Register a language catalog entry
    pub fn register_language(&mut self, code: &str, name: &str) -> Result<()> {
        if self.languages.contains_key(code) {
            return Err(AccessError::conflict(format!(
                "language `{code}` already exists"
            )));
        }
        self.languages
            .insert(code.to_string(), Language::new(code, name));
        Ok(())
    }

    // Identity sync

    /// Insert a user; automatic assignment is run separately, exactly once,
    /// by the registration workflow
    pub fn insert_user(&mut self, username: &str, email: &str) -> Result<Uuid> {
        if self.users.values().any(|u| u.username == username) {
            return Err(AccessError::conflict(format!(
                "user `{username}` already exists"
            )));
        }
        let user = User::new(username, email);
        let id = user.id;
        self.users.insert(id, user);
        Ok(id)
    }

    /// Remove a user, cascading membership removal
    pub fn remove_user(&mut self, user_id: Uuid) -> Result<()> {
        self.users
            .remove(&user_id)
            .ok_or_else(|| AccessError::not_found(format!("user {user_id}")))?;
        for team in self.teams.values_mut() {
            if team.members.remove(&user_id) {
                team.touch();
            }
        }
        Ok(())
    }

    /// Toggle the superuser flag
    pub fn set_superuser(&mut self, user_id: Uuid, is_superuser: bool) -> Result<()> {
        let user = self
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AccessError::not_found(format!("user {user_id}")))?;
        user.is_superuser = is_superuser;
        Ok(())
    }

    /// Toggle the active flag
    pub fn set_active(&mut self, user_id: Uuid, is_active: bool) -> Result<()> {
        let user = self
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AccessError::not_found(format!("user {user_id}")))?;
        user.is_active = is_active;
        Ok(())
    }

    // Team store

    /// Create a team
    ///
    /// Project-scoped teams start with an explicit selector on their
    /// defining project.
    pub fn create_team(&mut self, name: &str, defining_project: Option<Uuid>) -> Result<Uuid> {
        if name.trim().is_empty() {
            return Err(AccessError::validation("team name must not be empty"));
        }
        if self.team_by_name(name).is_some() {
            return Err(AccessError::conflict(format!("team `{name}` already exists")));
        }
        if let Some(project_id) = defining_project {
            if !self.projects.contains_key(&project_id) {
                return Err(AccessError::not_found(format!("project {project_id}")));
            }
        }

        let mut team = Team::new(name, defining_project);
        if let Some(project_id) = defining_project {
            team.scope = TeamScope::projects([project_id]);
        }
        let id = team.id;
        self.teams.insert(id, team);
        info!(team = name, "team created");
        Ok(id)
    }

    /// Delete a team
    ///
    /// System teams are managed by the engine (default families, instance
    /// teams) and cannot be deleted directly.
    pub fn delete_team(&mut self, team_id: Uuid) -> Result<()> {
        let team = self
            .teams
            .get(&team_id)
            .ok_or_else(|| AccessError::not_found(format!("team {team_id}")))?;
        if team.is_system {
            return Err(AccessError::validation(format!(
                "team `{}` is managed by the engine",
                team.name
            )));
        }
        let name = team.name.clone();
        self.teams.remove(&team_id);
        info!(team = %name, "team deleted");
        Ok(())
    }

    /// Add a member to a team
    pub fn add_member(&mut self, team_id: Uuid, user_id: Uuid) -> Result<()> {
        if !self.users.contains_key(&user_id) {
            return Err(AccessError::not_found(format!("user {user_id}")));
        }
        let team = self.team_mut(team_id)?;
        if !team.members.insert(user_id) {
            return Err(AccessError::conflict("user is already a team member"));
        }
        team.touch();
        Ok(())
    }

    /// Remove a member from a team
    pub fn remove_member(&mut self, team_id: Uuid, user_id: Uuid) -> Result<()> {
        let team = self.team_mut(team_id)?;
        if !team.members.remove(&user_id) {
            return Err(AccessError::not_found("user is not a team member"));
        }
        team.touch();
        Ok(())
    }

    /// Assign a role to a team
    pub fn assign_role(&mut self, team_id: Uuid, role: &str) -> Result<()> {
        if self.roles.get(role).is_none() {
            return Err(AccessError::validation(format!("unknown role `{role}`")));
        }
        let team = self.team_mut(team_id)?;
        if !team.roles.insert(role.to_string()) {
            return Err(AccessError::conflict(format!(
                "role `{role}` is already assigned"
            )));
        }
        team.touch();
        Ok(())
    }

    /// Revoke a role from a team
    pub fn revoke_role(&mut self, team_id: Uuid, role: &str) -> Result<()> {
        let team = self.team_mut(team_id)?;
        if !team.roles.remove(role) {
            return Err(AccessError::not_found(format!(
                "role `{role}` is not assigned"
            )));
        }
        team.touch();
        Ok(())
    }

    /// Edit one selector slot, retaining the others
    ///
    /// Returns the selector kinds now shadowed by a higher-precedence slot,
    /// so the caller can surface the precedence rule to the editor.
    pub fn set_selector(&mut self, team_id: Uuid, selector: Selector) -> Result<Vec<SelectorKind>> {
        self.validate_selector(team_id, &selector)?;
        let team = self.team_mut(team_id)?;
        team.scope.apply(selector);
        team.touch();
        Ok(team.scope.shadowed_selectors())
    }

    /// Clear one selector slot
    pub fn clear_selector(&mut self, team_id: Uuid, kind: SelectorKind) -> Result<()> {
        let team = self.team_mut(team_id)?;
        team.scope.clear(kind);
        team.touch();
        Ok(())
    }

    fn validate_selector(&self, team_id: Uuid, selector: &Selector) -> Result<()> {
        let team = self
            .teams
            .get(&team_id)
            .ok_or_else(|| AccessError::not_found(format!("team {team_id}")))?;

        let selected_components: Vec<Uuid> = match selector {
            Selector::ComponentList(list_id) => {
                let list = self.component_lists.get(list_id).ok_or_else(|| {
                    AccessError::validation(format!("unknown component list {list_id}"))
                })?;
                list.components.iter().copied().collect()
            }
            Selector::Components(ids) => {
                for id in ids {
                    if !self.components.contains_key(id) {
                        return Err(AccessError::validation(format!("unknown component {id}")));
                    }
                }
                ids.iter().copied().collect()
            }
            Selector::Projects(ProjectPredicate::Explicit(ids)) => {
                for id in ids {
                    if !self.projects.contains_key(id) {
                        return Err(AccessError::validation(format!("unknown project {id}")));
                    }
                }
                Vec::new()
            }
            Selector::Projects(_) => Vec::new(),
        };

        // Project-scoped teams stay confined to their defining project.
        if let Some(defining) = team.defining_project {
            for id in &selected_components {
                if self.components.get(id).map(|c| c.project) != Some(defining) {
                    return Err(AccessError::validation(
                        "selector leaves the team's defining project",
                    ));
                }
            }
            match selector {
                Selector::Projects(ProjectPredicate::Explicit(ids)) => {
                    if ids.iter().any(|id| *id != defining) {
                        return Err(AccessError::validation(
                            "selector leaves the team's defining project",
                        ));
                    }
                }
                Selector::Projects(_) => {
                    return Err(AccessError::validation(
                        "project-scoped teams cannot use dynamic project predicates",
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Restrict a team's translation-category permissions to the given
    /// languages, or lift the restriction
    pub fn set_language_restriction(
        &mut self,
        team_id: Uuid,
        restriction: LanguageRestriction,
    ) -> Result<()> {
        if let LanguageRestriction::Only(codes) = &restriction {
            for code in codes {
                if !self.languages.contains_key(code) {
                    return Err(AccessError::validation(format!("unknown language `{code}`")));
                }
            }
        }
        let team = self.team_mut(team_id)?;
        team.language_restriction = restriction;
        team.touch();
        Ok(())
    }

    /// Attach an automatic-assignment rule; malformed patterns are rejected
    /// here, never at evaluation time
    pub fn add_auto_assign_rule(
        &mut self,
        team_id: Uuid,
        attribute: IdentityAttribute,
        pattern: &str,
    ) -> Result<()> {
        let rule = AutoAssignRule::new(attribute, pattern)?;
        let team = self.team_mut(team_id)?;
        team.auto_assign.push(rule);
        team.touch();
        Ok(())
    }

    /// Remove an automatic-assignment rule by pattern
    pub fn remove_auto_assign_rule(&mut self, team_id: Uuid, pattern: &str) -> Result<()> {
        let team = self.team_mut(team_id)?;
        let before = team.auto_assign.len();
        team.auto_assign.retain(|r| r.pattern() != pattern);
        if team.auto_assign.len() == before {
            return Err(AccessError::not_found(format!(
                "assignment rule `{pattern}`"
            )));
        }
        team.touch();
        Ok(())
    }

    // Default teams

    /// Provision the instance-wide Users and Viewers teams
    pub fn provision_instance_teams(&mut self) -> Result<()> {
        if self.team_by_name(TEAM_USERS).is_none() {
            let mut team = Team::new(TEAM_USERS, None);
            team.is_system = true;
            team.scope.projects = Some(ProjectPredicate::AllPublic);
            team.roles.insert(BuiltinRole::Translate.name().to_string());
            self.teams.insert(team.id, team);
            debug!(team = TEAM_USERS, "instance team provisioned");
        }
        if self.team_by_name(TEAM_VIEWERS).is_none() {
            let mut team = Team::new(TEAM_VIEWERS, None);
            team.is_system = true;
            team.scope.projects = Some(ProjectPredicate::AllPublic);
            self.teams.insert(team.id, team);
            debug!(team = TEAM_VIEWERS, "instance team provisioned");
        }
        Ok(())
    }

    fn default_team_name(slug: &str, family: &str) -> String {
        format!("{slug}/{family}")
    }

    fn provision_default_teams(&mut self, project_id: Uuid) -> Result<Vec<String>> {
        let slug = self
            .projects
            .get(&project_id)
            .map(|p| p.slug.clone())
            .ok_or_else(|| AccessError::not_found(format!("project {project_id}")))?;

        let mut created = Vec::new();
        for (family, role) in DEFAULT_TEAM_FAMILY {
            let name = Self::default_team_name(&slug, family);
            let exists = self
                .teams
                .values()
                .any(|t| t.defining_project == Some(project_id) && t.name == name);
            if exists {
                continue;
            }
            let mut team = Team::new(&name, Some(project_id));
            team.is_system = true;
            team.scope = TeamScope::projects([project_id]);
            team.roles.insert(role.name().to_string());
            self.teams.insert(team.id, team);
            created.push(name);
        }
        if !created.is_empty() {
            debug!(project = %slug, count = created.len(), "default teams provisioned");
        }
        Ok(created)
    }

    fn remove_default_teams(&mut self, project_id: Uuid) -> Vec<String> {
        let removed: Vec<String> = self
            .teams
            .values()
            .filter(|t| t.defining_project == Some(project_id) && t.is_system)
            .map(|t| t.name.clone())
            .collect();
        self.teams
            .retain(|_, t| !(t.defining_project == Some(project_id) && t.is_system));
        removed
    }

    // Effective scope

    /// Resolve a team's effective scope under the selector precedence rule
    ///
    /// Only the highest-precedence populated slot is evaluated. Dangling
    /// references resolve to nothing and are logged as data-integrity
    /// warnings; they never fail the caller.
    pub fn effective_scope(&self, team: &Team) -> EffectiveScope {
        let mut scope = EffectiveScope::default();

        if let Some(list_id) = team.scope.component_list {
            match self.component_lists.get(&list_id) {
                Some(list) => {
                    let ids: Vec<Uuid> = list.components.iter().copied().collect();
                    self.collect_components(team, &ids, &mut scope);
                }
                None => warn!(
                    team = %team.name,
                    list = %list_id,
                    "team selects a missing component list; treating as empty scope"
                ),
            }
            return scope;
        }

        if !team.scope.components.is_empty() {
            let ids: Vec<Uuid> = team.scope.components.iter().copied().collect();
            self.collect_components(team, &ids, &mut scope);
            return scope;
        }

        if let Some(predicate) = &team.scope.projects {
            scope.projects = self
                .projects
                .values()
                .filter(|p| predicate.matches(p))
                .map(|p| p.id)
                .collect();
        }
        scope
    }

    fn collect_components(&self, team: &Team, ids: &[Uuid], scope: &mut EffectiveScope) {
        for id in ids {
            match self.components.get(id) {
                Some(component) => {
                    scope.components.insert(component.id);
                    scope.projects.insert(component.project);
                }
                None => warn!(
                    team = %team.name,
                    component = %id,
                    "team selects a missing component; skipping"
                ),
            }
        }
    }

    /// Union of catalog permissions granted through the team's roles
    pub(crate) fn team_permissions(&self, team: &Team) -> BTreeSet<Permission> {
        self.roles.permissions_of(team.roles.iter())
    }
}
