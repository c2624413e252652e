//! Administrative mutation API
//!
//! Every mutation is guarded through the resolver itself: managing a team
//! requires project-access management rights on every project implied by the
//! team's current effective scope, re-evaluated before and after the edit so
//! that scope-widening cannot escalate past the editor's own projects.

use tracing::warn;
use uuid::Uuid;

use crate::catalog::Permission;
use crate::resolver::{self, Target};
use crate::roles::ReconcileReport;
use crate::scope::{LanguageRestriction, ProjectPredicate, Selector, SelectorKind};
use crate::store::{IdentityAttribute, Team, World};
use crate::utils::error::{AccessError, Result};

use super::AccessEngine;

/// Actor-bound handle to the administrative mutation API
pub struct AdminApi<'a> {
    engine: &'a AccessEngine,
    actor: Uuid,
}

impl<'a> AdminApi<'a> {
    pub(super) fn new(engine: &'a AccessEngine, actor: Uuid) -> Self {
        Self { engine, actor }
    }

    // Team lifecycle

    /// Create a team
    ///
    /// Instance team administrators may create any team; holders of project
    /// access management on a project may only create teams scoped to that
    /// project.
    pub fn create_team(&self, name: &str, defining_project: Option<Uuid>) -> Result<Uuid> {
        let actor = self.actor;
        self.engine.commit(move |world| {
            let instance_admin =
                resolver::has_permission(world, actor, Permission::TeamsManage, &Target::Instance);
            match defining_project {
                Some(project_id) => {
                    let project_admin = resolver::has_permission(
                        world,
                        actor,
                        Permission::ProjectManageAccess,
                        &Target::Project(project_id),
                    );
                    if !instance_admin && !project_admin {
                        return Err(AccessError::denied(
                            "creating a project team requires access management on that project",
                        ));
                    }
                }
                None => {
                    if !instance_admin {
                        return Err(AccessError::denied(
                            "creating an instance-wide team requires instance team administration",
                        ));
                    }
                }
            }
            world.create_team(name, defining_project)
        })
    }

    /// Delete a team
    pub fn delete_team(&self, team_id: Uuid) -> Result<()> {
        self.mutate_team(team_id, move |world| world.delete_team(team_id))
    }

    // Membership and roles

    /// Add a member to a team
    pub fn add_member(&self, team_id: Uuid, user_id: Uuid) -> Result<()> {
        self.mutate_team(team_id, move |world| world.add_member(team_id, user_id))
    }

    /// Remove a member from a team
    pub fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> Result<()> {
        self.mutate_team(team_id, move |world| world.remove_member(team_id, user_id))
    }

    /// Assign a role to a team
    pub fn assign_role(&self, team_id: Uuid, role: &str) -> Result<()> {
        self.mutate_team(team_id, move |world| world.assign_role(team_id, role))
    }

    /// Revoke a role from a team
    pub fn revoke_role(&self, team_id: Uuid, role: &str) -> Result<()> {
        self.mutate_team(team_id, move |world| world.revoke_role(team_id, role))
    }

    // Scope editing

    /// Edit one selector slot
    ///
    /// Returns the selector kinds left shadowed by the edit, so the caller
    /// can warn whoever is editing the team about the precedence rule.
    pub fn set_selector(&self, team_id: Uuid, selector: Selector) -> Result<Vec<SelectorKind>> {
        let shadowed =
            self.mutate_team(team_id, move |world| world.set_selector(team_id, selector))?;
        if self.engine.config().warn_shadowed_selectors && !shadowed.is_empty() {
            warn!(
                team = %team_id,
                shadowed = ?shadowed,
                "selector edit leaves lower-precedence selectors shadowed"
            );
        }
        Ok(shadowed)
    }

    /// Clear one selector slot
    pub fn clear_selector(&self, team_id: Uuid, kind: SelectorKind) -> Result<()> {
        self.mutate_team(team_id, move |world| world.clear_selector(team_id, kind))
    }

    /// Restrict the team's translation permissions to the given languages
    pub fn set_language_restriction(
        &self,
        team_id: Uuid,
        restriction: LanguageRestriction,
    ) -> Result<()> {
        self.mutate_team(team_id, move |world| {
            world.set_language_restriction(team_id, restriction)
        })
    }

    /// Attach an automatic-assignment rule
    pub fn add_auto_assign_rule(
        &self,
        team_id: Uuid,
        attribute: IdentityAttribute,
        pattern: &str,
    ) -> Result<()> {
        self.mutate_team(team_id, move |world| {
            world.add_auto_assign_rule(team_id, attribute, pattern)
        })
    }

    /// Remove an automatic-assignment rule by pattern
    pub fn remove_auto_assign_rule(&self, team_id: Uuid, pattern: &str) -> Result<()> {
        self.mutate_team(team_id, move |world| {
            world.remove_auto_assign_rule(team_id, pattern)
        })
    }

    // Role registry

    /// Define a custom role from permission codes
    pub fn define_custom_role<S: AsRef<str>>(&self, name: &str, codes: &[S]) -> Result<()> {
        let actor = self.actor;
        self.engine.commit(move |world| {
            ensure_instance_permission(world, actor, Permission::RolesManage)?;
            world.define_custom_role(name, codes)?;
            Ok(())
        })
    }

    /// Replace the permission set of a custom role
    pub fn update_custom_role<S: AsRef<str>>(&self, name: &str, codes: &[S]) -> Result<()> {
        let actor = self.actor;
        self.engine.commit(move |world| {
            ensure_instance_permission(world, actor, Permission::RolesManage)?;
            world.update_custom_role(name, codes)
        })
    }

    /// Delete a custom role and revoke it everywhere
    pub fn delete_custom_role(&self, name: &str) -> Result<()> {
        let actor = self.actor;
        self.engine.commit(move |world| {
            ensure_instance_permission(world, actor, Permission::RolesManage)?;
            world.delete_custom_role(name)
        })
    }

    /// Re-assert built-in role definitions
    pub fn reconcile_builtins(&self) -> Result<ReconcileReport> {
        let actor = self.actor;
        self.engine.commit(move |world| {
            ensure_instance_permission(world, actor, Permission::RolesManage)?;
            Ok(world.reconcile_builtins())
        })
    }

    /// Run a guarded team mutation: per-team lock, manage check on the
    /// team's effective scope before and after the edit, transactional
    /// commit
    fn mutate_team<T>(&self, team_id: Uuid, mutate: impl FnOnce(&mut World) -> Result<T>) -> Result<T> {
        let lock = self.engine.team_lock(team_id);
        let _team_guard = lock.lock();
        let actor = self.actor;
        self.engine.commit(move |world| {
            let team = world
                .team(team_id)
                .ok_or_else(|| AccessError::not_found(format!("team {team_id}")))?;
            ensure_can_manage(world, actor, team)?;

            let outcome = mutate(world)?;

            // Post-edit check against the mutated world: widening the scope
            // past the actor's own projects aborts the whole commit.
            if let Some(team) = world.team(team_id) {
                ensure_can_manage(world, actor, team)?;
            }
            Ok(outcome)
        })
    }
}

fn ensure_instance_permission(world: &World, actor: Uuid, permission: Permission) -> Result<()> {
    if resolver::has_permission(world, actor, permission, &Target::Instance) {
        return Ok(());
    }
    Err(AccessError::denied(format!(
        "requires the `{permission}` permission"
    )))
}

/// Managing a team requires project-access management on every project
/// implied by its effective scope; unscoped teams and teams carrying a
/// dynamic project predicate require instance team administration
fn ensure_can_manage(world: &World, actor: Uuid, team: &Team) -> Result<()> {
    if resolver::has_permission(world, actor, Permission::TeamsManage, &Target::Instance) {
        return Ok(());
    }

    // A dynamic predicate (all projects, all public projects) can grow to
    // cover projects the actor never managed, so the concrete effective
    // scope of the moment is not a safe delegation boundary.
    let dynamic = matches!(
        &team.scope.projects,
        Some(ProjectPredicate::All | ProjectPredicate::AllPublic)
    ) && team.scope.active_selector() == Some(SelectorKind::Projects);

    let scope = world.effective_scope(team);
    if dynamic || scope.projects.is_empty() {
        return Err(AccessError::denied(format!(
            "managing team `{}` requires instance team administration",
            team.name
        )));
    }
    for project_id in &scope.projects {
        let allowed = resolver::has_permission(
            world,
            actor,
            Permission::ProjectManageAccess,
            &Target::Project(*project_id),
        );
        if !allowed {
            return Err(AccessError::denied(format!(
                "managing team `{}` requires access management on every project in its scope",
                team.name
            )));
        }
    }
    Ok(())
}
