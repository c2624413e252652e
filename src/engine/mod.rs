//! Engine facade
//!
//! `AccessEngine` owns the authoritative state and exposes the three
//! surfaces of the engine: the lock-free read path (permission checks over a
//! consistent snapshot), the trusted sync surface fed by the identity and
//! content subsystems, and the actor-guarded administrative mutation API.
//!
//! Reads load an `ArcSwap` snapshot, so unbounded concurrent checks each see
//! one consistent world and never block. Mutations clone the current world,
//! apply the change, and swap the pointer under a write gate: a mutation
//! that fails mid-way swaps nothing, so state is either fully applied or
//! fully rolled back.

mod admin;

pub use admin::AdminApi;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::catalog::Permission;
use crate::config::EngineConfig;
use crate::resolver::{self, Target};
use crate::roles::ReconcileReport;
use crate::scope::AccessMode;
use crate::store::{AccessModeTransition, World};
use crate::utils::error::Result;

/// Permission-resolution engine
pub struct AccessEngine {
    /// Consistent snapshot served to the read path
    state: ArcSwap<World>,
    /// Serializes clone-mutate-swap commits
    write_gate: Mutex<()>,
    /// Per-team locks so concurrent admins editing one team do not lose
    /// updates, without blocking unrelated teams
    team_locks: DashMap<Uuid, Arc<Mutex<()>>>,
    config: EngineConfig,
}

impl AccessEngine {
    /// Create a new engine
    ///
    /// Runs the built-in role reconciliation pass (the startup/migration
    /// hook) and provisions the instance-wide default teams before the
    /// engine becomes visible to any caller.
    pub fn new(config: EngineConfig) -> Result<Self> {
        info!("initializing access engine");

        let mut world = World::new();
        let report = world.reconcile_builtins();
        info!(
            created = report.created,
            repaired = report.repaired,
            "built-in roles ready"
        );
        if config.provision_instance_teams {
            world.provision_instance_teams()?;
        }

        Ok(Self {
            state: ArcSwap::from_pointee(world),
            write_gate: Mutex::new(()),
            team_locks: DashMap::new(),
            config,
        })
    }

    /// Create a new engine with the default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    /// A consistent snapshot of the current state, for callers that need
    /// several reads to agree with each other
    pub fn snapshot(&self) -> Arc<World> {
        self.state.load_full()
    }

    pub(crate) fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply a mutation transactionally: the swap happens only when the
    /// closure succeeds
    pub(crate) fn commit<T>(&self, mutate: impl FnOnce(&mut World) -> Result<T>) -> Result<T> {
        let _gate = self.write_gate.lock();
        let mut world = (**self.state.load()).clone();
        let outcome = mutate(&mut world)?;
        self.state.store(Arc::new(world));
        Ok(outcome)
    }

    pub(crate) fn team_lock(&self, team_id: Uuid) -> Arc<Mutex<()>> {
        self.team_locks
            .entry(team_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // Read path

    /// Whether the user may exercise the permission on the target
    pub fn has_permission(&self, user: Uuid, permission: Permission, target: &Target) -> bool {
        resolver::has_permission(&self.state.load(), user, permission, target)
    }

    /// Whether the user may see the target at all
    pub fn can_browse(&self, user: Uuid, target: &Target) -> bool {
        resolver::can_browse(&self.state.load(), user, target)
    }

    /// Every permission the user may exercise on the target
    pub fn effective_permissions(&self, user: Uuid, target: &Target) -> BTreeSet<Permission> {
        resolver::effective_permissions(&self.state.load(), user, target)
    }

    /// Projects the user can browse, ordered by slug
    pub fn browsable_projects(&self, user: Uuid) -> Vec<Uuid> {
        resolver::browsable_projects(&self.state.load(), user)
    }

    // Trusted sync surface, fed by the identity and content subsystems

    /// Register a user and run automatic team assignment, exactly once
    ///
    /// This is the only place assignment rules are evaluated; later profile
    /// edits never re-trigger membership changes.
    pub fn register_user(&self, username: &str, email: &str) -> Result<Uuid> {
        self.commit(|world| {
            let user_id = world.insert_user(username, email)?;
            world.run_automatic_assignment(user_id)?;
            Ok(user_id)
        })
    }

    /// Remove a user, cascading membership removal
    pub fn remove_user(&self, user_id: Uuid) -> Result<()> {
        self.commit(|world| world.remove_user(user_id))
    }

    /// Toggle the superuser flag
    pub fn set_superuser(&self, user_id: Uuid, is_superuser: bool) -> Result<()> {
        self.commit(|world| world.set_superuser(user_id, is_superuser))
    }

    /// Toggle the active flag
    pub fn set_active(&self, user_id: Uuid, is_active: bool) -> Result<()> {
        self.commit(|world| world.set_active(user_id, is_active))
    }

    /// Create a project, provisioning default teams unless the mode is
    /// Custom
    pub fn create_project(&self, slug: &str, access_mode: AccessMode) -> Result<Uuid> {
        self.commit(|world| world.create_project(slug, access_mode))
    }

    /// Change a project's access mode; returns the default-team transition
    pub fn set_access_mode(
        &self,
        project_id: Uuid,
        access_mode: AccessMode,
    ) -> Result<AccessModeTransition> {
        self.commit(|world| world.set_access_mode(project_id, access_mode))
    }

    /// Delete a project and everything scoped to it
    pub fn delete_project(&self, project_id: Uuid) -> Result<()> {
        self.commit(|world| world.delete_project(project_id))
    }

    /// Mirror a component into the engine
    pub fn register_component(
        &self,
        project_id: Uuid,
        slug: &str,
        restricted: bool,
    ) -> Result<Uuid> {
        self.commit(|world| world.register_component(project_id, slug, restricted))
    }

    /// Update a component's restricted flag
    pub fn set_component_restricted(&self, component_id: Uuid, restricted: bool) -> Result<()> {
        self.commit(|world| world.set_component_restricted(component_id, restricted))
    }

    /// Remove a component
    pub fn remove_component(&self, component_id: Uuid) -> Result<()> {
        self.commit(|world| world.remove_component(component_id))
    }

    /// Create a component list
    pub fn create_component_list(&self, name: &str, components: BTreeSet<Uuid>) -> Result<Uuid> {
        self.commit(|world| world.create_component_list(name, components))
    }

    /// Delete a component list
    pub fn delete_component_list(&self, list_id: Uuid) -> Result<()> {
        self.commit(|world| world.delete_component_list(list_id))
    }

    /// Register a language catalog entry
    pub fn register_language(&self, code: &str, name: &str) -> Result<()> {
        self.commit(|world| world.register_language(code, name))
    }

    /// Re-assert built-in role definitions (startup/migration pass)
    ///
    /// Holds the write gate for the duration, so concurrent checks see the
    /// pre- or post-reconciliation registry atomically, never a
    /// partially-updated role.
    pub fn reconcile_builtins(&self) -> Result<ReconcileReport> {
        self.commit(|world| Ok(world.reconcile_builtins()))
    }

    /// Administrative mutation API acting as the given user
    pub fn admin(&self, actor: Uuid) -> AdminApi<'_> {
        AdminApi::new(self, actor)
    }
}
