//! Role registry core

use crate::catalog::Permission;
use crate::utils::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

use super::builtin::{BuiltinRole, ROLE_CATALOG_VERSION};
use super::types::{Role, RoleKind};

/// Outcome of a built-in reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Built-in roles created from scratch
    pub created: usize,
    /// Built-in roles whose permission set was repaired
    pub repaired: usize,
}

impl ReconcileReport {
    /// Whether the pass changed anything
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.repaired == 0
    }
}

/// Registry of built-in and custom roles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRegistry {
    roles: HashMap<String, Role>,
    /// Version of the shipped definitions last reconciled into this registry
    catalog_version: u32,
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleRegistry {
    /// Create an empty registry; call [`RoleRegistry::reconcile_builtins`]
    /// before first use
    pub fn new() -> Self {
        Self {
            roles: HashMap::new(),
            catalog_version: 0,
        }
    }

    /// Idempotently re-create or repair built-in roles to match the shipped
    /// definitions
    ///
    /// Runs once during every startup. A pass at the current catalog version
    /// over an untouched registry is a no-op; after an upgrade it silently
    /// adds newly shipped permissions to existing built-in roles.
    pub fn reconcile_builtins(&mut self) -> ReconcileReport {
        debug!("reconciling built-in roles");

        let mut report = ReconcileReport::default();
        for builtin in BuiltinRole::ALL {
            let shipped: BTreeSet<Permission> = builtin.permissions().into_iter().collect();
            match self.roles.get_mut(builtin.name()) {
                Some(existing) => {
                    if existing.permissions != shipped || existing.kind != RoleKind::Builtin {
                        existing.permissions = shipped;
                        existing.kind = RoleKind::Builtin;
                        report.repaired += 1;
                    }
                }
                None => {
                    self.roles.insert(
                        builtin.name().to_string(),
                        Role {
                            name: builtin.name().to_string(),
                            kind: RoleKind::Builtin,
                            permissions: shipped,
                        },
                    );
                    report.created += 1;
                }
            }
        }
        self.catalog_version = ROLE_CATALOG_VERSION;

        if report.is_noop() {
            debug!("built-in roles already current");
        } else {
            info!(
                created = report.created,
                repaired = report.repaired,
                "built-in roles reconciled"
            );
        }
        report
    }

    /// Whether the registry matches the shipped catalog version
    pub fn is_current(&self) -> bool {
        self.catalog_version == ROLE_CATALOG_VERSION
    }

    /// Define a custom role from permission codes
    ///
    /// Fails with a validation error on any unknown code or on a name
    /// collision with an existing role.
    pub fn define_custom_role<S: AsRef<str>>(
        &mut self,
        name: &str,
        permission_codes: &[S],
    ) -> Result<&Role> {
        if name.trim().is_empty() {
            return Err(AccessError::validation("role name must not be empty"));
        }
        if self.roles.contains_key(name) {
            return Err(AccessError::conflict(format!(
                "role `{name}` already exists"
            )));
        }

        let permissions = resolve_codes(permission_codes)?;
        info!(role = name, count = permissions.len(), "custom role defined");
        Ok(self.roles.entry(name.to_string()).or_insert(Role {
            name: name.to_string(),
            kind: RoleKind::Custom,
            permissions,
        }))
    }

    /// Replace the permission set of a custom role
    pub fn update_custom_role<S: AsRef<str>>(
        &mut self,
        name: &str,
        permission_codes: &[S],
    ) -> Result<()> {
        let permissions = resolve_codes(permission_codes)?;
        let role = self
            .roles
            .get_mut(name)
            .ok_or_else(|| AccessError::not_found(format!("role `{name}`")))?;
        if role.is_builtin() {
            return Err(AccessError::ImmutableRole(name.to_string()));
        }
        role.permissions = permissions;
        info!(role = name, "custom role updated");
        Ok(())
    }

    /// Delete a custom role
    pub fn delete_custom_role(&mut self, name: &str) -> Result<()> {
        let role = self
            .roles
            .get(name)
            .ok_or_else(|| AccessError::not_found(format!("role `{name}`")))?;
        if role.is_builtin() {
            return Err(AccessError::ImmutableRole(name.to_string()));
        }
        self.roles.remove(name);
        info!(role = name, "custom role deleted");
        Ok(())
    }

    /// Get a role by name
    pub fn get(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }

    /// List all roles
    pub fn list(&self) -> Vec<&Role> {
        self.roles.values().collect()
    }

    /// Union of the permissions granted by the named roles
    ///
    /// Unknown names contribute nothing; the caller is expected to have
    /// validated role assignments at edit time.
    pub fn permissions_of<'a, I>(&self, names: I) -> BTreeSet<Permission>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut permissions = BTreeSet::new();
        for name in names {
            if let Some(role) = self.roles.get(name) {
                permissions.extend(role.permissions.iter().copied());
            }
        }
        permissions
    }

    #[cfg(test)]
    pub(crate) fn tamper_with(&mut self, name: &str, permissions: BTreeSet<Permission>) {
        if let Some(role) = self.roles.get_mut(name) {
            role.permissions = permissions;
        }
    }

    #[cfg(test)]
    pub(crate) fn rewind_catalog_version(&mut self) {
        self.catalog_version = 0;
    }
}

fn resolve_codes<S: AsRef<str>>(codes: &[S]) -> Result<BTreeSet<Permission>> {
    let mut permissions = BTreeSet::new();
    for code in codes {
        let code = code.as_ref();
        let permission = Permission::from_code(code)
            .ok_or_else(|| AccessError::validation(format!("unknown permission `{code}`")))?;
        permissions.insert(permission);
    }
    Ok(permissions)
}
