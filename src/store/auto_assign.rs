//! Automatic team assignment
//!
//! Evaluated exactly once per account, from the user-creation workflow.
//! Later profile edits never re-trigger membership changes; that is
//! intentional, not an oversight.

use crate::utils::error::{AccessError, Result};
use tracing::{debug, info};
use uuid::Uuid;

use super::world::World;

impl World {
    /// Run every team's assignment rules against a freshly created user
    ///
    /// Each team whose rule matches the user's identity attribute gains the
    /// user as a member; a user may match, and join, several teams. Returns
    /// the joined team IDs.
    pub fn run_automatic_assignment(&mut self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let user = self
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| AccessError::not_found(format!("user {user_id}")))?;

        let mut joined = Vec::new();
        for team in self.teams.values_mut() {
            if team.auto_assign.is_empty() {
                continue;
            }
            if team.auto_assign.iter().any(|rule| rule.matches(&user)) && team.members.insert(user_id)
            {
                team.touch();
                debug!(team = %team.name, user = %user.username, "automatic assignment matched");
                joined.push(team.id);
            }
        }

        if !joined.is_empty() {
            info!(
                user = %user.username,
                teams = joined.len(),
                "automatic assignment joined teams"
            );
        }
        Ok(joined)
    }
}
