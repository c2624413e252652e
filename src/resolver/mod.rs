//! Permission resolution
//!
//! Pure, side-effect-free read path over one consistent world snapshot.
//! Resolution never raises: absent or inconsistent data degrades to a deny,
//! with a data-integrity warning in the log.

mod check;
#[cfg(test)]
mod tests;

pub use check::{
    browsable_projects, can_browse, effective_permissions, has_permission, Target,
};
