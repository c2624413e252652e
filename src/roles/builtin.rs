//! Built-in role definitions

use crate::catalog::{Permission, ScopeCategory};

/// Version marker for the shipped role definitions
///
/// Bumped whenever a shipped role gains or loses a permission, so that
/// reconciliation after an upgrade knows the stored registry is stale.
pub(crate) const ROLE_CATALOG_VERSION: u32 = 1;

/// Roles shipped with the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinRole {
    /// Full control over a project and its components
    Administration,
    /// Translate plus review and accept workflow actions
    ReviewStrings,
    /// Basic translation actions
    Translate,
    /// Edit source strings
    ManageSources,
    /// Start and remove translations
    ManageLanguages,
    /// Maintain glossary entries
    ManageGlossary,
    /// Maintain translation memory
    ManageMemory,
    /// Maintain screenshots
    ManageScreenshots,
    /// Run automatic translation
    AutomaticTranslation,
    /// Repository operations
    ManageRepository,
    /// Billing and reporting access
    Billing,
}

impl BuiltinRole {
    /// Every built-in role
    pub const ALL: &'static [BuiltinRole] = &[
        BuiltinRole::Administration,
        BuiltinRole::ReviewStrings,
        BuiltinRole::Translate,
        BuiltinRole::ManageSources,
        BuiltinRole::ManageLanguages,
        BuiltinRole::ManageGlossary,
        BuiltinRole::ManageMemory,
        BuiltinRole::ManageScreenshots,
        BuiltinRole::AutomaticTranslation,
        BuiltinRole::ManageRepository,
        BuiltinRole::Billing,
    ];

    /// Registry name of the role
    pub const fn name(self) -> &'static str {
        match self {
            BuiltinRole::Administration => "Administration",
            BuiltinRole::ReviewStrings => "Review strings",
            BuiltinRole::Translate => "Translate",
            BuiltinRole::ManageSources => "Manage sources",
            BuiltinRole::ManageLanguages => "Manage languages",
            BuiltinRole::ManageGlossary => "Manage glossary",
            BuiltinRole::ManageMemory => "Manage translation memory",
            BuiltinRole::ManageScreenshots => "Manage screenshots",
            BuiltinRole::AutomaticTranslation => "Automatic translation",
            BuiltinRole::ManageRepository => "Manage repository",
            BuiltinRole::Billing => "Billing",
        }
    }

    /// Shipped permission set of the role
    pub fn permissions(self) -> Vec<Permission> {
        match self {
            // Administration carries every content permission; instance
            // administration stays separate.
            BuiltinRole::Administration => Permission::ALL
                .iter()
                .copied()
                .filter(|p| p.category() != ScopeCategory::Instance)
                .collect(),
            BuiltinRole::ReviewStrings => vec![
                Permission::StringsEdit,
                Permission::StringsSuggest,
                Permission::StringsVote,
                Permission::StringsReview,
                Permission::StringsAccept,
                Permission::SuggestionsDelete,
                Permission::CommentsAdd,
                Permission::CommentsResolve,
            ],
            BuiltinRole::Translate => vec![
                Permission::StringsEdit,
                Permission::StringsSuggest,
                Permission::StringsVote,
                Permission::CommentsAdd,
            ],
            BuiltinRole::ManageSources => vec![Permission::SourcesEdit],
            BuiltinRole::ManageLanguages => {
                vec![Permission::TranslationsAdd, Permission::TranslationsDelete]
            }
            BuiltinRole::ManageGlossary => vec![
                Permission::GlossaryAdd,
                Permission::GlossaryEdit,
                Permission::GlossaryDelete,
            ],
            BuiltinRole::ManageMemory => vec![Permission::MemoryEdit, Permission::MemoryDelete],
            BuiltinRole::ManageScreenshots => vec![
                Permission::ScreenshotsAdd,
                Permission::ScreenshotsEdit,
                Permission::ScreenshotsDelete,
            ],
            BuiltinRole::AutomaticTranslation => vec![Permission::TranslationsAuto],
            BuiltinRole::ManageRepository => vec![
                Permission::VcsAccess,
                Permission::VcsCommit,
                Permission::VcsPush,
                Permission::VcsUpdate,
                Permission::VcsReset,
            ],
            BuiltinRole::Billing => vec![Permission::BillingView, Permission::ReportsView],
        }
    }
}
