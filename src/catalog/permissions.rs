//! Permission definitions

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Scope category a permission applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeCategory {
    /// Instance-wide administration
    Instance,
    /// Project-level operations
    Project,
    /// Component-level operations
    Component,
    /// Per-string translation operations, subject to team language restrictions
    Translation,
}

/// Atomic capability known to the engine
///
/// Permissions cannot be assigned to a user directly; they are only reachable
/// through a role. The dotted code is the stable external identifier used by
/// custom role definitions and audit output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // Translation strings
    StringsEdit,
    StringsSuggest,
    StringsVote,
    StringsReview,
    StringsAccept,
    StringsDelete,
    SuggestionsDelete,
    CommentsAdd,
    CommentsDelete,
    CommentsResolve,

    // Components
    ComponentEditSettings,
    ComponentLock,
    SourcesEdit,
    TranslationsAdd,
    TranslationsDelete,
    TranslationsAuto,
    ScreenshotsAdd,
    ScreenshotsEdit,
    ScreenshotsDelete,
    VcsAccess,
    VcsCommit,
    VcsPush,
    VcsUpdate,
    VcsReset,

    // Projects
    ProjectEditSettings,
    ProjectManageAccess,
    GlossaryAdd,
    GlossaryEdit,
    GlossaryDelete,
    MemoryEdit,
    MemoryDelete,
    ReportsView,
    BillingView,

    // Instance
    TeamsManage,
    UsersManage,
    RolesManage,
    ListsManage,
    LanguagesManage,
}

impl Permission {
    /// Every permission in the catalog
    pub const ALL: &'static [Permission] = &[
        Permission::StringsEdit,
        Permission::StringsSuggest,
        Permission::StringsVote,
        Permission::StringsReview,
        Permission::StringsAccept,
        Permission::StringsDelete,
        Permission::SuggestionsDelete,
        Permission::CommentsAdd,
        Permission::CommentsDelete,
        Permission::CommentsResolve,
        Permission::ComponentEditSettings,
        Permission::ComponentLock,
        Permission::SourcesEdit,
        Permission::TranslationsAdd,
        Permission::TranslationsDelete,
        Permission::TranslationsAuto,
        Permission::ScreenshotsAdd,
        Permission::ScreenshotsEdit,
        Permission::ScreenshotsDelete,
        Permission::VcsAccess,
        Permission::VcsCommit,
        Permission::VcsPush,
        Permission::VcsUpdate,
        Permission::VcsReset,
        Permission::ProjectEditSettings,
        Permission::ProjectManageAccess,
        Permission::GlossaryAdd,
        Permission::GlossaryEdit,
        Permission::GlossaryDelete,
        Permission::MemoryEdit,
        Permission::MemoryDelete,
        Permission::ReportsView,
        Permission::BillingView,
        Permission::TeamsManage,
        Permission::UsersManage,
        Permission::RolesManage,
        Permission::ListsManage,
        Permission::LanguagesManage,
    ];

    /// Stable dotted identifier
    pub const fn code(self) -> &'static str {
        match self {
            Permission::StringsEdit => "strings.edit",
            Permission::StringsSuggest => "strings.suggest",
            Permission::StringsVote => "strings.vote",
            Permission::StringsReview => "strings.review",
            Permission::StringsAccept => "strings.accept",
            Permission::StringsDelete => "strings.delete",
            Permission::SuggestionsDelete => "suggestions.delete",
            Permission::CommentsAdd => "comments.add",
            Permission::CommentsDelete => "comments.delete",
            Permission::CommentsResolve => "comments.resolve",
            Permission::ComponentEditSettings => "component.edit_settings",
            Permission::ComponentLock => "component.lock",
            Permission::SourcesEdit => "sources.edit",
            Permission::TranslationsAdd => "translations.add",
            Permission::TranslationsDelete => "translations.delete",
            Permission::TranslationsAuto => "translations.auto",
            Permission::ScreenshotsAdd => "screenshots.add",
            Permission::ScreenshotsEdit => "screenshots.edit",
            Permission::ScreenshotsDelete => "screenshots.delete",
            Permission::VcsAccess => "vcs.access",
            Permission::VcsCommit => "vcs.commit",
            Permission::VcsPush => "vcs.push",
            Permission::VcsUpdate => "vcs.update",
            Permission::VcsReset => "vcs.reset",
            Permission::ProjectEditSettings => "project.edit_settings",
            Permission::ProjectManageAccess => "project.manage_access",
            Permission::GlossaryAdd => "glossary.add",
            Permission::GlossaryEdit => "glossary.edit",
            Permission::GlossaryDelete => "glossary.delete",
            Permission::MemoryEdit => "memory.edit",
            Permission::MemoryDelete => "memory.delete",
            Permission::ReportsView => "reports.view",
            Permission::BillingView => "billing.view",
            Permission::TeamsManage => "teams.manage",
            Permission::UsersManage => "users.manage",
            Permission::RolesManage => "roles.manage",
            Permission::ListsManage => "lists.manage",
            Permission::LanguagesManage => "languages.manage",
        }
    }

    /// Scope category the permission applies to
    pub const fn category(self) -> ScopeCategory {
        match self {
            Permission::StringsEdit
            | Permission::StringsSuggest
            | Permission::StringsVote
            | Permission::StringsReview
            | Permission::StringsAccept
            | Permission::StringsDelete
            | Permission::SuggestionsDelete
            | Permission::CommentsAdd
            | Permission::CommentsDelete
            | Permission::CommentsResolve => ScopeCategory::Translation,

            Permission::ComponentEditSettings
            | Permission::ComponentLock
            | Permission::SourcesEdit
            | Permission::TranslationsAdd
            | Permission::TranslationsDelete
            | Permission::TranslationsAuto
            | Permission::ScreenshotsAdd
            | Permission::ScreenshotsEdit
            | Permission::ScreenshotsDelete
            | Permission::VcsAccess
            | Permission::VcsCommit
            | Permission::VcsPush
            | Permission::VcsUpdate
            | Permission::VcsReset => ScopeCategory::Component,

            Permission::ProjectEditSettings
            | Permission::ProjectManageAccess
            | Permission::GlossaryAdd
            | Permission::GlossaryEdit
            | Permission::GlossaryDelete
            | Permission::MemoryEdit
            | Permission::MemoryDelete
            | Permission::ReportsView
            | Permission::BillingView => ScopeCategory::Project,

            Permission::TeamsManage
            | Permission::UsersManage
            | Permission::RolesManage
            | Permission::ListsManage
            | Permission::LanguagesManage => ScopeCategory::Instance,
        }
    }

    /// Human-readable description
    pub const fn describe(self) -> &'static str {
        match self {
            Permission::StringsEdit => "Edit translated strings",
            Permission::StringsSuggest => "Add suggestions",
            Permission::StringsVote => "Vote on suggestions",
            Permission::StringsReview => "Review translated strings",
            Permission::StringsAccept => "Accept suggestions",
            Permission::StringsDelete => "Delete translated strings",
            Permission::SuggestionsDelete => "Delete suggestions",
            Permission::CommentsAdd => "Add comments",
            Permission::CommentsDelete => "Delete comments",
            Permission::CommentsResolve => "Resolve comments",
            Permission::ComponentEditSettings => "Edit component settings",
            Permission::ComponentLock => "Lock a component from translation",
            Permission::SourcesEdit => "Edit source strings",
            Permission::TranslationsAdd => "Start new translations",
            Permission::TranslationsDelete => "Delete existing translations",
            Permission::TranslationsAuto => "Run automatic translation",
            Permission::ScreenshotsAdd => "Add screenshots",
            Permission::ScreenshotsEdit => "Edit screenshots",
            Permission::ScreenshotsDelete => "Delete screenshots",
            Permission::VcsAccess => "Access the internal repository",
            Permission::VcsCommit => "Commit changes to the repository",
            Permission::VcsPush => "Push changes to the upstream repository",
            Permission::VcsUpdate => "Update the repository",
            Permission::VcsReset => "Reset changes in the repository",
            Permission::ProjectEditSettings => "Edit project settings",
            Permission::ProjectManageAccess => "Manage project access",
            Permission::GlossaryAdd => "Add glossary entries",
            Permission::GlossaryEdit => "Edit glossary entries",
            Permission::GlossaryDelete => "Delete glossary entries",
            Permission::MemoryEdit => "Edit translation memory",
            Permission::MemoryDelete => "Delete translation memory entries",
            Permission::ReportsView => "Download reports",
            Permission::BillingView => "View billing information",
            Permission::TeamsManage => "Manage instance-wide teams",
            Permission::UsersManage => "Manage users",
            Permission::RolesManage => "Manage custom roles",
            Permission::ListsManage => "Manage component lists",
            Permission::LanguagesManage => "Manage the language catalog",
        }
    }

    /// Look up a permission by its dotted code
    pub fn from_code(code: &str) -> Option<Permission> {
        static BY_CODE: Lazy<HashMap<&'static str, Permission>> =
            Lazy::new(|| Permission::ALL.iter().map(|p| (p.code(), *p)).collect());

        BY_CODE.get(code).copied()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
