//! End-to-end resolution scenarios through the public engine surface

use crate::common::standard_fixture;
use polyglot_acl::{LanguageRestriction, Permission, Selector, Target};
use std::collections::BTreeSet;

#[test]
fn spanish_admin_reviewers_scenario() {
    let fx = standard_fixture();
    let user = fx.user("ana");

    let team = fx
        .engine
        .admin(fx.root)
        .create_team("Spanish Admin-Reviewers", None)
        .unwrap();
    let admin = fx.engine.admin(fx.root);
    admin.assign_role(team, "Review strings").unwrap();
    admin.assign_role(team, "Manage repository").unwrap();
    admin
        .set_selector(team, Selector::Components(BTreeSet::from([fx.ui])))
        .unwrap();
    admin
        .set_language_restriction(
            team,
            LanguageRestriction::Only(BTreeSet::from(["es".to_string()])),
        )
        .unwrap();
    admin.add_member(team, user).unwrap();

    assert!(fx.engine.has_permission(
        user,
        Permission::StringsReview,
        &Target::translation(fx.ui, "es")
    ));
    assert!(!fx.engine.has_permission(
        user,
        Permission::StringsReview,
        &Target::translation(fx.ui, "fr")
    ));
    // Unrestricted siblings of the selected component stay browsable...
    assert!(fx.engine.can_browse(user, &Target::Component(fx.docs)));
    // ...while the restricted one does not.
    assert!(!fx.engine.can_browse(user, &Target::Component(fx.secrets)));
    // Repository operations are not language-gated.
    assert!(fx
        .engine
        .has_permission(user, Permission::VcsCommit, &Target::Component(fx.ui)));
}

#[test]
fn effective_permissions_drive_ui_affordances() {
    let fx = standard_fixture();
    let user = fx.user("ana");
    fx.engine
        .admin(fx.root)
        .add_member(fx.team("fusion/Review"), user)
        .unwrap();

    let effective = fx
        .engine
        .effective_permissions(user, &Target::translation(fx.ui, "de"));
    assert!(effective.contains(&Permission::StringsReview));
    assert!(effective.contains(&Permission::StringsAccept));
    assert!(!effective.contains(&Permission::VcsCommit));

    // The same user gets nothing on a project they cannot even see.
    assert!(fx
        .engine
        .effective_permissions(user, &Target::Project(fx.skunkworks))
        .is_empty());
}

#[test]
fn instance_teams_open_public_projects_only() {
    let fx = standard_fixture();
    let user = fx.user("ana");
    fx.engine
        .admin(fx.root)
        .add_member(fx.team("Users"), user)
        .unwrap();

    assert!(fx.engine.can_browse(user, &Target::Project(fx.fusion)));
    assert!(!fx.engine.can_browse(user, &Target::Project(fx.skunkworks)));
    assert_eq!(fx.engine.browsable_projects(user), vec![fx.fusion]);
}

#[test]
fn membership_grant_and_revoke_round_trip() {
    let fx = standard_fixture();
    let user = fx.user("ana");
    let translate = fx.team("fusion/Translate");
    let target = Target::translation(fx.ui, "es");

    assert!(!fx.engine.has_permission(user, Permission::StringsEdit, &target));

    fx.engine.admin(fx.root).add_member(translate, user).unwrap();
    assert!(fx.engine.has_permission(user, Permission::StringsEdit, &target));

    fx.engine.admin(fx.root).remove_member(translate, user).unwrap();
    assert!(!fx.engine.has_permission(user, Permission::StringsEdit, &target));
}

#[test]
fn selector_shadowing_is_reported_to_the_editor() {
    let fx = standard_fixture();
    let team = fx
        .engine
        .admin(fx.root)
        .create_team("curators", None)
        .unwrap();
    let list = fx
        .engine
        .create_component_list("release", BTreeSet::from([fx.ui]))
        .unwrap();

    let admin = fx.engine.admin(fx.root);
    let shadowed = admin
        .set_selector(team, Selector::Components(BTreeSet::from([fx.docs])))
        .unwrap();
    assert!(shadowed.is_empty());

    let shadowed = admin.set_selector(team, Selector::ComponentList(list)).unwrap();
    assert_eq!(shadowed.len(), 1);

    // The shadowed slot is dormant: only the list's component resolves.
    let user = fx.user("ana");
    admin.add_member(team, user).unwrap();
    assert!(fx.engine.can_browse(user, &Target::Component(fx.ui)));
}
