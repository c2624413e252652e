//! Project and account lifecycle scenarios

use crate::common::standard_fixture;
use polyglot_acl::{AccessMode, IdentityAttribute, Target, DEFAULT_TEAM_FAMILY};

#[test]
fn switching_to_custom_mode_locks_out_default_team_members() {
    let fx = standard_fixture();
    let user = fx.user("ana");
    fx.engine
        .admin(fx.root)
        .add_member(fx.team("fusion/Translate"), user)
        .unwrap();
    assert!(fx.engine.can_browse(user, &Target::Project(fx.fusion)));

    let transition = fx
        .engine
        .set_access_mode(fx.fusion, AccessMode::Custom)
        .unwrap();
    assert_eq!(transition.removed.len(), DEFAULT_TEAM_FAMILY.len());

    // The default team is gone, and with it the membership.
    assert!(!fx.engine.can_browse(user, &Target::Project(fx.fusion)));
    assert!(fx.engine.snapshot().team_by_name("fusion/Translate").is_none());
}

#[test]
fn leaving_custom_mode_recreates_empty_default_teams() {
    let fx = standard_fixture();
    let user = fx.user("ana");
    fx.engine
        .admin(fx.root)
        .add_member(fx.team("fusion/Translate"), user)
        .unwrap();

    fx.engine.set_access_mode(fx.fusion, AccessMode::Custom).unwrap();
    let transition = fx
        .engine
        .set_access_mode(fx.fusion, AccessMode::Public)
        .unwrap();
    assert_eq!(transition.created.len(), DEFAULT_TEAM_FAMILY.len());

    // Recreated teams start empty; the earlier membership is not restored.
    let world = fx.engine.snapshot();
    assert!(world.team_by_name("fusion/Translate").unwrap().members.is_empty());
}

#[test]
fn repeated_mode_change_is_a_no_op() {
    let fx = standard_fixture();
    let transition = fx
        .engine
        .set_access_mode(fx.fusion, AccessMode::Public)
        .unwrap();
    assert!(transition.created.is_empty());
    assert!(transition.removed.is_empty());
}

#[test]
fn deleting_a_project_revokes_access_through_its_teams() {
    let fx = standard_fixture();
    let user = fx.user("ana");
    fx.engine
        .admin(fx.root)
        .add_member(fx.team("fusion/Review"), user)
        .unwrap();
    assert!(fx.engine.can_browse(user, &Target::Component(fx.ui)));

    fx.engine.delete_project(fx.fusion).unwrap();

    assert!(!fx.engine.can_browse(user, &Target::Component(fx.ui)));
    assert!(fx.engine.snapshot().team_by_name("fusion/Review").is_none());
}

#[test]
fn account_deletion_cascades_membership() {
    let fx = standard_fixture();
    let user = fx.user("ana");
    let review = fx.team("fusion/Review");
    fx.engine.admin(fx.root).add_member(review, user).unwrap();

    fx.engine.remove_user(user).unwrap();

    let world = fx.engine.snapshot();
    assert!(!world.team(review).unwrap().has_member(user));
    assert!(!fx.engine.can_browse(user, &Target::Project(fx.fusion)));
}

#[test]
fn automatic_assignment_applies_to_new_accounts_only() {
    let fx = standard_fixture();
    let veteran = fx
        .engine
        .register_user("veteran", "veteran@corp.example.com")
        .unwrap();

    let admin = fx.engine.admin(fx.root);
    let staff = admin.create_team("staff", None).unwrap();
    admin
        .add_auto_assign_rule(staff, IdentityAttribute::Email, r"@corp\.example\.com$")
        .unwrap();

    // Accounts that existed before the rule are untouched.
    assert!(!fx.engine.snapshot().team(staff).unwrap().has_member(veteran));

    // New matching accounts join at registration.
    let hire = fx
        .engine
        .register_user("hire", "hire@corp.example.com")
        .unwrap();
    assert!(fx.engine.snapshot().team(staff).unwrap().has_member(hire));
}
