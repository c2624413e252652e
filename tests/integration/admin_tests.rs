//! Administrative guard scenarios

use crate::common::standard_fixture;
use polyglot_acl::{AccessError, ProjectPredicate, Selector};
use std::collections::BTreeSet;

#[test]
fn project_admin_delegation_flow() {
    let fx = standard_fixture();
    let lead = fx.user("lead");
    let translator = fx.user("translator");

    // The superuser seats a project lead in the default Administration team.
    fx.engine
        .admin(fx.root)
        .add_member(fx.team("fusion/Administration"), lead)
        .unwrap();

    // From there the lead runs their own project without superuser help.
    let lead_admin = fx.engine.admin(lead);
    lead_admin
        .add_member(fx.team("fusion/Translate"), translator)
        .unwrap();
    let crew = lead_admin.create_team("fusion night shift", Some(fx.fusion)).unwrap();
    lead_admin.assign_role(crew, "Review strings").unwrap();
    lead_admin.add_member(crew, translator).unwrap();

    // But instance-wide surfaces stay closed.
    let err = lead_admin.create_team("global crew", None).unwrap_err();
    assert!(matches!(err, AccessError::PermissionDenied(_)));
    let err = lead_admin
        .define_custom_role("Shadow", &["strings.edit"])
        .unwrap_err();
    assert!(matches!(err, AccessError::PermissionDenied(_)));
}

#[test]
fn scope_widening_across_projects_is_blocked() {
    let fx = standard_fixture();
    let lead = fx.user("lead");
    fx.engine
        .admin(fx.root)
        .add_member(fx.team("fusion/Administration"), lead)
        .unwrap();

    let crew = fx
        .engine
        .admin(lead)
        .create_team("fusion crew", Some(fx.fusion))
        .unwrap();

    // Reaching for the private project aborts the edit entirely.
    let err = fx
        .engine
        .admin(lead)
        .set_selector(
            crew,
            Selector::Projects(ProjectPredicate::Explicit(BTreeSet::from([
                fx.fusion,
                fx.skunkworks,
            ]))),
        )
        .unwrap_err();
    assert!(matches!(err, AccessError::Validation(_) | AccessError::PermissionDenied(_)));

    let world = fx.engine.snapshot();
    assert_eq!(
        world.team(crew).unwrap().scope.projects,
        Some(ProjectPredicate::Explicit(BTreeSet::from([fx.fusion])))
    );
}

#[test]
fn unscoped_teams_require_instance_administration() {
    let fx = standard_fixture();
    let lead = fx.user("lead");
    let user = fx.user("ana");
    fx.engine
        .admin(fx.root)
        .add_member(fx.team("fusion/Administration"), lead)
        .unwrap();

    // The instance-wide Users team implies no concrete project the lead
    // manages, so it is out of reach.
    let users = fx.team("Users");
    let err = fx.engine.admin(lead).add_member(users, user).unwrap_err();
    assert!(matches!(err, AccessError::PermissionDenied(_)));

    fx.engine.admin(fx.root).add_member(users, user).unwrap();
}

#[test]
fn concurrent_edits_to_one_team_serialize() {
    let fx = standard_fixture();
    let crew = fx.engine.admin(fx.root).create_team("crew", None).unwrap();
    let members: Vec<_> = (0..8).map(|i| fx.user(&format!("user{i}"))).collect();

    let engine = &fx.engine;
    let root = fx.root;
    std::thread::scope(|scope| {
        for &user in &members {
            scope.spawn(move || {
                engine.admin(root).add_member(crew, user).unwrap();
            });
        }
    });

    // No lost updates: every member landed.
    let world = fx.engine.snapshot();
    assert_eq!(world.team(crew).unwrap().members.len(), members.len());
}
