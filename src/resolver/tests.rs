//! Resolver tests

#[cfg(test)]
mod tests {
    use crate::catalog::Permission;
    use crate::resolver::{browsable_projects, can_browse, effective_permissions, has_permission, Target};
    use crate::scope::{AccessMode, LanguageRestriction, ProjectPredicate, Selector};
    use crate::store::World;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn world() -> World {
        let mut world = World::new();
        world.reconcile_builtins();
        world.register_language("es", "Spanish").unwrap();
        world.register_language("fr", "French").unwrap();
        world
    }

    fn spanish_only() -> LanguageRestriction {
        LanguageRestriction::Only(BTreeSet::from(["es".to_string()]))
    }

    #[test]
    fn test_grant_and_revoke_round_trip() {
        let mut world = world();
        let project = world.create_project("foo", AccessMode::Custom).unwrap();
        let component = world.register_component(project, "bar", false).unwrap();
        let user = world.insert_user("ana", "ana@example.com").unwrap();
        let team = world.create_team("reviewers", None).unwrap();
        world.assign_role(team, "Review strings").unwrap();
        world
            .set_selector(
                team,
                Selector::Projects(ProjectPredicate::Explicit(BTreeSet::from([project]))),
            )
            .unwrap();

        let target = Target::translation(component, "es");
        assert!(!has_permission(&world, user, Permission::StringsReview, &target));

        world.add_member(team, user).unwrap();
        assert!(has_permission(&world, user, Permission::StringsReview, &target));

        world.remove_member(team, user).unwrap();
        assert!(!has_permission(&world, user, Permission::StringsReview, &target));
    }

    #[test]
    fn test_empty_role_set_grants_browse_only() {
        let mut world = world();
        let project = world.create_project("foo", AccessMode::Custom).unwrap();
        let user = world.insert_user("ana", "ana@example.com").unwrap();
        let team = world.create_team("watchers", None).unwrap();
        world
            .set_selector(
                team,
                Selector::Projects(ProjectPredicate::Explicit(BTreeSet::from([project]))),
            )
            .unwrap();
        world.add_member(team, user).unwrap();

        let target = Target::Project(project);
        assert!(can_browse(&world, user, &target));
        for permission in Permission::ALL {
            assert!(
                !has_permission(&world, user, *permission, &target),
                "unexpected grant of {permission}"
            );
        }
        assert!(effective_permissions(&world, user, &target).is_empty());
    }

    #[test]
    fn test_selector_precedence_component_list_wins() {
        let mut world = world();
        let list_project = world.create_project("alpha", AccessMode::Custom).unwrap();
        let component_a = world.register_component(list_project, "a", false).unwrap();
        let other_project = world.create_project("beta", AccessMode::Custom).unwrap();
        let component_b = world.register_component(other_project, "b", false).unwrap();
        let list = world
            .create_component_list("curated", BTreeSet::from([component_a]))
            .unwrap();

        let user = world.insert_user("ana", "ana@example.com").unwrap();
        let team = world.create_team("curators", None).unwrap();
        world.add_member(team, user).unwrap();
        // Both slots populated: the projects selector nominally covers the
        // project owning component B, but stays dormant.
        world
            .set_selector(
                team,
                Selector::Projects(ProjectPredicate::Explicit(BTreeSet::from([other_project]))),
            )
            .unwrap();
        world.set_selector(team, Selector::ComponentList(list)).unwrap();

        assert!(can_browse(&world, user, &Target::Component(component_a)));
        assert!(!can_browse(&world, user, &Target::Component(component_b)));
        assert!(!can_browse(&world, user, &Target::Project(other_project)));
    }

    #[test]
    fn test_language_gating_only_affects_translation_category() {
        let mut world = world();
        let project = world.create_project("foo", AccessMode::Custom).unwrap();
        let component = world.register_component(project, "bar", false).unwrap();
        let user = world.insert_user("ana", "ana@example.com").unwrap();
        world
            .define_custom_role(
                "Spanish maintainer",
                &["strings.review", "component.edit_settings"],
            )
            .unwrap();
        let team = world.create_team("spanish", None).unwrap();
        world.assign_role(team, "Spanish maintainer").unwrap();
        world
            .set_selector(team, Selector::Components(BTreeSet::from([component])))
            .unwrap();
        world.set_language_restriction(team, spanish_only()).unwrap();
        world.add_member(team, user).unwrap();

        assert!(has_permission(
            &world,
            user,
            Permission::StringsReview,
            &Target::translation(component, "es")
        ));
        assert!(!has_permission(
            &world,
            user,
            Permission::StringsReview,
            &Target::translation(component, "fr")
        ));
        // Component-category permissions pass through the same team
        // untouched by the language restriction.
        assert!(has_permission(
            &world,
            user,
            Permission::ComponentEditSettings,
            &Target::Component(component)
        ));
    }

    #[test]
    fn test_restricted_component_needs_explicit_selection() {
        let mut world = world();
        let project = world.create_project("foo", AccessMode::Custom).unwrap();
        let open = world.register_component(project, "bar", false).unwrap();
        let restricted = world.register_component(project, "baz", true).unwrap();
        let user = world.insert_user("ana", "ana@example.com").unwrap();
        let team = world.create_team("project wide", None).unwrap();
        world
            .set_selector(
                team,
                Selector::Projects(ProjectPredicate::Explicit(BTreeSet::from([project]))),
            )
            .unwrap();
        world.add_member(team, user).unwrap();

        assert!(can_browse(&world, user, &Target::Component(open)));
        assert!(!can_browse(&world, user, &Target::Component(restricted)));

        // Explicit component selection is the only way in.
        let explicit = world.create_team("restricted crew", None).unwrap();
        world
            .set_selector(explicit, Selector::Components(BTreeSet::from([restricted])))
            .unwrap();
        world.add_member(explicit, user).unwrap();
        assert!(can_browse(&world, user, &Target::Component(restricted)));
    }

    #[test]
    fn test_custom_mode_isolation() {
        let mut world = world();
        world.provision_instance_teams().unwrap();
        let project = world.create_project("foo", AccessMode::Public).unwrap();
        let user = world.insert_user("ana", "ana@example.com").unwrap();
        // Membership in an instance-wide default team is enough for a
        // public project.
        let users_team = world.team_by_name("Users").unwrap().id;
        world.add_member(users_team, user).unwrap();
        assert!(can_browse(&world, user, &Target::Project(project)));

        world.set_access_mode(project, AccessMode::Custom).unwrap();
        assert!(!can_browse(&world, user, &Target::Project(project)));

        // An explicit team naming the project restores access.
        let team = world.create_team("foo crew", None).unwrap();
        world
            .set_selector(
                team,
                Selector::Projects(ProjectPredicate::Explicit(BTreeSet::from([project]))),
            )
            .unwrap();
        world.add_member(team, user).unwrap();
        assert!(can_browse(&world, user, &Target::Project(project)));
    }

    #[test]
    fn test_spanish_admin_reviewers_scenario() {
        let mut world = world();
        let project = world.create_project("foo", AccessMode::Custom).unwrap();
        let bar = world.register_component(project, "bar", false).unwrap();
        let baz = world.register_component(project, "baz", false).unwrap();
        let user = world.insert_user("ana", "ana@example.com").unwrap();

        let team = world.create_team("Spanish Admin-Reviewers", None).unwrap();
        world.assign_role(team, "Review strings").unwrap();
        world.assign_role(team, "Manage repository").unwrap();
        world
            .set_selector(team, Selector::Components(BTreeSet::from([bar])))
            .unwrap();
        world.set_language_restriction(team, spanish_only()).unwrap();
        world.add_member(team, user).unwrap();

        assert!(has_permission(
            &world,
            user,
            Permission::StringsReview,
            &Target::translation(bar, "es")
        ));
        assert!(!has_permission(
            &world,
            user,
            Permission::StringsReview,
            &Target::translation(bar, "fr")
        ));
        // Sibling components of the selected component's project stay
        // browsable (they are unrestricted).
        assert!(can_browse(&world, user, &Target::Component(baz)));
        assert!(has_permission(
            &world,
            user,
            Permission::VcsCommit,
            &Target::Component(bar)
        ));
    }

    #[test]
    fn test_permissions_union_across_teams() {
        let mut world = world();
        let project = world.create_project("foo", AccessMode::Custom).unwrap();
        let component = world.register_component(project, "bar", false).unwrap();
        let user = world.insert_user("ana", "ana@example.com").unwrap();

        let reviewers = world.create_team("reviewers", None).unwrap();
        world.assign_role(reviewers, "Review strings").unwrap();
        world
            .set_selector(reviewers, Selector::Components(BTreeSet::from([component])))
            .unwrap();
        world.add_member(reviewers, user).unwrap();

        let vcs = world.create_team("vcs crew", None).unwrap();
        world.assign_role(vcs, "Manage repository").unwrap();
        world
            .set_selector(
                vcs,
                Selector::Projects(ProjectPredicate::Explicit(BTreeSet::from([project]))),
            )
            .unwrap();
        world.add_member(vcs, user).unwrap();

        let effective = effective_permissions(&world, user, &Target::Component(component));
        assert!(effective.contains(&Permission::StringsReview));
        assert!(effective.contains(&Permission::VcsCommit));
        assert!(!effective.contains(&Permission::BillingView));
    }

    #[test]
    fn test_dangling_component_list_resolves_to_no_match() {
        let mut world = world();
        let project = world.create_project("foo", AccessMode::Custom).unwrap();
        let component = world.register_component(project, "bar", false).unwrap();
        let list = world
            .create_component_list("curated", BTreeSet::from([component]))
            .unwrap();
        let user = world.insert_user("ana", "ana@example.com").unwrap();
        let team = world.create_team("curators", None).unwrap();
        world.set_selector(team, Selector::ComponentList(list)).unwrap();
        world.add_member(team, user).unwrap();
        assert!(can_browse(&world, user, &Target::Component(component)));

        // Deleting the list leaves the team pointing at nothing; the check
        // degrades to deny instead of erroring.
        world.delete_component_list(list).unwrap();
        assert!(!can_browse(&world, user, &Target::Component(component)));
    }

    #[test]
    fn test_absent_target_denies() {
        let mut world = world();
        let user = world.insert_user("ana", "ana@example.com").unwrap();
        world.set_superuser(user, true).unwrap();

        assert!(!can_browse(&world, user, &Target::Project(Uuid::new_v4())));
        assert!(!has_permission(
            &world,
            user,
            Permission::StringsEdit,
            &Target::Component(Uuid::new_v4())
        ));
    }

    #[test]
    fn test_superuser_bypasses_scoping() {
        let mut world = world();
        let project = world.create_project("foo", AccessMode::Custom).unwrap();
        let restricted = world.register_component(project, "baz", true).unwrap();
        let user = world.insert_user("root", "root@example.com").unwrap();
        world.set_superuser(user, true).unwrap();

        assert!(can_browse(&world, user, &Target::Component(restricted)));
        assert!(has_permission(
            &world,
            user,
            Permission::ProjectManageAccess,
            &Target::Project(project)
        ));
        assert_eq!(
            effective_permissions(&world, user, &Target::Project(project)).len(),
            Permission::ALL.len()
        );
    }

    #[test]
    fn test_inactive_user_loses_all_access() {
        let mut world = world();
        let project = world.create_project("foo", AccessMode::Custom).unwrap();
        let user = world.insert_user("ana", "ana@example.com").unwrap();
        let team = world.create_team("crew", None).unwrap();
        world.assign_role(team, "Administration").unwrap();
        world
            .set_selector(
                team,
                Selector::Projects(ProjectPredicate::Explicit(BTreeSet::from([project]))),
            )
            .unwrap();
        world.add_member(team, user).unwrap();
        assert!(can_browse(&world, user, &Target::Project(project)));

        world.set_active(user, false).unwrap();
        assert!(!can_browse(&world, user, &Target::Project(project)));
        assert!(!has_permission(
            &world,
            user,
            Permission::ProjectEditSettings,
            &Target::Project(project)
        ));
    }

    #[test]
    fn test_instance_permissions_ignore_content_scope() {
        let mut world = world();
        let user = world.insert_user("ops", "ops@example.com").unwrap();
        world
            .define_custom_role("Team admin", &["teams.manage"])
            .unwrap();
        let team = world.create_team("operators", None).unwrap();
        world.assign_role(team, "Team admin").unwrap();
        world.add_member(team, user).unwrap();

        // No selector at all: instance targets still resolve.
        assert!(has_permission(
            &world,
            user,
            Permission::TeamsManage,
            &Target::Instance
        ));
        assert!(!has_permission(
            &world,
            user,
            Permission::RolesManage,
            &Target::Instance
        ));
    }

    #[test]
    fn test_browsable_projects_filters_and_sorts() {
        let mut world = world();
        world.provision_instance_teams().unwrap();
        let public = world.create_project("zeta", AccessMode::Public).unwrap();
        // The private project never shows up in the listing.
        world.create_project("alpha", AccessMode::Private).unwrap();
        let explicit = world.create_project("mid", AccessMode::Custom).unwrap();

        let user = world.insert_user("ana", "ana@example.com").unwrap();
        let viewers = world.team_by_name("Viewers").unwrap().id;
        world.add_member(viewers, user).unwrap();
        let team = world.create_team("mid crew", None).unwrap();
        world
            .set_selector(
                team,
                Selector::Projects(ProjectPredicate::Explicit(BTreeSet::from([explicit]))),
            )
            .unwrap();
        world.add_member(team, user).unwrap();

        // Sorted by slug: "mid" before "zeta".
        assert_eq!(browsable_projects(&world, user), vec![explicit, public]);
    }

    #[test]
    fn test_protected_project_requires_membership() {
        let mut world = world();
        world.provision_instance_teams().unwrap();
        let project = world.create_project("foo", AccessMode::Protected).unwrap();
        let user = world.insert_user("ana", "ana@example.com").unwrap();
        let users_team = world.team_by_name("Users").unwrap().id;
        world.add_member(users_team, user).unwrap();

        // AllPublic does not reach Protected projects.
        assert!(!can_browse(&world, user, &Target::Project(project)));

        let review = world.team_by_name("foo/Review").unwrap().id;
        world.add_member(review, user).unwrap();
        assert!(can_browse(&world, user, &Target::Project(project)));
    }
}
