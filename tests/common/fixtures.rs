//! Test fixtures
//!
//! Builds an engine with a small but realistic content graph: two projects,
//! a restricted component, a language catalog and a superuser to bootstrap
//! administration.

use polyglot_acl::{AccessEngine, AccessMode};
use std::sync::Once;
use uuid::Uuid;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A populated engine plus the IDs tests keep reaching for
pub struct Fixture {
    pub engine: AccessEngine,
    /// Bootstrap superuser
    pub root: Uuid,
    /// Public project `fusion`
    pub fusion: Uuid,
    /// Unrestricted component `fusion/ui`
    pub ui: Uuid,
    /// Unrestricted component `fusion/docs`
    pub docs: Uuid,
    /// Restricted component `fusion/secrets`
    pub secrets: Uuid,
    /// Private project `skunkworks`
    pub skunkworks: Uuid,
}

/// Build the standard fixture
pub fn standard_fixture() -> Fixture {
    init_tracing();

    let engine = AccessEngine::with_defaults().expect("engine init");
    for (code, name) in [("es", "Spanish"), ("fr", "French"), ("de", "German")] {
        engine.register_language(code, name).expect("language");
    }

    let root = engine.register_user("root", "root@example.com").expect("root");
    engine.set_superuser(root, true).expect("superuser");

    let fusion = engine
        .create_project("fusion", AccessMode::Public)
        .expect("project");
    let ui = engine
        .register_component(fusion, "ui", false)
        .expect("component");
    let docs = engine
        .register_component(fusion, "docs", false)
        .expect("component");
    let secrets = engine
        .register_component(fusion, "secrets", true)
        .expect("component");

    let skunkworks = engine
        .create_project("skunkworks", AccessMode::Private)
        .expect("project");

    Fixture {
        engine,
        root,
        fusion,
        ui,
        docs,
        secrets,
        skunkworks,
    }
}

impl Fixture {
    /// Look up a team ID by name
    pub fn team(&self, name: &str) -> Uuid {
        self.engine
            .snapshot()
            .team_by_name(name)
            .unwrap_or_else(|| panic!("no team named {name}"))
            .id
    }

    /// Register an ordinary user
    pub fn user(&self, username: &str) -> Uuid {
        self.engine
            .register_user(username, &format!("{username}@example.com"))
            .expect("user")
    }
}
