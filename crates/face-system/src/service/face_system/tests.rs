use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::FacePersistency;
use toml::Table;

use super::*;
use crate::adapters::NullTransport;
use crate::ports::Channel;
use crate::service::Face;

// =============================================================================
// Test double
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
struct ProcessConfigArgs {
    section: Option<Table>,
    is_dry_run: bool,
}

#[derive(Default)]
struct DummyState {
    history: Vec<ProcessConfigArgs>,
    new_provided_schemes: BTreeSet<String>,
    /// Reject the pass with this dry-run flag.
    reject: Option<bool>,
    requests: Vec<CreateFaceRequest>,
}

/// Records every call; adopts `new_provided_schemes` on commit.
struct DummyProtocolFactory {
    state: Arc<Mutex<DummyState>>,
    provided_schemes: BTreeSet<String>,
}

impl DummyProtocolFactory {
    fn new() -> (Box<Self>, Arc<Mutex<DummyState>>) {
        let state = Arc::new(Mutex::new(DummyState::default()));
        let factory = Self {
            state: Arc::clone(&state),
            provided_schemes: BTreeSet::new(),
        };
        (Box::new(factory), state)
    }
}

impl ProtocolFactory for DummyProtocolFactory {
    fn provided_schemes(&self) -> &BTreeSet<String> {
        &self.provided_schemes
    }

    fn process_config(
        &mut self,
        section: Option<&ConfigSection>,
        context: &mut ConfigContext,
    ) -> Result<(), ConfigError> {
        let mut state = self.state.lock();
        state.history.push(ProcessConfigArgs {
            section: section.map(|s| s.table().clone()),
            is_dry_run: context.is_dry_run,
        });
        if state.reject == Some(context.is_dry_run) {
            return Err(ConfigError::InvalidValue {
                path: "face_system.dummy".into(),
                reason: "rejected".into(),
            });
        }
        if !context.is_dry_run {
            self.provided_schemes = state.new_provided_schemes.clone();
        }
        Ok(())
    }

    fn create_face(&mut self, request: CreateFaceRequest, completion: CreateFaceCompletion) {
        let uri = request.uri.clone();
        self.state.lock().requests.push(request);
        completion.succeed(Face::new(
            uri.clone(),
            uri,
            Box::new(NullTransport::new()),
        ));
    }

    fn get_channels(&self) -> Vec<Arc<dyn Channel>> {
        Vec::new()
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn section(text: &str) -> ConfigSection {
    let document: Table = text.parse().unwrap();
    match document.get("face_system") {
        Some(toml::Value::Table(table)) => ConfigSection::new("face_system", table.clone()),
        _ => ConfigSection::empty("face_system"),
    }
}

fn schemes(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn key_of(args: &ProcessConfigArgs) -> Option<&str> {
    args.section.as_ref()?.get("key")?.as_str()
}

/// Same factory object, by address.
fn is_factory(found: Option<&dyn ProtocolFactory>, expected: Option<&dyn ProtocolFactory>) -> bool {
    match (found, expected) {
        (Some(a), Some(b)) => std::ptr::addr_eq(a, b),
        _ => false,
    }
}

fn system_with(names: &[&str]) -> (FaceSystem, Vec<Arc<Mutex<DummyState>>>) {
    let mut system = FaceSystem::new();
    let states = names
        .iter()
        .map(|name| {
            let (factory, state) = DummyProtocolFactory::new();
            system.add_factory(*name, factory).unwrap();
            state
        })
        .collect();
    (system, states)
}

type Outcomes = Arc<Mutex<Vec<Result<FaceUri, CreationError>>>>;

fn create(system: &mut FaceSystem, uri: &str, outcomes: &Outcomes) {
    let created = Arc::clone(outcomes);
    let failed = Arc::clone(outcomes);
    system.create_face(
        uri,
        FacePersistency::Persistent,
        false,
        Box::new(move |face: Face| created.lock().push(Ok(face.remote_uri().clone()))),
        Box::new(move |err: CreationError| failed.lock().push(Err(err))),
    );
}

const NORMAL: &str = r#"
[face_system.f1]
key = "v1"

[face_system.f2]
key = "v2"
"#;

// =============================================================================
// process_config
// =============================================================================

#[test]
fn test_normal() {
    let (mut system, states) = system_with(&["f1", "f2"]);
    let config = section(NORMAL);

    system.process_config(&config, true).unwrap();
    for (state, expected) in states.iter().zip(["v1", "v2"]) {
        let state = state.lock();
        assert_eq!(state.history.len(), 1);
        assert!(state.history[0].is_dry_run);
        assert_eq!(key_of(&state.history[0]), Some(expected));
    }

    system.process_config(&config, false).unwrap();
    for (state, expected) in states.iter().zip(["v1", "v2"]) {
        let state = state.lock();
        assert_eq!(state.history.len(), 2);
        assert!(!state.history[1].is_dry_run);
        assert_eq!(key_of(&state.history[1]), Some(expected));
    }
}

#[test]
fn test_omitted_section() {
    let (mut system, states) = system_with(&["f1", "f2"]);
    let config = section("[face_system.f1]\n");

    for (pass, is_dry_run) in [true, false].into_iter().enumerate() {
        system.process_config(&config, is_dry_run).unwrap();

        let f1 = states[0].lock();
        assert_eq!(f1.history.len(), pass + 1);
        assert_eq!(f1.history[pass].is_dry_run, is_dry_run);
        assert_eq!(f1.history[pass].section, Some(Table::new()));

        let f2 = states[1].lock();
        assert_eq!(f2.history.len(), pass + 1);
        assert_eq!(f2.history[pass].is_dry_run, is_dry_run);
        assert_eq!(f2.history[pass].section, None);
    }
}

#[test]
fn test_missing_face_system_section() {
    let (mut system, states) = system_with(&["f1", "f2", "f3"]);

    system.reload(&section("")).unwrap();

    for state in &states {
        let state = state.lock();
        let calls: Vec<_> = state
            .history
            .iter()
            .map(|a| (a.section.is_some(), a.is_dry_run))
            .collect();
        assert_eq!(calls, [(false, true), (false, false)]);
    }
}

#[test]
fn test_unknown_section() {
    let (mut system, states) = system_with(&["f1"]);
    let config = section("[face_system.f0]\n");

    for is_dry_run in [true, false] {
        assert_eq!(
            system.process_config(&config, is_dry_run).unwrap_err(),
            ConfigError::UnrecognizedSection {
                parent: "face_system".into(),
                name: "f0".into(),
            }
        );
    }
    assert!(states[0].lock().history.is_empty());
}

#[test]
fn test_unknown_section_with_no_factories() {
    let mut system = FaceSystem::new();
    let config = section("[face_system.f0]\n");
    assert!(system.process_config(&config, true).is_err());
    assert!(system.process_config(&config, false).is_err());
}

#[test]
fn test_subsection_must_be_table() {
    let (mut system, states) = system_with(&["f1"]);
    let config = section("[face_system]\nf1 = 5\n");

    assert!(matches!(
        system.process_config(&config, true),
        Err(ConfigError::InvalidValue { path, .. }) if path == "face_system.f1"
    ));
    assert!(states[0].lock().history.is_empty());
}

#[test]
fn test_change_provided_schemes() {
    let (mut system, states) = system_with(&["f1"]);
    let config = section("[face_system.f1]\n");

    states[0].lock().new_provided_schemes = schemes(&["s1", "s2"]);
    system.process_config(&config, false).unwrap();
    let f1 = system.get_factory_by_id("f1");
    assert!(system.get_factory_by_scheme("f1").is_none());
    assert!(is_factory(system.get_factory_by_scheme("s1"), f1));
    assert!(is_factory(system.get_factory_by_scheme("s2"), f1));

    states[0].lock().new_provided_schemes = schemes(&["s1", "s3"]);
    system.process_config(&config, false).unwrap();
    let f1 = system.get_factory_by_id("f1");
    assert!(system.get_factory_by_scheme("f1").is_none());
    assert!(is_factory(system.get_factory_by_scheme("s1"), f1));
    assert!(system.get_factory_by_scheme("s2").is_none());
    assert!(is_factory(system.get_factory_by_scheme("s3"), f1));
}

#[test]
fn test_dry_run_leaves_schemes_alone() {
    let (mut system, states) = system_with(&["f1"]);
    states[0].lock().new_provided_schemes = schemes(&["s1"]);

    system.process_config(&section(""), true).unwrap();

    assert!(system.get_factory_by_id("f1").unwrap().provided_schemes().is_empty());
    assert!(system.get_factory_by_scheme("s1").is_none());
    assert_eq!(system.schemes().count(), 0);
}

#[test]
fn test_reload_aborts_on_validation_failure() {
    let (mut system, states) = system_with(&["f1", "f2"]);
    states[0].lock().new_provided_schemes = schemes(&["s1"]);
    states[1].lock().reject = Some(true);

    assert!(system.reload(&section(NORMAL)).is_err());

    // no commit pass reached either factory
    for state in &states {
        assert!(state.lock().history.iter().all(|a| a.is_dry_run));
    }
    assert!(system.get_factory_by_scheme("s1").is_none());
}

#[test]
fn test_reload_runs_both_passes_in_order() {
    let (mut system, states) = system_with(&["f1", "f2"]);
    system.reload(&section(NORMAL)).unwrap();

    for state in &states {
        let flags: Vec<bool> = state.lock().history.iter().map(|a| a.is_dry_run).collect();
        assert_eq!(flags, [true, false]);
    }
}

#[test]
fn test_commit_failure_still_rebuilds_scheme_table() {
    let (mut system, states) = system_with(&["f1", "f2"]);
    states[0].lock().new_provided_schemes = schemes(&["s1"]);
    states[1].lock().reject = Some(false);

    assert!(system.process_config(&section(""), false).is_err());

    let f1 = system.get_factory_by_id("f1");
    assert!(is_factory(system.get_factory_by_scheme("s1"), f1));
}

#[test]
fn test_scheme_conflict() {
    let (mut system, states) = system_with(&["f1", "f2"]);
    states[0].lock().new_provided_schemes = schemes(&["shared", "a"]);
    states[1].lock().new_provided_schemes = schemes(&["shared", "b"]);

    assert_eq!(
        system.process_config(&section(""), false).unwrap_err(),
        ConfigError::SchemeConflict {
            scheme: "shared".into(),
            first: "f1".into(),
            second: "f2".into(),
        }
    );
    assert!(system.get_factory_by_scheme("shared").is_none());
    assert!(is_factory(system.get_factory_by_scheme("a"), system.get_factory_by_id("f1")));
    assert!(is_factory(system.get_factory_by_scheme("b"), system.get_factory_by_id("f2")));
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_duplicate_factory_rejected() {
    let (mut system, _) = system_with(&["f1"]);
    let (again, _) = DummyProtocolFactory::new();
    assert_eq!(
        system.add_factory("f1", again).unwrap_err(),
        ConfigError::DuplicateFactory("f1".into())
    );
}

#[test]
fn test_list_in_registration_order() {
    let (system, _) = system_with(&["zeta", "alpha", "mid"]);
    let names: Vec<&str> = system.list_protocol_factories().map(|(name, _)| name).collect();
    assert_eq!(names, ["zeta", "alpha", "mid"]);
    assert!(system.get_factory_by_id("nope").is_none());
}

#[test]
fn test_default_factories() {
    let mut system = FaceSystem::with_default_factories();
    assert!(system.get_factory_by_id(INTERNAL_FACTORY).is_some());
    assert!(system.get_factory_by_scheme("internal").is_none());

    system.reload(&section("")).unwrap();
    assert!(is_factory(
        system.get_factory_by_scheme("internal"),
        system.get_factory_by_id(INTERNAL_FACTORY)
    ));
}

// =============================================================================
// create_face
// =============================================================================

#[test]
fn test_create_face_routes_by_scheme() {
    let (mut system, states) = system_with(&["f1"]);
    states[0].lock().new_provided_schemes = schemes(&["udp4"]);
    system.reload(&section("")).unwrap();
    let outcomes = Outcomes::default();

    create(&mut system, "udp4://192.0.2.1:6363", &outcomes);

    assert_eq!(
        *outcomes.lock(),
        vec![Ok(FaceUri::parse("udp4://192.0.2.1:6363").unwrap())]
    );
    let state = states[0].lock();
    assert_eq!(state.requests.len(), 1);
    assert_eq!(state.requests[0].persistency, FacePersistency::Persistent);
}

#[test]
fn test_create_face_malformed_uri() {
    let (mut system, states) = system_with(&["f1"]);
    let outcomes = Outcomes::default();

    create(&mut system, "not a uri", &outcomes);

    assert_eq!(
        *outcomes.lock(),
        vec![Err(CreationError::bad_request("Malformed URI"))]
    );
    assert!(states[0].lock().requests.is_empty());
}

#[test]
fn test_create_face_unsupported_scheme() {
    let (mut system, states) = system_with(&["f1"]);
    states[0].lock().new_provided_schemes = schemes(&["udp4"]);
    system.reload(&section("")).unwrap();
    let outcomes = Outcomes::default();

    // registration names are not schemes
    create(&mut system, "f1://host", &outcomes);
    create(&mut system, "tcp4://192.0.2.1:6363", &outcomes);

    assert_eq!(
        *outcomes.lock(),
        vec![
            Err(CreationError::not_acceptable("Unsupported protocol")),
            Err(CreationError::not_acceptable("Unsupported protocol")),
        ]
    );
    assert!(states[0].lock().requests.is_empty());
}
