//! Integration tests for rangebind.

#![allow(clippy::expect_used)]

use rangebind::binding::{Bindable, BindingState, ResetOutcome, Session};
use rangebind::core::{ArraySelector, DomainRange, RangeControl, SourceId};
use rangebind::property::{MemoryProperty, MemoryRegistry, SqliteRegistry};
use rangebind::prototype::{CloneMap, WidgetArena};
use rangebind::trace::{TraceLog, TraceState};
use tempfile::TempDir;

/// Helper to create a registry with one property over `(3.2, 97.6)`.
fn create_test_registry() -> MemoryRegistry {
    let mut registry = MemoryRegistry::new();
    registry.insert(
        MemoryProperty::new("ClipRange", vec![0.0, 0.0]).with_domain(DomainRange::new(3.2, 97.6)),
    );
    registry
}

/// Helper to create an initialized `SQLite` registry in a temp dir.
fn create_test_sqlite() -> (SqliteRegistry, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let mut registry = SqliteRegistry::open(&db_path).expect("Failed to open registry");
    registry.init().expect("Failed to init registry");
    (registry, temp_dir)
}

#[test]
fn test_full_lifecycle() {
    let mut registry = create_test_registry();
    let mut log = TraceLog::new();
    let mut control = RangeControl::with_property("ClipRange");
    control.set_minimum_label("Minimum");

    let mut session = Session::new(&mut registry).with_trace(&mut log);

    // Fresh control: Reset scales to the domain.
    control.reset(&mut session).expect("reset failed");
    assert_eq!(control.range(), (3.0, 98.0));
    assert_eq!(control.resolution(), 1.0);
    assert_eq!(control.binding_state(), BindingState::Bound);

    // User edits diverge.
    control.on_min_edited(20.0);
    control.on_max_edited(60.0);
    assert_eq!(control.binding_state(), BindingState::Diverged);

    // Accept commits and traces.
    let accepted = control.accept(&mut session).expect("accept failed");
    assert!(accepted.traced);
    assert_eq!(control.binding_state(), BindingState::Committed);

    // Further edits are discarded by Reset.
    control.on_max_edited(90.0);
    let outcome = control.reset(&mut session).expect("reset failed");
    assert_eq!(outcome, ResetOutcome::Restored { min: 20.0, max: 60.0 });
    assert_eq!(control.binding_state(), BindingState::Committed);

    drop(session);
    assert_eq!(
        log.statements(),
        &[
            "set kw(pvMinMax) [$kw(pvSource) GetPVWidget {Minimum}]".to_string(),
            "$kw(pvMinMax) SetMaxValue 60".to_string(),
            "$kw(pvMinMax) SetMinValue 20".to_string(),
        ]
    );
    assert_eq!(
        registry
            .get("ClipRange")
            .expect("property should exist")
            .elements(),
        &[20.0, 60.0]
    );
}

#[test]
fn test_accept_failure_keeps_edits() {
    let mut registry = MemoryRegistry::new();
    let mut control = RangeControl::with_property("ClipRange");
    control.set_max_value(3.0);

    let result = control.accept(&mut Session::new(&mut registry));
    assert!(result.is_err());
    assert!(control.is_modified());
    assert_eq!(control.values(), (0.0, 3.0));

    // Property appears later: the pending edit is still there to push.
    registry.insert(MemoryProperty::new("ClipRange", vec![0.0, 0.0]));
    control
        .accept(&mut Session::new(&mut registry))
        .expect("accept failed");
    assert!(!control.is_modified());
    assert_eq!(
        registry.get("ClipRange").expect("exists").elements(),
        &[0.0, 3.0]
    );
}

#[test]
fn test_domain_refresh_after_data_change() {
    let mut registry = create_test_registry();
    let mut control = RangeControl::with_property("ClipRange");
    control
        .reset(&mut Session::new(&mut registry))
        .expect("reset failed");

    registry
        .get_mut("ClipRange")
        .expect("exists")
        .set_domain(Some(DomainRange::new(0.0, 0.5)));
    control
        .refresh_from_domain(&mut Session::new(&mut registry))
        .expect("refresh failed");

    let (low, high) = control.range();
    assert!(low.abs() < 1e-12);
    assert!((high - 0.5).abs() < 1e-12);
    assert!((control.resolution() - 0.01).abs() < 1e-12);
}

#[test]
fn test_invalid_domain_is_reported_not_applied() {
    let mut registry = MemoryRegistry::new();
    registry.insert(
        MemoryProperty::new("ClipRange", vec![0.0, 0.0]).with_domain(DomainRange::new(9.0, 1.0)),
    );
    let mut control = RangeControl::with_property("ClipRange");
    control.set_range(0.0, 1.0);

    let result = control.reset(&mut Session::new(&mut registry));
    assert!(result.is_err());
    assert_eq!(control.range(), (0.0, 1.0));
}

/// Properties the synchronization protocol guarantees.
mod protocol_tests {
    use super::*;

    #[test]
    fn test_degenerate_domain() {
        let mut registry = MemoryRegistry::new();
        registry.insert(
            MemoryProperty::new("Iso", vec![0.0, 0.0]).with_domain(DomainRange::new(5.0, 5.0)),
        );
        let mut control = RangeControl::with_property("Iso");
        control
            .reset(&mut Session::new(&mut registry))
            .expect("reset failed");

        assert_eq!(control.range(), (5.0, 5.0));
        assert_eq!(control.values(), (5.0, 5.0));
        assert!(control.resolution() > 0.0);
    }

    #[test]
    fn test_reset_before_accept_is_idempotent() {
        let mut registry = create_test_registry();
        let mut control = RangeControl::with_property("ClipRange");

        control
            .reset(&mut Session::new(&mut registry))
            .expect("first reset");
        let first = (control.range(), control.values(), control.resolution());
        control
            .reset(&mut Session::new(&mut registry))
            .expect("second reset");
        let second = (control.range(), control.values(), control.resolution());

        assert_eq!(first, second);
        assert_eq!(
            registry.get("ClipRange").expect("exists").push_count(),
            0
        );
    }

    #[test]
    fn test_bootstrap_once_across_accepts() {
        let mut registry = create_test_registry();
        let mut log = TraceLog::new();
        let mut control = RangeControl::with_property("ClipRange");

        {
            let mut session = Session::new(&mut registry).with_trace(&mut log);
            for value in [1.0, 2.0, 3.0] {
                control.set_max_value(value);
                control.accept(&mut session).expect("accept failed");
            }
        }

        assert_eq!(log.count_matching("GetPVWidget"), 1);
        assert_eq!(log.count_matching("SetMaxValue"), 3);
        assert_eq!(control.trace_state(), TraceState::SelfInitialized);
    }

    #[test]
    fn test_shared_selector_cloned_once() {
        let mut arena = WidgetArena::new();
        let selector = arena.insert(ArraySelector::new("Scalars", "Input"));
        let first = arena.insert(RangeControl::with_property("ClipRange"));
        let second = arena.insert(RangeControl::with_property("ThresholdRange"));
        arena
            .attach_selector(first, selector)
            .expect("attach first");
        arena
            .attach_selector(second, selector)
            .expect("attach second");

        let mut map = CloneMap::new();
        let first_clone = arena
            .clone_range_control(first, SourceId(2), &mut map)
            .expect("clone first");
        let second_clone = arena
            .clone_range_control(second, SourceId(2), &mut map)
            .expect("clone second");

        let shared = arena
            .range_control(first_clone)
            .expect("first clone")
            .array_selector();
        assert_eq!(
            shared,
            arena
                .range_control(second_clone)
                .expect("second clone")
                .array_selector()
        );
        assert_ne!(shared, Some(selector));
        assert_eq!(arena.len(), 6);
    }

    #[test]
    fn test_cloned_control_traces_independently() {
        let mut arena = WidgetArena::new();
        let mut control = RangeControl::with_property("ClipRange");
        control.set_minimum_label("Minimum");
        let original = arena.insert(control);

        let mut log = TraceLog::new();
        arena
            .range_control_mut(original)
            .expect("original")
            .trace(Some(&mut log))
            .expect("trace failed");

        let clone = arena
            .clone_range_control(original, SourceId(4), &mut CloneMap::new())
            .expect("clone failed");
        arena
            .range_control_mut(clone)
            .expect("clone")
            .trace(Some(&mut log))
            .expect("trace failed");

        assert_eq!(log.count_matching("GetPVWidget"), 2);
        assert_eq!(
            log.statements()[3],
            "set kw(pvMinMax1) [$kw(pvSource4) GetPVWidget {Minimum}]"
        );
    }
}

/// `SQLite` registry tests.
mod sqlite_tests {
    use super::*;
    use rangebind::property::PropertyRegistry;

    #[test]
    fn test_accept_persists_across_reopen() {
        let (mut registry, temp) = create_test_sqlite();
        registry
            .define("ClipRange", &[0.0, 0.0], Some(DomainRange::new(0.0, 10.0)))
            .expect("define failed");

        let mut control = RangeControl::with_property("ClipRange");
        {
            let mut session = Session::new(&mut registry);
            control.reset(&mut session).expect("reset failed");
            control.on_min_edited(2.5);
            control.accept(&mut session).expect("accept failed");
        }
        drop(registry);

        let mut reopened =
            SqliteRegistry::open(temp.path().join("test.db")).expect("reopen failed");
        reopened.init().expect("init failed");
        let record = reopened
            .get("ClipRange")
            .expect("get failed")
            .expect("property should exist");
        assert_eq!(record.elements, vec![2.5, 10.0]);
        assert_eq!(record.push_count, 1);
        assert!(reopened.contains("ClipRange").expect("contains failed"));
    }

    #[test]
    fn test_reset_pulls_from_store() {
        let (mut registry, _temp) = create_test_sqlite();
        registry
            .define("ClipRange", &[0.0, 0.0], None)
            .expect("define failed");

        let mut control = RangeControl::with_property("ClipRange");
        control.set_range(0.0, 10.0);
        control.set_min_value(1.0);
        control.set_max_value(2.0);
        let mut session = Session::new(&mut registry);
        control.accept(&mut session).expect("accept failed");

        control.on_min_edited(8.0);
        let outcome = control.reset(&mut session).expect("reset failed");
        assert_eq!(outcome, ResetOutcome::Restored { min: 1.0, max: 2.0 });
    }

    #[test]
    fn test_migrates_v1_schema() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("old.db");
        {
            let conn = rusqlite::Connection::open(&db_path).expect("open");
            conn.execute_batch(
                r"
                CREATE TABLE schema_info (key TEXT PRIMARY KEY, value TEXT NOT NULL);
                CREATE TABLE properties (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL UNIQUE,
                    elements TEXT NOT NULL,
                    domain_low REAL,
                    domain_high REAL,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                INSERT INTO schema_info (key, value) VALUES ('version', '1');
                INSERT INTO properties (name, elements, domain_low, domain_high, created_at, updated_at)
                VALUES ('Legacy', '[1.0,2.0]', 0.0, 4.0, 0, 0);
                ",
            )
            .expect("v1 schema");
        }

        let mut registry = SqliteRegistry::open(&db_path).expect("open");
        registry.init().expect("migration failed");
        let record = registry
            .get("Legacy")
            .expect("get failed")
            .expect("legacy property");
        assert_eq!(record.elements, vec![1.0, 2.0]);
        assert_eq!(record.push_count, 0);
        assert_eq!(record.domain, Some(DomainRange::new(0.0, 4.0)));
    }
}

mod property_tests {
    use proptest::prelude::*;
    use rangebind::autoscale::{Quantization, quantize};
    use rangebind::core::{DomainRange, RangeControl};

    #[derive(Debug, Clone)]
    enum Edit {
        Min(f64),
        Max(f64),
    }

    fn edit() -> impl Strategy<Value = Edit> {
        prop_oneof![
            (-1000.0f64..1000.0).prop_map(Edit::Min),
            (-1000.0f64..1000.0).prop_map(Edit::Max),
        ]
    }

    proptest! {
        #[test]
        fn edits_keep_ordering(edits in prop::collection::vec(edit(), 1..40)) {
            let mut control = RangeControl::new();
            control.set_range(-500.0, 500.0);
            for edit in edits {
                match edit {
                    Edit::Min(v) => control.on_min_edited(v),
                    Edit::Max(v) => control.on_max_edited(v),
                }
                let (min, max) = control.values();
                prop_assert!(min <= max);
                prop_assert!((-500.0..=500.0).contains(&min));
                prop_assert!((-500.0..=500.0).contains(&max));
            }
        }

        #[test]
        fn quantized_bounds_cover_domain(low in -1.0e6f64..1.0e6, span in 1.0e-3f64..1.0e6) {
            let high = low + span;
            match quantize(&DomainRange::new(low, high)) {
                Ok(Quantization::Quantized { low: q_low, high: q_high, resolution }) => {
                    let tolerance = 1e-9 * low.abs().max(high.abs()).max(1.0);
                    prop_assert!(resolution > 0.0);
                    prop_assert!(q_low <= low + tolerance);
                    prop_assert!(q_high >= high - tolerance);
                }
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }
    }
}

/// CLI command integration tests.
mod cli_tests {
    use rangebind::cli::commands::execute;
    use rangebind::cli::parser::{Cli, Commands};
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Helper to create a CLI struct with custom `db_path`.
    fn make_cli(db_path: PathBuf, command: Commands) -> Cli {
        Cli {
            db_path: Some(db_path),
            verbose: false,
            format: "text".to_string(),
            command,
        }
    }

    /// Helper to create a CLI struct with JSON format.
    fn make_cli_json(db_path: PathBuf, command: Commands) -> Cli {
        Cli {
            db_path: Some(db_path),
            verbose: false,
            format: "json".to_string(),
            command,
        }
    }

    fn init(db_path: &PathBuf) {
        execute(&make_cli(db_path.clone(), Commands::Init { force: false })).expect("init");
    }

    #[test]
    fn test_cmd_init() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("test.db");

        let result = execute(&make_cli(db_path.clone(), Commands::Init { force: false }));
        assert!(result.expect("init result").contains("Initialized"));
        assert!(db_path.exists());
    }

    #[test]
    fn test_cmd_define_and_show_json() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("test.db");
        init(&db_path);

        execute(&make_cli(
            db_path.clone(),
            Commands::Define {
                name: "ClipRange".to_string(),
                low: Some(-1.0),
                high: Some(1.0),
                min: -0.5,
                max: 0.5,
            },
        ))
        .expect("define");

        let output = execute(&make_cli_json(
            db_path,
            Commands::Show {
                name: "ClipRange".to_string(),
            },
        ))
        .expect("show");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["name"], "ClipRange");
        assert_eq!(value["elements"][0], -0.5);
        assert_eq!(value["domain"]["high"], 1.0);
    }

    #[test]
    fn test_cmd_define_duplicate() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("test.db");
        init(&db_path);

        let define = || Commands::Define {
            name: "A".to_string(),
            low: None,
            high: None,
            min: 0.0,
            max: 0.0,
        };
        execute(&make_cli(db_path.clone(), define())).expect("first define");
        let err = execute(&make_cli(db_path, define())).expect_err("duplicate");
        assert!(err.to_string().contains("already defined"));
    }

    #[test]
    fn test_cmd_accept_with_control_config() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("test.db");
        init(&db_path);
        execute(&make_cli(
            db_path.clone(),
            Commands::Define {
                name: "ThresholdBetween".to_string(),
                low: Some(0.0),
                high: Some(100.0),
                min: 0.0,
                max: 0.0,
            },
        ))
        .expect("define");

        let control = temp_dir.path().join("control.json");
        std::fs::write(
            &control,
            r#"{
                "min_label": "Lower",
                "max_label": "Upper",
                "min_help": "Lower threshold",
                "max_help": "Upper threshold",
                "set_command": "ThresholdBetween",
                "array_menu": { "label": "Scalars", "input_name": "Input" }
            }"#,
        )
        .expect("write control");
        let trace = temp_dir.path().join("trace.tcl");

        let output = execute(&make_cli_json(
            db_path,
            Commands::Accept {
                name: "ThresholdBetween".to_string(),
                min: Some(80.0),
                max: Some(20.0),
                trace: Some(trace.clone()),
                control: Some(control),
                source: 2,
            },
        ))
        .expect("accept");

        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["accepted"]["min"], 20.0);
        assert_eq!(value["accepted"]["max"], 20.0);
        assert_eq!(value["accepted"]["traced"], true);
        assert_eq!(value["scaled"]["kind"], "refreshed");

        let contents = std::fs::read_to_string(&trace).expect("trace file");
        assert!(contents.starts_with("set kw(pvMinMax0) [$kw(pvSource2) GetPVWidget {Lower}]"));
    }

    #[test]
    fn test_cmd_autoscale_unconstrained() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("test.db");
        init(&db_path);
        execute(&make_cli(
            db_path.clone(),
            Commands::Define {
                name: "Open".to_string(),
                low: None,
                high: None,
                min: 0.0,
                max: 0.0,
            },
        ))
        .expect("define");

        let output = execute(&make_cli_json(
            db_path,
            Commands::Autoscale {
                name: "Open".to_string(),
            },
        ))
        .expect("autoscale");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["quantization"]["kind"], "unconstrained");
    }

    #[test]
    fn test_cmd_show_missing() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("test.db");
        init(&db_path);
        let result = execute(&make_cli(
            db_path,
            Commands::Show {
                name: "Nope".to_string(),
            },
        ));
        assert!(result.is_err());
    }
}

/// Binary smoke tests.
mod binary_tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn rangebind(db_dir: &TempDir) -> Command {
        let mut cmd = Command::cargo_bin("rangebind").expect("binary");
        cmd.env("RANGEBIND_DB_PATH", db_dir.path().join("properties.db"));
        cmd
    }

    #[test]
    fn test_help() {
        let mut cmd = Command::cargo_bin("rangebind").expect("binary");
        cmd.arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("autoscale"));
    }

    #[test]
    fn test_define_autoscale_roundtrip() {
        let dir = TempDir::new().expect("temp dir");
        rangebind(&dir).arg("init").assert().success();
        rangebind(&dir)
            .args(["define", "ClipRange", "--low", "3.2", "--high", "97.6"])
            .assert()
            .success();
        rangebind(&dir)
            .args(["autoscale", "ClipRange"])
            .assert()
            .success()
            .stdout("ClipRange: bounds [3, 98] resolution 1\n");
    }

    #[test]
    fn test_missing_property_fails() {
        let dir = TempDir::new().expect("temp dir");
        rangebind(&dir).arg("init").assert().success();
        rangebind(&dir)
            .args(["accept", "Nope", "--min", "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("could not find property of name: Nope"));
    }

    #[test]
    fn test_json_error_on_stdout() {
        let dir = TempDir::new().expect("temp dir");
        rangebind(&dir)
            .args(["--format", "json", "list"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("\"success\": false"));
    }
}
