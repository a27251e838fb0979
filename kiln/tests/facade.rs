//! Tests of the default engine and configuration loading.

#![allow(clippy::panic_in_result_fn)]

use anyhow::Result;
use kiln::{Config, Reporters, Status, assert};
use pretty_assertions::assert_eq;
use std::io::Write;

// All default-engine interaction lives in this one test; the engine is shared
// by every test in the binary.
#[tokio::test]
async fn default_engine_runs_declared_suites() -> Result<()> {
    kiln::update_config(
        Config::default()
            .with_app_name("Facade")
            .with_reporters(Reporters {
                console: false,
                json: false,
                junit: false,
            }),
    );
    assert_eq!(kiln::config().app_name, "Facade");

    kiln::suite("Facade")
        .test("deep equality", |_| async {
            assert::equal(vec![1, 2, 3], vec![1, 2, 3])?;
            Ok(())
        })
        .test("strings differ", |_| async {
            assert::equal("kiln", "kilm")?;
            Ok(())
        });

    assert!(std::ptr::eq(kiln::engine(), kiln::engine()));
    assert_eq!(kiln::engine().pending_batches(), 1);

    let report = kiln::run().await?;
    assert_eq!(report.data().project_name, "Facade");
    assert_eq!(report.stats().total, 2);
    assert_eq!(report.suites()[0].tests[1].status, Status::Failed);
    assert!(report.suites()[0].tests[1].errors[0].contains("^"));

    // Every reporter is disabled, so this writes nothing.
    kiln::report(&report)?;

    let empty = kiln::run().await?;
    assert_eq!(empty.stats().total, 0);
    Ok(())
}

#[test]
fn explicit_config_file_is_loaded() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(
        file,
        r#"
        app-name = "From file"
        verbose = true

        [reporters]
        junit = true
        "#
    )?;

    let loaded = kiln::config::load_config(Some(file.path()));
    assert!(loaded.error.is_none());
    assert!(loaded.explicit_path);
    assert_eq!(loaded.path.as_deref(), Some(file.path()));
    assert_eq!(loaded.settings.engine.app_name, "From file");
    assert!(loaded.settings.engine.verbose);
    assert!(loaded.settings.engine.reporters.console);
    assert!(loaded.settings.engine.reporters.junit);
    Ok(())
}

#[test]
fn invalid_explicit_config_is_reported() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "reporters = 3")?;

    let loaded = kiln::config::load_config(Some(file.path()));
    assert!(matches!(
        loaded.error,
        Some(kiln::config::ConfigLoadError::Parse(_))
    ));
    assert_eq!(loaded.settings, kiln::config::Settings::default());
    Ok(())
}

#[test]
fn compare_is_reexported() {
    let rendered = kiln::compare(&kiln::Value::from(1), &kiln::Value::from("1"));
    assert_eq!(
        rendered,
        "++1  [string]  (Expected)\n--1  [number]  (Actual)\n"
    );
}
