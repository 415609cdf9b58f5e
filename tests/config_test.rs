//! Integration tests for Settings config loading.
//!
//! These tests run without a global config (temp directories only),
//! so they test local config merging with defaults.

use std::fs;

use tempfile::TempDir;

use itemtree::application::ApplicationError;
use itemtree::config::{local_config_path, Settings};
use itemtree::domain::OrphanPolicy;

#[test]
fn given_no_local_config_when_load_then_uses_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.orphans, OrphanPolicy::Drop);
    assert!(settings.pretty);
}

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "orphans = \"append\"\npretty = false\n",
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.orphans, OrphanPolicy::Append);
    assert!(!settings.pretty);
}

#[test]
fn given_partial_local_config_when_load_then_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "orphans = \"reject\"\n").unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.orphans, OrphanPolicy::Reject);
    assert!(settings.pretty);
}

#[test]
fn given_unknown_policy_in_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "orphans = \"keep\"\n").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_effective_settings_when_rendered_then_round_trips_through_toml() {
    let settings = Settings {
        orphans: OrphanPolicy::Append,
        pretty: false,
    };
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), settings.to_toml().unwrap()).unwrap();

    let loaded = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(loaded, settings);
}
