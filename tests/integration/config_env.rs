//! Layered configuration: global file, explicit file, environment.

use super::test_utils::with_env;
use mirrorsync::config::ConfigLoader;
use std::fs;

#[test]
fn test_environment_overrides_defaults() {
    let config = with_env(
        &[
            ("MIRRORSYNC_SYNC__INTERVAL_SECS", "42"),
            ("MIRRORSYNC_LOGGING__LEVEL", "debug"),
        ],
        |_| ConfigLoader::load(None).unwrap(),
    );
    assert_eq!(config.sync.interval_secs, 42);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_environment_overrides_explicit_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("mirrorsync.toml");
    fs::write(&path, "[sync]\ninterval_secs = 300\nchunk_size = 8192\n").unwrap();

    let config = with_env(&[("MIRRORSYNC_SYNC__INTERVAL_SECS", "5")], |_| {
        ConfigLoader::load(Some(&path)).unwrap()
    });
    assert_eq!(config.sync.interval_secs, 5);
    assert_eq!(config.sync.chunk_size, 8192);
}

#[test]
fn test_invalid_environment_value_rejected() {
    let result = with_env(&[("MIRRORSYNC_SYNC__INTERVAL_SECS", "0")], |_| {
        ConfigLoader::load(None)
    });
    assert!(result.is_err());
}

#[cfg(target_os = "linux")]
#[test]
fn test_global_file_read_from_xdg_config_home() {
    let config = with_env(&[], |config_home| {
        let dir = config_home.join("mirrorsync");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "[sync]\nsentinel_name = \".mirror-lock\"\n").unwrap();
        ConfigLoader::load(None).unwrap()
    });
    assert_eq!(config.sync.sentinel_name, ".mirror-lock");
}
