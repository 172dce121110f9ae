//! Loading experiment configuration from YAML files.

use qpe_adapter_sim::NormalizationPolicy;
use qpe_core::{ConfigError, QpeConfig, WrapPolicy};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_yaml(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_yaml_round_trip() {
    let config = QpeConfig {
        estimation_wires: 5,
        seed: Some(1234),
        wrap_policy: WrapPolicy::SingleStep,
        normalization_policy: NormalizationPolicy::Warn,
        ..QpeConfig::default()
    };
    let yaml = serde_yaml_ng::to_string(&config).unwrap();
    assert!(yaml.contains("single-step"));

    let file = write_yaml(&yaml);
    let loaded = QpeConfig::from_file(file.path()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_file_uses_defaults() {
    let file = write_yaml("estimation_wires: 6\n");
    let loaded = QpeConfig::from_file(file.path()).unwrap();
    assert_eq!(loaded.estimation_wires, 6);
    assert_eq!(loaded.seed, None);
    assert_eq!(loaded.wrap_policy, WrapPolicy::Modulo);
    assert_eq!(loaded.max_qubits, 20);
}

#[test]
fn test_invalid_file_values_are_rejected() {
    let file = write_yaml("estimation_wires: 0\n");
    assert!(matches!(
        QpeConfig::from_file(file.path()),
        Err(ConfigError::ValidationError(_))
    ));

    let file = write_yaml("wrap_policy: clamp\n");
    assert!(matches!(
        QpeConfig::from_file(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");
    assert!(matches!(
        QpeConfig::from_file(&missing),
        Err(ConfigError::IoError(_))
    ));
}
