use std::path::Path;

use super::*;

#[test]
fn test_default_config() {
    let config = CompileConfig::default();
    assert_eq!(config.default_ip, DataType::I32);
    assert_eq!(config.default_fp, DataType::F32);
    assert_eq!(config.narrowing, NarrowingPolicy::Warn);
    assert!(config.verify_totality);
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_full_table() {
    let toml = r#"
[typecheck]
default_ip = "i64"
default_fp = "f64"
narrowing = "deny"
verify_totality = false
"#;
    let config = CompileConfig::parse_toml(toml, Path::new("test.toml")).unwrap();
    assert_eq!(config.default_ip, DataType::I64);
    assert_eq!(config.default_fp, DataType::F64);
    assert_eq!(config.narrowing, NarrowingPolicy::Deny);
    assert!(!config.verify_totality);
}

#[test]
fn test_missing_keys_fall_back_to_defaults() {
    let toml = "[typecheck]\ndefault_fp = \"f16\"\n";
    let config = CompileConfig::parse_toml(toml, Path::new("test.toml")).unwrap();
    assert_eq!(config.default_ip, DataType::I32);
    assert_eq!(config.default_fp, DataType::F16);

    let empty = CompileConfig::parse_toml("", Path::new("test.toml")).unwrap();
    assert_eq!(empty, CompileConfig::default());
}

#[test]
fn test_rejects_float_default_ip() {
    let toml = "[typecheck]\ndefault_ip = \"f32\"\n";
    let err = CompileConfig::parse_toml(toml, Path::new("bad.toml")).unwrap_err();
    assert!(err.message.contains("bad.toml"));
    assert!(err.message.contains("default_ip must be an integer type"));
}

#[test]
fn test_rejects_integer_default_fp() {
    let toml = "[typecheck]\ndefault_fp = \"u8\"\n";
    let err = CompileConfig::parse_toml(toml, Path::new("bad.toml")).unwrap_err();
    assert!(err.message.contains("default_fp must be a floating-point type"));
}

#[test]
fn test_rejects_unknown_key_and_type_name() {
    let toml = "[typecheck]\ndefault_bits = 32\n";
    assert!(CompileConfig::parse_toml(toml, Path::new("bad.toml")).is_err());
    let toml = "[typecheck]\ndefault_ip = \"int\"\n";
    assert!(CompileConfig::parse_toml(toml, Path::new("bad.toml")).is_err());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("typecheck.toml");
    std::fs::write(&path, "[typecheck]\ndefault_ip = \"i16\"\nnarrowing = \"warn\"\n").unwrap();
    let config = CompileConfig::load(&path).unwrap();
    assert_eq!(config.default_ip, DataType::I16);
    assert_eq!(config.narrowing, NarrowingPolicy::Warn);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = CompileConfig::load(&path).unwrap_err();
    assert!(err.message.contains("cannot read config"));
}

#[test]
fn test_builder_methods() {
    let config = CompileConfig::default()
        .with_default_ip(DataType::I64)
        .with_default_fp(DataType::F64)
        .with_narrowing(NarrowingPolicy::Deny)
        .with_verify_totality(false);
    assert_eq!(config.default_ip, DataType::I64);
    assert_eq!(config.default_fp, DataType::F64);
    assert_eq!(config.narrowing, NarrowingPolicy::Deny);
    assert!(!config.verify_totality);
}
