use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("root_dir: sql").unwrap();
    config.validate().unwrap();
    assert_eq!(config.root_dir, "sql");
    assert_eq!(config.migrations_dir, "migrations");
    assert_eq!(config.up_dir, "up");
    assert_eq!(config.down_dir, "down");
    assert_eq!(config.bookkeeping_table, "propel_migration");
    assert!(config.schemas.is_none());
    assert!(config.warnings().is_empty());
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
root_dir: build/sql/
migrations_dir: generated-migrations
up_dir: forward
down_dir: backward
bookkeeping_table: propel_history
schemas:
  - main
  - audit
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();

    let project = Path::new("/project");
    assert_eq!(
        config.root_dir_absolute(project),
        PathBuf::from("/project/build/sql")
    );
    assert_eq!(
        config.migrations_dir_absolute(project),
        PathBuf::from("/project/generated-migrations")
    );
    assert_eq!(config.direction_dirs(), DirectionDirs::new("forward", "backward"));
    assert_eq!(config.bookkeeping_filter().table(), "propel_history");
    assert_eq!(config.schemas.as_deref().unwrap(), ["main", "audit"]);
}

#[test]
fn test_root_dir_required() {
    assert!(serde_yaml::from_str::<Config>("up_dir: up").is_err());
}

#[test]
fn test_unknown_fields_rejected() {
    assert!(serde_yaml::from_str::<Config>("root_dir: sql\nroot: other").is_err());
}

#[test]
fn test_absolute_root_dir_is_kept() {
    let config = Config::new("/var/sql");
    assert_eq!(
        config.root_dir_absolute(Path::new("/project")),
        PathBuf::from("/var/sql")
    );
}

#[test]
fn test_validate_rejects_empty_values() {
    let mut config = Config::new(" ");
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));

    config = Config::new("sql");
    config.down_dir = String::new();
    assert!(config.validate().is_err());

    config = Config::new("sql");
    config.bookkeeping_table = String::new();
    assert!(config.validate().is_err());

    config = Config::new("sql");
    config.schemas = Some(vec!["main".into(), String::new()]);
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_nested_direction_dirs() {
    for bad in ["a/b", r"a\b", "..", "."] {
        let mut config = Config::new("sql");
        config.up_dir = bad.to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("up_dir"), "{bad}: {err}");
    }
}

#[test]
fn test_merged_direction_dirs_warn() {
    let mut config = Config::new("sql");
    config.down_dir = "up".to_string();
    config.validate().unwrap();

    let warnings = config.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("share one slot sequence"));
    assert!(config.direction_dirs().is_merged());
}

#[test]
fn test_empty_schema_list_warns() {
    let mut config = Config::new("sql");
    config.schemas = Some(Vec::new());
    assert_eq!(config.warnings().len(), 1);
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("px.yml"), "root_dir: from_yml\n").unwrap();
    std::fs::write(dir.path().join("px.yaml"), "root_dir: from_yaml\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.root_dir, "from_yml");
}

#[test]
fn test_load_from_dir_yaml_fallback() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("px.yaml"), "root_dir: from_yaml\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.root_dir, "from_yaml");
}

#[test]
fn test_load_from_dir_missing() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    match err {
        CoreError::ConfigNotFound { path } => assert!(path.ends_with("px.yml")),
        other => panic!("expected ConfigNotFound, got {other:?}"),
    }
}

#[test]
fn test_load_invalid_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("px.yml");
    std::fs::write(&path, "root_dir: [unclosed").unwrap();
    assert!(matches!(Config::load(&path), Err(CoreError::Yaml(_))));
}

#[test]
fn test_load_runs_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("px.yml");
    std::fs::write(&path, "root_dir: sql\nup_dir: a/b\n").unwrap();
    assert!(matches!(
        Config::load(&path),
        Err(CoreError::ConfigInvalid { .. })
    ));
}
