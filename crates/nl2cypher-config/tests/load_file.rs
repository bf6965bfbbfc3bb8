//! Loading configuration files from disk

use std::io::Write;

use nl2cypher_config::{ConfigError, ConfigLoader};

#[tokio::test]
async fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[gate]
primary_url = "http://graph:8101"
overall_timeout_secs = 30

[query]
sparse_relationships = ["drugs_of", "belongs_to"]
"#
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(file.path()).await.unwrap();

    assert_eq!(config.gate.primary_url, "http://graph:8101");
    assert_eq!(config.gate.overall_timeout_secs, 30);
    assert_eq!(config.gate.backup_url, "http://0.0.0.0:8101");
    assert_eq!(config.query.sparse_relationships.len(), 2);
    assert!(config.query.merge);
}

#[tokio::test]
async fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = ConfigLoader::load(Some(&missing)).await.unwrap_err();

    assert!(matches!(err, ConfigError::Io { .. }));
}
