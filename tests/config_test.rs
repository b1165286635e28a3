// tests/config_test.rs
use git_stamp::config::loader::parse_config;
use git_stamp::config::{load_config, Configuration, IncrementStrategy, VersioningMode, CONFIG_FILE_NAME};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_default_config_is_git_flow() {
    let config = Configuration::default();
    let keys: Vec<&str> = config.branches.keys().collect();
    assert_eq!(
        keys,
        vec!["develop", "main", "release", "feature", "pull-request", "hotfix", "support", "unknown"]
    );
    assert_eq!(config.tag_prefix, "[vV]?");
    assert_eq!(config.mode, VersioningMode::ContinuousDelivery);
    assert!(config.branches.contains_key("hotfix"));
    assert!(!config.branches.contains_key("gray"));
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
mode = "ContinuousDeployment"
next-version = "2.0"

[branches.main]
increment = "Minor"

[branches.docs]
regex = "^docs?[/-]"
label = "docs"
source-branches = ["main"]
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.mode, VersioningMode::ContinuousDeployment);
    assert_eq!(config.next_version.as_deref(), Some("2.0"));

    let main = config.branches.get("main").unwrap();
    assert_eq!(main.increment, IncrementStrategy::Minor);
    assert_eq!(main.is_mainline, Some(true));

    assert_eq!(config.branch_rule_key("docs/readme"), Some("docs"));
    assert_eq!(config.branch_configuration("docs/readme").label.as_deref(), Some("docs"));
}

#[test]
fn test_missing_custom_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(load_config(Some(missing.to_str().unwrap())).is_err());
}

#[test]
fn test_invalid_file_is_an_error() {
    assert!(parse_config("increment = \"Sideways\"").is_err());
}

#[test]
#[serial]
fn test_file_in_working_directory_is_picked_up() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "tag-prefix = \"rel-\"\n").unwrap();

    let previous = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let loaded = load_config(None);
    env::set_current_dir(previous).unwrap();

    assert_eq!(loaded.unwrap().tag_prefix, "rel-");
}

#[test]
fn test_unknown_branch_falls_back_to_unknown_rule() {
    let config = Configuration::default();
    assert_eq!(config.branch_rule_key("spike"), Some("unknown"));
    assert_eq!(config.branch_configuration("spike").label.as_deref(), Some("{BranchName}"));
}
