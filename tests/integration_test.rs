// tests/integration_test.rs
use git2::{Oid, Repository, RepositoryInitOptions, Signature, Time};
use git_stamp::cli::{calculate_variables, render_output, run_stamp_workflow, OutputFormat, StampWorkflowArgs};
use git_stamp::config::{Configuration, ConfigurationBuilder, IgnoreConfiguration};
use git_stamp::git::Git2Repository;
use std::fs;
use tempfile::TempDir;

const EPOCH: i64 = 1_700_000_000;

fn init_repo() -> (TempDir, Repository) {
    let dir = TempDir::new().unwrap();
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = Repository::init_opts(dir.path(), &opts).unwrap();
    (dir, repo)
}

/// Commit an empty tree onto `refname`, `offset` seconds after EPOCH
fn commit(repo: &Repository, refname: &str, message: &str, offset: i64, parents: &[Oid]) -> Oid {
    let sig = Signature::new("Test", "test@example.com", &Time::new(EPOCH + offset, 0)).unwrap();
    let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parents: Vec<git2::Commit> = parents.iter().map(|id| repo.find_commit(*id).unwrap()).collect();
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    repo.commit(Some(refname), &sig, &sig, message, &tree, &parent_refs).unwrap()
}

fn tag(repo: &Repository, name: &str, id: Oid) {
    let object = repo.find_object(id, None).unwrap();
    repo.tag_lightweight(name, &object, false).unwrap();
}

fn variables_for(repo: Repository, branch: &str) -> git_stamp::output::VersionVariables {
    let repo = Git2Repository::from_git2(repo);
    calculate_variables(&repo, Configuration::default(), Some(branch))
        .unwrap()
        .variables
}

/// main: v1.0.0 on the root commit
fn tagged_main() -> (TempDir, Repository, Oid) {
    let (dir, repo) = init_repo();
    let root = commit(&repo, "refs/heads/main", "initial", 0, &[]);
    tag(&repo, "v1.0.0", root);
    (dir, repo, root)
}

#[test]
fn test_main_counts_commits_since_tag() {
    let (_dir, repo, root) = tagged_main();
    let second = commit(&repo, "refs/heads/main", "second", 10, &[root]);
    commit(&repo, "refs/heads/main", "third", 20, &[second]);

    let vars = variables_for(repo, "main");
    assert_eq!(vars.sem_ver, "1.0.1");
    assert_eq!(vars.full_sem_ver, "1.0.1+2");
    assert_eq!(vars.commits_since_version_source, "2");
    assert_eq!(vars.branch_name, "main");
}

#[test]
fn test_tagged_head_is_used_verbatim() {
    let (_dir, repo, root) = tagged_main();
    let head = commit(&repo, "refs/heads/main", "release it", 10, &[root]);
    tag(&repo, "v1.2.0", head);

    let vars = variables_for(repo, "main");
    assert_eq!(vars.sem_ver, "1.2.0");
    assert_eq!(vars.full_sem_ver, "1.2.0");
}

#[test]
fn test_develop_bumps_minor_with_alpha_label() {
    let (_dir, repo, root) = tagged_main();
    let mut parent = root;
    for (i, message) in ["one", "two", "three"].iter().enumerate() {
        parent = commit(&repo, "refs/heads/develop", message, 10 * (i as i64 + 1), &[parent]);
    }

    let vars = variables_for(repo, "develop");
    assert_eq!(vars.sem_ver, "1.1.0-alpha.3");
    assert_eq!(vars.pre_release_label, "alpha");
}

#[test]
fn test_feature_branch_inherits_increment_from_main() {
    let (_dir, repo, root) = tagged_main();
    commit(&repo, "refs/heads/feature/login", "add login", 10, &[root]);

    let vars = variables_for(repo, "feature/login");
    assert_eq!(vars.sem_ver, "1.0.1-login.1");
    assert_eq!(vars.escaped_branch_name, "feature-login");
}

#[test]
fn test_release_branch_takes_version_from_name() {
    let (_dir, repo, root) = tagged_main();
    commit(&repo, "refs/heads/release/2.0.0", "stabilize", 10, &[root]);

    let vars = variables_for(repo, "release/2.0.0");
    assert_eq!(vars.sem_ver, "2.0.0-beta.1");
    assert_eq!(vars.major_minor_patch, "2.0.0");
}

#[test]
fn test_merge_message_from_release_branch() {
    let (_dir, repo, root) = tagged_main();
    let release = commit(&repo, "refs/heads/release/1.3.0", "stabilize", 10, &[root]);
    commit(
        &repo,
        "refs/heads/main",
        "Merge branch 'release/1.3.0'",
        20,
        &[root, release],
    );

    let vars = variables_for(repo, "main");
    // main prevents incrementing a merged branch version
    assert_eq!(vars.major_minor_patch, "1.3.0");
}

#[test]
fn test_equal_merge_target_tags_give_a_stable_source() {
    let (_dir, repo) = init_repo();
    let root = commit(&repo, "refs/heads/main", "initial", 0, &[]);
    for (i, name) in ["a", "b", "c", "d", "e", "f", "g", "h"].iter().enumerate() {
        let side = commit(&repo, &format!("refs/side/{}", name), "side", 10 + i as i64, &[root]);
        tag(&repo, &format!("{}-1.0.0", name), side);
    }
    commit(&repo, "refs/heads/develop", "work", 100, &[root]);

    let configuration = ConfigurationBuilder::git_flow().with_tag_prefix("[a-z]-").build();
    let repo = Git2Repository::from_git2(repo);
    let first = calculate_variables(&repo, configuration.clone(), Some("develop"))
        .unwrap()
        .variables;
    for _ in 0..10 {
        let again = calculate_variables(&repo, configuration.clone(), Some("develop"))
            .unwrap()
            .variables;
        assert_eq!(again.version_source_sha, first.version_source_sha);
        assert_eq!(again.full_build_meta_data, first.full_build_meta_data);
    }
}

#[test]
fn test_custom_tag_prefix() {
    let (_dir, repo) = init_repo();
    let root = commit(&repo, "refs/heads/main", "initial", 0, &[]);
    tag(&repo, "release-1.4.0", root);
    tag(&repo, "v9.0.0", root);
    commit(&repo, "refs/heads/main", "second", 10, &[root]);

    let configuration = ConfigurationBuilder::git_flow().with_tag_prefix("release-").build();
    let repo = Git2Repository::from_git2(repo);
    let vars = calculate_variables(&repo, configuration, Some("main")).unwrap().variables;
    assert_eq!(vars.full_sem_ver, "1.4.1+1");
}

#[test]
fn test_ignored_tag_sources_fall_back() {
    let (_dir, repo, root) = tagged_main();
    commit(&repo, "refs/heads/main", "second", 10, &[root]);

    let configuration = ConfigurationBuilder::git_flow()
        .with_ignore(IgnoreConfiguration {
            sources: vec!["^Git tag".to_string()],
            ..IgnoreConfiguration::default()
        })
        .build();
    let repo = Git2Repository::from_git2(repo);
    let result = calculate_variables(&repo, configuration, Some("main")).unwrap();
    assert_eq!(result.variables.full_sem_ver, "0.0.1+1");
    assert_eq!(result.next_version.base.excluded.len(), 1);
}

#[test]
fn test_workflow_with_config_file_and_env_output() {
    let (dir, repo, root) = tagged_main();
    commit(&repo, "refs/heads/main", "second", 10, &[root]);
    drop(repo);

    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("gitstamp.toml");
    fs::write(&config_path, "next-version = \"3.0.0\"\n").unwrap();

    let result = run_stamp_workflow(&StampWorkflowArgs {
        config_path: Some(config_path.to_string_lossy().into_owned()),
        branch: Some("main".to_string()),
        repository_path: Some(dir.path().to_path_buf()),
    })
    .unwrap();
    assert_eq!(result.variables.major_minor_patch, "3.0.0");

    let rendered = render_output(&result.variables, OutputFormat::Env, None).unwrap();
    assert!(rendered.lines().any(|l| l == "GitStamp_MajorMinorPatch=3.0.0"));
}

#[test]
fn test_workflow_outside_repository_fails() {
    let dir = TempDir::new().unwrap();
    let result = run_stamp_workflow(&StampWorkflowArgs {
        repository_path: Some(dir.path().to_path_buf()),
        ..StampWorkflowArgs::default()
    });
    assert!(result.is_err());
}
