//! Main workflow orchestration logic
//!
//! Keeps the version workflow out of main.rs so it can be called
//! programmatically without depending on clap.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::calculation::{GitVersionContext, NextVersion, NextVersionCalculator};
use crate::config::{load_config, Configuration};
use crate::git::{Git2Repository, Repository, RepositoryStore};
use crate::output::{VariableProvider, VersionVariables};

/// Arguments for the version workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StampWorkflowArgs {
    /// Path to custom config file
    pub config_path: Option<String>,

    /// Branch to calculate the version for instead of HEAD
    pub branch: Option<String>,

    /// Repository path; the current directory when unset
    pub repository_path: Option<PathBuf>,
}

/// Result of a successful version workflow
#[derive(Debug, Clone)]
pub struct WorkflowResult {
    pub next_version: NextVersion,
    pub variables: VersionVariables,
}

/// Main version workflow
///
/// 1. Load configuration
/// 2. Open the repository
/// 3. Calculate the next version
/// 4. Render the output variables
///
/// # Arguments
///
/// * `args` - Workflow arguments (config path, branch, repository path)
///
/// # Returns
///
/// Result containing the calculated version and its variables
pub fn run_stamp_workflow(args: &StampWorkflowArgs) -> Result<WorkflowResult> {
    let configuration = load_config(args.config_path.as_deref()).context("Error loading config")?;

    let path = args.repository_path.clone().unwrap_or_else(|| PathBuf::from("."));
    let repo = Git2Repository::open(&path)
        .with_context(|| format!("Git repository error at '{}'", path.display()))?;

    let result = calculate_variables(&repo, configuration, args.branch.as_deref())?;
    info!(version = %result.variables.full_sem_ver, "version workflow finished");
    Ok(result)
}

/// Calculate the version and variables for any repository implementation
///
/// # Returns
///
/// * `Ok(WorkflowResult)` - Version of the branch tip (or HEAD)
/// * `Err` - If the branch is unknown, the repository cannot be read, or a
///   configured format is invalid
pub fn calculate_variables(
    repo: &dyn Repository,
    configuration: Configuration,
    branch: Option<&str>,
) -> crate::Result<WorkflowResult> {
    let context = GitVersionContext::new(repo, configuration, branch)?;
    let store = RepositoryStore::new(repo);
    let next_version = NextVersionCalculator::new(store, &context).calculate()?;

    let variables = VariableProvider::new().variables_for(
        &next_version.semantic_version,
        next_version.configuration(),
        next_version.tagged.as_ref(),
    )?;

    Ok(WorkflowResult {
        next_version,
        variables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::{mock_oid, MockRepository};

    #[test]
    fn test_workflow_args_default() {
        let args = StampWorkflowArgs::default();
        assert!(args.config_path.is_none());
        assert!(args.branch.is_none());
        assert!(args.repository_path.is_none());
    }

    #[test]
    fn test_calculate_variables_on_mock_repository() {
        let mut repo = MockRepository::new();
        repo.commit(1, 100, "root", &[]);
        repo.commit(2, 200, "work", &[1]);
        repo.set_branch_head("develop", mock_oid(2));
        repo.checkout("develop");
        repo.add_tag("v1.0.0", mock_oid(1));

        let result = calculate_variables(&repo, Configuration::default(), None).unwrap();
        // develop is continuous deployment: the commit count becomes the number
        assert_eq!(result.variables.sem_ver, "1.1.0-alpha.1");
        assert_eq!(result.variables.branch_name, "develop");
        assert_eq!(result.variables.commits_since_version_source, "1");
    }

    #[test]
    fn test_unrelated_tag_on_head_keeps_commit_count_numbering() {
        let mut repo = MockRepository::new();
        repo.commit(1, 100, "root", &[]);
        repo.commit(2, 200, "work", &[1]);
        repo.commit(3, 300, "more work", &[2]);
        repo.set_branch_head("develop", mock_oid(3));
        repo.add_tag("v1.0.0", mock_oid(1));
        repo.add_tag("v0.9.0", mock_oid(3));

        let result = calculate_variables(&repo, Configuration::default(), Some("develop")).unwrap();
        assert_eq!(result.variables.sem_ver, "1.1.0-alpha.2");
        assert_eq!(result.variables.full_sem_ver, "1.1.0-alpha.2");
    }

    #[test]
    fn test_unknown_branch_is_an_error() {
        let mut repo = MockRepository::new();
        repo.commit(1, 100, "root", &[]);
        repo.set_branch_head("main", mock_oid(1));
        assert!(calculate_variables(&repo, Configuration::default(), Some("nope")).is_err());
    }
}
