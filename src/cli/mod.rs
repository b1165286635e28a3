//! Command line surface: output formats and the workflow behind them

pub mod orchestration;

pub use orchestration::{calculate_variables, run_stamp_workflow, StampWorkflowArgs, WorkflowResult};

use crate::output::{self, VersionVariables};
use anyhow::{anyhow, Result};

/// How the variables are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON object
    #[default]
    Json,
    /// `GitStamp_Name=value` lines
    Env,
    /// Aligned human-readable table
    Table,
}

/// Render the requested output
///
/// With `show_variable` only that variable's value is returned.
pub fn render_output(
    variables: &VersionVariables,
    format: OutputFormat,
    show_variable: Option<&str>,
) -> Result<String> {
    if let Some(name) = show_variable {
        return variables
            .get(name)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Unknown variable '{}'", name));
    }

    Ok(match format {
        OutputFormat::Json => output::to_json(variables)?,
        OutputFormat::Env => output::to_env_lines(variables).join("\n"),
        OutputFormat::Table => crate::ui::format_variable_table(variables).join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variables() -> VersionVariables {
        VersionVariables {
            sem_ver: "1.2.3".to_string(),
            ..VersionVariables::default()
        }
    }

    #[test]
    fn test_show_variable() {
        assert_eq!(render_output(&variables(), OutputFormat::Json, Some("semver")).unwrap(), "1.2.3");
        assert!(render_output(&variables(), OutputFormat::Json, Some("Banana")).is_err());
    }

    #[test]
    fn test_env_output() {
        let rendered = render_output(&variables(), OutputFormat::Env, None).unwrap();
        assert!(rendered.lines().any(|l| l == "GitStamp_SemVer=1.2.3"));
    }
}
