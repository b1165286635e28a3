//! Output layer - version variables, format templates and serialization

pub mod provider;
pub mod template;
pub mod variables;

pub use provider::VariableProvider;
pub use variables::VersionVariables;

use crate::error::{GitStampError, Result};

/// Prefix of the variable names in `KEY=value` output
pub const ENV_PREFIX: &str = "GitStamp_";

/// Serialize the variables as a pretty-printed JSON object
pub fn to_json(variables: &VersionVariables) -> Result<String> {
    serde_json::to_string_pretty(variables)
        .map_err(|e| GitStampError::format(format!("failed to serialize variables: {}", e)))
}

/// One `GitStamp_Name=value` line per variable
pub fn to_env_lines(variables: &VersionVariables) -> Vec<String> {
    variables
        .iter()
        .map(|(name, value)| format!("{}{}={}", ENV_PREFIX, name, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_lines() {
        let variables = VersionVariables {
            major: "3".to_string(),
            ..VersionVariables::default()
        };
        let lines = to_env_lines(&variables);
        assert_eq!(lines.len(), 24);
        assert_eq!(lines[0], "GitStamp_Major=3");
        assert_eq!(lines[23], "GitStamp_CommitDate=");
    }

    #[test]
    fn test_json_round_trips_as_object() {
        let variables = VersionVariables {
            sem_ver: "1.0.0".to_string(),
            ..VersionVariables::default()
        };
        let json: serde_json::Value = serde_json::from_str(&to_json(&variables).unwrap()).unwrap();
        assert_eq!(json["SemVer"], "1.0.0");
        assert_eq!(json.as_object().map(|o| o.len()), Some(24));
    }
}
