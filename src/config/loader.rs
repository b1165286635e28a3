use crate::config::{Configuration, ConfigurationBuilder};
use crate::error::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "gitstamp.toml";

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitstamp.toml` in current directory
/// 3. `.gitstamp.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// Branch rules from the file are layered over the built-in GitFlow rules:
/// a rule with a known key inherits from the built-in one, new keys are
/// appended in file order.
///
/// # Returns
/// * `Ok(Configuration)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Configuration> {
    let config_str = if let Some(path) = config_path {
        debug!(path, "loading configuration");
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        debug!(path = CONFIG_FILE_NAME, "loading configuration");
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            debug!(path = %config_path.display(), "loading configuration");
            fs::read_to_string(config_path)?
        } else {
            return Ok(Configuration::default());
        }
    } else {
        return Ok(Configuration::default());
    };

    parse_config(&config_str)
}

/// Parse configuration text and layer it over the built-in defaults
pub fn parse_config(text: &str) -> Result<Configuration> {
    let mut user: Configuration = toml::from_str(text)?;
    let user_branches = std::mem::take(&mut user.branches);

    user.branches = Configuration::default().branches;
    let mut builder = ConfigurationBuilder::from_configuration(user);
    for (key, rule) in user_branches.iter() {
        builder = builder.with_branch(key, rule.clone());
    }
    Ok(builder.build())
}
