//! `{Token}` substitution for the configurable version formats
//!
//! Supported tokens:
//! - `{Name}` - a version variable, e.g. `{Major}` or `{ShortSha}`
//! - `{env:NAME}` - an environment variable
//! - `{env:NAME ?? "fallback"}` - an environment variable with a default

use crate::error::{GitStampError, Result};
use crate::output::VersionVariables;
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn token_regex() -> Result<&'static Regex> {
    static TOKEN: OnceLock<Option<Regex>> = OnceLock::new();
    TOKEN
        .get_or_init(|| {
            Regex::new(
                r#"\{(?P<env>env:)?(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?:\s*\?\?\s*"(?P<fallback>[^"]*)")?\}"#,
            )
            .ok()
        })
        .as_ref()
        .ok_or_else(|| GitStampError::format("template token pattern failed to compile"))
}

/// Render `template` against `variables` and the process environment
pub fn render(template: &str, variables: &VersionVariables) -> Result<String> {
    render_with_env(template, variables, |name| std::env::var(name).ok())
}

/// Render `template` with a custom environment lookup
///
/// # Returns
/// * `Ok(String)` - The template with every token substituted
/// * `Err(Format)` - If a token names an unknown variable, or an environment
///   variable that is unset and has no fallback
pub fn render_with_env<F>(template: &str, variables: &VersionVariables, env: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = token_regex()?;
    let mut error = None;

    let rendered = re.replace_all(template, |caps: &Captures| {
        let name = &caps["name"];
        let fallback = caps.name("fallback").map(|m| m.as_str().to_string());

        let value = if caps.name("env").is_some() {
            env(name).or(fallback).ok_or_else(|| {
                GitStampError::format(format!(
                    "environment variable '{}' is not set and has no fallback",
                    name
                ))
            })
        } else {
            variables
                .get(name)
                .map(str::to_string)
                .or(fallback)
                .ok_or_else(|| GitStampError::format(format!("unknown variable '{{{}}}'", name)))
        };

        match value {
            Ok(value) => value,
            Err(e) => {
                error.get_or_insert(e);
                String::new()
            }
        }
    });

    match error {
        Some(e) => Err(e),
        None => Ok(rendered.into_owned()),
    }
}
