// src/report/env_privacy.rs

//! Which environment variables are omitted from or redacted in reports.

use std::collections::BTreeSet;

pub const HIDE_ENV_VARS_ENV_VAR: &str = "RUNNER_HIDE_ENV";
pub const CENSOR_ENV_VARS_ENV_VAR: &str = "RUNNER_CENSOR_ENV";

/// Variables whose values are redacted no matter what the user configures.
pub const ALWAYS_CENSORED: &[&str] = &["RUNNER_SMTP_PASS", "RUNNER_NTFY_ACCESS_TOKEN"];

/// Shorter values are replaced entirely; longer ones keep their first and
/// last character.
pub const MIN_LEN_FOR_CENSOR_HINT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvPrivacy {
    hidden: BTreeSet<String>,
    censored: BTreeSet<String>,
}

impl EnvPrivacy {
    /// Build from colon-separated name lists.
    pub fn new(hide_list: Option<&str>, censor_list: Option<&str>) -> Self {
        let mut censored = split_names(censor_list);
        censored.extend(ALWAYS_CENSORED.iter().map(|s| s.to_string()));
        Self {
            hidden: split_names(hide_list),
            censored,
        }
    }

    /// Read the hide/censor lists from an environment snapshot.
    pub fn from_vars(vars: &[(String, String)]) -> Self {
        let lookup = |key: &str| {
            vars.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        Self::new(lookup(HIDE_ENV_VARS_ENV_VAR), lookup(CENSOR_ENV_VARS_ENV_VAR))
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        self.hidden.contains(name)
    }

    pub fn is_censored(&self, name: &str) -> bool {
        self.censored.contains(name)
    }

    /// The value as it may appear in a report, or `None` if the variable is
    /// to be omitted entirely.
    pub fn render(&self, name: &str, value: &str) -> Option<String> {
        if self.is_hidden(name) {
            None
        } else if self.is_censored(name) {
            Some(censor_value(value))
        } else {
            Some(value.to_string())
        }
    }
}

fn split_names(list: Option<&str>) -> BTreeSet<String> {
    list.unwrap_or_default()
        .split(':')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Redact a value, hinting only at its length and, if long enough, its
/// first and last characters.
pub fn censor_value(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < MIN_LEN_FOR_CENSOR_HINT {
        return format!("[{} chars]", chars.len());
    }
    format!(
        "{}[{} chars]{}",
        chars[0],
        chars.len() - 2,
        chars[chars.len() - 1]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_values_are_pure_length_placeholders() {
        assert_eq!(censor_value(""), "[0 chars]");
        assert_eq!(censor_value("abcd"), "[4 chars]");
    }

    #[test]
    fn long_values_keep_edges_only() {
        assert_eq!(censor_value("abcde"), "a[3 chars]e");
        assert_eq!(censor_value("hunter2hunter2"), "h[12 chars]2");
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        assert_eq!(censor_value("päßwörd"), "p[5 chars]d");
    }

    #[test]
    fn credential_variables_are_always_censored() {
        let privacy = EnvPrivacy::new(None, None);
        assert_eq!(
            privacy.render("RUNNER_SMTP_PASS", "supersecret"),
            Some("s[9 chars]t".to_string())
        );
        assert_eq!(
            privacy.render("RUNNER_NTFY_ACCESS_TOKEN", "tk"),
            Some("[2 chars]".to_string())
        );
        assert_eq!(privacy.render("PATH", "/bin"), Some("/bin".to_string()));
    }

    #[test]
    fn lists_come_from_snapshot_variables() {
        let vars = vec![
            ("RUNNER_HIDE_ENV".to_string(), "AWS_PROFILE:HOME".to_string()),
            ("RUNNER_CENSOR_ENV".to_string(), "DB_URL".to_string()),
        ];
        let privacy = EnvPrivacy::from_vars(&vars);
        assert_eq!(privacy.render("HOME", "/root"), None);
        assert_eq!(privacy.render("AWS_PROFILE", "prod"), None);
        assert_eq!(
            privacy.render("DB_URL", "postgres://x"),
            Some("p[10 chars]x".to_string())
        );
    }

    #[test]
    fn hiding_wins_over_censoring() {
        let privacy = EnvPrivacy::new(Some("RUNNER_SMTP_PASS"), None);
        assert_eq!(privacy.render("RUNNER_SMTP_PASS", "secret"), None);
    }
}
