use crate::checks::selection::Selection;
use crate::error::KubescoreError;
use crate::report::OutputFormat;
use crate::types::version::PlatformVersion;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KubescoreConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig {
    pub kubernetes_version: Option<PlatformVersion>,
    #[serde(default)]
    pub enabled_optional_tests: Vec<String>,
    #[serde(default)]
    pub ignored_tests: Vec<String>,
    #[serde(default)]
    pub exit_one_on_warning: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

/// Values given on the command line. They take precedence over the files.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub kubernetes_version: Option<PlatformVersion>,
    pub enabled_optional_tests: Vec<String>,
    pub ignored_tests: Vec<String>,
    pub exit_one_on_warning: bool,
}

impl KubescoreConfig {
    pub fn apply_overrides(&mut self, overrides: RunOverrides) {
        if let Some(version) = overrides.kubernetes_version {
            self.run.kubernetes_version = Some(version);
        }
        union_into(
            &mut self.run.enabled_optional_tests,
            overrides.enabled_optional_tests,
        );
        union_into(&mut self.run.ignored_tests, overrides.ignored_tests);
        self.run.exit_one_on_warning |= overrides.exit_one_on_warning;
    }

    pub fn selection(&self) -> Selection {
        Selection {
            enabled_optional: self.run.enabled_optional_tests.iter().cloned().collect(),
            ignored: self.run.ignored_tests.iter().cloned().collect(),
            platform_version: self.run.kubernetes_version,
        }
    }

    pub fn validate(&self) -> Result<(), KubescoreError> {
        let mut seen = HashMap::<String, &'static str>::new();
        for (field, ids) in [
            ("enabled_optional_tests", &self.run.enabled_optional_tests),
            ("ignored_tests", &self.run.ignored_tests),
        ] {
            let mut field_seen = HashSet::<String>::new();
            for id in ids {
                let normalized = id.trim();
                if normalized.is_empty() {
                    return Err(KubescoreError::ConfigParse(format!(
                        "run.{field} entries must be non-empty check identifiers"
                    )));
                }
                if !field_seen.insert(normalized.to_string()) {
                    continue;
                }
                if let Some(existing) = seen.get(normalized) {
                    return Err(KubescoreError::ConfigParse(format!(
                        "check '{normalized}' cannot appear in both run.{existing} and run.{field}"
                    )));
                }
                seen.insert(normalized.to_string(), field);
            }
        }

        Ok(())
    }
}

fn union_into(target: &mut Vec<String>, extra: Vec<String>) {
    for id in extra {
        if !target.contains(&id) {
            target.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config_uses_defaults() {
        let cfg: KubescoreConfig = toml::from_str("").expect("empty config should parse");
        assert!(cfg.run.kubernetes_version.is_none());
        assert!(cfg.run.enabled_optional_tests.is_empty());
        assert!(!cfg.run.exit_one_on_warning);
        assert!(cfg.output.format.is_none());
    }

    #[test]
    fn parse_full_config() {
        let cfg: KubescoreConfig = toml::from_str(
            r#"
[run]
kubernetes_version = "v1.18"
enabled_optional_tests = ["container-security-context"]
ignored_tests = ["pod-networkpolicy"]
exit_one_on_warning = true

[output]
format = "sarif"
"#,
        )
        .expect("config should parse");

        assert_eq!(
            cfg.run.kubernetes_version,
            Some(PlatformVersion::new(1, 18))
        );
        assert_eq!(
            cfg.run.enabled_optional_tests,
            vec!["container-security-context".to_string()]
        );
        assert!(cfg.run.exit_one_on_warning);
        assert!(matches!(cfg.output.format, Some(OutputFormat::Sarif)));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parse_rejects_malformed_version() {
        let result: Result<KubescoreConfig, _> = toml::from_str(
            r#"
[run]
kubernetes_version = "latest"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_check_both_enabled_and_ignored() {
        let cfg: KubescoreConfig = toml::from_str(
            r#"
[run]
enabled_optional_tests = ["container-seccomp-profile"]
ignored_tests = ["container-seccomp-profile"]
"#,
        )
        .expect("config should parse");
        assert!(matches!(
            cfg.validate(),
            Err(KubescoreError::ConfigParse(message)) if message.contains("cannot appear in both")
        ));
    }

    #[test]
    fn validate_rejects_empty_entry() {
        let cfg: KubescoreConfig = toml::from_str(
            r#"
[run]
ignored_tests = [" "]
"#,
        )
        .expect("config should parse");
        assert!(matches!(
            cfg.validate(),
            Err(KubescoreError::ConfigParse(_))
        ));
    }

    #[test]
    fn overrides_win_over_file_values_and_union_lists() {
        let mut cfg: KubescoreConfig = toml::from_str(
            r#"
[run]
kubernetes_version = "1.18"
enabled_optional_tests = ["container-security-context"]
"#,
        )
        .expect("config should parse");

        cfg.apply_overrides(RunOverrides {
            kubernetes_version: Some(PlatformVersion::new(1, 29)),
            enabled_optional_tests: vec![
                "container-security-context".to_string(),
                "container-seccomp-profile".to_string(),
            ],
            ignored_tests: vec!["pod-networkpolicy".to_string()],
            exit_one_on_warning: true,
        });

        assert_eq!(
            cfg.run.kubernetes_version,
            Some(PlatformVersion::new(1, 29))
        );
        assert_eq!(cfg.run.enabled_optional_tests.len(), 2);
        assert!(cfg.run.exit_one_on_warning);

        let selection = cfg.selection();
        assert!(selection.enabled_optional.contains("container-seccomp-profile"));
        assert!(selection.ignored.contains("pod-networkpolicy"));
    }
}
