use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::ModuleReference;

/// Root configuration structure, deserialized from `.golicense-checkr/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Permitted license identifiers. Every license found in a module must be listed.
    #[serde(default = "default_allow")]
    pub allow: BTreeSet<String>,
    /// License findings forced for specific modules.
    #[serde(default, rename = "override")]
    pub overrides: Vec<LicenseOverride>,
    /// Decisions waived for specific modules.
    #[serde(default, rename = "exception")]
    pub exceptions: Exceptions,
}

fn default_allow() -> BTreeSet<String> {
    ["MIT", "Apache-2.0", "BSD-2-Clause", "BSD-3-Clause", "ISC"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Default for Config {
    /// Built-in policy used when no config file is found: common permissive
    /// licenses only, no overrides or exceptions.
    fn default() -> Self {
        Config {
            allow: default_allow(),
            overrides: Vec::new(),
            exceptions: Exceptions::default(),
        }
    }
}

/// Matches a module path and, optionally, one version of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleMatcher {
    pub path: String,
    /// Omitted means every version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ModuleMatcher {
    pub fn matches(&self, reference: &ModuleReference) -> bool {
        self.path == reference.path
            && self
                .version
                .as_ref()
                .map_or(true, |version| *version == reference.version)
    }
}

/// Replaces the classifier's findings for matching modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseOverride {
    #[serde(flatten)]
    pub module: ModuleMatcher,
    pub licenses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exceptions {
    #[serde(default)]
    pub license_not_permitted: Vec<LicenseNotPermittedException>,
    #[serde(default)]
    pub unresolvable_license: Vec<ModuleMatcher>,
}

/// Accepts non-permitted licenses for matching modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseNotPermittedException {
    #[serde(flatten)]
    pub module: ModuleMatcher,
    /// Omitted means every license.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licenses: Option<Vec<String>>,
}

impl LicenseNotPermittedException {
    pub fn waives(&self, reference: &ModuleReference, license: &str) -> bool {
        self.module.matches(reference)
            && self
                .licenses
                .as_ref()
                .map_or(true, |licenses| licenses.iter().any(|l| l == license))
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for o in &self.overrides {
            if o.licenses.is_empty() {
                bail!("override for {} lists no licenses", o.module.path);
            }
        }
        Ok(())
    }

    /// Licenses forced for `reference` by the first matching override.
    pub fn override_for(&self, reference: &ModuleReference) -> Option<&[String]> {
        self.overrides
            .iter()
            .find(|o| o.module.matches(reference))
            .map(|o| o.licenses.as_slice())
    }
}

/// Load the policy configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.golicense-checkr/config.toml`
/// 3. `~/.config/golicense-checkr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".golicense-checkr").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("golicense-checkr")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    tracing::info!("no config file found, using built-in policy");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config =
        Config::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))?;
    tracing::info!("loaded policy from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
allow = ["MIT", "BSD-3-Clause"]

[[override]]
path = "github.com/foo/bar"
version = "v1.2.3"
licenses = ["MIT"]

[[exception.license_not_permitted]]
path = "github.com/foo/baz"
licenses = ["GPL-3.0"]

[[exception.unresolvable_license]]
path = "github.com/foo/qux"
version = "v2.0.0"
"#;

    #[test]
    fn test_default_allow_list() {
        let cfg = Config::default();
        assert!(cfg.allow.contains("MIT"));
        assert!(cfg.allow.contains("Apache-2.0"));
        assert!(!cfg.allow.contains("GPL-3.0"));
    }

    #[test]
    fn test_parse_full_config() {
        let cfg = Config::from_toml(FULL).unwrap();
        assert_eq!(cfg.allow.len(), 2);
        assert_eq!(cfg.overrides.len(), 1);
        assert_eq!(cfg.overrides[0].module.version.as_deref(), Some("v1.2.3"));
        assert_eq!(cfg.exceptions.license_not_permitted.len(), 1);
        assert_eq!(cfg.exceptions.unresolvable_license[0].path, "github.com/foo/qux");
    }

    #[test]
    fn test_missing_allow_uses_default() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_empty_override_rejected() {
        let err = Config::from_toml("[[override]]\npath = \"x\"\nlicenses = []\n").unwrap_err();
        assert!(err.to_string().contains("lists no licenses"));
    }

    #[test]
    fn test_matcher_versions() {
        let any = ModuleMatcher {
            path: "github.com/x".into(),
            version: None,
        };
        let pinned = ModuleMatcher {
            path: "github.com/x".into(),
            version: Some("v1.0.0".into()),
        };

        assert!(any.matches(&ModuleReference::new("github.com/x", "v9.9.9")));
        assert!(pinned.matches(&ModuleReference::new("github.com/x", "v1.0.0")));
        assert!(!pinned.matches(&ModuleReference::new("github.com/x", "v1.0.1")));
        assert!(!any.matches(&ModuleReference::new("github.com/y", "v1.0.0")));
    }

    #[test]
    fn test_override_lookup() {
        let cfg = Config::from_toml(FULL).unwrap();
        assert_eq!(
            cfg.override_for(&ModuleReference::new("github.com/foo/bar", "v1.2.3")),
            Some(&["MIT".to_string()][..])
        );
        assert!(cfg
            .override_for(&ModuleReference::new("github.com/foo/bar", "v1.0.0"))
            .is_none());
    }

    #[test]
    fn test_exception_waives() {
        let cfg = Config::from_toml(FULL).unwrap();
        let exception = &cfg.exceptions.license_not_permitted[0];
        let baz = ModuleReference::new("github.com/foo/baz", "v0.0.1");
        assert!(exception.waives(&baz, "GPL-3.0"));
        assert!(!exception.waives(&baz, "AGPL-3.0"));
    }

    #[test]
    fn test_load_precedence() {
        let project = tempfile::tempdir().unwrap();
        let dir = project.path().join(".golicense-checkr");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "allow = [\"ISC\"]\n").unwrap();

        let explicit = project.path().join("explicit.toml");
        std::fs::write(&explicit, "allow = [\"MPL-2.0\"]\n").unwrap();

        let from_project = load_config(project.path(), None).unwrap();
        assert!(from_project.allow.contains("ISC"));

        let from_flag = load_config(project.path(), Some(&explicit)).unwrap();
        assert!(from_flag.allow.contains("MPL-2.0"));
    }

    #[test]
    fn test_load_reports_bad_file() {
        let project = tempfile::tempdir().unwrap();
        let bad = project.path().join("bad.toml");
        std::fs::write(&bad, "allow = \"MIT\"\n").unwrap();

        let err = load_config(project.path(), Some(&bad)).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }
}
