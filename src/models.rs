use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Build metadata of one scanned binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Binary path as printed in the metadata header.
    pub path: String,
    /// Import path of the main package; empty for devel builds.
    pub package_path: String,
    /// Path of the main module; empty for devel builds.
    pub module_path: String,
    /// Dependency modules in the order they appeared.
    pub module_refs: Vec<ModuleReference>,
}

/// A dependency edge: one module at one resolved version.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleReference {
    pub path: String,
    pub version: String,
}

impl ModuleReference {
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for ModuleReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.path, self.version)
    }
}

/// A license identified in a module's source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct License {
    /// License identifier (e.g. `MIT`).
    pub name: String,
    /// File the license was found in, relative to the module directory.
    pub path: String,
}

/// A resolved module with its local source and license findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    #[serde(flatten)]
    pub reference: ModuleReference,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dir: Option<PathBuf>,
    pub licenses: Vec<License>,
}

impl Module {
    pub fn new(reference: ModuleReference) -> Self {
        Self {
            reference,
            dir: None,
            licenses: Vec::new(),
        }
    }

    /// Distinct license identifiers found for this module.
    pub fn license_names(&self) -> std::collections::BTreeSet<String> {
        self.licenses.iter().map(|l| l.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseRisk {
    Permissive,
    WeakCopyleft,
    StrongCopyleft,
    Unknown,
}
