use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::{BuildInfo, Module, ModuleReference};

/// Outcome of checking one module against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "allowed")]
    Allowed,
    #[serde(rename = "unresolvable-license")]
    NotAllowedUnresolvableLicense,
    #[serde(rename = "licenses-not-allowed")]
    NotAllowedLicenseNotPermitted,
}

impl Decision {
    /// Stable machine-readable token, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allowed => "allowed",
            Decision::NotAllowedUnresolvableLicense => "unresolvable-license",
            Decision::NotAllowedLicenseNotPermitted => "licenses-not-allowed",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A module together with the decision reached for it.
///
/// `not_permitted` is non-empty exactly when `decision` is
/// [`Decision::NotAllowedLicenseNotPermitted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluatedModule {
    #[serde(flatten)]
    pub module: Module,
    pub decision: Decision,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub not_permitted: BTreeSet<String>,
    /// Binaries that pulled this module in.
    pub used_by: BTreeSet<String>,
}

impl EvaluatedModule {
    /// Decide `module` against the permitted identifiers in `allow`.
    ///
    /// Every license found must be permitted; a module with no license at all
    /// is unresolvable.
    pub fn evaluate(module: Module, allow: &BTreeSet<String>, used_by: BTreeSet<String>) -> Self {
        let found = module.license_names();
        let not_permitted: BTreeSet<String> = found.difference(allow).cloned().collect();

        let decision = if found.is_empty() {
            Decision::NotAllowedUnresolvableLicense
        } else if not_permitted.is_empty() {
            Decision::Allowed
        } else {
            Decision::NotAllowedLicenseNotPermitted
        };

        Self {
            module,
            decision,
            not_permitted,
            used_by,
        }
    }

    pub fn allowed(&self) -> bool {
        self.decision == Decision::Allowed
    }

    pub fn explain_decision(&self) -> String {
        match self.decision {
            Decision::Allowed => "allowed".to_string(),
            Decision::NotAllowedUnresolvableLicense => "not allowed - unresolvable license".to_string(),
            Decision::NotAllowedLicenseNotPermitted => format!(
                "not allowed - non-permitted licenses: {}",
                self.not_permitted
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    pub fn reference(&self) -> &ModuleReference {
        &self.module.reference
    }
}

/// Which binaries depend on which module, keyed by module identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedBy(BTreeMap<ModuleReference, BTreeSet<String>>);

impl UsedBy {
    /// Attribute every module referenced by `binaries` to the binary path.
    pub fn from_binaries(binaries: &[BuildInfo]) -> Self {
        binaries.iter().fold(Self::default(), |mut used_by, binary| {
            used_by.merge(Self::from_binary(binary));
            used_by
        })
    }

    /// Attribute the modules referenced by a single binary.
    pub fn from_binary(binary: &BuildInfo) -> Self {
        let mut used_by = Self::default();
        for reference in &binary.module_refs {
            used_by.insert(reference.clone(), binary.path.clone());
        }
        used_by
    }

    pub fn insert(&mut self, reference: ModuleReference, importer: impl Into<String>) {
        self.0.entry(reference).or_default().insert(importer.into());
    }

    /// Union `other` into `self`.
    pub fn merge(&mut self, other: UsedBy) {
        for (reference, importers) in other.0 {
            self.0.entry(reference).or_default().extend(importers);
        }
    }

    pub fn importers(&self, reference: &ModuleReference) -> BTreeSet<String> {
        self.0.get(reference).cloned().unwrap_or_default()
    }

    /// Distinct module identities, ordered.
    pub fn references(&self) -> impl Iterator<Item = &ModuleReference> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub binaries: Vec<BuildInfo>,
    /// One entry per distinct module, ordered by identity.
    pub modules: Vec<EvaluatedModule>,
}

impl Summary {
    pub fn all_allowed(&self) -> bool {
        self.modules.iter().all(EvaluatedModule::allowed)
    }

    pub fn not_allowed(&self) -> impl Iterator<Item = &EvaluatedModule> {
        self.modules.iter().filter(|m| !m.allowed())
    }
}
