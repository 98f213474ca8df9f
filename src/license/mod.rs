//! License identification for resolved modules.
//!
//! - [`classifier`]: [`LicenseClassifier`] implementation based on SPDX tags
//!   and canonical license phrases.
//! - [`spdx`]: identifier normalization and risk categories.

pub mod classifier;
pub mod spdx;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::{License, Module};

/// Maps license text to the license identifiers it contains. An empty set
/// means the text could not be attributed to any known license.
pub trait LicenseClassifier {
    fn classify(&self, text: &str) -> BTreeSet<String>;
}

/// License files at the root of `dir` (`LICENSE*`, `LICENCE*`, `UNLICENSE*`, `COPYING*`), sorted by name.
pub fn find_license_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_ascii_lowercase();
        if ["license", "licence", "unlicense", "copying"]
            .iter()
            .any(|prefix| name.starts_with(prefix))
        {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Classify every license file of `module` and record the findings on it.
/// Modules without a local directory are left without licenses.
pub fn resolve_licenses(module: &mut Module, classifier: &impl LicenseClassifier) -> Result<()> {
    let Some(dir) = module.dir.clone() else {
        return Ok(());
    };

    for file in find_license_files(&dir)? {
        let bytes = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
        let text = String::from_utf8_lossy(&bytes);
        let relative = file
            .strip_prefix(&dir)
            .unwrap_or(&file)
            .to_string_lossy()
            .into_owned();

        for name in classifier.classify(&text) {
            module.licenses.push(License {
                name,
                path: relative.clone(),
            });
        }
    }

    Ok(())
}
