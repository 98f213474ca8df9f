use crate::models::LicenseRisk;

/// Risk category of a canonical SPDX identifier, used to colour reports.
pub fn classify_spdx_id(id: &str) -> LicenseRisk {
    match id.trim() {
        // Permissive
        "MIT"
        | "MIT-0"
        | "Apache-2.0"
        | "BSD-2-Clause"
        | "BSD-3-Clause"
        | "ISC"
        | "0BSD"
        | "Unlicense"
        | "Zlib"
        | "CC0-1.0"
        | "BSL-1.0" => LicenseRisk::Permissive,

        // Weak copyleft
        "LGPL-2.1"
        | "LGPL-2.1-only"
        | "LGPL-2.1-or-later"
        | "LGPL-3.0"
        | "LGPL-3.0-only"
        | "LGPL-3.0-or-later"
        | "MPL-2.0"
        | "EPL-2.0" => LicenseRisk::WeakCopyleft,

        // Strong copyleft
        "GPL-2.0"
        | "GPL-2.0-only"
        | "GPL-2.0-or-later"
        | "GPL-3.0"
        | "GPL-3.0-only"
        | "GPL-3.0-or-later"
        | "AGPL-3.0"
        | "AGPL-3.0-only"
        | "AGPL-3.0-or-later" => LicenseRisk::StrongCopyleft,

        _ => LicenseRisk::Unknown,
    }
}

/// Normalize common non-SPDX spellings to their SPDX identifiers.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed {
        "Apache 2.0" | "Apache License 2.0" | "Apache License, Version 2.0" | "Apache2" => {
            "Apache-2.0".to_string()
        }
        "MIT License" | "The MIT License" | "Expat" => "MIT".to_string(),
        "BSD 2-Clause" | "Simplified BSD" | "FreeBSD" => "BSD-2-Clause".to_string(),
        "BSD" | "BSD 3-Clause" | "New BSD" | "Modified BSD" => "BSD-3-Clause".to_string(),
        "GPLv2" | "GPL v2" => "GPL-2.0".to_string(),
        "GPLv3" | "GPL v3" => "GPL-3.0".to_string(),
        "LGPLv2.1" | "LGPL v2.1" => "LGPL-2.1".to_string(),
        "LGPLv3" | "LGPL v3" => "LGPL-3.0".to_string(),
        "MPL 2.0" | "MPLv2" => "MPL-2.0".to_string(),
        "AGPLv3" | "AGPL v3" => "AGPL-3.0".to_string(),
        other => other.to_string(),
    }
}

/// License identifiers named by an SPDX expression such as
/// `(MIT OR Apache-2.0) AND BSD-3-Clause WITH x`. Operators, parentheses and
/// `WITH` exceptions are dropped.
pub fn expression_ids(expr: &str) -> Vec<String> {
    let mut ids = Vec::new();
    let mut tokens = expr
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter(|t| !t.is_empty());

    while let Some(token) = tokens.next() {
        match token {
            "AND" | "OR" | "and" | "or" => {}
            "WITH" | "with" => {
                tokens.next(); // exception identifier
            }
            // Trailing comment closers in source headers.
            "*/" | "-->" => break,
            id => {
                let id = normalize(id);
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
    }

    ids
}
