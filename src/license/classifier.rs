use std::collections::BTreeSet;

use regex::Regex;

use super::spdx::expression_ids;
use super::LicenseClassifier;

/// A license recognised by phrases from its canonical text.
struct Rule {
    id: &'static str,
    any: Regex,
    none: Option<Regex>,
}

/// `(id, phrases that identify it, phrases that rule it out)`, matched
/// against lowercased, whitespace-collapsed text.
const RULES: &[(&str, &str, Option<&str>)] = &[
    ("Apache-2.0", r"apache license,? version 2\.0", None),
    (
        "MIT",
        r"permission is hereby granted, free of charge, to any person obtaining a copy",
        None,
    ),
    (
        "BSD-3-Clause",
        r"redistribution and use in source and binary forms.*neither the name",
        Some(r"all advertising materials"),
    ),
    (
        "BSD-2-Clause",
        r"redistribution and use in source and binary forms",
        Some(r"neither the name|all advertising materials"),
    ),
    (
        "ISC",
        r"permission to use, copy, modify, and/or distribute this software for any purpose with or without fee is hereby granted",
        None,
    ),
    ("MPL-2.0", r"mozilla public license,? (version|v\.) 2\.0", None),
    (
        "GPL-2.0",
        r"gnu general public license version 2, june 1991|gnu general public license as published by the free software foundation; either version 2",
        None,
    ),
    (
        "GPL-3.0",
        r"gnu general public license version 3, 29 june 2007|gnu general public license as published by the free software foundation, either version 3",
        None,
    ),
    ("LGPL-2.1", r"gnu lesser general public license,? version 2\.1", None),
    ("LGPL-3.0", r"gnu lesser general public license,? version 3", None),
    ("AGPL-3.0", r"gnu affero general public license,? version 3", None),
    (
        "Unlicense",
        r"this is free and unencumbered software released into the public domain",
        None,
    ),
    ("CC0-1.0", r"cc0 1\.0 universal", None),
    ("Zlib", r"altered source versions must be plainly marked as such", None),
    ("BSL-1.0", r"boost software license - version 1\.0", None),
];

/// Identifies licenses from `SPDX-License-Identifier` tags or, failing that,
/// from distinctive phrases of well-known license texts.
pub struct TextClassifier {
    tag: Regex,
    rules: Vec<Rule>,
}

impl TextClassifier {
    pub fn new() -> Result<Self, regex::Error> {
        let tag = Regex::new(r"(?m)SPDX-License-Identifier:[ \t]*(.+?)[ \t]*$")?;
        let rules = RULES
            .iter()
            .map(|&(id, any, none)| {
                Ok::<_, regex::Error>(Rule {
                    id,
                    any: Regex::new(any)?,
                    none: none.map(Regex::new).transpose()?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { tag, rules })
    }
}

impl LicenseClassifier for TextClassifier {
    fn classify(&self, text: &str) -> BTreeSet<String> {
        let tagged: BTreeSet<String> = self
            .tag
            .captures_iter(text)
            .flat_map(|c| expression_ids(&c[1]))
            .collect();
        if !tagged.is_empty() {
            return tagged;
        }

        let normalized = text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        self.rules
            .iter()
            .filter(|rule| rule.any.is_match(&normalized))
            .filter(|rule| !rule.none.as_ref().is_some_and(|n| n.is_match(&normalized)))
            .map(|rule| rule.id.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIT: &str = "MIT License

Copyright (c) 2020 Someone

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the \"Software\"), to deal
in the Software without restriction.";

    const BSD3: &str = "Redistribution and use in source and binary forms, with or without
modification, are permitted provided that the following conditions are met:

   * Neither the name of Google Inc. nor the names of its
contributors may be used to endorse or promote products derived from
this software without specific prior written permission.";

    const BSD2: &str = "Redistribution and use in source and binary forms, with or without
modification, are permitted provided that the following conditions are met:
1. Redistributions of source code must retain the above copyright notice.";

    fn classify(text: &str) -> Vec<String> {
        TextClassifier::new().unwrap().classify(text).into_iter().collect()
    }

    #[test]
    fn test_mit() {
        assert_eq!(classify(MIT), vec!["MIT"]);
    }

    #[test]
    fn test_bsd_variants() {
        assert_eq!(classify(BSD3), vec!["BSD-3-Clause"]);
        assert_eq!(classify(BSD2), vec!["BSD-2-Clause"]);
    }

    #[test]
    fn test_apache_across_lines() {
        let text = "                                 Apache License\n                           Version 2.0, January 2004\n";
        assert_eq!(classify(text), vec!["Apache-2.0"]);
    }

    #[test]
    fn test_gpl_family() {
        assert_eq!(
            classify("GNU GENERAL PUBLIC LICENSE\n Version 3, 29 June 2007"),
            vec!["GPL-3.0"]
        );
        assert_eq!(
            classify("GNU LESSER GENERAL PUBLIC LICENSE\n Version 3, 29 June 2007\n\nversion 3 of the GNU General Public License"),
            vec!["LGPL-3.0"]
        );
        assert_eq!(
            classify("GNU AFFERO GENERAL PUBLIC LICENSE\n Version 3, 19 November 2007"),
            vec!["AGPL-3.0"]
        );
    }

    #[test]
    fn test_spdx_tag_wins() {
        let text = "// SPDX-License-Identifier: Apache-2.0 OR MIT\n\nPermission is hereby granted, free of charge, to any person obtaining a copy";
        assert_eq!(classify(text), vec!["Apache-2.0", "MIT"]);
    }

    #[test]
    fn test_dual_license_file() {
        let text = format!("{MIT}\n\n---\n\n{BSD3}");
        assert_eq!(classify(&text), vec!["BSD-3-Clause", "MIT"]);
    }

    #[test]
    fn test_unknown_text() {
        assert!(classify("All rights reserved. Do not copy.").is_empty());
        assert!(classify("").is_empty());
    }
}
