use anyhow::Result;

use crate::scan::Summary;

pub fn render(summary: &Summary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{BuildInfo, License, Module, ModuleReference};
    use crate::scan::evaluate;

    #[test]
    fn test_render_summary() {
        let reference = ModuleReference::new("github.com/y", "v1.0.0");
        let mut module = Module::new(reference.clone());
        module.licenses.push(License {
            name: "GPL-3.0".to_string(),
            path: "COPYING".to_string(),
        });

        let summary = evaluate(
            &Config::default(),
            vec![BuildInfo {
                path: "/tmp/app".to_string(),
                package_path: "github.com/x".to_string(),
                module_path: "github.com/x".to_string(),
                module_refs: vec![reference],
            }],
            vec![module],
        );

        let json: serde_json::Value = serde_json::from_str(&render(&summary).unwrap()).unwrap();
        assert_eq!(json["binaries"][0]["path"], "/tmp/app");
        assert_eq!(json["binaries"][0]["module_refs"][0]["path"], "github.com/y");
        assert_eq!(json["modules"][0]["decision"], "licenses-not-allowed");
        assert_eq!(json["modules"][0]["not_permitted"], serde_json::json!(["GPL-3.0"]));
        assert_eq!(json["modules"][0]["used_by"], serde_json::json!(["/tmp/app"]));
        assert_eq!(json["modules"][0]["licenses"][0]["path"], "COPYING");
    }
}
