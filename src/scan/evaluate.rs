use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::result::{Decision, EvaluatedModule, Summary, UsedBy};
use crate::config::Config;
use crate::models::{BuildInfo, License, Module, ModuleReference};

/// Shown as the source file of licenses forced by configuration.
pub const OVERRIDE_SOURCE: &str = "<override>";

/// Reduce scanned binaries and their resolved modules to a [`Summary`].
///
/// Produces one entry per module identity referenced by `binaries`, carrying
/// every binary that references it. A referenced module missing from
/// `modules` is evaluated without licenses. All license findings must already
/// be attached.
pub fn evaluate(config: &Config, binaries: Vec<BuildInfo>, modules: Vec<Module>) -> Summary {
    let used_by = UsedBy::from_binaries(&binaries);

    let mut resolved: BTreeMap<ModuleReference, Module> = BTreeMap::new();
    for module in modules {
        resolved.entry(module.reference.clone()).or_insert(module);
    }

    let mut evaluated = Vec::with_capacity(used_by.len());
    for reference in used_by.references() {
        let mut module = match resolved.remove(reference) {
            Some(module) => module,
            None => {
                warn!(module = %reference, "module was not resolved, evaluating without licenses");
                Module::new(reference.clone())
            }
        };

        apply_override(config, &mut module);
        let mut result =
            EvaluatedModule::evaluate(module, &config.allow, used_by.importers(reference));
        apply_exceptions(config, &mut result);
        evaluated.push(result);
    }

    for reference in resolved.keys() {
        debug!(module = %reference, "ignoring resolved module no binary references");
    }

    Summary {
        binaries,
        modules: evaluated,
    }
}

fn apply_override(config: &Config, module: &mut Module) {
    if let Some(licenses) = config.override_for(&module.reference) {
        module.licenses = licenses
            .iter()
            .map(|name| License {
                name: name.clone(),
                path: OVERRIDE_SOURCE.to_string(),
            })
            .collect();
    }
}

fn apply_exceptions(config: &Config, result: &mut EvaluatedModule) {
    let reference = result.module.reference.clone();

    match result.decision {
        Decision::Allowed => {}
        Decision::NotAllowedUnresolvableLicense => {
            if config
                .exceptions
                .unresolvable_license
                .iter()
                .any(|e| e.matches(&reference))
            {
                result.decision = Decision::Allowed;
            }
        }
        Decision::NotAllowedLicenseNotPermitted => {
            result.not_permitted.retain(|license| {
                !config
                    .exceptions
                    .license_not_permitted
                    .iter()
                    .any(|e| e.waives(&reference, license))
            });
            if result.not_permitted.is_empty() {
                result.decision = Decision::Allowed;
            }
        }
    }
}
