//! Policy evaluation of resolved modules.
//!
//! - [`result`]: [`Decision`], [`EvaluatedModule`], [`UsedBy`] attribution and the [`Summary`].
//! - [`evaluate`]: applies overrides, the allow-list and exceptions to produce a [`Summary`].
//! - [`run`]: resolves and classifies the modules of parsed binaries, then evaluates them.

pub mod evaluate;
pub mod result;

use anyhow::Result;

use crate::config::Config;
use crate::license::{resolve_licenses, LicenseClassifier};
use crate::models::{BuildInfo, ModuleReference};
use crate::module::ModuleResolver;

pub use evaluate::evaluate;
pub use result::{Decision, EvaluatedModule, Summary, UsedBy};

/// Scan the modules referenced by `binaries`.
///
/// Every distinct module is fetched once through `resolver`; a fetch failure
/// aborts the scan instead of being reported as an unresolvable license.
pub async fn run<R, C>(
    config: &Config,
    binaries: Vec<BuildInfo>,
    resolver: &R,
    classifier: &C,
) -> Result<Summary>
where
    R: ModuleResolver,
    C: LicenseClassifier,
{
    let refs: Vec<ModuleReference> = UsedBy::from_binaries(&binaries)
        .references()
        .cloned()
        .collect();

    let mut modules = resolver.fetch(&refs).await?;
    for module in &mut modules {
        resolve_licenses(module, classifier)?;
    }

    Ok(evaluate(config, binaries, modules))
}
