use std::collections::BTreeSet;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::license::spdx::classify_spdx_id;
use crate::models::LicenseRisk;
use crate::scan::{Decision, EvaluatedModule, Summary};

/// Render a colored terminal report.
pub fn render(summary: &Summary, verbose: bool, quiet: bool) {
    let total = summary.modules.len();
    let allowed_count = summary.modules.iter().filter(|m| m.allowed()).count();
    let unresolvable_count = count(summary, Decision::NotAllowedUnresolvableLicense);
    let not_permitted_count = count(summary, Decision::NotAllowedLicenseNotPermitted);

    if quiet {
        println!(
            "Binaries: {}  Modules: {}  Allowed: {}  Not allowed: {}",
            summary.binaries.len(),
            total,
            allowed_count.to_string().green(),
            (total - allowed_count).to_string().red(),
        );
        return;
    }

    println!(
        "\n {} v{}",
        "golicense-checkr".bold(),
        env!("CARGO_PKG_VERSION")
    );
    for binary in &summary.binaries {
        println!(" Scanned: {}", binary.path);
    }
    println!();

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Modules              : {}", total));
    println!(
        " │  {:<48} │",
        format!("{}  Allowed            : {:>4}", "✓".green(), allowed_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Not permitted      : {:>4}", "✗".red(), not_permitted_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Unresolvable       : {:>4}", "?".yellow(), unresolvable_count)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if allowed_count < total {
        println!(" {} Modules requiring attention:\n", "[NOT ALLOWED]".red().bold());
        render_table(summary.not_allowed());
        println!();
    }

    if verbose && allowed_count > 0 {
        println!(" {} Allowed modules:\n", "[ALLOWED]".green().bold());
        render_table(summary.modules.iter().filter(|m| m.allowed()));
        println!();
    }
}

fn count(summary: &Summary, decision: Decision) -> usize {
    summary
        .modules
        .iter()
        .filter(|m| m.decision == decision)
        .count()
}

fn render_table<'a>(modules: impl Iterator<Item = &'a EvaluatedModule>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Module").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("Licenses").add_attribute(Attribute::Bold),
            Cell::new("Decision").add_attribute(Attribute::Bold),
            Cell::new("Used by").add_attribute(Attribute::Bold),
        ]);

    for module in modules {
        let licenses = module.module.license_names();

        let decision_color = match module.decision {
            Decision::Allowed => Color::Green,
            Decision::NotAllowedUnresolvableLicense => Color::Yellow,
            Decision::NotAllowedLicenseNotPermitted => Color::Red,
        };

        table.add_row(vec![
            Cell::new(&module.module.reference.path),
            Cell::new(&module.module.reference.version),
            licenses_cell(&licenses),
            Cell::new(module.explain_decision()).fg(decision_color),
            Cell::new(
                module
                    .used_by
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        ]);
    }

    println!("{}", table);
}

/// License list coloured by the riskiest license it contains.
fn licenses_cell(licenses: &BTreeSet<String>) -> Cell {
    if licenses.is_empty() {
        return Cell::new("unknown").fg(Color::DarkGrey);
    }

    let risks: Vec<LicenseRisk> = licenses.iter().map(|l| classify_spdx_id(l)).collect();
    let color = if risks.contains(&LicenseRisk::StrongCopyleft) {
        Color::Red
    } else if risks.contains(&LicenseRisk::WeakCopyleft) {
        Color::Yellow
    } else if risks.contains(&LicenseRisk::Unknown) {
        Color::DarkGrey
    } else {
        Color::Green
    };

    Cell::new(
        licenses
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", "),
    )
    .fg(color)
}
