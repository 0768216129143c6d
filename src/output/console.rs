use std::fmt::Write;

use crate::breach::BreachStatus;
use crate::probe::ProbeReport;

pub fn render_username_header(identifier: &str, site_count: usize) -> String {
    format!(
        "\n--- 👤 Username Analysis for {} ---\nSearching across {} sites... Please wait.",
        identifier, site_count
    )
}

/// Human-readable view of a report.
///
/// Unreachable sites read as "not found" unless `show_errors` is set.
pub fn render_report(report: &ProbeReport, show_errors: bool) -> String {
    let mut out = String::new();
    let found: Vec<_> = report.found().collect();

    if found.is_empty() {
        out.push_str("❌ Username not found on any of the checked sites.\n");
    } else {
        out.push_str("✅ Found on the following sites:\n");
        for r in found {
            let _ = writeln!(out, "  - {}: {}", r.site, r.url);
        }
    }

    if show_errors {
        let errors: Vec<_> = report.errors().collect();
        if !errors.is_empty() {
            out.push_str("⚠️  Could not reach:\n");
            for r in errors {
                let kind = r.error_kind.map(|k| format!("{:?}", k).to_lowercase()).unwrap_or_default();
                let _ = writeln!(out, "  - {} ({})", r.site, kind);
            }
        }
    }

    let s = report.summary();
    let _ = write!(out, "[*] {} sites checked in {}ms ({} found)", s.total, report.duration_ms, s.found);
    out
}

pub fn render_breaches(email: &str, status: &BreachStatus) -> String {
    let mut out = format!("\n--- 📧 Email Breach Analysis for {} ---\n", email);
    match status {
        BreachStatus::Clean => out.push_str("✅ GOOD: Email not found in any known data breaches."),
        BreachStatus::Breached(breaches) => {
            let _ = write!(out, "🚨 DANGER: Email found in {} data breaches!", breaches.len());
            for b in breaches {
                let date = b.breach_date.as_deref().unwrap_or("unknown date");
                let _ = write!(out, "\n  - Breach: {} ({})", b.name, date);
            }
        }
    }
    out
}
