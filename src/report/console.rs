use crate::config::ReportFormat;
use crate::report::{CertificateSummary, RunReport};
use crate::utils::error::Result;
use rust_decimal::prelude::ToPrimitive;
use std::io::Write;

pub fn render<W: Write>(report: &RunReport, format: ReportFormat, out: &mut W) -> Result<()> {
    match format {
        ReportFormat::Text => render_text(report, out),
        ReportFormat::Json => render_json(report, out),
    }
}

pub fn render_json<W: Write>(report: &RunReport, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

fn pct(value: f64, limit: f64) -> f64 {
    if limit == 0.0 {
        0.0
    } else {
        value / limit * 100.0
    }
}

fn write_samples<W: Write>(out: &mut W, title: &str, samples: &[CertificateSummary]) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}:", title)?;
    if samples.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for s in samples {
        writeln!(
            out,
            "  Certificate ID: {}, Amount: ${:.2} ({:.2}%), Orders: {}, Merchants: {}",
            s.id, s.amount, s.fill_percentage, s.order_count, s.merchant_count
        )?;
    }
    Ok(())
}

/// Line-oriented summary for humans.
pub fn render_text<W: Write>(report: &RunReport, out: &mut W) -> Result<()> {
    let stats = &report.stats;
    let limit = report.limit.to_f64().unwrap_or(0.0);
    let min = stats.min_amount.to_f64().unwrap_or(0.0);
    let max = stats.max_amount.to_f64().unwrap_or(0.0);

    writeln!(out, "Statistics:")?;
    writeln!(out, "  Source: {}", report.source)?;
    writeln!(out, "  Merchants: {}", report.merchant_count)?;
    writeln!(out, "  Total orders: {}", report.order_count)?;
    writeln!(out, "  Total order amount: ${:.2}", report.total_order_amount)?;
    writeln!(out, "  Certificate limit: ${:.2}", report.limit)?;
    writeln!(
        out,
        "  Theoretical certificates (total/limit): {:.2}",
        report.theoretical_certificates
    )?;
    writeln!(
        out,
        "  Certificates generated: {} ({} main, {} balancing)",
        report.certificate_count(),
        report.main_certificates,
        report.balancing_certificates
    )?;
    writeln!(
        out,
        "  Slot plan: target {}, reserved {}, main slots {}",
        report.plan.target, report.plan.reserved, report.plan.main_slots
    )?;
    writeln!(out, "  Average fill: {:.2}%", stats.fill_percentage)?;

    writeln!(out)?;
    writeln!(out, "Certificate amount distribution:")?;
    let rows = [
        ("Minimum", min),
        ("P25", stats.p25),
        ("Median (P50)", stats.p50),
        ("P75", stats.p75),
        ("P90", stats.p90),
        ("Maximum", max),
    ];
    for (label, value) in rows {
        writeln!(
            out,
            "  {}: ${:.2} ({:.2}% of limit)",
            label,
            value,
            pct(value, limit)
        )?;
    }

    write_samples(out, "First main certificates", &report.main_samples)?;
    write_samples(out, "Last balancing certificates", &report.balancing_samples)?;

    if !report.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Warnings ({}):", report.warnings.len())?;
        for warning in &report.warnings {
            writeln!(out, "  {}", warning)?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "Timings: load {} ms, allocate {} ms",
        report.timings.load_ms, report.timings.allocate_ms
    )?;
    Ok(())
}
