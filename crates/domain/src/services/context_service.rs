//! Context digest - the textual summary of the dataset fed to the language model
//!
//! Built once at startup and handed to the AI relay as an immutable value.

use super::analytics_service::compute_analytics;
use crate::entities::{Dataset, DealStatus, SalesRep};
use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::sync::Arc;

/// Immutable digest of the dataset. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesContext(Arc<str>);

impl SalesContext {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SalesContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SalesContext {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Default)]
struct RegionTotals {
    reps: usize,
    deals: usize,
    value: f64,
    won_value: f64,
}

/// Render the dataset digest. Deterministic for a given dataset.
pub fn build_context(dataset: &Dataset) -> SalesContext {
    let mut out = String::new();
    // fmt::Write into a String cannot fail
    let _ = write_context(&mut out, dataset);
    SalesContext(Arc::from(out))
}

fn write_context(out: &mut String, dataset: &Dataset) -> fmt::Result {
    let analytics = compute_analytics(dataset);

    writeln!(out, "SALES TEAM OVERVIEW")?;
    writeln!(out, "Sales representatives: {}", dataset.rep_count())?;
    writeln!(
        out,
        "Total deals: {} worth {}",
        analytics.total_deal_count,
        format_currency(analytics.total_deal_value)
    )?;
    writeln!(
        out,
        "Average deal value: {}",
        format_currency(analytics.average_deal_value)
    )?;
    writeln!(out)?;

    writeln!(out, "DEALS BY STATUS")?;
    for status in DealStatus::ALL {
        writeln!(
            out,
            "- {}: {} deals worth {}",
            status,
            analytics.deal_status_summary.get(status),
            format_currency(analytics.deal_value_by_status.get(status))
        )?;
    }
    writeln!(out)?;

    let mut regions: BTreeMap<&str, RegionTotals> = BTreeMap::new();
    for rep in &dataset.sales_reps {
        let totals = regions.entry(rep.region.as_str()).or_default();
        totals.reps += 1;
        totals.deals += rep.deals.len();
        totals.value += rep.total_deal_value();
        totals.won_value += rep.value_with_status(DealStatus::ClosedWon);
    }

    writeln!(out, "REGIONS")?;
    for (region, totals) in &regions {
        writeln!(
            out,
            "- {}: {} reps, {} deals worth {}, closed won {}",
            region,
            totals.reps,
            totals.deals,
            format_currency(totals.value),
            format_currency(totals.won_value)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "SALES REPRESENTATIVES")?;
    for rep in &dataset.sales_reps {
        write_rep(out, rep)?;
    }

    writeln!(out, "STRATEGIC NOTES")?;
    let top = dataset.sales_reps.iter().max_by(|a, b| {
        a.value_with_status(DealStatus::ClosedWon)
            .total_cmp(&b.value_with_status(DealStatus::ClosedWon))
    });
    match top {
        Some(rep) if rep.value_with_status(DealStatus::ClosedWon) > 0.0 => writeln!(
            out,
            "- Top performer by closed-won value: {} ({}, {})",
            rep.name,
            rep.region,
            format_currency(rep.value_with_status(DealStatus::ClosedWon))
        )?,
        _ => writeln!(out, "- No closed-won deals recorded yet")?,
    }

    let won = analytics.deal_status_summary.closed_won;
    let lost = analytics.deal_status_summary.closed_lost;
    if won + lost > 0 {
        writeln!(
            out,
            "- Win rate on closed deals: {:.1}% ({} won, {} lost)",
            won as f64 * 100.0 / (won + lost) as f64,
            won,
            lost
        )?;
    }
    writeln!(
        out,
        "- Open pipeline: {} deals worth {}",
        analytics.deal_status_summary.in_progress,
        format_currency(analytics.deal_value_by_status.in_progress)
    )?;

    Ok(())
}

fn write_rep(out: &mut String, rep: &SalesRep) -> fmt::Result {
    writeln!(out, "{} - {}, {}", rep.name, rep.role, rep.region)?;

    if rep.skills.is_empty() {
        writeln!(out, "  Skills: none listed")?;
    } else {
        writeln!(out, "  Skills: {}", rep.skills.join(", "))?;
    }

    writeln!(
        out,
        "  Deals: {} worth {}",
        rep.deals.len(),
        format_currency(rep.total_deal_value())
    )?;
    for status in DealStatus::ALL {
        writeln!(
            out,
            "  {}: {} worth {}",
            status,
            rep.deals_with_status(status).count(),
            format_currency(rep.value_with_status(status))
        )?;
    }

    let clients: Vec<&str> = rep.clients.iter().map(|c| c.name.as_str()).collect();
    if clients.is_empty() {
        writeln!(out, "  Clients: none listed")?;
    } else {
        writeln!(out, "  Clients: {}", clients.join(", "))?;
    }
    writeln!(out)
}

/// `$1,234,567` style, rounded to whole units; cents shown only when non-zero.
pub fn format_currency(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let negative = cents < 0;
    let cents = cents.unsigned_abs();
    let units = cents / 100;
    let fraction = cents % 100;

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if fraction == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{fraction:02}")
    }
}
