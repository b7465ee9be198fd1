//! Terminal and JSON rendering of engine and repository output.

use std::fmt;

use clap::ValueEnum;
use itax_core::{
    ConversationMessage, RegimeAnalytics, RegimeBreakdown, SessionRecord, TaxComparison,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// One computed record, optionally tied to a stored session.
#[derive(Debug, Clone, Serialize)]
pub struct ComputeReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    #[serde(flatten)]
    pub comparison: TaxComparison,
}

/// A stored session with its conversation log.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    #[serde(flatten)]
    pub record: SessionRecord,
    pub conversation: Vec<ConversationMessage>,
}

pub struct AnalyticsReport<'a>(pub &'a RegimeAnalytics);

fn breakdown_rows(
    f: &mut fmt::Formatter<'_>,
    old: &RegimeBreakdown,
    new: &RegimeBreakdown,
) -> fmt::Result {
    writeln!(f, "{:<20} {:>16} {:>16}", "", "Old regime", "New regime")?;
    let rows = [
        ("Deductions", old.total_deductions, new.total_deductions),
        ("Taxable income", old.taxable_income, new.taxable_income),
        ("Slab tax", old.slab_tax, new.slab_tax),
        ("Cess (4%)", old.cess, new.cess),
        ("Total tax", old.total_tax, new.total_tax),
    ];
    for (label, old_value, new_value) in rows {
        writeln!(f, "{:<20} {:>16.2} {:>16.2}", label, old_value, new_value)?;
    }
    Ok(())
}

impl fmt::Display for ComputeReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if let Some(id) = self.session_id {
            writeln!(f, "Session:            {}", id)?;
        }
        breakdown_rows(f, &self.comparison.old, &self.comparison.new)?;
        write!(
            f,
            "Recommended regime: {} (saves {:.2})",
            self.comparison.best_regime,
            self.comparison.savings()
        )
    }
}

impl fmt::Display for SessionReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let record = &self.record;
        writeln!(f, "Session:            {}", record.session_id)?;
        writeln!(
            f,
            "Created:            {}",
            record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        for (field, amount) in record.input.amounts() {
            writeln!(f, "{:<20}{:.2}", format!("{}:", field), amount)?;
        }
        writeln!(f, "{:<20}{}", "selected_regime:", record.input.selected_regime)?;
        writeln!(f, "Tax (old regime):   {:.2}", record.result.tax_old)?;
        writeln!(f, "Tax (new regime):   {:.2}", record.result.tax_new)?;
        write!(f, "Recommended regime: {}", record.result.best_regime)?;

        if !self.conversation.is_empty() {
            writeln!(f)?;
            write!(f, "Conversation:")?;
            for message in &self.conversation {
                write!(
                    f,
                    "\n  [{}/{}] {}",
                    message.role.as_str(),
                    message.kind.as_str(),
                    message.content
                )?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for AnalyticsReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let analytics = self.0;
        writeln!(f, "Sessions:           {}", analytics.num_sessions)?;
        writeln!(f, "Selected old:       {}", analytics.old_selected)?;
        writeln!(f, "Selected new:       {}", analytics.new_selected)?;
        writeln!(f, "Average tax (old):  {:.2}", analytics.avg_tax_old)?;
        write!(f, "Average tax (new):  {:.2}", analytics.avg_tax_new)
    }
}
