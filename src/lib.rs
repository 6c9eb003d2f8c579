//! Turn an income statement and a general ledger export into a QuickBooks IIF journal file.

use chrono::NaiveDate;

pub mod args;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod ir;
pub mod mapping;
pub mod operations;
mod terminal;

use error::{ConvertError, Result};
use import::{IncomeRow, LedgerRow};
use ir::JournalLine;
use mapping::MappingRules;
use operations::EntryBuilder;

/// Result of one conversion: the journal lines and their IIF rendering.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub lines: Vec<JournalLine>,
    pub iif: String,
}

/// Build journal entries for all rows the mapping rules pick up (income rows first, then the
/// ledger) and render them as IIF. Any error aborts the whole conversion.
pub fn convert(
    rules: &MappingRules,
    income: &[IncomeRow],
    ledger: &[LedgerRow],
    conversion_date: NaiveDate,
) -> Result<Conversion> {
    let mut builder = EntryBuilder::new(rules, conversion_date);
    builder.add_income_rows(income)?;
    builder.add_ledger_rows(ledger)?;
    let lines = builder.finish();
    operations::check_entries_are_balanced(&lines)?;
    let iif = export::render_iif(&lines)?;
    Ok(Conversion { lines, iif })
}

/// Same as [convert], with the conversion date given as `MM/DD/YYYY`.
pub fn generate_iif(
    rules: &MappingRules,
    income: &[IncomeRow],
    ledger: &[LedgerRow],
    conversion_date: &str,
) -> Result<String> {
    let conversion_date = import::parse_us_date(conversion_date)
        .map_err(|_| ConvertError::ConversionDate(conversion_date.to_string()))?;
    Ok(convert(rules, income, ledger, conversion_date)?.iif)
}
