use std::io::Read;

use crate::error::{ConvertError, Result};

mod amount;
mod csv;
mod date;

pub use amount::parse_amount;
pub use self::csv::{maybe_remove_byte_order_mark, read_table, CsvTable};
pub use date::{format_iif_date, format_month_year, parse_ledger_date, parse_us_date};

pub const INCOME_FILE: &str = "income statement";
pub const LEDGER_FILE: &str = "general ledger";

pub const LEDGER_DATE_COLUMN: &str = "Date";
pub const LEDGER_ACCOUNT_COLUMN: &str = "GL Account";
pub const LEDGER_DEBIT_COLUMN: &str = "Debit";
pub const LEDGER_REMARKS_COLUMN: &str = "Remarks";
pub const LEDGER_PAYEE_COLUMN: &str = "Payee / Payer";

/// One line of the income statement. Cells are kept as exported, the amount is only parsed
/// once a mapping rule picks the row up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeRow {
    pub row: usize,
    pub name: String,
    pub amount: String,
}

/// One line of the general ledger, see [IncomeRow].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub row: usize,
    pub date: String,
    pub gl_account: String,
    pub debit: String,
    pub remarks: String,
    pub payee: String,
}

/// Load the income statement. Only the first two columns (name and amount) are used, whatever
/// their headers say.
pub fn load_income(input_stream: impl Read, max_rows: usize) -> Result<Vec<IncomeRow>> {
    let table = read_table(input_stream, INCOME_FILE, max_rows)?;
    if table.headers.len() < 2 {
        return Err(ConvertError::MissingColumn {
            file: INCOME_FILE,
            column: if table.headers.is_empty() {
                "Name"
            } else {
                "Amount"
            },
        });
    }
    Ok(table
        .rows
        .iter()
        .enumerate()
        .map(|(index, record)| IncomeRow {
            row: index + 1,
            name: record.get(0).unwrap_or_default().trim().to_string(),
            amount: record.get(1).unwrap_or_default().to_string(),
        })
        .collect())
}

/// Load the general ledger. Columns are looked up by header; `Remarks` and `Payee / Payer` may
/// be missing and then read as empty.
pub fn load_ledger(input_stream: impl Read, max_rows: usize) -> Result<Vec<LedgerRow>> {
    let table = read_table(input_stream, LEDGER_FILE, max_rows)?;
    let required = |column: &'static str| {
        table.column(column).ok_or(ConvertError::MissingColumn {
            file: LEDGER_FILE,
            column,
        })
    };
    let date = required(LEDGER_DATE_COLUMN)?;
    let gl_account = required(LEDGER_ACCOUNT_COLUMN)?;
    let debit = required(LEDGER_DEBIT_COLUMN)?;
    let remarks = table.column(LEDGER_REMARKS_COLUMN);
    let payee = table.column(LEDGER_PAYEE_COLUMN);

    let cell = |record: &::csv::StringRecord, index: Option<usize>| {
        index
            .and_then(|index| record.get(index))
            .unwrap_or_default()
            .to_string()
    };
    Ok(table
        .rows
        .iter()
        .enumerate()
        .map(|(index, record)| LedgerRow {
            row: index + 1,
            date: cell(record, Some(date)),
            gl_account: cell(record, Some(gl_account)),
            debit: cell(record, Some(debit)),
            remarks: cell(record, remarks),
            payee: cell(record, payee),
        })
        .collect())
}
