//! QuickBooks IIF output. An IIF file is tab separated; every journal entry is one `TRNS` line
//! followed by `SPL` lines for the remaining postings and closed by `ENDTRNS`.

use anyhow::{anyhow, Result as AnyResult};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::borrow::Cow;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::import::format_iif_date;
use crate::ir::{group_by_doc_num, JournalEntry, JournalLine};

const TRANSACTION_TYPE: &str = "GENERAL JOURNAL";

const HEADER: [&str; 3] = [
    "!TRNS\tTRNSTYPE\tDATE\tACCNT\tAMOUNT\tMEMO\tNAME\tDOCNUM",
    "!SPL\tTRNSTYPE\tDATE\tACCNT\tAMOUNT\tMEMO\tNAME\tDOCNUM",
    "!ENDTRNS",
];

/// Render journal lines as IIF text. Lines are joined with `\n`, without a trailing newline.
pub fn render_iif(lines: &[JournalLine]) -> Result<String> {
    let mut output: Vec<String> = HEADER.iter().map(|line| line.to_string()).collect();
    for entry in group_by_doc_num(lines) {
        render_entry(&entry, &mut output)?;
    }
    Ok(output.join("\n"))
}

fn render_entry(entry: &JournalEntry<'_>, output: &mut Vec<String>) -> Result<()> {
    let (header_index, header) = entry.header_line().ok_or_else(|| {
        ConvertError::Lookup(format!("Entry {} has no debit line", entry.doc_num))
    })?;
    output.push(render_line("TRNS", header, header.debit));
    for (index, line) in entry.lines.iter().enumerate() {
        if index == header_index {
            continue;
        }
        output.push(render_line("SPL", line, line.signed_amount()));
    }
    output.push("ENDTRNS".to_string());
    Ok(())
}

fn render_line(kind: &str, line: &JournalLine, amount: Decimal) -> String {
    let date = format_iif_date(line.date);
    let account = sanitize_field(&line.account);
    let amount = format_amount(amount);
    let memo = sanitize_field(&line.memo);
    let name = sanitize_field(&line.name);
    let doc_num = line.doc_num.to_string();
    let fields: [&str; 8] = [
        kind,
        TRANSACTION_TYPE,
        &date,
        &account,
        &amount,
        &memo,
        &name,
        &doc_num,
    ];
    fields.join("\t")
}

/// Two decimal places, half away from zero.
fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Tabs and line breaks would shift or split IIF columns, so they are replaced by spaces.
fn sanitize_field(field: &str) -> Cow<'_, str> {
    if field.contains(['\t', '\r', '\n']) {
        log::warn!("Replacing tabs and line breaks in field {:?}", field);
        Cow::Owned(field.replace(['\t', '\r', '\n'], " "))
    } else {
        Cow::Borrowed(field)
    }
}

/// `{entity}_JE_{MM-DD-YYYY}.iif`. The date uses dashes because slashes are path separators.
pub fn output_file_name(entity: &str, conversion_date: NaiveDate) -> String {
    format!("{}_JE_{}.iif", entity, conversion_date.format("%m-%d-%Y"))
}

/// Write the IIF file. The content first goes to a temporary file that is renamed into place,
/// so a failed write never leaves a partial IIF behind.
pub fn write_iif(path: &Path, content: &str) -> AnyResult<()> {
    log::info!("Writing {}...", path.display());
    let filename = path
        .file_name()
        .ok_or_else(|| anyhow!("Path has no filename"))?
        .to_str()
        .ok_or_else(|| anyhow!("Filename isn't valid utf-8"))?;
    let tmppath = path.with_file_name(format!(".{}.tmp", filename));
    std::fs::write(&tmppath, content)?;
    std::fs::rename(&tmppath, path)?;
    log::info!("Writing {}...done", path.display());
    Ok(())
}
