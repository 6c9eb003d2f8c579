use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{hash_map::Entry, HashMap};
use std::fmt;

/// Document number shared by all lines of one journal entry, rendered as `JE001`, `JE002`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocNum(pub u32);

impl DocNum {
    pub const FIRST: DocNum = DocNum(1);

    pub fn next(self) -> Self {
        DocNum(self.0 + 1)
    }
}

impl fmt::Display for DocNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JE{:03}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalLine {
    pub date: NaiveDate,
    pub account: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub memo: String,
    pub name: String,
    pub doc_num: DocNum,
}

impl JournalLine {
    pub fn is_debit(&self) -> bool {
        self.debit > Decimal::ZERO
    }

    /// Positive for debits, negative for credits. This is the IIF amount of a split line.
    pub fn signed_amount(&self) -> Decimal {
        if self.is_debit() {
            self.debit
        } else {
            -self.credit
        }
    }
}

/// All lines with the same document number, in the order they were built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry<'a> {
    pub doc_num: DocNum,
    pub lines: Vec<&'a JournalLine>,
}

impl JournalEntry<'_> {
    pub fn is_balanced(&self) -> bool {
        self.lines
            .iter()
            .map(|line| line.signed_amount())
            .sum::<Decimal>()
            .is_zero()
    }

    /// The first debit line. IIF writes it as the `TRNS` line of the entry.
    pub fn header_line(&self) -> Option<(usize, &JournalLine)> {
        self.lines
            .iter()
            .enumerate()
            .find(|(_, line)| line.is_debit())
            .map(|(index, line)| (index, *line))
    }

    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|line| line.debit).sum()
    }
}

/// Group lines by document number. Entries come out in the order their document number was
/// first seen and keep the relative order of their lines.
pub fn group_by_doc_num(lines: &[JournalLine]) -> Vec<JournalEntry<'_>> {
    let mut entries: Vec<JournalEntry<'_>> = Vec::new();
    let mut index_by_doc_num: HashMap<DocNum, usize> = HashMap::new();
    for line in lines {
        match index_by_doc_num.entry(line.doc_num) {
            Entry::Occupied(index) => entries[*index.get()].lines.push(line),
            Entry::Vacant(index) => {
                index.insert(entries.len());
                entries.push(JournalEntry {
                    doc_num: line.doc_num,
                    lines: vec![line],
                });
            }
        }
    }
    entries
}
