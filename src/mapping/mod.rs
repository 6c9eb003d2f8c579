//! The mapping table decides which rows of the inputs become journal entries and which
//! accounts they hit. Rules are tried in file order and the first match wins.

use serde::Deserialize;
use std::io::Read;

use crate::error::{ConvertError, Result};
use crate::import::read_table;

mod property;

pub use property::{discover_properties, Property};

pub const MAPPING_FILE: &str = "mapping";
const MAX_MAPPING_RULES: usize = 10_000;

const REQUIRED_COLUMNS: [&str; 5] = ["Type", "MatchValue", "Direction", "DebitAcc", "CreditAcc"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleType {
    /// Matches income statement rows by exact name
    Name,
    /// Matches general ledger rows whose account contains the keyword
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    pub fn inverted(self) -> Self {
        match self {
            Direction::Debit => Direction::Credit,
            Direction::Credit => Direction::Debit,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Direction::Debit => "DR",
            Direction::Credit => "CR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRule {
    pub rule_type: RuleType,
    pub match_value: String,
    pub direction: Direction,
    pub debit_account: String,
    pub credit_account: String,
    pub memo_template: String,
    pub use_vendor: bool,
}

impl MappingRule {
    pub fn matches_income_name(&self, name: &str) -> bool {
        self.rule_type == RuleType::Name && name.trim() == self.match_value.trim()
    }

    pub fn matches_ledger_account(&self, gl_account: &str) -> bool {
        self.rule_type == RuleType::Keyword && gl_account.contains(self.match_value.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct MappingRow {
    #[serde(rename = "Type")]
    rule_type: String,
    #[serde(rename = "MatchValue")]
    match_value: String,
    #[serde(rename = "Direction")]
    direction: String,
    #[serde(rename = "DebitAcc")]
    debit_account: String,
    #[serde(rename = "CreditAcc")]
    credit_account: String,
    #[serde(rename = "MemoTemplate", default)]
    memo_template: String,
    #[serde(rename = "UseVendor", default)]
    use_vendor: String,
}

impl MappingRow {
    fn is_blank(&self) -> bool {
        [
            &self.rule_type,
            &self.match_value,
            &self.direction,
            &self.debit_account,
            &self.credit_account,
        ]
        .iter()
        .all(|cell| cell.trim().is_empty())
    }

    fn into_rule(self, row: usize) -> Result<MappingRule> {
        let error = |message: String| ConvertError::Config(format!("Rule {row}: {message}"));
        let rule_type = match self.rule_type.trim().to_ascii_lowercase().as_str() {
            "name" => RuleType::Name,
            "keyword" => RuleType::Keyword,
            _ => {
                return Err(error(format!(
                    "Type must be Name or Keyword but is '{}'",
                    self.rule_type
                )))
            }
        };
        let direction = match self.direction.trim().to_ascii_uppercase().as_str() {
            "DR" => Direction::Debit,
            "CR" => Direction::Credit,
            _ => {
                return Err(error(format!(
                    "Direction must be DR or CR but is '{}'",
                    self.direction
                )))
            }
        };
        if self.match_value.trim().is_empty() {
            return Err(error("MatchValue is empty".to_string()));
        }
        if self.debit_account.trim().is_empty() || self.credit_account.trim().is_empty() {
            return Err(error("DebitAcc and CreditAcc must both be set".to_string()));
        }
        Ok(MappingRule {
            rule_type,
            match_value: self.match_value,
            direction,
            debit_account: self.debit_account.trim().to_string(),
            credit_account: self.credit_account.trim().to_string(),
            memo_template: self.memo_template,
            use_vendor: self.use_vendor.trim().eq_ignore_ascii_case("yes"),
        })
    }
}

/// Ordered list of mapping rules for one property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingRules {
    rules: Vec<MappingRule>,
}

impl MappingRules {
    pub fn new(rules: Vec<MappingRule>) -> Self {
        Self { rules }
    }

    /// Load the mapping table from CSV. Fully blank rows are ignored, any other malformed row
    /// fails the whole load. `Type`, `Direction` and `UseVendor` are read case-insensitively,
    /// so `name`, `dr` and `YES` are accepted as well.
    pub fn load(input_stream: impl Read) -> Result<Self> {
        let table = read_table(input_stream, MAPPING_FILE, MAX_MAPPING_RULES)?;
        for column in REQUIRED_COLUMNS {
            if table.column(column).is_none() {
                return Err(ConvertError::Config(format!(
                    "Mapping file is missing the '{column}' column"
                )));
            }
        }
        let mut rules = Vec::with_capacity(table.rows.len());
        for (index, record) in table.rows.iter().enumerate() {
            let row = index + 1;
            let mapping_row: MappingRow = record
                .deserialize(Some(&table.headers))
                .map_err(|err| ConvertError::Config(format!("Rule {row}: {err}")))?;
            if mapping_row.is_blank() {
                log::debug!("Skipping blank mapping row {row}");
                continue;
            }
            rules.push(mapping_row.into_rule(row)?);
        }
        log::info!("Loaded {} mapping rules", rules.len());
        Ok(Self { rules })
    }

    pub fn find_income_rule(&self, name: &str) -> Option<&MappingRule> {
        self.rules.iter().find(|rule| rule.matches_income_name(name))
    }

    pub fn find_ledger_rule(&self, gl_account: &str) -> Option<&MappingRule> {
        self.rules
            .iter()
            .find(|rule| rule.matches_ledger_account(gl_account))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MappingRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
