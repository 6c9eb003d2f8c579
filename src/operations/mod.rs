use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{ConvertError, Result};
use crate::import::{
    parse_amount, parse_ledger_date, IncomeRow, LedgerRow, INCOME_FILE, LEDGER_FILE,
};
use crate::ir::{group_by_doc_num, DocNum, JournalLine};
use crate::mapping::{Direction, MappingRule, MappingRules};

mod memo;

pub use memo::render_memo;

/// Turns matched input rows into balanced pairs of journal lines. Every matched row takes the
/// next document number, even if its amount is zero and no lines are written for it.
pub struct EntryBuilder<'a> {
    rules: &'a MappingRules,
    conversion_date: NaiveDate,
    next_doc_num: DocNum,
    lines: Vec<JournalLine>,
}

/// Shared fields of the two lines of one entry.
struct EntryInfo<'r> {
    rule: &'r MappingRule,
    date: NaiveDate,
    memo: String,
    name: String,
    doc_num: DocNum,
}

impl<'a> EntryBuilder<'a> {
    pub fn new(rules: &'a MappingRules, conversion_date: NaiveDate) -> Self {
        Self {
            rules,
            conversion_date,
            next_doc_num: DocNum::FIRST,
            lines: Vec::new(),
        }
    }

    pub fn add_income_rows(&mut self, rows: &[IncomeRow]) -> Result<()> {
        rows.iter().try_for_each(|row| self.add_income_row(row))
    }

    pub fn add_ledger_rows(&mut self, rows: &[LedgerRow]) -> Result<()> {
        rows.iter().try_for_each(|row| self.add_ledger_row(row))
    }

    fn add_income_row(&mut self, row: &IncomeRow) -> Result<()> {
        let rules = self.rules;
        let Some(rule) = rules.find_income_rule(&row.name) else {
            log::debug!("No mapping rule for {} row {} '{}'", INCOME_FILE, row.row, row.name);
            return Ok(());
        };
        let amount = parse_amount(&row.amount)
            .map_err(|err| ConvertError::parse(INCOME_FILE, row.row, err))?;
        let memo = render_memo(&rule.memo_template, self.conversion_date)?;

        // A negative amount books the same absolute amount in the other direction
        let (amount, direction) = if amount < Decimal::ZERO {
            (-amount, rule.direction.inverted())
        } else {
            (amount, rule.direction)
        };

        let doc_num = self.take_doc_num();
        let Some(sides) = entry_sides(amount, direction) else {
            warn_no_entry(INCOME_FILE, row.row, rule, amount, doc_num);
            return Ok(());
        };
        let info = EntryInfo {
            rule,
            date: self.conversion_date,
            memo,
            name: String::new(),
            doc_num,
        };
        self.push_entry(info, sides);
        Ok(())
    }

    fn add_ledger_row(&mut self, row: &LedgerRow) -> Result<()> {
        let rules = self.rules;
        let Some(rule) = rules.find_ledger_rule(&row.gl_account) else {
            log::debug!(
                "No mapping rule for {} row {} '{}'",
                LEDGER_FILE,
                row.row,
                row.gl_account
            );
            return Ok(());
        };
        // The ledger only has the one amount column, the rule decides which side it goes to
        let amount = parse_amount(&row.debit)
            .map_err(|err| ConvertError::parse(LEDGER_FILE, row.row, err))?;

        let doc_num = self.take_doc_num();
        // Heading and subtotal rows have neither amount nor date, so the date is only read
        // for rows that produce lines
        let Some(sides) = entry_sides(amount, rule.direction) else {
            warn_no_entry(LEDGER_FILE, row.row, rule, amount, doc_num);
            return Ok(());
        };
        let date = parse_ledger_date(&row.date)
            .map_err(|err| ConvertError::parse(LEDGER_FILE, row.row, err))?;
        let name = if rule.use_vendor {
            row.payee.clone()
        } else {
            String::new()
        };

        let info = EntryInfo {
            rule,
            date,
            memo: row.remarks.clone(),
            name,
            doc_num,
        };
        self.push_entry(info, sides);
        Ok(())
    }

    fn take_doc_num(&mut self) -> DocNum {
        let doc_num = self.next_doc_num;
        self.next_doc_num = doc_num.next();
        doc_num
    }

    fn push_entry(&mut self, info: EntryInfo<'_>, sides: EntrySides) {
        let line = |account: &str, (debit, credit): (Decimal, Decimal)| JournalLine {
            date: info.date,
            account: account.to_string(),
            debit,
            credit,
            memo: info.memo.clone(),
            name: info.name.clone(),
            doc_num: info.doc_num,
        };
        let debit_line = line(&info.rule.debit_account, sides.debit_account);
        let credit_line = line(&info.rule.credit_account, sides.credit_account);
        self.lines.push(debit_line);
        self.lines.push(credit_line);
    }

    pub fn finish(self) -> Vec<JournalLine> {
        self.lines
    }
}

/// `(debit, credit)` of the `DebitAcc` and the `CreditAcc` line.
struct EntrySides {
    debit_account: (Decimal, Decimal),
    credit_account: (Decimal, Decimal),
}

/// With a debit, `DebitAcc` is debited and `CreditAcc` credited; with a credit it is the other
/// way around. A zero or negative amount gives no entry.
fn entry_sides(amount: Decimal, direction: Direction) -> Option<EntrySides> {
    if amount <= Decimal::ZERO {
        return None;
    }
    Some(match direction {
        Direction::Debit => EntrySides {
            debit_account: (amount, Decimal::ZERO),
            credit_account: (Decimal::ZERO, amount),
        },
        Direction::Credit => EntrySides {
            debit_account: (Decimal::ZERO, amount),
            credit_account: (amount, Decimal::ZERO),
        },
    })
}

fn warn_no_entry(file: &str, row: usize, rule: &MappingRule, amount: Decimal, doc_num: DocNum) {
    log::warn!(
        "{file} row {row} matched '{}' but has amount {amount}, no entry written for {doc_num}",
        rule.match_value,
    );
}

/// Every entry must have debits equal to credits.
pub fn check_entries_are_balanced(lines: &[JournalLine]) -> Result<()> {
    for entry in group_by_doc_num(lines) {
        if !entry.is_balanced() {
            return Err(ConvertError::Lookup(format!(
                "Entry {} is not balanced: {:?}",
                entry.doc_num, entry.lines,
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::testutils::line;
    use crate::mapping::RuleType;

    fn rule(
        rule_type: RuleType,
        match_value: &str,
        direction: Direction,
        debit_account: &str,
        credit_account: &str,
    ) -> MappingRule {
        MappingRule {
            rule_type,
            match_value: match_value.to_string(),
            direction,
            debit_account: debit_account.to_string(),
            credit_account: credit_account.to_string(),
            memo_template: String::new(),
            use_vendor: false,
        }
    }

    fn rent_rules() -> MappingRules {
        MappingRules::new(vec![
            MappingRule {
                memo_template: "Rent {current_month}".to_string(),
                ..rule(
                    RuleType::Name,
                    "Rent Income",
                    Direction::Debit,
                    "1000 Cash",
                    "4000 Rent Revenue",
                )
            },
            MappingRule {
                use_vendor: true,
                ..rule(
                    RuleType::Keyword,
                    "Repairs",
                    Direction::Debit,
                    "6100 Repairs",
                    "1000 Cash",
                )
            },
            rule(
                RuleType::Keyword,
                "Owner",
                Direction::Credit,
                "3000 Owner Equity",
                "1000 Cash",
            ),
        ])
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 30).unwrap()
    }

    fn income(row: usize, name: &str, amount: &str) -> IncomeRow {
        IncomeRow {
            row,
            name: name.to_string(),
            amount: amount.to_string(),
        }
    }

    fn ledger(row: usize, date: &str, gl_account: &str, debit: &str) -> LedgerRow {
        LedgerRow {
            row,
            date: date.to_string(),
            gl_account: gl_account.to_string(),
            debit: debit.to_string(),
            remarks: format!("Remarks {row}"),
            payee: format!("Payee {row}"),
        }
    }

    fn build(rules: &MappingRules, income: &[IncomeRow], ledger: &[LedgerRow]) -> Vec<JournalLine> {
        let mut builder = EntryBuilder::new(rules, date());
        builder.add_income_rows(income).unwrap();
        builder.add_ledger_rows(ledger).unwrap();
        builder.finish()
    }

    #[test]
    fn positive_income() {
        let rules = rent_rules();
        let lines = build(&rules, &[income(1, "Rent Income", "1,200.00")], &[]);
        assert_eq!(
            lines,
            vec![
                JournalLine {
                    date: date(),
                    account: "1000 Cash".to_string(),
                    debit: Decimal::new(120000, 2),
                    credit: Decimal::ZERO,
                    memo: "Rent September 2025".to_string(),
                    name: String::new(),
                    doc_num: DocNum(1),
                },
                JournalLine {
                    date: date(),
                    account: "4000 Rent Revenue".to_string(),
                    debit: Decimal::ZERO,
                    credit: Decimal::new(120000, 2),
                    memo: "Rent September 2025".to_string(),
                    name: String::new(),
                    doc_num: DocNum(1),
                },
            ]
        );
    }

    #[test]
    fn negative_income_flips_direction() {
        let rules = rent_rules();
        let lines = build(&rules, &[income(1, "Rent Income", "-1,200.00")], &[]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].account, "1000 Cash");
        assert_eq!(lines[0].debit, Decimal::ZERO);
        assert_eq!(lines[0].credit, Decimal::new(120000, 2));
        assert_eq!(lines[1].account, "4000 Rent Revenue");
        assert_eq!(lines[1].debit, Decimal::new(120000, 2));
        assert_eq!(lines[1].credit, Decimal::ZERO);
    }

    #[test]
    fn income_pairs_are_balanced_for_any_sign() {
        let rules = rent_rules();
        for amount in ["1,200.00", "-1,200.00", "0.01", "-99999.99"] {
            let lines = build(&rules, &[income(1, "Rent Income", amount)], &[]);
            assert_eq!(lines.len(), 2, "amount {amount}");
            assert_eq!(lines[0].debit + lines[1].debit, lines[0].credit + lines[1].credit);
            for line in &lines {
                assert!(line.debit >= Decimal::ZERO && line.credit >= Decimal::ZERO);
                assert_ne!(line.debit.is_zero(), line.credit.is_zero());
            }
            check_entries_are_balanced(&lines).unwrap();
        }
    }

    #[test]
    fn ledger_debit_rule() {
        let rules = rent_rules();
        let lines = build(
            &rules,
            &[],
            &[ledger(1, "09/15/2025", "6100 Repairs & Maintenance", "250.00")],
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].account, "6100 Repairs");
        assert_eq!(lines[0].debit, Decimal::new(25000, 2));
        assert_eq!(lines[1].account, "1000 Cash");
        assert_eq!(lines[1].credit, Decimal::new(25000, 2));
        for line in &lines {
            assert_eq!(line.date, NaiveDate::from_ymd_opt(2025, 9, 15).unwrap());
            assert_eq!(line.memo, "Remarks 1");
            assert_eq!(line.name, "Payee 1");
        }
    }

    #[test]
    fn ledger_credit_rule() {
        let rules = rent_rules();
        let lines = build(
            &rules,
            &[],
            &[ledger(1, "2025-09-20", "3000 Owner Contribution", "1,000")],
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].account, "3000 Owner Equity");
        assert_eq!(lines[0].credit, Decimal::new(1000, 0));
        assert_eq!(lines[1].account, "1000 Cash");
        assert_eq!(lines[1].debit, Decimal::new(1000, 0));
        // UseVendor is not set on this rule
        assert_eq!(lines[0].name, "");
    }

    #[test]
    fn unmatched_rows_do_not_take_a_doc_num() {
        let rules = rent_rules();
        let lines = build(
            &rules,
            &[
                income(1, "Laundry Income", "not an amount"),
                income(2, "Rent Income", "100"),
            ],
            &[
                ledger(1, "garbage", "7000 Utilities", "garbage"),
                ledger(2, "09/01/2025", "6100 Repairs", "50"),
            ],
        );
        let doc_nums: Vec<DocNum> = lines.iter().map(|line| line.doc_num).collect();
        assert_eq!(doc_nums, vec![DocNum(1), DocNum(1), DocNum(2), DocNum(2)]);
    }

    #[test]
    fn zero_amount_rows_take_a_doc_num_but_write_no_lines() {
        let rules = rent_rules();
        let lines = build(
            &rules,
            &[income(1, "Rent Income", "0.00"), income(2, "Rent Income", "5")],
            &[
                ledger(1, "09/01/2025", "6100 Repairs", ""),
                ledger(2, "09/01/2025", "6100 Repairs", "-20.00"),
                ledger(3, "09/01/2025", "6100 Repairs", "20.00"),
            ],
        );
        let doc_nums: Vec<String> = lines.iter().map(|line| line.doc_num.to_string()).collect();
        assert_eq!(doc_nums, vec!["JE002", "JE002", "JE005", "JE005"]);
    }

    #[test]
    fn doc_nums_are_strictly_increasing_across_sources() {
        let rules = rent_rules();
        let lines = build(
            &rules,
            &[income(1, "Rent Income", "1"), income(2, "Rent Income", "-2")],
            &[ledger(1, "09/01/2025", "6100 Repairs", "3")],
        );
        let mut doc_nums: Vec<DocNum> = lines.iter().map(|line| line.doc_num).collect();
        doc_nums.dedup();
        assert_eq!(doc_nums, vec![DocNum(1), DocNum(2), DocNum(3)]);
    }

    #[test]
    fn invalid_amount_of_matched_row() {
        let rules = rent_rules();
        let mut builder = EntryBuilder::new(&rules, date());
        let err = builder.add_income_rows(&[income(7, "Rent Income", "12.3.4")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error in income statement row 7: Failed to parse amount"
        );
    }

    #[test]
    fn invalid_date_of_matched_row() {
        let rules = rent_rules();
        let mut builder = EntryBuilder::new(&rules, date());
        let err = builder
            .add_ledger_rows(&[ledger(3, "soon", "6100 Repairs", "1")])
            .unwrap_err();
        assert!(matches!(err, ConvertError::Parse { .. }));
        assert!(err.to_string().contains("general ledger row 3"));
    }

    #[test]
    fn invalid_memo_template() {
        let rules = MappingRules::new(vec![MappingRule {
            memo_template: "Rent {month}".to_string(),
            ..rule(RuleType::Name, "Rent", Direction::Debit, "A", "B")
        }]);
        let mut builder = EntryBuilder::new(&rules, date());
        let err = builder.add_income_rows(&[income(1, "Rent", "1")]).unwrap_err();
        assert!(matches!(err, ConvertError::Format(_)));
    }

    #[test]
    fn ledger_heading_rows_without_amount_or_date() {
        let rules = rent_rules();
        let lines = build(
            &rules,
            &[],
            &[
                ledger(1, "", "6100 Repairs & Maintenance", ""),
                ledger(2, "", "6100 Repairs & Maintenance", "0.00"),
                ledger(3, "09/15/2025", "6100 Repairs", "250.00"),
            ],
        );
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.doc_num == DocNum(3)));
        assert_eq!(lines[0].date, NaiveDate::from_ymd_opt(2025, 9, 15).unwrap());
    }

    #[test]
    fn income_rows_never_carry_a_name() {
        let rules = MappingRules::new(vec![MappingRule {
            use_vendor: true,
            ..rule(RuleType::Name, "Rent Income", Direction::Debit, "1000 Cash", "4000 Rent")
        }]);
        let lines = build(&rules, &[income(1, "Rent Income", "100")], &[]);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.name.is_empty()));
    }

    #[test]
    fn ledger_name_only_with_use_vendor() {
        let rules = rent_rules();
        let lines = build(
            &rules,
            &[],
            &[
                ledger(1, "09/01/2025", "6100 Repairs", "10"),
                ledger(2, "09/01/2025", "3000 Owner Contribution", "10"),
            ],
        );
        let names: Vec<&str> = lines.iter().map(|line| line.name.as_str()).collect();
        assert_eq!(names, vec!["Payee 1", "Payee 1", "", ""]);
    }

    #[test]
    fn test_check_entries_are_balanced() {
        check_entries_are_balanced(&[line(1, "A", 100, 0), line(1, "B", 0, 100)]).unwrap();
        let err =
            check_entries_are_balanced(&[line(1, "A", 100, 0), line(1, "B", 0, 90)]).unwrap_err();
        assert!(matches!(err, ConvertError::Lookup(_)));
    }
}
