use anyhow::{anyhow, bail, Context as _, Result};
use chrono::NaiveDate;
use console::{pad_str, style, Alignment, StyledObject};
use rust_decimal::Decimal;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::args::{Args, Command, ConvertArgs};
use crate::config::Config;
use crate::export::{output_file_name, write_iif};
use crate::import::{self, format_iif_date, parse_us_date};
use crate::ir::{group_by_doc_num, JournalEntry};
use crate::mapping::{discover_properties, MappingRule, MappingRules, Property, RuleType};
use crate::terminal::{self, BulletPointPrinter, LineWriter};
use crate::Conversion;

pub fn main(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    match args.command {
        Command::Convert(convert_args) => main_convert(&config, convert_args),
        Command::ListProperties { mapping_dir } => {
            main_list_properties(mapping_dir.as_deref().unwrap_or(&config.mapping_dir))
        }
        Command::CheckMapping { mapping } => main_check_mapping(&mapping),
    }
}

fn main_convert(config: &Config, args: ConvertArgs) -> Result<()> {
    let mapping_dir = args.mapping_dir.as_deref().unwrap_or(&config.mapping_dir);
    let (property, mapping_path) = select_mapping(&args, mapping_dir)?;
    let conversion_date = select_conversion_date(args.date.as_deref())?;

    let rules = load_rules(&mapping_path)?;
    let income = import::load_income(open(&args.income)?, config.max_input_rows)
        .with_context(|| anyhow!("Failed to load {}", args.income.display()))?;
    let ledger = import::load_ledger(open(&args.gl)?, config.max_input_rows)
        .with_context(|| anyhow!("Failed to load {}", args.gl.display()))?;

    let conversion = crate::convert(&rules, &income, &ledger, conversion_date)
        .context("Conversion failed, no IIF file was written")?;

    if args.stdout {
        println!("{}", conversion.iif);
        return Ok(());
    }

    let output_dir = args.output_dir.as_deref().unwrap_or(&config.output_dir);
    let output_path = output_dir.join(output_file_name(property.name(), conversion_date));
    write_iif(&output_path, &conversion.iif)?;

    println!(
        "{}",
        style_header(&format!("Journal entries for {}:", property.name()))
    );
    print_conversion(&BulletPointPrinter::new(), &conversion);
    println!();
    println!("Wrote {}", style(output_path.display()).green().bold());
    Ok(())
}

fn main_list_properties(mapping_dir: &Path) -> Result<()> {
    let properties = discover_properties(mapping_dir)
        .with_context(|| anyhow!("Failed to read mapping directory {}", mapping_dir.display()))?;
    println!("{}", style_header("Properties:"));
    let printer = BulletPointPrinter::new();
    for property in properties {
        printer.print_item(format!(
            "{} {}",
            style_property(&property),
            style(format!("({})", property.mapping_path(mapping_dir).display())).dim(),
        ));
    }
    Ok(())
}

fn main_check_mapping(mapping_path: &Path) -> Result<()> {
    let rules = load_rules(mapping_path)?;
    println!(
        "{}",
        style_header(&format!("{} rules in {}:", rules.len(), mapping_path.display()))
    );
    print_rules(&BulletPointPrinter::new(), &rules);
    Ok(())
}

/// Mapping file given with `--mapping`, or the one of the selected property.
fn select_mapping(args: &ConvertArgs, mapping_dir: &Path) -> Result<(Property, PathBuf)> {
    if let Some(mapping) = &args.mapping {
        let property = match &args.property {
            Some(name) => Property::from_name(name),
            None => Property::from_mapping_path(mapping),
        };
        return Ok((property, mapping.clone()));
    }
    let property = match &args.property {
        Some(name) => Property::from_name(name),
        None => prompt_property(mapping_dir)?,
    };
    let mapping_path = property.mapping_path(mapping_dir);
    Ok((property, mapping_path))
}

fn prompt_property(mapping_dir: &Path) -> Result<Property> {
    if !console::user_attended() {
        bail!("No --property given");
    }
    let mut properties = discover_properties(mapping_dir)
        .with_context(|| anyhow!("Failed to read mapping directory {}", mapping_dir.display()))?;
    let names: Vec<&str> = properties.iter().map(|property| property.name()).collect();
    let selected = terminal::prompt_select("Property", &names, 0)?;
    Ok(properties.swap_remove(selected))
}

fn select_conversion_date(date: Option<&str>) -> Result<NaiveDate> {
    let date = match date {
        Some(date) => date.to_string(),
        None => {
            if !console::user_attended() {
                bail!("No --date given");
            }
            let today = chrono::Local::now().date_naive();
            terminal::prompt_with_default("Journal date (MM/DD/YYYY)", format_iif_date(today))?
        }
    };
    parse_us_date(&date).map_err(|err| anyhow!("Invalid date '{}': {}", date, err))
}

fn load_rules(mapping_path: &Path) -> Result<MappingRules> {
    MappingRules::load(open(mapping_path)?)
        .with_context(|| anyhow!("Failed to load mapping {}", mapping_path.display()))
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| anyhow!("Failed to open {}", path.display()))
}

fn print_conversion<W: LineWriter + Clone>(
    printer: &BulletPointPrinter<W>,
    conversion: &Conversion,
) {
    let entries = group_by_doc_num(&conversion.lines);
    if entries.is_empty() {
        printer.print_item(style("(none)").italic());
        return;
    }
    for entry in &entries {
        print_entry(printer, entry);
    }
}

fn print_entry<W: LineWriter + Clone>(printer: &BulletPointPrinter<W>, entry: &JournalEntry<'_>) {
    let Some(first) = entry.lines.first() else {
        return;
    };
    printer.print_item(format!(
        "{} {} {} {}",
        style(entry.doc_num).cyan().bold(),
        style(format_iif_date(first.date)),
        pad_str(
            &style_amount(entry.total_debit()).to_string(),
            12,
            Alignment::Right,
            None
        ),
        style(&first.memo).blue(),
    ));
    let printer = printer.indent();
    for line in &entry.lines {
        let (side, amount) = if line.is_debit() {
            ("DR", line.debit)
        } else {
            ("CR", line.credit)
        };
        let name = if line.name.is_empty() {
            String::new()
        } else {
            format!(" {}", style(&line.name).yellow())
        };
        printer.print_item(format!(
            "{} {} {}{}",
            side,
            style_account(&line.account),
            style_amount(amount),
            name,
        ));
    }
}

fn print_rules<W: LineWriter + Clone>(printer: &BulletPointPrinter<W>, rules: &MappingRules) {
    if rules.is_empty() {
        printer.print_item(style("(none)").italic());
    }
    for rule in rules.iter() {
        print_rule(printer, rule);
    }
}

fn print_rule<W: LineWriter + Clone>(printer: &BulletPointPrinter<W>, rule: &MappingRule) {
    let matcher = match rule.rule_type {
        RuleType::Name => "Name",
        RuleType::Keyword => "Keyword",
    };
    printer.print_item(format!(
        "{} {} {}",
        matcher,
        style(format!("'{}'", rule.match_value)).bold(),
        rule.direction.code(),
    ));
    let printer = printer.indent();
    printer.print_item(format!("debit {}", style_account(&rule.debit_account)));
    printer.print_item(format!("credit {}", style_account(&rule.credit_account)));
    if !rule.memo_template.is_empty() {
        printer.print_item(format!("memo {}", style(&rule.memo_template).blue()));
    }
    if rule.use_vendor {
        printer.print_item("payee as name");
    }
}

fn style_header(header: &str) -> StyledObject<&str> {
    style(header).bold().underlined()
}

fn style_property(property: &Property) -> StyledObject<&str> {
    style(property.name()).cyan().bold()
}

fn style_account(account: &str) -> StyledObject<&str> {
    style(account).magenta()
}

fn style_amount(amount: Decimal) -> StyledObject<String> {
    style(format!("{:.2}", amount)).bold().green()
}
