use rust_decimal::Decimal;

/// Parse an amount cell as exported by the accounting system, e.g. `1,234.56`, `-1,200.00` or
/// `$99.10`. Thousands separators and a leading dollar sign are dropped. An empty cell is zero.
pub fn parse_amount(content: &str) -> Result<Decimal, &'static str> {
    let mut content = content.trim().to_string();
    if content.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let mut negative = if content.starts_with('-') {
        content.remove(0);
        true
    } else {
        false
    };
    if content.starts_with('$') {
        content.remove(0);
        // "$-12.00"
        if content.starts_with('-') {
            if negative {
                return Err("Amount has two minus signs");
            }
            content.remove(0);
            negative = true;
        }
    }
    let content = content.replace(',', "");
    if content.is_empty() {
        return Err("Empty amount");
    }
    let amount = Decimal::from_str_exact(&content).map_err(|_| "Failed to parse amount")?;
    Ok(if negative { -amount } else { amount })
}
