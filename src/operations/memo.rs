use chrono::NaiveDate;

use crate::error::{ConvertError, Result};
use crate::import::format_month_year;

const CURRENT_MONTH: &str = "current_month";

/// Fill in a memo template. `{current_month}` becomes e.g. "September 2025", `{{` and `}}` are
/// literal braces. Any other placeholder is an error.
pub fn render_memo(template: &str, conversion_date: NaiveDate) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                result.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                result.push('}');
            }
            '{' => {
                let mut placeholder = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => placeholder.push(c),
                        None => {
                            return Err(ConvertError::Format(format!(
                                "Unclosed '{{' in memo template '{template}'"
                            )))
                        }
                    }
                }
                if placeholder != CURRENT_MONTH {
                    return Err(ConvertError::Format(format!(
                        "Unknown placeholder '{{{placeholder}}}' in memo template '{template}'"
                    )));
                }
                result.push_str(&format_month_year(conversion_date));
            }
            '}' => {
                return Err(ConvertError::Format(format!(
                    "Single '}}' in memo template '{template}'"
                )))
            }
            c => result.push(c),
        }
    }
    Ok(result)
}
