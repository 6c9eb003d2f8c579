use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Select};

pub fn prompt_with_default(prompt: &str, default: String) -> Result<String> {
    Ok(Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact_text()?)
}

pub fn prompt_select(prompt: &str, options: &[&str], default: usize) -> Result<usize> {
    Ok(Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(options)
        .default(default)
        .interact()?)
}
