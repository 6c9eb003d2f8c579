use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate QuickBooks IIF journal entries from an income statement and a general ledger export.
#[derive(Parser, Debug)]
pub struct Args {
    /// Config file, defaults to iif-journal.yaml in the working directory if that exists
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert an income statement and a general ledger CSV into an IIF file
    Convert(ConvertArgs),

    /// List the properties that have a mapping file
    ListProperties {
        /// Directory with the mapping files, overrides the config file
        #[clap(long)]
        mapping_dir: Option<PathBuf>,
    },

    /// Load a mapping file and print its rules
    CheckMapping {
        /// Path to the mapping CSV
        mapping: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
pub struct ConvertArgs {
    /// Path to the income statement CSV
    #[clap(long)]
    pub income: PathBuf,

    /// Path to the general ledger CSV
    #[clap(long)]
    pub gl: PathBuf,

    /// Property whose mapping file to use, or "Other" for the generic Mapping.csv.
    /// Asks interactively if neither this nor --mapping is given.
    #[clap(short, long)]
    pub property: Option<String>,

    /// Use this mapping file instead of looking it up by property
    #[clap(long)]
    pub mapping: Option<PathBuf>,

    /// Journal date for the income statement entries, as MM/DD/YYYY. Asks interactively if missing.
    #[clap(short, long)]
    pub date: Option<String>,

    /// Directory with the mapping files, overrides the config file
    #[clap(long)]
    pub mapping_dir: Option<PathBuf>,

    /// Directory to write the IIF file to, overrides the config file
    #[clap(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print the IIF to stdout instead of writing a file
    #[clap(long)]
    pub stdout: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn parse_convert() {
        let args = Args::try_parse_from([
            "iif-journal",
            "convert",
            "--income",
            "income.csv",
            "--gl",
            "gl.csv",
            "-p",
            "Oak Street",
            "-d",
            "09/30/2025",
            "--stdout",
        ])
        .unwrap();
        let Command::Convert(convert) = args.command else {
            panic!("Expected convert command");
        };
        assert_eq!(convert.income, PathBuf::from("income.csv"));
        assert_eq!(convert.gl, PathBuf::from("gl.csv"));
        assert_eq!(convert.property.as_deref(), Some("Oak Street"));
        assert_eq!(convert.date.as_deref(), Some("09/30/2025"));
        assert!(convert.stdout);
        assert!(convert.mapping.is_none());
    }

    #[test]
    fn convert_needs_inputs() {
        assert!(Args::try_parse_from(["iif-journal", "convert", "--income", "i.csv"]).is_err());
    }
}
