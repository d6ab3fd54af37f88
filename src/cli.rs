use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::field::FieldType;

#[derive(Debug, Parser)]
#[command(author, version, about = "Detect table schemas from tabular data samples", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect field names and types from a CSV sample
    Describe(DescribeArgs),
    /// List the fields of a schema file as a table
    Fields(FieldsArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
    Table,
}

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Input CSV file to sample (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Write the schema here (format follows the extension unless --format is given)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Output format (defaults to yaml on stdout)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (detected when omitted)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Treat the first row as data and synthesize field names
    #[arg(long = "no-header")]
    pub no_header: bool,
    /// Detector configuration file (YAML or JSON); flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Bytes buffered for encoding detection
    #[arg(long = "byte-volume")]
    pub byte_volume: Option<usize>,
    /// Maximum number of data rows sampled
    #[arg(long = "data-volume")]
    pub data_volume: Option<usize>,
    /// Share of present cells a type must parse before it is accepted, in (0, 1]
    #[arg(long = "field-confidence")]
    pub field_confidence: Option<f64>,
    /// Detect numbers as floats instead of decimals
    #[arg(long = "float-numbers")]
    pub float_numbers: bool,
    /// Tokens read as missing values (repeatable; replaces the default `""`)
    #[arg(long = "missing-values", action = clap::ArgAction::Append)]
    pub missing_values: Vec<String>,
    /// Assign this type to every field instead of detecting
    #[arg(long = "field-type", value_parser = parse_field_type)]
    pub field_type: Option<FieldType>,
    /// Field names to use instead of the header row
    #[arg(long = "field-names", value_delimiter = ',')]
    pub field_names: Vec<String>,
    /// Existing schema file; when it defines fields, detection is skipped
    #[arg(short = 's', long = "schema")]
    pub schema: Option<PathBuf>,
    /// Reorder and filter fields to match the header row
    #[arg(long = "schema-sync")]
    pub schema_sync: bool,
    /// Patch applied after detection: JSON text or a path to a YAML/JSON file
    #[arg(long = "schema-patch")]
    pub schema_patch: Option<String>,
}

#[derive(Debug, Args)]
pub struct FieldsArgs {
    /// Schema file (YAML or JSON)
    #[arg(short = 's', long = "schema")]
    pub schema: PathBuf,
}

pub fn parse_field_type(value: &str) -> Result<FieldType, String> {
    value.parse::<FieldType>().map_err(|err| err.to_string())
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
