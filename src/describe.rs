//! `describe` subcommand: sample a CSV source and print or save its schema.

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use log::info;
use serde_json::{Map, Value as JsonValue};

use crate::{
    cli::{DescribeArgs, OutputFormat},
    config::{DetectorConfig, is_yaml_path},
    detector::Detector,
    io_utils::{self, SampleOptions},
    schema::Schema,
    table,
};

pub fn execute(args: &DescribeArgs) -> Result<()> {
    let config = build_config(args)?;
    let detector = Detector::new(config).context("Configuring detector")?;

    let options = SampleOptions {
        delimiter: io_utils::resolve_input_delimiter(&args.input, args.delimiter),
        has_headers: !args.no_header,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
    };
    info!(
        "Sampling '{}' (up to {} row(s)) with delimiter '{}'",
        args.input.display(),
        detector.data_volume(),
        printable_delimiter(options.delimiter)
    );
    let sample = io_utils::read_csv_sample(&args.input, &options, &detector)
        .with_context(|| format!("Sampling {:?}", args.input))?;

    let existing = match &args.schema {
        Some(path) => {
            Some(Schema::load(path).with_context(|| format!("Loading schema from {path:?}"))?)
        }
        None => None,
    };

    let schema = detector
        .detect_schema(&sample.rows, sample.labels.as_deref(), existing.as_ref())
        .with_context(|| format!("Detecting schema for {:?}", args.input))?;
    info!(
        "Detected {} field(s) from {} sampled row(s) ({})",
        schema.fields.len(),
        sample.rows.len(),
        sample.encoding.name()
    );

    emit(&schema, args)
}

fn build_config(args: &DescribeArgs) -> Result<DetectorConfig> {
    let mut config = match &args.config {
        Some(path) => DetectorConfig::load(path)
            .with_context(|| format!("Loading detector config from {path:?}"))?,
        None => DetectorConfig::default(),
    };
    if let Some(byte_volume) = args.byte_volume {
        config.byte_volume = byte_volume;
    }
    if let Some(data_volume) = args.data_volume {
        config.data_volume = data_volume;
    }
    if let Some(confidence) = args.field_confidence {
        config.field_confidence = confidence;
    }
    if args.float_numbers {
        config.field_float_numbers = true;
    }
    if !args.missing_values.is_empty() {
        config.field_missing_values = args.missing_values.clone();
    }
    if args.field_type.is_some() {
        config.field_type = args.field_type;
    }
    if !args.field_names.is_empty() {
        config.field_names = Some(args.field_names.clone());
    }
    if args.schema_sync {
        config.schema_sync = true;
    }
    if let Some(raw) = &args.schema_patch {
        config.schema_patch = Some(parse_schema_patch(raw)?);
    }
    Ok(config)
}

/// Accepts inline JSON or the path of a YAML/JSON file.
fn parse_schema_patch(raw: &str) -> Result<Map<String, JsonValue>> {
    let path = Path::new(raw);
    let value: JsonValue = if path.is_file() {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Reading schema patch {path:?}"))?;
        if is_yaml_path(path) {
            serde_yaml::from_str(&contents).context("Parsing schema patch YAML")?
        } else {
            serde_json::from_str(&contents).context("Parsing schema patch JSON")?
        }
    } else {
        serde_json::from_str(raw).context("Parsing --schema-patch as JSON")?
    };
    match value {
        JsonValue::Object(map) => Ok(map),
        other => Err(anyhow!("Schema patch must be a mapping, got {other}")),
    }
}

fn emit(schema: &Schema, args: &DescribeArgs) -> Result<()> {
    let rendered = match (args.format, &args.output) {
        (None, Some(path)) => {
            schema
                .save(path)
                .with_context(|| format!("Writing schema to {path:?}"))?;
            info!("Schema written to {:?}", path);
            return Ok(());
        }
        (None | Some(OutputFormat::Yaml), _) => schema.to_yaml_string()?,
        (Some(OutputFormat::Json), _) => schema.to_json_string()?,
        (Some(OutputFormat::Table), _) => table::render_fields(schema),
    };
    match &args.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("Writing schema to {path:?}"))?;
            info!("Schema written to {:?}", path);
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
