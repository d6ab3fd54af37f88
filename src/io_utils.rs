//! I/O utilities: bounded sample reading, encoding, and delimiter resolution.
//!
//! The detector works on an in-memory sample. This module produces one from
//! a CSV file (or stdin via `-`):
//!
//! - **Byte volume**: the first `byte_volume` bytes feed encoding detection.
//! - **Data volume**: at most `data_volume` data rows are kept (the header
//!   row is not counted).
//! - **Encoding**: the stream is transcoded to UTF-8 with `encoding_rs_io`;
//!   a BOM overrides the requested encoding and is stripped.

use std::{
    fs::File,
    io::{BufReader, Cursor, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::Encoding;
use encoding_rs_io::DecodeReaderBytesBuilder;
use log::debug;

use crate::{data::Cell, detector::Detector};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<Option<&'static Encoding>> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .map(Some)
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'")),
        None => Ok(None),
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Short rows are allowed; their trailing cells read as absent.
pub fn open_csv_reader<R>(reader: R, delimiter: u8, has_headers: bool) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(has_headers)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if is_dash(path) {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    Ok(Box::new(BufReader::new(file)))
}

#[derive(Debug, Clone)]
pub struct SampleOptions {
    pub delimiter: u8,
    pub has_headers: bool,
    pub encoding: Option<&'static Encoding>,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_CSV_DELIMITER,
            has_headers: true,
            encoding: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsvSample {
    pub labels: Option<Vec<String>>,
    pub rows: Vec<Vec<Cell>>,
    pub encoding: &'static Encoding,
}

/// Reads a bounded sample from a CSV source.
pub fn read_csv_sample(
    path: &Path,
    options: &SampleOptions,
    detector: &Detector,
) -> Result<CsvSample> {
    let mut input = open_input(path)?;
    let mut head = Vec::with_capacity(detector.byte_volume());
    (&mut input)
        .take(detector.byte_volume() as u64)
        .read_to_end(&mut head)
        .with_context(|| format!("Reading byte sample from {path:?}"))?;

    let encoding = options
        .encoding
        .unwrap_or_else(|| detector.detect_encoding(&head));
    debug!(
        "Sampling {:?}: {} byte(s) buffered, encoding {}",
        path,
        head.len(),
        encoding.name()
    );

    let stream = Cursor::new(head).chain(input);
    let decoded = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .bom_override(true)
        .strip_bom(true)
        .build(stream);
    let mut reader = open_csv_reader(decoded, options.delimiter, options.has_headers);

    let labels = if options.has_headers {
        let headers = reader
            .headers()
            .with_context(|| format!("Reading header row from {path:?}"))?;
        Some(headers.iter().map(str::to_string).collect::<Vec<_>>())
    } else {
        None
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        if rows.len() >= detector.data_volume() {
            break;
        }
        let record =
            record.with_context(|| format!("Reading sample row {} of {path:?}", rows.len() + 1))?;
        rows.push(
            record
                .iter()
                .map(|value| Cell::String(value.to_string()))
                .collect::<Vec<_>>(),
        );
    }
    debug!("Sampled {} row(s) from {:?}", rows.len(), path);

    Ok(CsvSample {
        labels,
        rows,
        encoding,
    })
}
