//! Schema detection from a bounded in-memory sample.
//!
//! [`Detector::detect_schema`] derives column names, races candidate types
//! per column (see [`crate::scorer`]), then optionally syncs the result to
//! the observed header and applies a caller-supplied patch. Each step builds
//! a new [`Schema`] value; the caller's sample, labels, and schema are never
//! modified.
//!
//! The detector does no I/O of its own: bounding the sample by byte and row
//! volume is the reader's job (see [`crate::io_utils::read_csv_sample`]).

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use log::debug;
use serde_json::{Map, Value as JsonValue};

use crate::{
    config::DetectorConfig,
    data::{NULL_CELL, Sample},
    error::{Error, Result},
    field::{Field, FieldType},
    schema::Schema,
    scorer::ColumnScorer,
};

type EncodingGuesser = Box<dyn Fn(&[u8]) -> &'static Encoding + Send + Sync>;

#[derive(Default)]
pub struct Detector {
    config: DetectorConfig,
    encoding_guesser: Option<EncodingGuesser>,
}

impl fmt::Debug for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detector")
            .field("config", &self.config)
            .field("encoding_guesser", &self.encoding_guesser.is_some())
            .finish()
    }
}

impl Detector {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            encoding_guesser: None,
        })
    }

    /// Replaces the built-in encoding sniffing.
    pub fn with_encoding_guesser<F>(mut self, guesser: F) -> Self
    where
        F: Fn(&[u8]) -> &'static Encoding + Send + Sync + 'static,
    {
        self.encoding_guesser = Some(Box::new(guesser));
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn byte_volume(&self) -> usize {
        self.config.byte_volume
    }

    pub fn data_volume(&self) -> usize {
        self.config.data_volume
    }

    /// Guesses the text encoding of a byte sample.
    ///
    /// A BOM wins outright. Valid UTF-8 (allowing a sequence cut off by the
    /// byte volume) is UTF-8. Otherwise the buffer is windows-1252 when the
    /// share of its non-ASCII bytes that map to printable characters reaches
    /// the configured encoding confidence, and UTF-8 when it does not.
    pub fn detect_encoding(&self, buffer: &[u8]) -> &'static Encoding {
        if let Some(guesser) = &self.encoding_guesser {
            return guesser(buffer);
        }
        if let Some((encoding, _)) = Encoding::for_bom(buffer) {
            return encoding;
        }
        match std::str::from_utf8(buffer) {
            Ok(_) => return UTF_8,
            Err(err) if err.error_len().is_none() => return UTF_8,
            Err(_) => {}
        }
        let non_ascii = buffer.iter().filter(|b| !b.is_ascii()).count();
        let printable = buffer
            .iter()
            .filter(|b| !b.is_ascii() && !matches!(**b, 0x81 | 0x8D | 0x8F | 0x90 | 0x9D))
            .count();
        let confidence = printable as f64 / non_ascii.max(1) as f64;
        if confidence >= self.config.encoding_confidence {
            WINDOWS_1252
        } else {
            UTF_8
        }
    }

    /// Detects a schema from `sample`.
    ///
    /// An existing schema with fields skips inference. Sync and patch run
    /// afterwards in either case, and the result must have unique field
    /// names.
    pub fn detect_schema(
        &self,
        sample: &Sample,
        labels: Option<&[String]>,
        schema: Option<&Schema>,
    ) -> Result<Schema> {
        let mut schema = match schema {
            Some(existing) if !existing.fields.is_empty() => {
                debug!(
                    "Reusing provided schema with {} field(s)",
                    existing.fields.len()
                );
                existing.clone()
            }
            _ => self.infer_schema(sample, labels),
        };

        if self.config.schema_sync
            && let Some(labels) = labels.filter(|labels| !labels.is_empty())
        {
            schema = sync_schema(&schema, labels);
        }

        if let Some(patch) = &self.config.schema_patch {
            schema = patch_schema(&schema, patch)?;
        }

        schema.ensure_unique_names()?;
        Ok(schema)
    }

    fn infer_schema(&self, sample: &Sample, labels: Option<&[String]>) -> Schema {
        let mut schema = Schema::default();
        if !self.config.has_default_missing_values() {
            schema.missing_values = self.config.field_missing_values.clone();
        }

        let source = self
            .config
            .field_names
            .as_deref()
            .filter(|names| !names.is_empty())
            .or(labels.filter(|labels| !labels.is_empty()));
        let names = derive_names(source, sample);
        if names.is_empty() {
            return schema;
        }
        debug!("Detecting types for {} column(s): {:?}", names.len(), names);

        if self.config.field_type.is_some() || sample.is_empty() {
            let field_type = self.config.field_type.unwrap_or(FieldType::Any);
            schema.fields = names
                .into_iter()
                .map(|name| Field::new(name, field_type))
                .collect();
            return schema;
        }

        let mut scorers = names
            .iter()
            .map(|name| {
                ColumnScorer::new(
                    name,
                    sample.len(),
                    self.config.field_confidence,
                    self.config.field_float_numbers,
                )
            })
            .collect::<Vec<_>>();

        for (row_idx, row) in sample.iter().enumerate() {
            for (idx, scorer) in scorers.iter_mut().enumerate() {
                if scorer.is_locked() {
                    continue;
                }
                let cell = row.get(idx).unwrap_or(&NULL_CELL);
                if let Some(field) = scorer.observe(cell, &self.config.field_missing_values) {
                    debug!(
                        "Column '{}' locked as '{}' at sample row {}",
                        field.name,
                        field.field_type,
                        row_idx + 1
                    );
                }
            }
        }

        schema.fields = scorers.into_iter().map(ColumnScorer::finish).collect();
        schema
    }
}

/// Picks names from `source` (override list or labels) or synthesizes
/// `field1..fieldN` from the first row's width, fills blanks, and
/// deduplicates.
pub fn derive_names(source: Option<&[String]>, sample: &Sample) -> Vec<String> {
    let names: Vec<String> = match source {
        Some(names) => names.to_vec(),
        None => match sample.first() {
            Some(first) => (1..=first.len()).map(|n| format!("field{n}")).collect(),
            None => return Vec::new(),
        },
    };
    let filled = names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            if name.is_empty() {
                format!("field{}", idx + 1)
            } else {
                name
            }
        })
        .collect::<Vec<_>>();
    deduplicate_names(&filled)
}

/// Appends the occurrence count (2, 3, ...) to repeated names, leaving the
/// first occurrence unchanged. A suffixed name that collides with a name
/// already emitted keeps counting until it is free.
pub fn deduplicate_names(names: &[String]) -> Vec<String> {
    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    let mut emitted: HashSet<String> = HashSet::with_capacity(names.len());
    let mut output = Vec::with_capacity(names.len());
    for name in names {
        let count = occurrences.entry(name.as_str()).or_insert(0);
        *count += 1;
        let mut suffix = *count;
        let mut candidate = if suffix > 1 {
            format!("{name}{suffix}")
        } else {
            name.clone()
        };
        while emitted.contains(&candidate) {
            suffix = suffix.max(1) + 1;
            candidate = format!("{name}{suffix}");
        }
        emitted.insert(candidate.clone());
        output.push(candidate);
    }
    output
}

/// Rebuilds the field list in `labels` order: known names keep their field,
/// unknown labels become `any` fields, and fields not named by a label are
/// dropped. Table-level settings are kept.
pub fn sync_schema(schema: &Schema, labels: &[String]) -> Schema {
    let mapping: HashMap<&str, &Field> = schema
        .fields
        .iter()
        .map(|field| (field.name.as_str(), field))
        .collect();
    let fields = labels
        .iter()
        .map(|label| match mapping.get(label.as_str()) {
            Some(field) => (*field).clone(),
            None => Field::new(label.clone(), FieldType::Any),
        })
        .collect::<Vec<_>>();
    debug!(
        "Synced schema to {} label(s); dropped {} field(s)",
        labels.len(),
        schema
            .fields
            .iter()
            .filter(|f| !labels.contains(&f.name))
            .count()
    );
    Schema {
        fields,
        ..schema.clone()
    }
}

/// Applies `patch`: every key except `fields` updates the schema itself;
/// `fields` maps field names to per-field overrides.
pub fn patch_schema(schema: &Schema, patch: &Map<String, JsonValue>) -> Result<Schema> {
    let mut schema_patch = patch.clone();
    let field_patches = match schema_patch.remove("fields") {
        None => Map::new(),
        Some(JsonValue::Object(map)) => map,
        Some(other) => {
            return Err(Error::schema(format!(
                "Schema patch 'fields' must be a mapping of field name to overrides, got {other}"
            )));
        }
    };

    let mut patched = schema.update(&schema_patch)?;
    for field in patched.fields.iter_mut() {
        let Some(overrides) = field_patches.get(&field.name) else {
            continue;
        };
        let JsonValue::Object(overrides) = overrides else {
            return Err(Error::schema(format!(
                "Patch for field '{}' must be a mapping",
                field.name
            )));
        };
        debug!("Patching field '{}' with {:?}", field.name, overrides);
        *field = field.update(overrides)?;
    }
    Ok(patched)
}
