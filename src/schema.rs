//! Schema model: an ordered list of [`Field`] descriptors plus table-level
//! settings, with YAML/JSON persistence.
//!
//! Field names must be unique. Every constructor and mutator that can
//! introduce a duplicate reports it as [`Error::Schema`].

use std::{fs, path::Path};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::{
    config::{DEFAULT_MISSING_VALUES, default_missing_values, is_yaml_path},
    data::{Cell, NULL_CELL, Value},
    error::{CellError, Error, Result},
    field::Field,
};

fn is_default_missing_values(values: &[String]) -> bool {
    values.len() == DEFAULT_MISSING_VALUES.len()
        && values.iter().zip(DEFAULT_MISSING_VALUES).all(|(a, b)| a == b)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(
        default = "default_missing_values",
        skip_serializing_if = "is_default_missing_values"
    )]
    pub missing_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_key: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Default for Schema {
    fn default() -> Self {
        Schema {
            fields: Vec::new(),
            missing_values: default_missing_values(),
            primary_key: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl Schema {
    pub fn from_fields(fields: Vec<Field>) -> Result<Self> {
        let schema = Schema {
            fields,
            ..Schema::default()
        };
        schema.ensure_unique_names()?;
        Ok(schema)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_index(name).is_some()
    }

    pub fn add_field(&mut self, field: Field) -> Result<()> {
        if self.has_field(&field.name) {
            return Err(Error::schema(format!(
                "Field '{}' already exists in the schema",
                field.name
            )));
        }
        self.fields.push(field);
        Ok(())
    }

    pub fn remove_field(&mut self, name: &str) -> Result<Field> {
        let idx = self
            .field_index(name)
            .ok_or_else(|| Error::schema(format!("Field '{name}' does not exist")))?;
        Ok(self.fields.remove(idx))
    }

    pub fn update_field(&mut self, name: &str, patch: &Map<String, JsonValue>) -> Result<()> {
        let idx = self
            .field_index(name)
            .ok_or_else(|| Error::schema(format!("Field '{name}' does not exist")))?;
        let updated = self.fields[idx].update(patch)?;
        self.fields[idx] = updated;
        self.ensure_unique_names()
    }

    /// Returns a copy with schema-level keys from `patch` merged over this
    /// descriptor. A `fields` key, if present, replaces the field list.
    pub fn update(&self, patch: &Map<String, JsonValue>) -> Result<Schema> {
        let mut descriptor = match serde_json::to_value(self)? {
            JsonValue::Object(map) => map,
            _ => return Err(Error::schema("Schema descriptor must be an object")),
        };
        for (key, value) in patch {
            descriptor.insert(key.clone(), value.clone());
        }
        serde_json::from_value(JsonValue::Object(descriptor)).map_err(Error::Patch)
    }

    pub fn ensure_unique_names(&self) -> Result<()> {
        let duplicates = self
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .duplicates()
            .collect::<Vec<_>>();
        if duplicates.is_empty() {
            return Ok(());
        }
        Err(Error::schema(format!(
            "Schemas with duplicate field names are not supported: {}",
            duplicates.join(", ")
        )))
    }

    /// Reads one row of raw cells; missing trailing cells read as absent.
    pub fn read_cells(&self, row: &[Cell]) -> Vec<Result<Option<Value>, CellError>> {
        self.fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let cell = row.get(idx).unwrap_or(&NULL_CELL);
                field.read_cell(cell, &self.missing_values)
            })
            .collect()
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let schema: Schema = serde_json::from_str(raw)?;
        schema.ensure_unique_names()?;
        Ok(schema)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let schema: Schema = serde_yaml::from_str(raw)?;
        schema.ensure_unique_names()?;
        Ok(schema)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Loads a descriptor; `.yml`/`.yaml` files are YAML, anything else JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if is_yaml_path(path) {
            Schema::from_yaml_str(&raw)
        } else {
            Schema::from_json_str(&raw)
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let rendered = if is_yaml_path(path) {
            self.to_yaml_string()?
        } else {
            self.to_json_string()?
        };
        fs::write(path, rendered).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
