//! Field listing from a schema file.
//!
//! Reads a schema (YAML or JSON) and renders its field names, types, and
//! formats as an ASCII table.

use anyhow::{Context, Result};
use log::info;

use crate::{cli::FieldsArgs, schema::Schema, table};

pub fn execute(args: &FieldsArgs) -> Result<()> {
    let schema = Schema::load(&args.schema)
        .with_context(|| format!("Loading schema from {schema:?}", schema = args.schema))?;

    if schema.fields.is_empty() {
        info!("Schema {:?} does not define any fields", args.schema);
        return Ok(());
    }

    print!("{}", table::render_fields(&schema));
    info!(
        "Listed {} field(s) from {:?}",
        schema.fields.len(),
        args.schema
    );
    Ok(())
}
