//! Text-table loader: an external-collaborator-facing convenience for
//! building a [`Table`] from a small tab-separated fixture format.
//!
//! Format (see spec's external-interfaces section):
//! line 1 = tab-separated column names, line 2 = tab-separated type names
//! (`int`, `long`, `float`, `double`, `string`), line 3 = the literal
//! separator `===`, and every subsequent non-empty line is a tab-separated
//! row of cell values. Strings are unquoted. This is peripheral glue, not
//! part of the core storage/scan model: parse errors are reported but the
//! loader does nothing the core itself couldn't do via `add_column`/`append`.

use std::fs;
use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;

use crate::error::{store_bail, store_ensure, StoreResult};
use crate::storage::Table;
use crate::types::{AnyValue, DataType};

const SEPARATOR_LINE: &str = "===";

/// Loads a table from a file at `path`, using `chunk_size` rows per chunk.
pub fn load_table(path: impl AsRef<Path>, chunk_size: usize) -> StoreResult<Arc<Table>> {
    let path = path.as_ref();
    let file =
        fs::File::open(path).map_err(|e| io_err(&format!("opening '{}'", path.display()), e))?;
    load_table_from_reader(io::BufReader::new(file), chunk_size)
}

/// Loads a table from an in-memory string, same format as [`load_table`].
/// Used by tests and anything that already has the fixture in memory.
pub fn load_table_from_str(text: &str, chunk_size: usize) -> StoreResult<Arc<Table>> {
    load_table_from_reader(text.as_bytes(), chunk_size)
}

fn load_table_from_reader(reader: impl BufRead, chunk_size: usize) -> StoreResult<Arc<Table>> {
    let mut lines = reader.lines();

    let names_line = next_line(&mut lines, "column names")?;
    let types_line = next_line(&mut lines, "type names")?;
    let separator_line = next_line(&mut lines, "separator")?;
    store_ensure!(
        separator_line == SEPARATOR_LINE,
        TypeMismatch: "expected separator line '{SEPARATOR_LINE}', got '{separator_line}'"
    );

    let names: Vec<&str> = names_line.split('\t').collect();
    let type_names: Vec<&str> = types_line.split('\t').collect();
    store_ensure!(
        names.len() == type_names.len(),
        ArityMismatch: "header has {} column names but {} type names", names.len(), type_names.len()
    );

    let table = Table::new(chunk_size);
    let mut types = Vec::with_capacity(type_names.len());
    for (name, type_name) in names.iter().zip(&type_names) {
        let dt = DataType::from_name(type_name)?;
        table.add_column(name, dt)?;
        types.push(dt);
    }

    let mut row_index = 0usize;
    for line in lines {
        let line = line.map_err(|e| io_err("reading row", e))?;
        if line.is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split('\t').collect();
        store_ensure!(
            cells.len() == types.len(),
            ArityMismatch: "row {row_index} has {} cells, table has {} columns", cells.len(), types.len()
        );
        let values: Vec<AnyValue<'_>> = cells
            .iter()
            .zip(&types)
            .map(|(cell, dt)| parse_cell(cell, *dt))
            .collect::<StoreResult<_>>()?;
        table.append(&values)?;
        log::trace!("loaded row {row_index}: {line}");
        row_index += 1;
    }

    Ok(table)
}

fn next_line(lines: &mut io::Lines<impl BufRead>, what: &str) -> StoreResult<String> {
    match lines.next() {
        Some(line) => line.map_err(|e| io_err(&format!("reading {what}"), e)),
        None => store_bail!(TypeMismatch: "missing {what} line"),
    }
}

fn io_err(context: &str, e: io::Error) -> crate::error::StoreError {
    crate::error::StoreError::TypeMismatch(format!("{context}: {e}"))
}

fn parse_cell(cell: &str, dt: DataType) -> StoreResult<AnyValue<'static>> {
    Ok(match dt {
        DataType::Int32 => AnyValue::Int32(parse_number(cell, "int")?),
        DataType::Int64 => AnyValue::Int64(parse_number(cell, "long")?),
        DataType::Float32 => AnyValue::Float32(parse_number(cell, "float")?),
        DataType::Float64 => AnyValue::Float64(parse_number(cell, "double")?),
        DataType::Str => AnyValue::Str(cell.to_string().into()),
    })
}

fn parse_number<T: std::str::FromStr>(cell: &str, type_name: &str) -> StoreResult<T> {
    cell.parse::<T>()
        .map_err(|_| crate::error::StoreError::TypeMismatch(format!("'{cell}' is not a valid {type_name}")))
}
