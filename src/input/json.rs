//! JSON input tables: an array of objects keyed by column.

use serde_json::Value;

use crate::error_handling::InputError;

use super::Columns;

/// Reads the cells of `columns` from a JSON array of objects.
///
/// A column must be a key of at least one object. Null and missing values are
/// empty cells; other non-string values are skipped with a warning.
pub(super) fn read_columns(text: &str, columns: &[String]) -> Result<Columns, InputError> {
    let value: Value = serde_json::from_str(text)?;
    let rows = match value {
        Value::Array(rows) => rows,
        _ => return Err(InputError::NotAnArray),
    };
    let objects = rows
        .iter()
        .map(|row| row.as_object().ok_or(InputError::NotAnArray))
        .collect::<Result<Vec<_>, _>>()?;

    for column in columns {
        if !objects.iter().any(|object| object.contains_key(column)) {
            return Err(InputError::MissingColumn(column.clone()));
        }
    }

    Ok(columns
        .iter()
        .map(|column| {
            objects
                .iter()
                .map(|object| match object.get(column) {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => {
                        log::warn!("Skipping non-string value in column '{column}': {other}");
                        None
                    }
                })
                .collect()
        })
        .collect())
}
