//! CSV input tables.

use crate::error_handling::InputError;

use super::Columns;

/// Reads the cells of `columns` from CSV text with a header row.
pub(super) fn read_columns(text: &str, columns: &[String]) -> Result<Columns, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let indices = columns
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| InputError::MissingColumn(column.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut cells: Columns = vec![Vec::new(); columns.len()];
    for record in reader.records() {
        let record = record?;
        for (values, &index) in cells.iter_mut().zip(&indices) {
            values.push(record.get(index).map(str::to_string));
        }
    }
    Ok(cells)
}
