//! Catalog maintenance operations.
//!
//! Small in-place edits used while preparing the sheets: product lookups and
//! edits, price-sheet cleanup after export, and bulk fixes on the app sheet.
//! Every mutating operation returns how many rows or cells it touched.

use std::collections::HashSet;

use log::{debug, info};

use crate::schema::{AppColumns, SheetColumns, SyncSchema};
use crate::table::Table;

/// Cell values treated as "no data" by [`replace_missing_values`]
const MISSING_MARKERS: [&str; 6] = ["nan", "n/a", "na", "null", "undefined", ""];

/// A reference-sheet row found by product code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductMatch<'a> {
    /// Data row index (header excluded)
    pub row_index: usize,
    pub row: &'a [String],
    pub value: &'a str,
}

/// An app-sheet row found by product code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppMatch<'a> {
    pub row_index: usize,
    pub row: &'a [String],
    pub price: &'a str,
    pub stock: &'a str,
}

fn find_row(sheet: &Table, identifier: usize, code: &str) -> Option<usize> {
    let code = code.trim();
    sheet
        .rows()
        .iter()
        .position(|row| row.get(identifier).is_some_and(|cell| cell.trim() == code))
}

/// Finds the first row of a stock or price sheet whose code matches.
///
/// Returns `None` when no row matches or the matching row has no value cell.
pub fn search_product<'a>(
    sheet: &'a Table,
    columns: SheetColumns,
    code: &str,
) -> Option<ProductMatch<'a>> {
    let row_index = find_row(sheet, columns.identifier, code)?;
    let row = &sheet.rows()[row_index];
    let value = row.get(columns.value)?;
    Some(ProductMatch {
        row_index,
        row,
        value,
    })
}

/// Finds the first app-sheet row whose SKU matches.
pub fn search_app<'a>(app: &'a Table, columns: AppColumns, code: &str) -> Option<AppMatch<'a>> {
    let row_index = find_row(app, columns.identifier, code)?;
    let row = &app.rows()[row_index];
    Some(AppMatch {
        row_index,
        row,
        price: row.get(columns.price)?,
        stock: row.get(columns.stock)?,
    })
}

/// Overwrites the value column of the first row whose code matches.
///
/// Returns `false` if no row matches or the row is too short.
pub fn update_value(sheet: &mut Table, columns: SheetColumns, code: &str, new_value: &str) -> bool {
    let Some(row_index) = find_row(sheet, columns.identifier, code) else {
        debug!("No row with code '{code}'");
        return false;
    };
    match sheet.rows_mut()[row_index].get_mut(columns.value) {
        Some(cell) => {
            info!("Row {row_index}: '{code}' value '{cell}' -> '{new_value}'");
            *cell = new_value.to_string();
            true
        }
        None => false,
    }
}

/// Appends a product row.
pub fn add_product(sheet: &mut Table, row: Vec<String>) {
    debug!("Adding product row: {row:?}");
    sheet.push_row(row);
}

/// Removes the first `n` records of the sheet, header included, and promotes
/// the next record to be the header.
///
/// Exported price sheets start with a banner block above the real header.
/// Returns the number of records removed.
pub fn drop_leading_rows(table: &mut Table, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let total = table.len() + 1;
    let removed = n.min(total);

    let rows = table.rows_mut();
    let mut remaining: Vec<Vec<String>> = rows.drain(..).skip(removed - 1).collect();
    let header = if remaining.is_empty() {
        Vec::new()
    } else {
        remaining.remove(0)
    };

    *table.headers_mut() = header;
    *table.rows_mut() = remaining;
    removed
}

/// Splits merged `"a|b"` cells of column `left` into `left` and `right`.
///
/// Data rows only. Returns the number of rows split.
pub fn unmerge_columns(table: &mut Table, left: usize, right: usize, delimiter: char) -> usize {
    let min_len = left.max(right) + 1;
    let mut split = 0;

    for row in table.rows_mut().iter_mut().filter(|row| row.len() >= min_len) {
        let Some((first, second)) = row[left].split_once(delimiter) else {
            continue;
        };
        let (first, second) = (first.to_string(), second.to_string());
        row[left] = first;
        row[right] = second;
        split += 1;
    }

    split
}

/// Copies column `from` over column `to` in every data row long enough for both.
pub fn copy_column(table: &mut Table, from: usize, to: usize) -> usize {
    let min_len = from.max(to) + 1;
    let mut copied = 0;

    for row in table.rows_mut().iter_mut().filter(|row| row.len() >= min_len) {
        row[to] = row[from].clone();
        copied += 1;
    }

    copied
}

/// Deletes column `index` from the header and every row that has it.
///
/// Returns the number of data rows changed.
pub fn delete_column(table: &mut Table, index: usize) -> usize {
    if table.headers().len() > index {
        table.headers_mut().remove(index);
    }

    let mut changed = 0;
    for row in table.rows_mut().iter_mut().filter(|row| row.len() > index) {
        row.remove(index);
        changed += 1;
    }
    changed
}

/// Deletes the first `n` columns. Rows with `n` cells or fewer become empty.
pub fn delete_leading_columns(table: &mut Table, n: usize) -> usize {
    fn drop_front(cells: &mut Vec<String>, n: usize) {
        let end = n.min(cells.len());
        cells.drain(..end);
    }

    drop_front(table.headers_mut(), n);
    let mut changed = 0;
    for row in table.rows_mut().iter_mut().filter(|row| !row.is_empty()) {
        drop_front(row, n);
        changed += 1;
    }
    changed
}

/// Sets the stock column of every app row that mentions `needle` in any cell
/// (case-insensitive).
pub fn set_stock_for_matching(app: &mut Table, columns: AppColumns, needle: &str, value: &str) -> usize {
    let needle = needle.to_lowercase();
    let mut updated = 0;

    for row in app.rows_mut().iter_mut().filter(|row| row.len() > columns.stock) {
        if row.iter().any(|cell| cell.to_lowercase().contains(&needle)) {
            row[columns.stock] = value.to_string();
            updated += 1;
        }
    }

    info!("Set stock to {value} for {updated} rows mentioning '{needle}'");
    updated
}

/// Replaces placeholder cells (`nan`, `n/a`, `null`, empty, ...) in data rows.
pub fn replace_missing_values(table: &mut Table, replacement: &str) -> usize {
    let mut replaced = 0;

    for cell in table.rows_mut().iter_mut().flat_map(|row| row.iter_mut()) {
        let lower = cell.trim().to_lowercase();
        if MISSING_MARKERS.contains(&lower.as_str()) {
            *cell = replacement.to_string();
            replaced += 1;
        }
    }

    info!("Replaced {replaced} missing values with '{replacement}'");
    replaced
}

/// For every stock-sheet code containing `marker`, sets the app sheet's
/// max-stock column to `value` on rows with that SKU.
pub fn cap_max_stock_for_marker(
    app: &mut Table,
    stock_sheet: &Table,
    schema: &SyncSchema,
    marker: &str,
    value: &str,
) -> usize {
    let marked: HashSet<String> = stock_sheet
        .rows()
        .iter()
        .filter_map(|row| row.get(schema.stock.identifier))
        .filter(|code| code.contains(marker))
        .map(|code| code.trim().to_string())
        .collect();

    let columns = schema.app;
    let min_len = columns.identifier.max(columns.max_stock) + 1;
    let mut updated = 0;

    for row in app.rows_mut().iter_mut().filter(|row| row.len() >= min_len) {
        if marked.contains(row[columns.identifier].trim()) {
            row[columns.max_stock] = value.to_string();
            updated += 1;
        }
    }

    info!(
        "Set max stock to {value} for {updated} app rows ({} codes marked '{marker}')",
        marked.len()
    );
    updated
}

/// Pads short rows with empty cells and truncates long rows to the header width.
pub fn normalize_rows(table: &mut Table) -> usize {
    let width = table.headers().len();
    let mut changed = 0;

    for row in table.rows_mut().iter_mut().filter(|row| row.len() != width) {
        row.resize(width, String::new());
        changed += 1;
    }

    changed
}

#[cfg(test)]
#[path = "operations_tests.rs"]
mod tests;
