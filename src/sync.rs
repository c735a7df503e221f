//! Cross-sheet synchronization of the app sheet.
//!
//! Stock totals and prices are looked up from the stock and price sheets by
//! product code and written into the app sheet, VLOOKUP style. Rows without a
//! match keep their current values.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::schema::{SheetColumns, SyncSchema};
use crate::table::Table;

/// How repeated identifiers in a reference sheet are resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The later row's value replaces the earlier one
    #[default]
    Overwrite,
}

/// Trimmed identifier -> trimmed value, built from one reference sheet
#[derive(Debug, Clone, Default)]
pub struct Lookup {
    entries: HashMap<String, String>,
    duplicates: usize,
    skipped_rows: usize,
}

impl Lookup {
    /// Projects `columns` out of every data row long enough to contain both
    /// positions. Shorter rows are skipped.
    pub fn build(sheet: &Table, columns: SheetColumns, policy: DuplicatePolicy) -> Self {
        let mut lookup = Lookup::default();
        let min_len = columns.min_row_len();

        for row in sheet.rows() {
            if row.len() < min_len {
                lookup.skipped_rows += 1;
                continue;
            }
            let code = row[columns.identifier].trim().to_string();
            let value = row[columns.value].trim().to_string();

            match policy {
                DuplicatePolicy::Overwrite => {
                    if let Some(previous) = lookup.entries.insert(code, value) {
                        lookup.duplicates += 1;
                        debug!("Duplicate code overwrote value '{previous}'");
                    }
                }
            }
        }

        lookup
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rows whose code was already present
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Number of rows too short to contain both positions
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}

/// Counts from a synchronization run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub rows_scanned: usize,
    pub rows_too_short: usize,
    pub stock_matches: usize,
    pub price_matches: usize,
    /// Cells whose content actually changed
    pub cells_changed: usize,
}

fn write_cell(cell: &mut String, value: &str) -> bool {
    if cell.as_str() == value {
        return false;
    }
    cell.clear();
    cell.push_str(value);
    true
}

/// Rewrites the stock and price columns of `app` in place.
///
/// Row count and order are never changed and the header is not touched.
pub fn sync_app_sheet(
    app: &mut Table,
    stock_lookup: &Lookup,
    price_lookup: &Lookup,
    schema: &SyncSchema,
) -> SyncReport {
    let columns = schema.app;
    let min_len = columns.min_row_len();
    let mut report = SyncReport::default();

    for row in app.rows_mut().iter_mut() {
        report.rows_scanned += 1;
        if row.len() < min_len {
            report.rows_too_short += 1;
            continue;
        }

        let code = row[columns.identifier].trim().to_string();

        if let Some(price) = price_lookup.get(&code) {
            report.price_matches += 1;
            if write_cell(&mut row[columns.price], price) {
                report.cells_changed += 1;
            }
        }

        if let Some(stock) = stock_lookup.get(&code) {
            report.stock_matches += 1;
            if write_cell(&mut row[columns.stock], stock) {
                report.cells_changed += 1;
            }
        }
    }

    report
}

/// Builds both lookups and synchronizes `app` against them.
pub fn synchronize(
    app: &mut Table,
    stock_sheet: &Table,
    price_sheet: &Table,
    schema: &SyncSchema,
) -> SyncReport {
    let stock_lookup = Lookup::build(stock_sheet, schema.stock, DuplicatePolicy::Overwrite);
    let price_lookup = Lookup::build(price_sheet, schema.price, DuplicatePolicy::Overwrite);

    info!(
        "Built lookups: {} stock codes ({} duplicates), {} price codes ({} duplicates)",
        stock_lookup.len(),
        stock_lookup.duplicates(),
        price_lookup.len(),
        price_lookup.duplicates()
    );
    if stock_lookup.skipped_rows() > 0 || price_lookup.skipped_rows() > 0 {
        warn!(
            "Skipped short reference rows: {} in stock sheet, {} in price sheet",
            stock_lookup.skipped_rows(),
            price_lookup.skipped_rows()
        );
    }

    let report = sync_app_sheet(app, &stock_lookup, &price_lookup, schema);

    info!(
        "App sheet synchronized: {} rows, {} price matches, {} stock matches, {} cells changed",
        report.rows_scanned, report.price_matches, report.stock_matches, report.cells_changed
    );
    if report.rows_too_short > 0 {
        warn!("{} app rows too short to synchronize", report.rows_too_short);
    }

    report
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
