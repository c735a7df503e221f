//! Identifier-aware sorting and filtering of product sheets.
//!
//! Rows are ordered the way spreadsheet applications sort "numbers where
//! possible": numeric values ascending, non-numeric values after them, ties
//! broken by the raw text. After sorting, rows whose identifier does not look
//! like a single product code are dropped.

use std::cmp::Ordering;

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;

use crate::cell::{compare_numeric_nulls_last, CellValue};
use crate::error::Result;
use crate::table::Table;

lazy_static! {
    static ref DIGIT_RUN: Regex = Regex::new(r"\d+").expect("digit run pattern is valid");
}

/// Maximum number of digits a valid identifier may contain
pub const DEFAULT_MAX_DIGITS: usize = 6;

/// Why an identifier was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Two or more separate digit runs, e.g. `12-34`
    MultipleNumbers,
    /// More digits in total than allowed
    TooManyDigits,
}

/// Structural validity rules for identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierRules {
    pub max_digits: usize,
}

impl Default for IdentifierRules {
    fn default() -> Self {
        Self {
            max_digits: DEFAULT_MAX_DIGITS,
        }
    }
}

impl IdentifierRules {
    /// Checks an identifier against the rules in their fixed order.
    ///
    /// Empty identifiers and identifiers without digits are always valid.
    pub fn check(&self, identifier: &str) -> Option<Rejection> {
        let runs: Vec<&str> = DIGIT_RUN.find_iter(identifier).map(|m| m.as_str()).collect();

        if runs.len() >= 2 {
            return Some(Rejection::MultipleNumbers);
        }

        let digit_count: usize = runs.iter().map(|run| run.chars().count()).sum();
        if digit_count > self.max_digits {
            return Some(Rejection::TooManyDigits);
        }

        None
    }
}

/// Counts from a sort/filter run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortReport {
    pub rows_in: usize,
    pub multiple_numbers: usize,
    pub too_many_digits: usize,
}

impl SortReport {
    pub fn rows_dropped(&self) -> usize {
        self.multiple_numbers + self.too_many_digits
    }

    pub fn rows_out(&self) -> usize {
        self.rows_in - self.rows_dropped()
    }
}

struct SortKey<'a> {
    number: Option<f64>,
    raw: Option<&'a str>,
}

impl<'a> SortKey<'a> {
    fn of(row: &'a [String], column: usize) -> Self {
        let raw = row.get(column).map(String::as_str);
        let number = raw.and_then(|cell| CellValue::parse(cell).as_number());
        Self { number, raw }
    }

    fn compare(&self, other: &Self) -> Ordering {
        compare_numeric_nulls_last(self.number, other.number).then_with(|| {
            match (self.raw, other.raw) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        })
    }
}

/// Sorts data rows by `column` using the numeric-first order.
///
/// Returns the permuted table; cells are not modified.
pub fn sort_by_column(table: &Table, column: &str) -> Result<Table> {
    let index = table.require_column(column)?;

    let mut keyed: Vec<(SortKey<'_>, &Vec<String>)> = table
        .rows()
        .iter()
        .map(|row| (SortKey::of(row, index), row))
        .collect();

    // sort_by is stable: rows with equal keys keep their input order.
    keyed.sort_by(|a, b| a.0.compare(&b.0));

    let rows = keyed.into_iter().map(|(_, row)| row.clone()).collect();
    Ok(Table::new(table.headers().to_vec(), rows))
}

/// Drops rows whose identifier in `column` fails `rules`, keeping order.
pub fn filter_identifiers(
    table: &Table,
    column: &str,
    rules: &IdentifierRules,
) -> Result<(Table, SortReport)> {
    let index = table.require_column(column)?;
    let mut report = SortReport {
        rows_in: table.len(),
        ..SortReport::default()
    };

    let mut rows = Vec::with_capacity(table.len());
    for (row_num, row) in table.rows().iter().enumerate() {
        let identifier = row.get(index).map(String::as_str).unwrap_or("");
        match rules.check(identifier) {
            Some(Rejection::MultipleNumbers) => {
                debug!("Row {row_num}: dropping '{identifier}' (multiple numbers)");
                report.multiple_numbers += 1;
            }
            Some(Rejection::TooManyDigits) => {
                debug!("Row {row_num}: dropping '{identifier}' (too many digits)");
                report.too_many_digits += 1;
            }
            None => rows.push(row.clone()),
        }
    }

    Ok((Table::new(table.headers().to_vec(), rows), report))
}

/// Sorts by `column`, then filters out invalid identifiers.
///
/// Fails with [`crate::SyncError::ColumnNotFound`] when the column is missing.
/// Running this on its own output returns an identical table.
pub fn sort_and_filter(
    table: &Table,
    column: &str,
    rules: &IdentifierRules,
) -> Result<(Table, SortReport)> {
    let sorted = sort_by_column(table, column)?;
    let (filtered, report) = filter_identifiers(&sorted, column, rules)?;

    info!(
        "Sorted {} rows by '{}', removed {} with multiple numbers and {} with more than {} digits",
        report.rows_in, column, report.multiple_numbers, report.too_many_digits, rules.max_digits
    );

    Ok((filtered, report))
}

#[cfg(test)]
#[path = "sorter_tests.rs"]
mod tests;
