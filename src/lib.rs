//! Pharmacy Sync - product catalog reconciliation
//!
//! Sorts and cleans the app sheet by SKU and synchronizes its prices and stock
//! levels from the stock and price sheets. Sheets are exchanged as CSV.

pub mod cell;
pub mod changelog;
pub mod error;
pub mod operations;
pub mod schema;
pub mod sorter;
pub mod sync;
pub mod table;

pub use cell::CellValue;
pub use changelog::ChangeLog;
pub use error::{Result, SyncError};
pub use schema::{AppColumns, SheetColumns, SyncSchema};
pub use sorter::{sort_and_filter, IdentifierRules, Rejection, SortReport};
pub use sync::{synchronize, DuplicatePolicy, Lookup, SyncReport};
pub use table::Table;
