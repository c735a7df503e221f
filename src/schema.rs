//! Column-position schema for the three sheets.
//!
//! The sheets come from external spreadsheets whose layout is not under our
//! control, so the join columns are addressed by position rather than by
//! header name. The defaults describe the pharmacy deployment and can be
//! replaced with a JSON file.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Identifier and value positions of a reference sheet (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetColumns {
    pub identifier: usize,
    pub value: usize,
}

impl SheetColumns {
    pub const fn new(identifier: usize, value: usize) -> Self {
        Self { identifier, value }
    }

    /// Smallest row length that contains both positions
    pub fn min_row_len(&self) -> usize {
        self.identifier.max(self.value) + 1
    }
}

/// Positions in the app sheet (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppColumns {
    pub identifier: usize,
    pub price: usize,
    pub stock: usize,
    /// Max-stock column, only used by the marker capping operation
    #[serde(default = "default_max_stock_column")]
    pub max_stock: usize,
}

fn default_max_stock_column() -> usize {
    25
}

impl AppColumns {
    /// Smallest row length that contains the identifier and both write columns
    pub fn min_row_len(&self) -> usize {
        self.identifier.max(self.price).max(self.stock) + 1
    }
}

/// Complete positional layout used by the synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSchema {
    pub app: AppColumns,
    pub stock: SheetColumns,
    pub price: SheetColumns,
}

impl Default for SyncSchema {
    fn default() -> Self {
        Self {
            app: AppColumns {
                identifier: 8,
                price: 9,
                stock: 27,
                max_stock: default_max_stock_column(),
            },
            stock: SheetColumns::new(0, 21),
            // Price sheet keeps its code in column 14, not 0.
            price: SheetColumns::new(14, 8),
        }
    }
}

impl SyncSchema {
    /// Loads a schema from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
        let schema: SyncSchema = serde_json::from_str(&content)?;
        info!("Loaded sync schema from {}: {:?}", path.display(), schema);
        Ok(schema)
    }

    /// Loads `path` if given, otherwise returns the default layout
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
