//! Pharmacy Sync - command line entry point
//!
//! Each subcommand loads its sheets from CSV, runs one operation and writes
//! the full result back out.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pharmacy_sync::changelog::DEFAULT_CHANGELOG;
use pharmacy_sync::operations;
use pharmacy_sync::sorter::DEFAULT_MAX_DIGITS;
use pharmacy_sync::{sort_and_filter, synchronize, ChangeLog, IdentifierRules, SyncSchema, Table};

/// Pharmacy product catalog sync - sorts, cleans and reconciles CSV sheets
#[derive(Parser, Debug)]
#[command(name = "pharmacy_sync")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file with the column positions of the three sheets
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// File that records every change made to the sheets
    #[arg(long, global = true, default_value = DEFAULT_CHANGELOG)]
    changelog: PathBuf,

    /// Do not write the change log
    #[arg(long, global = true, default_value_t = false)]
    no_changelog: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sort a sheet by a column (numbers first) and drop invalid SKUs
    Sort {
        input: PathBuf,
        output: PathBuf,
        /// Header name of the column to sort by
        column: String,
        /// SKUs with more digits than this are removed
        #[arg(long, default_value_t = DEFAULT_MAX_DIGITS)]
        max_digits: usize,
    },
    /// Copy prices and stock totals into the app sheet
    Sync {
        app: PathBuf,
        stock: PathBuf,
        price: PathBuf,
        output: PathBuf,
    },
    /// Look up a product code in one sheet
    Search {
        #[arg(value_enum)]
        sheet: SheetKind,
        file: PathBuf,
        code: String,
    },
    /// Set the stock total of a product in the stock sheet (in place)
    UpdateStock {
        stock: PathBuf,
        code: String,
        value: i64,
    },
    /// Set the price of a product in the price sheet (in place)
    UpdatePrice {
        price: PathBuf,
        code: String,
        value: f64,
    },
    /// Append a product row to a sheet (in place)
    AddProduct {
        file: PathBuf,
        #[arg(required = true)]
        cells: Vec<String>,
    },
    /// Apply one cleanup step to an exported price sheet
    CleanPrice {
        price: PathBuf,
        output: PathBuf,
        #[command(subcommand)]
        step: CleanStep,
    },
    /// Replace nan/n/a/null/empty cells in a sheet
    FillMissing {
        input: PathBuf,
        output: PathBuf,
        #[arg(long = "with", default_value = "0")]
        replacement: String,
    },
    /// Set the stock of every app row mentioning some text
    SetStockMatching {
        app: PathBuf,
        output: PathBuf,
        #[arg(default_value = "home nursing services")]
        needle: String,
        #[arg(default_value = "9000000")]
        value: String,
    },
    /// Set max stock on app rows whose stock-sheet code carries a marker
    CapMarked {
        app: PathBuf,
        stock: PathBuf,
        output: PathBuf,
        #[arg(long, default_value = "#S#R")]
        marker: String,
        #[arg(long, default_value = "1")]
        value: String,
    },
    /// Pad or truncate every row to the header width
    Normalize { input: PathBuf, output: PathBuf },
}

#[derive(Subcommand, Debug)]
enum CleanStep {
    /// Delete the first records (header included)
    DropRows {
        #[arg(default_value_t = 10)]
        count: usize,
    },
    /// Split merged "a|b" cells into two columns
    Unmerge {
        #[arg(default_value_t = 8)]
        left: usize,
        #[arg(default_value_t = 9)]
        right: usize,
    },
    /// Copy one column over another
    CopyColumn {
        #[arg(default_value_t = 15)]
        from: usize,
        #[arg(default_value_t = 7)]
        to: usize,
    },
    /// Delete a single column
    DeleteColumn {
        #[arg(default_value_t = 9)]
        index: usize,
    },
    /// Delete the first columns
    DeleteLeading {
        #[arg(default_value_t = 6)]
        count: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SheetKind {
    Stock,
    Price,
    App,
}

fn main() {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let schema = SyncSchema::load_or_default(args.schema.as_deref())
        .context("Failed to load sync schema")?;
    let changelog = if args.no_changelog {
        ChangeLog::disabled()
    } else {
        ChangeLog::new(&args.changelog)
    };

    match args.command {
        Command::Sort {
            input,
            output,
            column,
            max_digits,
        } => {
            let table = load(&input)?;
            let rules = IdentifierRules { max_digits };
            let (sorted, report) = sort_and_filter(&table, &column, &rules)
                .with_context(|| format!("Cannot sort {}", input.display()))?;
            save(&sorted, &output)?;
            changelog.record(&format!(
                "Sorted {} by '{}': {} rows kept, {} removed",
                input.display(),
                column,
                report.rows_out(),
                report.rows_dropped()
            ));
        }
        Command::Sync {
            app,
            stock,
            price,
            output,
        } => {
            let mut app_sheet = load(&app)?;
            let stock_sheet = load(&stock)?;
            let price_sheet = load(&price)?;
            let report = synchronize(&mut app_sheet, &stock_sheet, &price_sheet, &schema);
            save(&app_sheet, &output)?;
            changelog.record(&format!(
                "App sheet synchronized from stock and price sheets - {} cells updated.",
                report.cells_changed
            ));
        }
        Command::Search { sheet, file, code } => {
            let table = load(&file)?;
            search(&table, sheet, &code, &schema);
        }
        Command::UpdateStock { stock, code, value } => {
            let mut table = load(&stock)?;
            let value = value.to_string();
            if !operations::update_value(&mut table, schema.stock, &code, &value) {
                bail!("Product '{code}' not found in stock sheet");
            }
            save(&table, &stock)?;
            changelog.record(&format!("Stock updated for code {code}: new stock = {value}"));
        }
        Command::UpdatePrice { price, code, value } => {
            let mut table = load(&price)?;
            let value = value.to_string();
            if !operations::update_value(&mut table, schema.price, &code, &value) {
                bail!("Product '{code}' not found in price sheet");
            }
            save(&table, &price)?;
            changelog.record(&format!("Price updated for code {code}: new price = {value}"));
        }
        Command::AddProduct { file, cells } => {
            let mut table = load(&file)?;
            let code = cells[0].clone();
            operations::add_product(&mut table, cells);
            save(&table, &file)?;
            changelog.record(&format!("Product added: code = {code}"));
        }
        Command::CleanPrice {
            price,
            output,
            step,
        } => {
            let mut table = load(&price)?;
            let message = match step {
                CleanStep::DropRows { count } => {
                    let removed = operations::drop_leading_rows(&mut table, count);
                    format!("Deleted first {removed} rows from price sheet (including header).")
                }
                CleanStep::Unmerge { left, right } => {
                    let split = operations::unmerge_columns(&mut table, left, right, '|');
                    format!("Unmerged columns {left} & {right} in price sheet ({split} rows).")
                }
                CleanStep::CopyColumn { from, to } => {
                    let copied = operations::copy_column(&mut table, from, to);
                    format!("Copied column {from} to column {to} in price sheet ({copied} rows).")
                }
                CleanStep::DeleteColumn { index } => {
                    operations::delete_column(&mut table, index);
                    format!("Deleted column {index} from price sheet.")
                }
                CleanStep::DeleteLeading { count } => {
                    operations::delete_leading_columns(&mut table, count);
                    format!("Deleted first {count} columns from price sheet.")
                }
            };
            save(&table, &output)?;
            log::info!("{message}");
            changelog.record(&message);
        }
        Command::FillMissing {
            input,
            output,
            replacement,
        } => {
            let mut table = load(&input)?;
            let replaced = operations::replace_missing_values(&mut table, &replacement);
            save(&table, &output)?;
            changelog.record(&format!(
                "Converted {replaced} nan/empty values to {replacement} in {}",
                input.display()
            ));
        }
        Command::SetStockMatching {
            app,
            output,
            needle,
            value,
        } => {
            let mut table = load(&app)?;
            let updated = operations::set_stock_for_matching(&mut table, schema.app, &needle, &value);
            save(&table, &output)?;
            changelog.record(&format!(
                "Set stock to {value} for {updated} '{needle}' rows in App Sheet."
            ));
        }
        Command::CapMarked {
            app,
            stock,
            output,
            marker,
            value,
        } => {
            let mut app_sheet = load(&app)?;
            let stock_sheet = load(&stock)?;
            let updated = operations::cap_max_stock_for_marker(
                &mut app_sheet,
                &stock_sheet,
                &schema,
                &marker,
                &value,
            );
            save(&app_sheet, &output)?;
            changelog.record(&format!(
                "Set max stock for {marker} products in App Sheet for {updated} rows."
            ));
        }
        Command::Normalize { input, output } => {
            let mut table = load(&input)?;
            let changed = operations::normalize_rows(&mut table);
            save(&table, &output)?;
            log::info!("Normalized {changed} rows to header width");
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<Table> {
    Table::read_csv(path).with_context(|| format!("Failed to load sheet {}", path.display()))
}

fn save(table: &Table, path: &Path) -> Result<()> {
    table
        .write_csv(path)
        .with_context(|| format!("Failed to save sheet {}", path.display()))
}

fn search(table: &Table, sheet: SheetKind, code: &str, schema: &SyncSchema) {
    println!("--- Search results for code: {code} ---");
    match sheet {
        SheetKind::Stock | SheetKind::Price => {
            let (columns, label, value_label) = match sheet {
                SheetKind::Stock => (schema.stock, "Stock Sheet", "Total"),
                _ => (schema.price, "Price Sheet", "Price"),
            };
            match operations::search_product(table, columns, code) {
                Some(found) => {
                    println!("{label}: Row {}", found.row_index + 1);
                    println!("{}", found.row.join(", "));
                    println!("{value_label} = {}", found.value);
                }
                None => println!("{label}: Not found"),
            }
        }
        SheetKind::App => match operations::search_app(table, schema.app, code) {
            Some(found) => {
                println!("App Sheet: Row {}", found.row_index + 1);
                println!("{}", found.row.join(", "));
                println!("Price = {}, Stock = {}", found.price, found.stock);
            }
            None => println!("App Sheet: Not found"),
        },
    }
}
