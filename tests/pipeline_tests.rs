use pharmacy_sync::operations::{cap_max_stock_for_marker, replace_missing_values};
use pharmacy_sync::{
    sort_and_filter, synchronize, AppColumns, IdentifierRules, SheetColumns, SyncError,
    SyncSchema, Table,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// Test fixtures - small sheets using a compact column layout:
// app = name,sku,price,stock,max ; stock = code,description,total ; price = price,name,code

fn test_schema() -> SyncSchema {
    SyncSchema {
        app: AppColumns {
            identifier: 1,
            price: 2,
            stock: 3,
            max_stock: 4,
        },
        stock: SheetColumns::new(0, 2),
        price: SheetColumns::new(2, 0),
    }
}

fn app_csv() -> &'static str {
    "name,sku,price,stock,max
Panadol Extra,102,5.00,3,10
\"Vitamin C, 1000mg\",9,12.50,0,10
Offer bundle,12-34,20.00,1,10
Zinc,AB7,3.00,4,10
Gauze roll,1234567,1.00,9,10
Home visit,,50.00,0,10
Bandage,10,2.00,6,10"
}

fn stock_csv() -> &'static str {
    "code,description,total
9,Vitamin C,40
102,Panadol,15
102,Panadol (recount),17
AB7#S#R,Zinc pack,2
short-row"
}

fn price_csv() -> &'static str {
    "price,name,code
13.75,Vitamin C,9
2.25,Bandage, 10
4.00,Zinc,AB7"
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn column(table: &Table, index: usize) -> Vec<String> {
    table
        .rows()
        .iter()
        .map(|row| row.get(index).cloned().unwrap_or_default())
        .collect()
}

fn load(path: &Path) -> Table {
    Table::read_csv(path).unwrap()
}

#[test]
fn test_sort_filter_round_trip_through_files() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "app.csv", app_csv());
    let output = dir.path().join("sorted.csv");

    let table = load(&input);
    let (sorted, report) = sort_and_filter(&table, "sku", &IdentifierRules::default()).unwrap();
    sorted.write_csv(&output).unwrap();

    let reloaded = load(&output);
    assert_eq!(reloaded, sorted);
    assert_eq!(column(&reloaded, 1), vec!["9", "10", "102", "", "AB7"]);
    assert_eq!(report.multiple_numbers, 1);
    assert_eq!(report.too_many_digits, 1);
    assert_eq!(reloaded.rows()[0][0], "Vitamin C, 1000mg");
}

#[test]
fn test_sort_missing_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "app.csv", app_csv());

    let result = sort_and_filter(&load(&input), "SKU", &IdentifierRules::default());
    match result {
        Err(SyncError::ColumnNotFound { column, available }) => {
            assert_eq!(column, "SKU");
            assert!(available.contains(&"sku".to_string()));
        }
        other => panic!("expected ColumnNotFound, got {other:?}"),
    }
}

#[test]
fn test_sync_updates_matches_and_keeps_misses() {
    let dir = TempDir::new().unwrap();
    let mut app = load(&write_file(&dir, "app.csv", app_csv()));
    let stock = load(&write_file(&dir, "stock.csv", stock_csv()));
    let price = load(&write_file(&dir, "price.csv", price_csv()));
    let original = app.clone();

    let report = synchronize(&mut app, &stock, &price, &test_schema());

    assert_eq!(app.len(), original.len());
    assert_eq!(column(&app, 1), column(&original, 1));

    // Panadol: stock only, last duplicate wins
    assert_eq!(app.rows()[0][2], "5.00");
    assert_eq!(app.rows()[0][3], "17");
    // Vitamin C: both sheets
    assert_eq!(app.rows()[1][2], "13.75");
    assert_eq!(app.rows()[1][3], "40");
    // Bandage: price code padded with spaces in the price sheet
    assert_eq!(app.rows()[6][2], "2.25");
    assert_eq!(app.rows()[6][3], "6");
    // Zinc: code in stock sheet carries a marker, so only the price matches
    assert_eq!(app.rows()[3][2], "4.00");
    assert_eq!(app.rows()[3][3], "4");
    // No matches at all
    assert_eq!(app.rows()[2], original.rows()[2]);
    assert_eq!(app.rows()[4], original.rows()[4]);
    assert_eq!(app.rows()[5], original.rows()[5]);

    assert_eq!(report.price_matches, 3);
    assert_eq!(report.stock_matches, 2);
}

#[test]
fn test_full_pipeline_sort_then_sync() {
    let dir = TempDir::new().unwrap();
    let app = load(&write_file(&dir, "app.csv", app_csv()));
    let stock = load(&write_file(&dir, "stock.csv", stock_csv()));
    let price = load(&write_file(&dir, "price.csv", price_csv()));

    let (mut sorted, _) = sort_and_filter(&app, "sku", &IdentifierRules::default()).unwrap();
    synchronize(&mut sorted, &stock, &price, &test_schema());
    cap_max_stock_for_marker(&mut sorted, &stock, &test_schema(), "#S#R", "1");
    replace_missing_values(&mut sorted, "0");

    let output = dir.path().join("out.csv");
    sorted.write_csv(&output).unwrap();
    let written = fs::read_to_string(&output).unwrap();

    assert_eq!(
        written,
        "name,sku,price,stock,max
\"Vitamin C, 1000mg\",9,13.75,40,10
Bandage,10,2.25,6,10
Panadol Extra,102,5.00,17,10
Home visit,0,50.00,0,10
Zinc,AB7,4.00,4,10
"
    );
}

#[test]
fn test_read_missing_file_is_io_error() {
    let result = Table::read_csv("/this/file/does/not/exist.csv");
    assert!(matches!(result, Err(SyncError::Io { .. })));
}

#[test]
fn test_read_empty_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "empty.csv", "");
    assert!(matches!(
        Table::read_csv(&path),
        Err(SyncError::EmptyTable { .. })
    ));
}

#[test]
fn test_schema_file_drives_sync() {
    let dir = TempDir::new().unwrap();
    let schema_path = write_file(
        &dir,
        "schema.json",
        r#"{
            "app": { "identifier": 1, "price": 2, "stock": 3, "max_stock": 4 },
            "stock": { "identifier": 0, "value": 2 },
            "price": { "identifier": 2, "value": 0 }
        }"#,
    );
    let schema = SyncSchema::load(&schema_path).unwrap();
    assert_eq!(schema, test_schema());
}
