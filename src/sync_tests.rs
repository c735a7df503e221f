//! Unit tests for cross-sheet synchronization.

use super::*;
use crate::schema::AppColumns;

/// Small layout so test rows stay readable:
/// app = [sku, price, stock], stock = [code, total], price = [price, code]
fn small_schema() -> SyncSchema {
    SyncSchema {
        app: AppColumns {
            identifier: 0,
            price: 1,
            stock: 2,
            max_stock: 3,
        },
        stock: SheetColumns::new(0, 1),
        price: SheetColumns::new(1, 0),
    }
}

fn table(rows: &[&[&str]]) -> Table {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect();
    let width = rows.first().map(Vec::len).unwrap_or(0);
    let headers = (0..width).map(|i| format!("col{i}")).collect();
    Table::new(headers, rows)
}

mod lookup_tests {
    use super::*;

    #[test]
    fn trims_codes_and_values() {
        let sheet = table(&[&[" 100 ", " 12 "], &["200", "3"]]);
        let lookup = Lookup::build(&sheet, SheetColumns::new(0, 1), DuplicatePolicy::Overwrite);
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.get("100"), Some("12"));
        assert_eq!(lookup.get(" 100 "), None);
    }

    #[test]
    fn later_duplicate_overwrites_earlier() {
        let sheet = table(&[&["100", "1"], &["200", "2"], &["100", "3"]]);
        let lookup = Lookup::build(&sheet, SheetColumns::new(0, 1), DuplicatePolicy::Overwrite);
        assert_eq!(lookup.get("100"), Some("3"));
        assert_eq!(lookup.duplicates(), 1);
        assert_eq!(lookup.len(), 2);
    }

    #[test]
    fn skips_rows_missing_either_position() {
        let sheet = table(&[&["9.5", "100"], &["7"], &["", "300"]]);
        let lookup = Lookup::build(&sheet, SheetColumns::new(1, 0), DuplicatePolicy::Overwrite);
        assert_eq!(lookup.get("100"), Some("9.5"));
        assert_eq!(lookup.get("300"), Some(""));
        assert_eq!(lookup.skipped_rows(), 1);
        assert_eq!(lookup.len(), 2);
    }
}

mod sync_app_sheet_tests {
    use super::*;

    #[test]
    fn writes_matched_price_and_stock() {
        let mut app = table(&[&["100", "old", "0"], &[" 200 ", "5", "1"]]);
        let stock = table(&[&["100", "10"], &["200", "20"]]);
        let price = table(&[&["4.50", "100"], &["7.25", "200"]]);

        let report = synchronize(&mut app, &stock, &price, &small_schema());

        assert_eq!(app.rows()[0], vec!["100", "4.50", "10"]);
        assert_eq!(app.rows()[1], vec![" 200 ", "7.25", "20"]);
        assert_eq!(report.price_matches, 2);
        assert_eq!(report.stock_matches, 2);
        assert_eq!(report.cells_changed, 4);
    }

    #[test]
    fn unmatched_rows_keep_values() {
        let mut app = table(&[&["999", " 3,50 ", "n/a"]]);
        let before = app.clone();
        let stock = table(&[&["100", "10"]]);
        let price = table(&[&["4.50", "100"]]);

        let report = synchronize(&mut app, &stock, &price, &small_schema());

        assert_eq!(app, before);
        assert_eq!(report.price_matches + report.stock_matches, 0);
    }

    #[test]
    fn lookups_are_independent() {
        let mut app = table(&[&["100", "p", "s"], &["200", "p", "s"]]);
        let stock = table(&[&["100", "10"]]);
        let price = table(&[&["2.00", "200"]]);

        synchronize(&mut app, &stock, &price, &small_schema());

        assert_eq!(app.rows()[0], vec!["100", "p", "10"]);
        assert_eq!(app.rows()[1], vec!["200", "2.00", "s"]);
    }

    #[test]
    fn every_row_with_the_code_is_updated() {
        let mut app = table(&[&["X", "", ""], &["Y", "", ""], &["X ", "", ""]]);
        let stock = table(&[&["X", "10"]]);
        let price = table(&[&["1", "Z"]]);

        synchronize(&mut app, &stock, &price, &small_schema());

        assert_eq!(app.rows()[0][2], "10");
        assert_eq!(app.rows()[1][2], "");
        assert_eq!(app.rows()[2][2], "10");
    }

    #[test]
    fn short_rows_pass_through() {
        let mut app = table(&[&["100", "p", "s"]]);
        app.push_row(vec!["100".to_string(), "p".to_string()]);
        let stock = table(&[&["100", "10"]]);
        let price = table(&[&["4", "100"]]);

        let report = synchronize(&mut app, &stock, &price, &small_schema());

        assert_eq!(app.rows()[1], vec!["100", "p"]);
        assert_eq!(report.rows_too_short, 1);
        assert_eq!(report.rows_scanned, 2);
    }

    #[test]
    fn preserves_row_count_order_and_header() {
        let mut app = table(&[&["3", "", ""], &["1", "", ""], &["2", "", ""]]);
        let headers = app.headers().to_vec();
        let stock = table(&[&["1", "a"], &["2", "b"], &["4", "c"]]);
        let price = table(&[&["x", "3"]]);

        synchronize(&mut app, &stock, &price, &small_schema());

        assert_eq!(app.headers(), headers.as_slice());
        let codes: Vec<&str> = app.rows().iter().map(|r| r[0].as_str()).collect();
        assert_eq!(codes, vec!["3", "1", "2"]);
    }

    #[test]
    fn unchanged_values_are_not_counted() {
        let mut app = table(&[&["100", "4.50", "10"]]);
        let stock = table(&[&["100", "10"]]);
        let price = table(&[&["4.50", "100"]]);

        let report = synchronize(&mut app, &stock, &price, &small_schema());

        assert_eq!(report.stock_matches, 1);
        assert_eq!(report.cells_changed, 0);
    }

    #[test]
    fn default_schema_uses_pharmacy_positions() {
        let mut app_row = vec![String::new(); 28];
        app_row[8] = "555".to_string();
        let mut app = Table::new(vec!["h".to_string(); 28], vec![app_row]);

        let mut stock_row = vec![String::new(); 22];
        stock_row[0] = "555".to_string();
        stock_row[21] = "42".to_string();
        let stock = Table::new(vec!["h".to_string(); 22], vec![stock_row]);

        let mut price_row = vec![String::new(); 15];
        price_row[14] = "555".to_string();
        price_row[8] = "19.99".to_string();
        let price = Table::new(vec!["h".to_string(); 15], vec![price_row]);

        synchronize(&mut app, &stock, &price, &SyncSchema::default());

        assert_eq!(app.rows()[0][9], "19.99");
        assert_eq!(app.rows()[0][27], "42");
    }
}
