use super::*;

fn make_table(headers: Vec<&str>, data: Vec<Vec<&str>>) -> Table {
    Table::from_records(
        headers.into_iter().map(String::from).collect(),
        &data
            .into_iter()
            .map(|row| row.into_iter().map(String::from).collect())
            .collect::<Vec<_>>(),
    )
}

fn people() -> Table {
    make_table(
        vec!["name", "age", "city"],
        vec![
            vec!["Alice", "30", "Paris"],
            vec!["Bob", "25", "London"],
            vec!["Charlie", "35", "Berlin"],
        ],
    )
}

/// Helper to get a column as display text for assertion comparisons
fn col_text(table: &Table, col: usize) -> Vec<String> {
    table.column(col).unwrap().values().iter().map(|v| v.to_string()).collect()
}

#[test]
fn from_records_infers_column_types() {
    let table = people();
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.col_count(), 3);
    assert_eq!(table.column(0).unwrap().dtype(), ColumnType::Text);
    assert_eq!(table.column(1).unwrap().dtype(), ColumnType::Int);
    assert_eq!(table.get_cell(1, 1), Some(&Value::Int(25)));
}

#[test]
fn empty_fields_load_as_null() {
    let table = make_table(vec!["a", "b"], vec![vec!["1", ""], vec!["", "x"]]);
    assert_eq!(table.get_cell(1, 0), Some(&Value::Null));
    assert_eq!(table.get_cell(0, 1), Some(&Value::Null));
    assert_eq!(table.column(0).unwrap().dtype(), ColumnType::Int);
}

#[test]
fn header_only_table_has_columns_but_no_rows() {
    let table = make_table(vec!["name", "age", "city"], vec![]);
    assert_eq!(table.row_count(), 0);
    assert_eq!(table.col_count(), 3);
    assert_eq!(table.column_names(), vec!["name", "age", "city"]);
}

#[test]
fn set_cell_keeps_numeric_type() {
    let mut table = people();
    table.set_cell(1, 1, Value::Int(99));
    assert_eq!(table.get_cell(1, 1), Some(&Value::Int(99)));

    table.set_cell(0, 1, "41".into());
    assert_eq!(table.get_cell(0, 1), Some(&Value::Int(41)));
    assert_eq!(table.column(1).unwrap().dtype(), ColumnType::Int);
}

#[test]
fn set_cell_widens_int_column_to_float() {
    let mut table = people();
    table.set_cell(2, 1, Value::Float(35.5));
    assert_eq!(table.column(1).unwrap().dtype(), ColumnType::Float);
    assert_eq!(table.get_cell(0, 1), Some(&Value::Float(30.0)));
    assert_eq!(table.get_cell(2, 1), Some(&Value::Float(35.5)));
}

#[test]
fn set_cell_widens_numeric_column_to_text() {
    let mut table = people();
    table.set_cell(0, 1, "unknown".into());
    assert_eq!(table.column(1).unwrap().dtype(), ColumnType::Text);
    assert_eq!(col_text(&table, 1), vec!["unknown", "25", "35"]);
}

#[test]
fn set_cell_out_of_range_is_ignored() {
    let mut table = people();
    let before = table.clone();
    table.set_cell(3, 0, "x".into());
    table.set_cell(0, 3, "x".into());
    assert_eq!(table, before);
}

#[test]
fn insert_row_shifts_following_rows() {
    let mut table = people();
    table.insert_empty_row_at(1);
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.get_row(1), Some(vec![Value::Null, Value::Null, Value::Null]));
    assert_eq!(col_text(&table, 0), vec!["Alice", "", "Bob", "Charlie"]);
}

#[test]
fn insert_row_with_values_coerces() {
    let mut table = people();
    table.insert_row_at(3, vec!["Dora".into(), "40".into(), "Rome".into()]);
    assert_eq!(table.get_cell(3, 1), Some(&Value::Int(40)));
    assert_eq!(table.get_cell(3, 2), Some(&Value::Text("Rome".into())));
}

#[test]
fn delete_row_preserves_order() {
    let mut table = people();
    let removed = table.delete_row_at(1).unwrap();
    assert_eq!(removed[0], Value::Text("Bob".into()));
    assert_eq!(col_text(&table, 0), vec!["Alice", "Charlie"]);
    assert_eq!(table.delete_row_at(5), None);
}

#[test]
fn insert_and_delete_columns() {
    let mut table = people();
    table.insert_col_at(1, "new".to_string());
    assert_eq!(table.column_names(), vec!["name", "new", "age", "city"]);
    assert!(table.column(1).unwrap().values().iter().all(Value::is_null));

    let removed = table.delete_col_at(0).unwrap();
    assert_eq!(removed.name(), "name");
    assert_eq!(table.column_names(), vec!["new", "age", "city"]);
    assert_eq!(table.row_count(), 3);
}

#[test]
fn unique_column_name_probes_upward() {
    let mut table = people();
    assert_eq!(table.unique_column_name(1), "Column_1");

    table.rename_col(1, "Column_1".to_string());
    table.insert_col_at(0, "Column_2".to_string());
    assert_eq!(table.unique_column_name(1), "Column_3");
    assert_eq!(table.unique_column_name(0), "Column_0");
}

#[test]
fn rows_iter_renders_text() {
    let mut table = people();
    table.insert_empty_row_at(0);
    let rows: Vec<Vec<String>> = table.rows_iter().collect();
    assert_eq!(rows[0], vec!["", "", ""]);
    assert_eq!(rows[1], vec!["Alice", "30", "Paris"]);
}

#[test]
fn col_widths_clamped() {
    let table = make_table(
        vec!["id", "description"],
        vec![vec!["1", "a fairly long description that overflows"]],
    );
    assert_eq!(table.col_widths(20), vec![MIN_COL_WIDTH, 20]);
}

#[test]
fn col_widths_parallel_matches_sequential() {
    let rows: Vec<Vec<String>> = (0..6000)
        .map(|i| vec![i.to_string(), format!("name{}", i)])
        .collect();
    let table = Table::from_records(vec!["n".into(), "label".into()], &rows);
    assert_eq!(table.col_widths(30), vec![4, 8]);
}
