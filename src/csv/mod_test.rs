use super::*;

const SCHEMA: &[ColumnSpec] = &[
    ColumnSpec::new("id", DataType::String),
    ColumnSpec::new("Name", DataType::String),
    ColumnSpec::new("Influence", DataType::Float),
    ColumnSpec::new("Rank", DataType::Integer),
];

#[test]
fn parses_typed_rows_with_uploader() {
    let text = "ID,name,INFLUENCE,rank\ns1,\"Suppliers, Tier 1\",4.5,2\ns2,NGOs,3,1\n";
    let rows = parse(text, SCHEMA, "ana@example.org").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].row, 1);
    assert_eq!(rows[0].text("Name").unwrap(), "Suppliers, Tier 1");
    assert_eq!(rows[0].number("Influence").unwrap(), 4.5);
    assert_eq!(rows[0].values["Rank"], CsvValue::Integer(2));
    assert_eq!(rows[1].number("Influence").unwrap(), 3.0);
    assert!(rows.iter().all(|r| r.uploader == "ana@example.org"));
}

#[test]
fn header_order_and_extra_columns_do_not_matter() {
    let text = "Comment,Rank,Influence,Name,id\nhello,1,2.0,NGOs,s1\n";
    let rows = parse(text, SCHEMA, "u").unwrap();
    assert_eq!(rows[0].text("id").unwrap(), "s1");
    assert!(!rows[0].values.contains_key("Comment"));
}

#[test]
fn missing_column_is_named() {
    let text = "id,Name,Rank\ns1,NGOs,1\n";
    let err = parse(text, SCHEMA, "u").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    let msg = err.to_string();
    assert!(msg.contains("Influence"), "got {msg}");
    assert!(!msg.contains("Rank"), "got {msg}");
}

#[test]
fn bad_value_reports_row_and_column() {
    let text = "id,Name,Influence,Rank\ns1,NGOs,4,1\n\ns2,Unions,high,1\n";
    let err = parse(text, SCHEMA, "u").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("row 2"), "got {msg}");
    assert!(msg.contains("line 4"), "got {msg}");
    assert!(msg.contains("Influence"), "got {msg}");
    assert!(msg.contains("high"), "got {msg}");
}

#[test]
fn short_row_is_rejected() {
    let text = "id,Name,Influence,Rank\ns1,NGOs\n";
    let err = parse(text, SCHEMA, "u").unwrap_err();
    assert!(err.to_string().contains("row 1"), "got {err}");
}

#[test]
fn non_finite_float_is_rejected() {
    let text = "id,Name,Influence,Rank\ns1,NGOs,inf,1\n";
    assert!(parse(text, SCHEMA, "u").is_err());
}

#[test]
fn integer_column_rejects_fraction() {
    let text = "id,Name,Influence,Rank\ns1,NGOs,1,1.5\n";
    let err = parse(text, SCHEMA, "u").unwrap_err();
    assert!(err.to_string().contains("integer"), "got {err}");
}

#[test]
fn empty_input_is_rejected() {
    for text in ["", "\n\n", "  \r\n , \n"] {
        let err = parse(text, SCHEMA, "u").unwrap_err();
        assert!(err.to_string().contains("empty"), "got {err}");
    }
}

#[test]
fn header_only_yields_no_rows() {
    let rows = parse("id,Name,Influence,Rank\n", SCHEMA, "u").unwrap();
    assert!(rows.is_empty());
}

#[test]
fn leading_byte_order_mark_is_ignored() {
    let text = "\u{feff}id,Name,Influence,Rank\ns1,NGOs,2.5,1\n";
    let rows = parse(text, SCHEMA, "u").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].text("id").unwrap(), "s1");
}
