// End-to-end scenarios through the public API.
// Run with: cargo test -p cellgrid-engine --test scenarios

use cellgrid_engine::{FormulaError, Position, Sheet, SheetError, Size, Value};

fn p(text: &str) -> Position {
    let pos = Position::from_a1(text);
    assert!(pos.is_valid(), "bad test position {text}");
    pos
}

fn value(sheet: &Sheet, pos: &str) -> Value {
    sheet.cell(p(pos)).unwrap().expect("cell exists").value()
}

#[test]
fn formula_then_operand() {
    let mut sheet = Sheet::new();
    sheet.set_cell(p("A1"), "=B1+1").unwrap();
    sheet.set_cell(p("B1"), "10").unwrap();
    assert_eq!(value(&sheet, "A1"), Value::Number(11.0));
}

#[test]
fn self_reference_rejected() {
    let mut sheet = Sheet::new();
    assert_eq!(
        sheet.set_cell(p("A1"), "=A1"),
        Err(SheetError::CircularDependency)
    );
    assert!(sheet.cell(p("A1")).unwrap().is_none());
}

#[test]
fn mutual_reference_rejected() {
    let mut sheet = Sheet::new();
    sheet.set_cell(p("A1"), "=B1").unwrap();
    assert_eq!(
        sheet.set_cell(p("B1"), "=A1"),
        Err(SheetError::CircularDependency)
    );
    assert_eq!(sheet.cell(p("B1")).unwrap().unwrap().text(), "");
}

#[test]
fn reference_materializes_empty_cell() {
    let mut sheet = Sheet::new();
    sheet.set_cell(p("A1"), "=C1").unwrap();
    let c1 = sheet.cell(p("C1")).unwrap().expect("C1 materialized");
    assert_eq!(c1.text(), "");
    assert_eq!(value(&sheet, "A1"), Value::Number(0.0));
}

#[test]
fn escaped_text_value() {
    let mut sheet = Sheet::new();
    sheet.set_cell(p("A1"), "hello").unwrap();
    sheet.set_cell(p("A2"), "'123").unwrap();
    assert_eq!(value(&sheet, "A1"), Value::Text("hello".to_string()));
    assert_eq!(sheet.cell(p("A2")).unwrap().unwrap().text(), "'123");
    assert_eq!(value(&sheet, "A2"), Value::Text("123".to_string()));
}

#[test]
fn arithmetic_error_propagates_by_category() {
    let mut sheet = Sheet::new();
    sheet.set_cell(p("A1"), "=1/0").unwrap();
    sheet.set_cell(p("A2"), "=A1+1").unwrap();
    assert_eq!(value(&sheet, "A1"), Value::Error(FormulaError::Arithmetic));
    assert_eq!(value(&sheet, "A2"), Value::Error(FormulaError::Arithmetic));
}

#[test]
fn rejection_leaves_observable_state_unchanged() {
    let mut sheet = Sheet::new();
    sheet.set_cell(p("A1"), "=B1*2").unwrap();
    sheet.set_cell(p("B1"), "3").unwrap();
    assert_eq!(value(&sheet, "A1"), Value::Number(6.0));

    let before_texts = {
        let mut out = String::new();
        sheet.print_texts(&mut out).unwrap();
        out
    };

    assert!(sheet.set_cell(p("B1"), "=A1").is_err());
    assert!(sheet.set_cell(p("A1"), "=1+*2").is_err());

    let mut after_texts = String::new();
    sheet.print_texts(&mut after_texts).unwrap();
    assert_eq!(after_texts, before_texts);
    assert_eq!(value(&sheet, "A1"), Value::Number(6.0));
}

#[test]
fn writes_ripple_through_a_chain() {
    let mut sheet = Sheet::new();
    for (cell, formula) in [("B1", "=A1+1"), ("C1", "=B1+1"), ("D1", "=C1+1")] {
        sheet.set_cell(p(cell), formula).unwrap();
    }
    sheet.set_cell(p("A1"), "1").unwrap();
    assert_eq!(value(&sheet, "D1"), Value::Number(4.0));

    sheet.set_cell(p("A1"), "100").unwrap();
    assert_eq!(value(&sheet, "D1"), Value::Number(103.0));

    sheet.clear_cell(p("A1")).unwrap();
    assert_eq!(value(&sheet, "D1"), Value::Number(3.0));
}

#[test]
fn repeated_reads_are_stable() {
    let mut sheet = Sheet::new();
    sheet.set_cell(p("A1"), "=2*3").unwrap();
    let first = value(&sheet, "A1");
    for _ in 0..10 {
        assert_eq!(value(&sheet, "A1"), first);
    }
}

#[test]
fn printable_grid_rendering() {
    let mut sheet = Sheet::new();
    sheet.set_cell(p("A1"), "=2+2").unwrap();
    sheet.set_cell(p("B1"), "some").unwrap();
    sheet.set_cell(p("B2"), "'=escaped").unwrap();

    assert_eq!(sheet.printable_size(), Size::new(2, 2));

    let mut values = String::new();
    sheet.print_values(&mut values).unwrap();
    assert_eq!(values, "4\tsome\n\t=escaped\n");

    let mut texts = String::new();
    sheet.print_texts(&mut texts).unwrap();
    assert_eq!(texts, "=2+2\tsome\n\t'=escaped\n");
}

#[test]
fn position_round_trip_with_sheet_reporting() {
    let mut sheet = Sheet::new();
    sheet.set_cell(p("C3"), "=AA100+B2+A1").unwrap();
    let refs: Vec<String> = sheet
        .cell(p("C3"))
        .unwrap()
        .unwrap()
        .referenced_cells()
        .iter()
        .map(|r| r.to_a1())
        .collect();
    // Reported ascending in row-major order, regardless of source order.
    assert_eq!(refs, vec!["A1", "B2", "AA100"]);
}
