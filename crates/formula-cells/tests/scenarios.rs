use formula_cells::{CellEngine, EngineError};

fn set(engine: &CellEngine, name: &str, definition: &str) {
    engine
        .set_cell(name, definition)
        .unwrap_or_else(|err| panic!("set {name} = {definition:?}: {err}"));
}

fn assert_values(engine: &CellEngine, expected: &[(&str, i64)]) {
    for &(name, value) in expected {
        assert_eq!(engine.get_cell(name), value, "value of {name}");
        assert_eq!(engine.evaluate(name).unwrap(), value, "evaluated {name}");
    }
}

#[test]
fn formula_sums_its_operands() {
    let engine = CellEngine::new();
    set(&engine, "A1", "1");
    set(&engine, "A2", "2");
    set(&engine, "A3", "=A1+A2");
    assert_eq!(engine.get_cell("A3"), 3);
}

#[test]
fn changing_an_operand_updates_the_formula() {
    let engine = CellEngine::new();
    set(&engine, "A1", "1");
    set(&engine, "A2", "2");
    set(&engine, "A3", "=A1+A2");

    set(&engine, "A2", "4");
    assert_eq!(engine.get_cell("A3"), 5);
}

#[test]
fn two_cell_loop_is_rejected_and_leaves_values_alone() {
    let engine = CellEngine::new();
    set(&engine, "A1", "=A2");

    let err = engine.set_cell("A2", "=A1").unwrap_err();
    assert!(err.is_cyclic(), "unexpected error: {err}");
    assert_eq!(engine.get_cell("A2"), 0);
    assert_eq!(engine.get_cell("A1"), 0);

    // A2 is still free to take a literal, which then flows into A1.
    set(&engine, "A2", "6");
    assert_eq!(engine.get_cell("A1"), 6);
}

#[test]
fn self_reference_is_rejected() {
    let engine = CellEngine::new();
    let err = engine.set_cell("D1", "=D1").unwrap_err();
    match err {
        EngineError::CyclicDependency(cycle) => {
            assert_eq!(cycle.path, vec!["D1".to_string(), "D1".to_string()]);
            assert_eq!(cycle.to_string(), "circular reference: D1 -> D1");
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
    assert_eq!(engine.get_cell("D1"), 0);
    assert!(engine.is_empty());
}

#[test]
fn diamond_dependency_is_counted_per_path() {
    let engine = CellEngine::new();
    set(&engine, "X", "1");
    set(&engine, "Y", "=X");
    set(&engine, "Z", "=X");
    set(&engine, "W", "=Y+Z");
    assert_eq!(engine.get_cell("W"), 2);

    let update = engine.set_cell("X", "5").unwrap();
    assert_eq!(update.previous, 1);
    assert_eq!(update.value, 5);
    // Y, Z and W are each written once.
    assert_eq!(update.dependents_updated, 3);
    assert_values(&engine, &[("X", 5), ("Y", 5), ("Z", 5), ("W", 10)]);
}

#[test]
fn unknown_cell_reads_as_zero() {
    let engine = CellEngine::new();
    assert_eq!(engine.get_cell("Unknown"), 0);
    assert_eq!(engine.evaluate("Unknown").unwrap(), 0);
    assert!(engine.is_empty());
}

#[test]
fn forward_references_pick_up_later_definitions() {
    let engine = CellEngine::new();
    set(&engine, "B1", "=C1+C2");
    assert_eq!(engine.get_cell("B1"), 0);

    set(&engine, "C1", "8");
    set(&engine, "C2", "7");
    assert_eq!(engine.get_cell("B1"), 15);
}

#[test]
fn worksheet_walkthrough() {
    let engine = CellEngine::new();
    set(&engine, "A1", "1");
    set(&engine, "A2", "2");
    set(&engine, "A3", "=A1+A2");
    set(&engine, "A4", "=A2");
    set(&engine, "A5", "=A4+A3");
    assert_values(
        &engine,
        &[("A1", 1), ("A2", 2), ("A3", 3), ("A4", 2), ("A5", 5)],
    );

    set(&engine, "Z99", "99");
    assert_values(&engine, &[("Z99", 99), ("X0", 0)]);

    // Change a leaf.
    set(&engine, "A1", "7");
    assert_values(
        &engine,
        &[("A1", 7), ("A2", 2), ("A3", 9), ("A4", 2), ("A5", 11)],
    );

    // Turn an intermediate formula into a literal.
    set(&engine, "A3", "100");
    assert_values(
        &engine,
        &[("A1", 7), ("A2", 2), ("A3", 100), ("A4", 2), ("A5", 102)],
    );
    assert!(engine.dependents_of("A1").is_empty());

    // Turn literals into formulas.
    set(&engine, "C1", "8");
    set(&engine, "C2", "7");
    set(&engine, "A1", "=C1+C2");
    set(&engine, "A3", "=A1");
    set(&engine, "A4", "=A1+A2");
    assert_values(
        &engine,
        &[("A1", 15), ("A2", 2), ("A3", 15), ("A4", 17), ("A5", 32)],
    );

    set(&engine, "B1", "=A1+A2+A3+A4+A5");
    assert_values(&engine, &[("B1", 81)]);

    // A2 feeds A4 -> A5 -> B1, so it cannot read B1.
    let err = engine.set_cell("A2", "=A5+B1").unwrap_err();
    assert!(err.is_cyclic());
    assert_values(
        &engine,
        &[("A1", 15), ("A2", 2), ("A3", 15), ("A4", 17), ("A5", 32), ("B1", 81)],
    );

    set(&engine, "C2", "10");
    assert_values(
        &engine,
        &[("A1", 18), ("A3", 18), ("A4", 20), ("A5", 38), ("B1", 96)],
    );
}

#[test]
fn redefining_with_the_same_value_reports_no_updates() {
    let engine = CellEngine::new();
    set(&engine, "A1", "3");
    set(&engine, "A2", "=A1");

    let update = engine.set_cell("A1", "3").unwrap();
    assert_eq!(update.dependents_updated, 0);
    assert_eq!(engine.get_cell("A2"), 3);
}

#[test]
fn negative_literals_propagate() {
    let engine = CellEngine::new();
    set(&engine, "A1", "10");
    set(&engine, "A2", "=A1+A1");
    set(&engine, "A1", "-5");
    assert_values(&engine, &[("A1", -5), ("A2", -10)]);
}
