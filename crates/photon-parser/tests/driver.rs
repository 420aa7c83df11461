use photon_parser::driver::{drive, StaticLines};

#[test]
fn nested_function_body_parses_into_a_three_level_forest() {
    let source = "def add(a, b):\n    return a + b\nx = add(1, 2)\n";
    let blocks = drive(StaticLines::new(source), "t.w", false).unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].body.len(), 1);
    assert!(blocks[1].body.is_empty());
}

#[test]
fn class_with_method_nests_two_levels() {
    let source = "class Point():\n    def new(x, y):\n        return x\n";
    let blocks = drive(StaticLines::new(source), "t.w", false).unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].body.len(), 1);
    assert_eq!(blocks[0].body[0].body.len(), 1);
}
