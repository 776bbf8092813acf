use anvil_test_bench::assert_eq_tree;
use anvil_test_bench::consts::*;

#[test]
fn flow_bare_map() {
    assert_eq_tree(BARE_MAP_INPUT, BARE_MAP_TREE);
    assert_eq_tree(BARE_MAP2_INPUT, BARE_MAP_TREE);
}

#[test]
fn flow_seq() {
    assert_eq_tree(NUM_LIST_INPUT, NUM_LIST_TREE);
    assert_eq_tree(NUM_LIST2_INPUT, NUM_LIST_TREE);
}

#[test]
fn flow_numbers() {
    assert_eq_tree(NUMBERS_INPUT, NUMBERS_TREE);
}

#[test]
fn flow_booleans() {
    assert_eq_tree(BOOL_INPUT, BOOL_TREE);
}

#[test]
fn flow_nested() {
    assert_eq_tree(NESTED_INPUT, NESTED_TREE);
}

#[test]
fn flow_empty_nodes() {
    assert_eq_tree(EMPTY_INPUT, EMPTY_TREE);
    assert_eq_tree(EMPTY2_INPUT, EMPTY_TREE);
    assert_eq_tree(EMPTY_FLOW_MAP_INPUT, EMPTY_FLOW_MAP_TREE);
    assert_eq_tree(EMPTY_FLOW_MAP2_INPUT, EMPTY_FLOW_MAP_TREE);
}

#[test]
fn flow_trailing_comma() {
    assert_eq_tree(TRAILING_COMMA_INPUT, TRAILING_COMMA_TREE);
}

#[test]
fn flow_top_level_scalar() {
    assert_eq_tree(TOP_SCALAR_INPUT, TOP_SCALAR_TREE);
}

#[test]
fn flow_colon_in_key() {
    assert_eq_tree(COLON_KEY_INPUT, COLON_KEY_TREE);
}
