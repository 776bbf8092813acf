pub const BARE_MAP_INPUT: &str = r#"
name: "hello world"
"#;
pub const BARE_MAP2_INPUT: &str = r#"name:    "hello world"   # trailing comment"#;
pub const BARE_MAP_TREE: &str = r"
+MAP
=KEY name
=STR hello world
-MAP";

pub const NUM_LIST_INPUT: &str = r"nums: [1, 2, 3_000]";
pub const NUM_LIST2_INPUT: &str = r"
nums: [
  1,
  2,
  3_000
]";
pub const NUM_LIST_TREE: &str = r"
+MAP
=KEY nums
+SEQ
=NUM 1.0
=NUM 2.0
=NUM 3000.0
-SEQ
-MAP";

pub const NUMBERS_INPUT: &str = r"[1_000_000, +1, -1, 1.5e3, .5, -0.25, 1e-2]";
pub const NUMBERS_TREE: &str = r"
+SEQ
=NUM 1000000.0
=NUM 1.0
=NUM -1.0
=NUM 1500.0
=NUM 0.5
=NUM -0.25
=NUM 0.01
-SEQ";

pub const BOOL_INPUT: &str = r"{on: true, off: false, list: [false,true]}";
pub const BOOL_TREE: &str = r"
+MAP
=KEY on
=BOOL true
=KEY off
=BOOL false
=KEY list
+SEQ
=BOOL false
=BOOL true
-SEQ
-MAP";

pub const NESTED_INPUT: &str = r#"
package: "anvil"
build: {compiler: "clang", macros: {DEBUG: "1"}, deps: []}
profiles: {debug: ["-g"], release: []}
"#;
pub const NESTED_TREE: &str = r"
+MAP
=KEY package
=STR anvil
=KEY build
+MAP
=KEY compiler
=STR clang
=KEY macros
+MAP
=KEY DEBUG
=STR 1
-MAP
=KEY deps
+SEQ
-SEQ
-MAP
=KEY profiles
+MAP
=KEY debug
+SEQ
=STR -g
-SEQ
=KEY release
+SEQ
-SEQ
-MAP
-MAP";

pub const EMPTY_INPUT: &str = "";
pub const EMPTY2_INPUT: &str = "\n  # nothing here\n\n";
pub const EMPTY_TREE: &str = r"
+MAP
-MAP";

pub const EMPTY_FLOW_MAP_INPUT: &str = "{}";
pub const EMPTY_FLOW_MAP2_INPUT: &str = "{ }";
pub const EMPTY_FLOW_MAP_TREE: &str = r"
+MAP
-MAP";

pub const TRAILING_COMMA_INPUT: &str = r"{a: 1, b: {c: 2,},}";
pub const TRAILING_COMMA_TREE: &str = r"
+MAP
=KEY a
=NUM 1.0
=KEY b
+MAP
=KEY c
=NUM 2.0
-MAP
-MAP";

pub const TOP_SCALAR_INPUT: &str = r"'just a string'";
pub const TOP_SCALAR_TREE: &str = r"
=STR just a string";

pub const COLON_KEY_INPUT: &str = r#"http://host:8080: "url key""#;
pub const COLON_KEY_TREE: &str = r"
+MAP
=KEY http://host:8080
=STR url key
-MAP";

pub const ESCAPES_INPUT: &str = r#"s: "tab\there\nnew \"q\" \\ \/ \x41 é""#;
pub const ESCAPES_TREE: &str = r#"
+MAP
=KEY s
=STR tab\there\nnew "q" \\ / A é
-MAP"#;

pub const SINGLE_QUOTE_INPUT: &str = r"s: 'it''s \n raw'";
pub const SINGLE_QUOTE_TREE: &str = r"
+MAP
=KEY s
=STR it's \\n raw
-MAP";

pub const ALIAS_INPUT: &str = r#"
a: &base {x: 1}
b: *base
c: {<<: *base, y: 2}
"#;
pub const ALIAS_TREE: &str = r"
+MAP
=KEY a
+MAP &1
=KEY x
=NUM &2 1.0
-MAP
=KEY b
=ALI *1
=KEY c
+MAP
=KEY x
=ALI *2
=KEY y
=NUM 2.0
-MAP
-MAP";

pub const MERGE_OVERRIDE_INPUT: &str = r#"
defaults: &d {cstd: "c17", compiler: "gcc"}
build: {<<: *d, compiler: "clang"}
"#;
pub const MERGE_OVERRIDE_TREE: &str = r"
+MAP
=KEY defaults
+MAP
=KEY cstd
=STR &1 c17
=KEY compiler
=STR gcc
-MAP
=KEY build
+MAP
=KEY cstd
=ALI *1
=KEY compiler
=STR clang
-MAP
-MAP";

pub const MERGE_INLINE_INPUT: &str = r"m: {a: 0, <<: {a: 1, b: 2}}";
pub const MERGE_INLINE_TREE: &str = r"
+MAP
=KEY m
+MAP
=KEY a
=NUM 0.0
=KEY b
=NUM 2.0
-MAP
-MAP";

pub const ALIAS_IN_LIST_INPUT: &str = r#"
flags: &f ["-Wall", "-Wextra"]
profiles: {debug: *f, release: [*f, "-O3"]}
"#;
pub const ALIAS_IN_LIST_TREE: &str = r"
+MAP
=KEY flags
+SEQ &1
=STR -Wall
=STR -Wextra
-SEQ
=KEY profiles
+MAP
=KEY debug
=ALI *1
=KEY release
+SEQ
=ALI *1
=STR -O3
-SEQ
-MAP
-MAP";
