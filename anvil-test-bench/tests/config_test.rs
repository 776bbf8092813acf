use anvil_config::{load, CachePolicy, ConfigError, ValidateStr};
use anvil_yaml::ParseOptions;
use std::io::Write;

const BUILD_FILE: &str = r#"
# anvil build file
package: "demo"
version: 0.3
author: 'someone'

common: &common {cstd: "c17", macros: {LOG: "1"}}

workspace: {libs: "vendor"}
targets: [
  {name: "demo", type: "exe", main: "src/main.c", target: ["linux", "macos"]},
  {name: "core", type: "lib"}
]
build: {
  <<: *common,
  compiler: "clang",
  arguments: {
    git_hash: {validate_str: "compact", cache_policy: "memoize", commands: ["git", "rev-parse", "HEAD"]}
  },
  deps: [{name: "zlib", type: "git", repo: "https://github.com/madler/zlib"}]
}
profiles: {debug: ["-g", "-O0"], release: ["-O2"]}
"#;

fn write_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn load_full_build_file() {
    let file = write_file(BUILD_FILE);
    for chunk_size in [1, 16, 4096] {
        let options = ParseOptions::default().with_chunk_size(chunk_size);
        let config = load(file.path(), &options).unwrap();

        assert_eq!(config.package.as_deref(), Some("demo"));
        assert_eq!(config.version.as_deref(), Some("0.3"));
        assert_eq!(config.author.as_deref(), Some("someone"));

        let workspace = config.workspace.as_ref().unwrap();
        assert_eq!(workspace.libs_or_default(), "vendor");
        assert_eq!(workspace.target_or_default(), anvil_config::DEFAULT_TARGET_PATH);

        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.targets[0].target, vec!["linux", "macos"]);
        assert_eq!(config.targets[1].kind.as_deref(), Some("lib"));

        let build = config.build.as_ref().unwrap();
        assert_eq!(build.compiler.as_deref(), Some("clang"));
        assert_eq!(build.cstd.as_deref(), Some("c17"));
        assert_eq!(build.macros.get("LOG").map(String::as_str), Some("1"));
        let hook = &build.arguments["git_hash"];
        assert_eq!(hook.validate_mode(), Some(ValidateStr::Compact));
        assert_eq!(hook.cache_mode(), Some(CachePolicy::Memoize));
        assert_eq!(hook.commands, vec!["git", "rev-parse", "HEAD"]);
        assert_eq!(build.deps[0].repo.as_deref(), Some("https://github.com/madler/zlib"));

        assert_eq!(config.profiles["debug"].flags, vec!["-g", "-O0"]);
    }
}

#[test]
fn syntax_error_carries_path() {
    let file = write_file("package: \"demo\"\ntargets: [{name: \"a\"} {name: \"b\"}]\n");
    let err = load(file.path(), &ParseOptions::default()).unwrap_err();
    let ConfigError::Load(located) = &err else {
        panic!("expected a load error, got {err:?}");
    };
    assert_eq!(located.error.mark().map(|m| (m.line, m.col)), Some((2, 23)));
    assert!(err
        .to_string()
        .ends_with(":2:23 -> Comma missing between elements in a collection."));
}

#[test]
fn root_must_be_a_map() {
    let file = write_file("[\"not\", \"a\", \"map\"]");
    let err = load(file.path(), &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, ConfigError::NotAMap(_)));
}

#[test]
fn bench_fixture_is_a_valid_build_file() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("benches/build_file.yaml");
    let config = load(path, &ParseOptions::default().with_chunk_size(7)).unwrap();
    assert_eq!(config.targets.len(), 4);
    let build = config.build.unwrap();
    assert_eq!(build.cstd.as_deref(), Some("c17"));
    assert_eq!(build.deps.len(), 3);
    assert_eq!(build.arguments["cpu_count"].cache_mode(), Some(CachePolicy::Always));
    // nested lists are not flags
    assert_eq!(config.profiles["debug"].flags, vec!["-g", "-O0", "-fsanitize=address"]);
    assert_eq!(config.profiles["size"].flags.len(), 3);
}
