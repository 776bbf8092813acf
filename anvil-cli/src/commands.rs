//! CLI command implementations.

use anvil_common::LocatedError;
use anvil_config::ConfigError;
use anvil_yaml::{emit_to_string, ParseOptions};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

pub fn show(path: &Path, options: &ParseOptions) -> Result<()> {
    let config = anvil_config::load(path, options)?;
    print!("{config}");
    Ok(())
}

pub fn check(path: &Path, options: &ParseOptions) -> Result<()> {
    anvil_yaml::parse_file(path, options)?;
    println!("ok: {}", path.display());
    Ok(())
}

pub fn dump(path: &Path, options: &ParseOptions) -> Result<()> {
    let root = anvil_yaml::parse_file(path, options)?;
    let text = emit_to_string(&root)
        .map_err(|_| anyhow::anyhow!("{} cannot be written back (NaN value)", path.display()))?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .context("failed to write to stdout")?;
    Ok(())
}

fn located(err: &anyhow::Error) -> Option<&LocatedError> {
    if let Some(located) = err.downcast_ref::<LocatedError>() {
        return Some(located);
    }
    match err.downcast_ref::<ConfigError>() {
        Some(ConfigError::Load(located)) => Some(located),
        _ => None,
    }
}

/// Writes the diagnostic for `err` to stderr, with a source snippet for syntax errors.
pub fn report(err: &anyhow::Error) {
    let _ = write_report(&mut std::io::stderr().lock(), err);
}

/// Located errors read `path:line:col -> message`, anything else gets an `error:` prefix.
fn write_report(out: &mut impl Write, err: &anyhow::Error) -> std::io::Result<()> {
    let Some(located) = located(err) else {
        return writeln!(out, "error: {err:#}");
    };
    // the located message already carries its cause
    writeln!(out, "{located}")?;
    let Some(syntax) = located.error.as_syntax() else {
        return Ok(());
    };
    // best effort, the file may be gone by now
    if let Ok(source) = std::fs::read_to_string(&located.path) {
        write!(out, "{}", syntax.render_snippet(&source))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn report_text(err: &anyhow::Error) -> String {
        let mut out = Vec::new();
        write_report(&mut out, err).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_syntax_error_starts_with_location() {
        let file = build_file("package: \"demo\"\nflags: [1 2]\n");
        let err = check(file.path(), &ParseOptions::default()).unwrap_err();
        let text = report_text(&err);
        let expected = format!(
            "{}:2:11 -> Comma missing between elements in a collection.\n\
             YamlError::MISSING_COMMA\n  1 |package: \"demo\"\n  2 |flags: [1 2]\n    |          ^\n",
            file.path().display()
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_config_load_error_is_located() {
        let file = build_file("package: 'demo");
        let err = show(file.path(), &ParseOptions::default()).unwrap_err();
        let text = report_text(&err);
        assert!(text.starts_with(&format!("{}:1:10 -> ", file.path().display())), "{text}");
    }

    #[test]
    fn test_unlocated_error_keeps_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let err = anyhow::Error::new(anvil_config::ConfigError::NotAMap(anvil_common::NodeKind::List));
        assert_eq!(
            report_text(&err),
            "error: configuration root must be a map, found a list\n"
        );
        let missing = dir.path().join("anvil.yaml");
        let err = check(&missing, &ParseOptions::default()).unwrap_err();
        let text = report_text(&err);
        assert!(text.starts_with(&format!("{} -> failed to read input: ", missing.display())), "{text}");
    }
}
