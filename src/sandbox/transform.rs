//! Textual rewrite of a snippet into an executable body.
//!
//! The sandbox performs no module resolution, so every import is stripped;
//! whatever the snippet needs must come from the capability map instead. A
//! default export becomes the body's `return` value; a snippet without one
//! is treated as a single expression and returned directly.

use regex::Regex;
use std::sync::LazyLock;

static IMPORT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\bimport\s+[^'";]*?from\s*['"][^'"]*['"];?\s*"#)
        .expect("import-from pattern is valid")
});

static IMPORT_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bimport\s*['"][^'"]*['"];?\s*"#).expect("bare import pattern is valid")
});

static EXPORT_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bexport\s+default\s+").expect("export pattern is valid"));

/// Rewrite snippet source into a function body whose `return` value is the
/// rendered result.
pub fn transform(source: &str) -> String {
    let stripped = IMPORT_FROM.replace_all(source, "");
    let stripped = IMPORT_BARE.replace_all(&stripped, "");
    if EXPORT_DEFAULT.is_match(&stripped) {
        EXPORT_DEFAULT.replacen(&stripped, 1, "return ").into_owned()
    } else {
        format!("return ({})", stripped.trim())
    }
}
