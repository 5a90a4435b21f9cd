//! Heuristic formatter and linter for generated snippets.
//!
//! Line-based, not syntax-aware: indentation follows brace depth, quote and
//! semicolon fixes are regex rewrites, and lint rules fire on textual
//! patterns. Good enough to tidy LLM output before display; not a prettier
//! replacement.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Trailing comma styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingComma {
    None,
    Es5,
    All,
}

#[derive(Debug, Clone)]
pub struct FormatOptions {
    pub use_tabs: bool,
    pub tab_width: usize,
    pub semi: bool,
    pub single_quote: bool,
    pub trailing_comma: TrailingComma,
    pub print_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            use_tabs: false,
            tab_width: 2,
            semi: false,
            single_quote: true,
            trailing_comma: TrailingComma::Es5,
            print_width: 100,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One lint finding with its location and rule id.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LintDiagnostic {
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub rule: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct LintReport {
    pub errors: Vec<LintDiagnostic>,
    pub warnings: Vec<LintDiagnostic>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

static SEMI_BEFORE_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r";(\s*\n)").expect("semicolon pattern is valid"));
static SEMI_AT_EOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m);\s*$").expect("semicolon pattern is valid"));
static DOUBLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"\\]*(\\.[^"\\]*)*)""#).expect("quote pattern is valid")
});
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("comma pattern is valid"));
static MISSING_TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^,\s])(\s*[}\]])").expect("comma pattern is valid"));
static COMMA_WRAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*").expect("comma pattern is valid"));
static NAMED_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"import\s+\{([^}]+)\}\s+from").expect("import pattern is valid"));
static HOOK_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"use[A-Z]\w*").expect("hook pattern is valid"));

/// Apply the formatting heuristics in a fixed order: line endings,
/// indentation, semicolons, quotes, trailing commas, long-line wrapping.
pub fn format(code: &str, options: &FormatOptions) -> String {
    let mut formatted = code.replace("\r\n", "\n");

    formatted = fix_indentation(&formatted, options.tab_width, options.use_tabs);

    if !options.semi {
        formatted = SEMI_BEFORE_NEWLINE.replace_all(&formatted, "$1").into_owned();
        formatted = SEMI_AT_EOL.replace_all(&formatted, "").into_owned();
    }

    if options.single_quote {
        formatted = DOUBLE_QUOTED.replace_all(&formatted, "'$1'").into_owned();
    }

    formatted = match options.trailing_comma {
        TrailingComma::None => TRAILING_COMMA.replace_all(&formatted, "$1").into_owned(),
        TrailingComma::All => MISSING_TRAILING_COMMA
            .replace_all(&formatted, "$1,$2")
            .into_owned(),
        TrailingComma::Es5 => formatted,
    };

    wrap_long_lines(&formatted, options.print_width)
}

fn fix_indentation(code: &str, tab_width: usize, use_tabs: bool) -> String {
    let indent = if use_tabs {
        "\t".to_string()
    } else {
        " ".repeat(tab_width)
    };
    let mut level: usize = 0;
    let lines: Vec<String> = code
        .lines()
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.contains('}') && !trimmed.contains('{') {
                level = level.saturating_sub(1);
            }
            let indented = if trimmed.is_empty() {
                String::new()
            } else {
                format!("{}{}", indent.repeat(level), trimmed)
            };
            if trimmed.contains('{') && !trimmed.contains('}') {
                level += 1;
            }
            indented
        })
        .collect();
    lines.join("\n")
}

fn wrap_long_lines(code: &str, print_width: usize) -> String {
    let lines: Vec<String> = code
        .lines()
        .map(|line| {
            if line.len() <= print_width || !line.contains(',') {
                line.to_string()
            } else {
                COMMA_WRAP.replace_all(line, ",\n  ").into_owned()
            }
        })
        .collect();
    lines.join("\n")
}

/// Run every lint rule over the source, line by line.
pub fn lint(code: &str) -> LintReport {
    let mut report = LintReport::default();
    for (index, line) in code.lines().enumerate() {
        let line_number = index + 1;
        check_named_imports(line, line_number, &mut report.warnings);
        check_console_statements(line, line_number, &mut report.warnings);
        check_missing_keys(line, line_number, &mut report.errors);
        check_hook_rules(line, line_number, &mut report.errors);
        check_any_types(line, line_number, &mut report.warnings);
    }
    report
}

fn check_named_imports(line: &str, line_number: usize, warnings: &mut Vec<LintDiagnostic>) {
    if let Some(captures) = NAMED_IMPORT.captures(line) {
        for import in captures[1].split(',') {
            let import = import.trim();
            if import.is_empty() {
                continue;
            }
            warnings.push(LintDiagnostic {
                line: line_number,
                column: 1,
                message: format!("'{import}' is imported but never used"),
                rule: "@typescript-eslint/no-unused-vars".to_string(),
                severity: Severity::Warning,
                suggestion: Some(format!("Remove unused import '{import}'")),
            });
        }
    }
}

fn check_console_statements(line: &str, line_number: usize, warnings: &mut Vec<LintDiagnostic>) {
    if line.contains("console.log") || line.contains("console.error") {
        warnings.push(LintDiagnostic {
            line: line_number,
            column: line.find("console").unwrap_or(0) + 1,
            message: "Unexpected console statement".to_string(),
            rule: "no-console".to_string(),
            severity: Severity::Warning,
            suggestion: Some("Remove console statement before production".to_string()),
        });
    }
}

fn check_missing_keys(line: &str, line_number: usize, errors: &mut Vec<LintDiagnostic>) {
    if line.contains(".map(") && !line.contains("key=") {
        errors.push(LintDiagnostic {
            line: line_number,
            column: 1,
            message: "Missing \"key\" prop for element in iterator".to_string(),
            rule: "react/jsx-key".to_string(),
            severity: Severity::Error,
            suggestion: None,
        });
    }
}

fn check_hook_rules(line: &str, line_number: usize, errors: &mut Vec<LintDiagnostic>) {
    let in_conditional =
        line.contains("if (") || line.contains("for (") || line.contains("while (");
    if in_conditional && HOOK_CALL.is_match(line) {
        errors.push(LintDiagnostic {
            line: line_number,
            column: 1,
            message: "React Hook cannot be called inside a loop, condition, or nested function"
                .to_string(),
            rule: "react-hooks/rules-of-hooks".to_string(),
            severity: Severity::Error,
            suggestion: None,
        });
    }
}

fn check_any_types(line: &str, line_number: usize, warnings: &mut Vec<LintDiagnostic>) {
    if let Some(position) = line.find(": any") {
        warnings.push(LintDiagnostic {
            line: line_number,
            column: position + 1,
            message: "Unexpected any. Specify a different type".to_string(),
            rule: "@typescript-eslint/no-explicit-any".to_string(),
            severity: Severity::Warning,
            suggestion: Some("Use a more specific type instead of any".to_string()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixes_indentation_by_brace_depth() {
        let code = "function App() {\nreturn (\n<div>\nhi\n</div>\n)\n}";
        let formatted = format(code, &FormatOptions::default());
        let lines: Vec<&str> = formatted.lines().collect();
        assert_eq!(lines[0], "function App() {");
        assert_eq!(lines[1], "  return (");
        assert_eq!(lines[6], "}");
    }

    #[test]
    fn removes_semicolons_when_semi_is_off() {
        let formatted = format("const a = 1;\nconst b = 2;", &FormatOptions::default());
        assert!(!formatted.contains(';'), "{formatted}");
    }

    #[test]
    fn keeps_semicolons_when_semi_is_on() {
        let options = FormatOptions {
            semi: true,
            ..FormatOptions::default()
        };
        let formatted = format("const a = 1;", &options);
        assert!(formatted.contains(';'));
    }

    #[test]
    fn converts_double_quotes_to_single() {
        let formatted = format("const name = \"preview\"", &FormatOptions::default());
        assert!(formatted.contains("'preview'"));
    }

    #[test]
    fn strips_trailing_commas_in_none_mode() {
        let options = FormatOptions {
            trailing_comma: TrailingComma::None,
            ..FormatOptions::default()
        };
        let formatted = format("const xs = [1, 2, 3,]", &options);
        assert!(formatted.contains("3]"), "{formatted}");
    }

    #[test]
    fn normalizes_crlf_line_endings() {
        let formatted = format("const a = 1\r\nconst b = 2", &FormatOptions::default());
        assert!(!formatted.contains('\r'));
    }

    #[test]
    fn wraps_overlong_lines_at_commas() {
        let options = FormatOptions {
            print_width: 20,
            ..FormatOptions::default()
        };
        let formatted = format("call(aaaaaaaa, bbbbbbbb, cccccccc)", &options);
        assert!(formatted.lines().count() > 1, "{formatted}");
    }

    #[test]
    fn lints_console_statements() {
        let report = lint("console.log('debug')");
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].rule, "no-console");
        assert_eq!(report.warnings[0].line, 1);
    }

    #[test]
    fn lints_map_without_key_prop() {
        let report = lint("items.map(item => <li>{item}</li>)");
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].rule, "react/jsx-key");
    }

    #[test]
    fn map_with_key_prop_is_clean() {
        let report = lint("items.map(item => <li key={item.id}>{item}</li>)");
        assert!(report.errors.is_empty());
    }

    #[test]
    fn lints_hooks_inside_conditionals() {
        let report = lint("if (ready) { const [a, setA] = useState(0) }");
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].rule, "react-hooks/rules-of-hooks");
    }

    #[test]
    fn lints_any_type_annotations() {
        let report = lint("function f(x: any) {}");
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].rule, "@typescript-eslint/no-explicit-any");
        assert_eq!(report.warnings[0].column, 14);
    }

    #[test]
    fn lints_named_imports_as_potentially_unused() {
        let report = lint("import { Button, Card } from \"@/components/ui\"");
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].message.contains("'Button'"));
    }

    #[test]
    fn clean_code_produces_a_clean_report() {
        let report = lint("const total = items.length");
        assert!(report.is_clean());
    }
}
