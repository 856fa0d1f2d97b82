//! Help text for an option table.

use crate::arity::Arity;
use crate::definition::{FlagIndex, OptionDeclaration, flag_token};

/// Text around the generated options table.
#[derive(Debug, Clone, Default)]
pub struct UsageMeta {
    /// Program name used in the `Usage:` line.
    pub program: String,
    /// What follows `[ OPTIONS ]` in the `Usage:` line, e.g. `<file> [<file> ...]`.
    pub arguments: String,
    /// Free text printed before the usage line.
    pub description: String,
}

/// Above this count `Exact(n)` is written as `<V> x n`.
const MAX_REPEATED_PLACEHOLDERS: usize = 4;

fn value_name(decl: &OptionDeclaration) -> String {
    decl.value_name_text()
        .map(|s| s.to_string())
        .unwrap_or_else(|| decl.canonical_key().to_ascii_uppercase())
}

fn format_values(decl: &OptionDeclaration) -> String {
    let v = value_name(decl);
    match decl.arity() {
        Arity::Exact(0) => String::new(),
        Arity::Exact(n) if n > MAX_REPEATED_PLACEHOLDERS => format!(" <{v}> x {n}"),
        Arity::Exact(n) => {
            let mut out = String::new();
            for _ in 0..n {
                out.push_str(&format!(" <{v}>"));
            }
            out
        }
        Arity::Optional => format!(" [<{v}>]"),
        Arity::ZeroOrMore => format!(" [<{v}>...]"),
        Arity::OneOrMore => format!(" <{v}>..."),
    }
}

/// Left column for one declaration: short flags first, then long ones.
pub fn format_flags(decl: &OptionDeclaration) -> String {
    let (short, long): (Vec<&String>, Vec<&String>) =
        decl.aliases().iter().partition(|a| a.chars().count() == 1);
    let names: Vec<String> = short
        .into_iter()
        .chain(long)
        .map(|a| flag_token(a))
        .collect();
    let mut out = names.join(", ");
    out.push_str(&format_values(decl));
    out
}

/// Render the help block for `index`.
///
/// ```text
///   Usage: tool [ OPTIONS ] <file>
///
///     -h, --help             Display this help message and exit.
/// ```
pub fn render(index: &FlagIndex, meta: &UsageMeta) -> String {
    let mut out = String::new();

    if !meta.description.trim().is_empty() {
        out.push('\n');
        for line in meta.description.trim().lines() {
            out.push_str(&format!("  {}\n", line.trim_end()));
        }
    }

    let program = if meta.program.trim().is_empty() {
        "<program>"
    } else {
        meta.program.trim()
    };
    out.push_str(&format!("\n  Usage: {program}"));
    if !index.is_empty() {
        out.push_str(" [ OPTIONS ]");
    }
    if !meta.arguments.trim().is_empty() {
        out.push_str(&format!(" {}", meta.arguments.trim()));
    }
    out.push('\n');

    let rows: Vec<(String, &str)> = index
        .declarations()
        .iter()
        .map(|d| (format_flags(d), d.help_text().map(str::trim).unwrap_or("")))
        .collect();
    if rows.is_empty() {
        return out;
    }

    out.push('\n');
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("    {left}\n"));
        } else {
            out.push_str(&format!("    {left:width$}  {help}\n"));
        }
    }

    out
}
