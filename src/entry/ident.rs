//! Rust identifier validation and the optional sanitising rewrite.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

/// Strict and reserved keywords of the 2024 edition, none of which may name a constant.
const KEYWORDS: &[&str] = &[
    "Self", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv",
    "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Treatment of file names that are not legal identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierPolicy {
    /// Fail the run, naming the file and the rejected identifier.
    #[default]
    Reject,
    /// Rewrite the name into a legal identifier and warn about the rename.
    Sanitize,
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("invalid identifier regex"))
}

fn is_keyword(candidate: &str) -> bool {
    KEYWORDS.contains(&candidate)
}

/// Check `candidate` against the ASCII identifier grammar and the keyword list.
pub fn check_identifier(candidate: &str) -> Result<(), &'static str> {
    if candidate.is_empty() {
        return Err("is empty");
    }
    if candidate == "_" {
        return Err("is the `_` placeholder, which cannot name an item");
    }
    if !identifier_pattern().is_match(candidate) {
        return if candidate.starts_with(|c: char| c.is_ascii_digit()) {
            Err("must not start with a digit")
        } else {
            Err("may only contain ASCII letters, digits and underscores")
        };
    }
    if is_keyword(candidate) {
        return Err("is a reserved Rust keyword");
    }
    Ok(())
}

/// Rewrite `name` into a legal identifier, or `None` when nothing usable remains.
pub fn sanitize_identifier(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }

    let mut base = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>();

    while base.contains("__") {
        base = base.replace("__", "_");
    }

    if base.starts_with(|c: char| c.is_ascii_digit()) {
        base = format!("_{base}");
    }

    if base == "_" || is_keyword(&base) {
        base.push('_');
    }

    Some(base)
}

/// Resolve the identifier for `name` under `policy`.
///
/// Returns the identifier and whether it differs from `name`.
pub fn resolve_identifier(
    name: &str,
    policy: IdentifierPolicy,
) -> Result<(String, bool), &'static str> {
    match check_identifier(name) {
        Ok(()) => Ok((name.to_string(), false)),
        Err(reason) => match policy {
            IdentifierPolicy::Reject => Err(reason),
            IdentifierPolicy::Sanitize => sanitize_identifier(name)
                .map(|identifier| (identifier, true))
                .ok_or(reason),
        },
    }
}
