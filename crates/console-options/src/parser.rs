use std::collections::HashSet;

use crate::arity::Arity;
use crate::definition::{FlagIndex, OptionDeclaration};
use crate::error::ParseError;
use crate::matches::{Input, ParseResult};

/// Longest run of letters accepted as combined short flags (`-abc`).
const MAX_COMBINED_SHORTS: usize = 60;

/// Where the next bare token goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Active<'a> {
    /// Positionals.
    None,
    /// After `--`: everything is positional, verbatim.
    Terminated,
    /// The flag that is still waiting for values. `reopened` is set when a
    /// fixed-size option is named again after its list was already full.
    Option { flag: &'a str, reopened: bool },
}

/// Parse `argv` against `index`.
///
/// The first element is treated as the program name and skipped unless it
/// starts with `-`. Tokens are trimmed and empty ones ignored. Recognized
/// forms:
/// - `--` ends option scanning; later tokens are positional
/// - `--name=value` / `-x=value` assign directly
/// - `-abc` sets each of `-a`, `-b`, `-c`
/// - `--name` / `-x` followed by as many bare tokens as its arity allows
///
/// A token the active option refuses (already set, list full) becomes a
/// positional. `Exact(n)` options with `n > 1` are left out of the result when
/// they did not end up with exactly `n` values, or when more than `n` values
/// were attached to the flag itself (`--pair a b --pair c`, `--pair=c`).
///
/// With `strict`, the first unknown flag aborts the parse with
/// [`ParseError::UnknownOption`]; otherwise unknown flags are ignored.
pub fn parse<S: AsRef<str>>(
    index: &FlagIndex,
    argv: &[S],
    strict: bool,
) -> Result<ParseResult, ParseError> {
    let mut result = ParseResult::default();

    let argv = match argv.first().map(|s| s.as_ref()) {
        Some(program) if !program.is_empty() && !program.starts_with('-') => &argv[1..],
        _ => argv,
    };
    if argv.is_empty() {
        return Ok(result);
    }

    let mut active = Active::None;
    let mut oversupplied: HashSet<&str> = HashSet::new();

    for raw in argv {
        let arg = raw.as_ref().trim();
        if arg.is_empty() {
            continue;
        }

        if active == Active::Terminated {
            result.push_positional(arg);
            continue;
        }
        if arg == "--" {
            active = Active::Terminated;
            continue;
        }

        if arg.starts_with('-') && arg != "-" {
            active = Active::None;

            // --name=value
            if let Some((flag, value)) = arg.split_once('=') {
                match index.lookup(flag) {
                    Some(decl) => {
                        if !result.accumulate(decl, Input::Literal(value)) {
                            tracing::trace!(flag, value, "value rejected");
                            if is_fixed_list(decl) {
                                oversupplied.insert(decl.canonical_key());
                            }
                        }
                    }
                    None => unknown(flag, strict)?,
                }
                continue;
            }

            // -abc
            if let Some(letters) = combined_shorts(arg) {
                for c in letters.chars() {
                    let flag = format!("-{c}");
                    match index.lookup(&flag) {
                        Some(decl) => {
                            result.accumulate(decl, Input::Flag);
                        }
                        None => unknown(&flag, strict)?,
                    }
                }
                continue;
            }

            let Some(decl) = index.lookup(arg) else {
                unknown(arg, strict)?;
                continue;
            };
            let arity = decl.arity();
            if arity.accepts_bare_flag() {
                result.accumulate(decl, Input::Flag);
            }
            active = match arity {
                // Switches never wait for a value.
                Arity::Exact(0) => Active::None,
                Arity::Exact(n) => {
                    let full = result
                        .get(decl.canonical_key())
                        .is_some_and(|v| v.len() >= n);
                    Active::Option {
                        flag: arg,
                        reopened: full && n > 1,
                    }
                }
                Arity::Optional | Arity::ZeroOrMore | Arity::OneOrMore => Active::Option {
                    flag: arg,
                    reopened: false,
                },
            };
            continue;
        }

        let Active::Option { flag, reopened } = active else {
            result.push_positional(arg);
            continue;
        };
        let Some(decl) = index.lookup(flag) else {
            result.push_positional(arg);
            continue;
        };
        if !result.accumulate(decl, Input::Literal(arg)) {
            tracing::trace!(flag, arg, "option refused value, keeping as positional");
            if reopened && is_fixed_list(decl) {
                oversupplied.insert(decl.canonical_key());
            }
            result.push_positional(arg);
        }
    }

    drop_unsatisfied(index, &mut result, &oversupplied);

    Ok(result)
}

/// Compile `table` and parse `argv` against it in one step.
///
/// A table that does not compile yields [`ParseError::InvalidInput`] and
/// nothing is parsed.
pub fn parse_table<S: AsRef<str>>(
    table: &[(&str, &str)],
    argv: &[S],
    strict: bool,
) -> Result<ParseResult, ParseError> {
    let index = FlagIndex::from_table(table)?;
    parse(&index, argv, strict)
}

fn unknown(flag: &str, strict: bool) -> Result<(), ParseError> {
    if strict {
        return Err(ParseError::UnknownOption(flag.to_string()));
    }
    tracing::debug!(flag, "ignoring unknown option");
    Ok(())
}

/// The letters of `-abc`, if `arg` is a dash followed by 2..=60 ASCII letters.
fn combined_shorts(arg: &str) -> Option<&str> {
    let letters = arg.strip_prefix('-')?;
    let ok = (2..=MAX_COMBINED_SHORTS).contains(&letters.len())
        && letters.bytes().all(|b| b.is_ascii_alphabetic());
    ok.then_some(letters)
}

fn is_fixed_list(decl: &OptionDeclaration) -> bool {
    matches!(decl.arity(), Arity::Exact(n) if n > 1)
}

/// Remove `Exact(n > 1)` options that did not receive exactly `n` values or
/// were handed more through their own flag.
fn drop_unsatisfied(
    index: &FlagIndex,
    result: &mut ParseResult,
    oversupplied: &HashSet<&str>,
) {
    for decl in index.declarations() {
        let Arity::Exact(n) = decl.arity() else {
            continue;
        };
        if n <= 1 {
            continue;
        }
        let key = decl.canonical_key();
        let Some(got) = result.get(key).map(|v| v.len()) else {
            continue;
        };
        if got != n || oversupplied.contains(key) {
            tracing::debug!(
                option = key,
                expected = n,
                got,
                "dropping option with wrong value count"
            );
            result.remove(key);
        }
    }
}
