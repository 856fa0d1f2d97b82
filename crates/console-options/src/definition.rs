use indexmap::IndexMap;

use crate::arity::Arity;
use crate::error::{DefinitionError, ParseError};
use crate::matches::ParseResult;

/// One row of an option table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDeclaration {
    aliases: Vec<String>,
    arity: Arity,
    help: Option<String>,
    value_name: Option<String>,
}

impl OptionDeclaration {
    /// Build a declaration from a comma-separated alias list such as `"help, h"`.
    ///
    /// Aliases are trimmed and empty pieces are dropped. At least one alias
    /// must survive.
    pub fn new(alias_csv: &str, arity: Arity) -> Result<Self, DefinitionError> {
        Self::with_index(0, alias_csv, arity)
    }

    /// Like [`OptionDeclaration::new`], but parses the arity token too.
    pub fn parse(alias_csv: &str, arity: &str) -> Result<Self, DefinitionError> {
        Self::new(alias_csv, arity.parse()?)
    }

    pub(crate) fn with_index(
        index: usize,
        alias_csv: &str,
        arity: Arity,
    ) -> Result<Self, DefinitionError> {
        let aliases: Vec<String> = alias_csv
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if aliases.is_empty() {
            return Err(DefinitionError::NoAliases { index });
        }
        Ok(Self {
            aliases,
            arity,
            help: None,
            value_name: None,
        })
    }

    /// Attach a one-line description used by [`usage::render`](crate::usage::render).
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Placeholder shown for this option's values in usage text.
    pub fn value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = Some(name.into());
        self
    }

    pub fn aliases(&self) -> &[String] {
        self.aliases.as_slice()
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// The first alias; values are stored under this key.
    pub fn canonical_key(&self) -> &str {
        &self.aliases[0]
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn value_name_text(&self) -> Option<&str> {
        self.value_name.as_deref()
    }

    /// Flag tokens for every alias, in declaration order.
    pub fn flag_tokens(&self) -> impl Iterator<Item = String> + '_ {
        self.aliases.iter().map(|alias| flag_token(alias))
    }
}

/// The token form of an alias: `-x` for one character, `--name` otherwise.
pub fn flag_token(alias: &str) -> String {
    if alias.chars().count() == 1 {
        format!("-{alias}")
    } else {
        format!("--{alias}")
    }
}

/// Compiled, read-only lookup from flag token to the declaration owning it.
///
/// Built once per tool run and shared by every parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagIndex {
    declarations: Vec<OptionDeclaration>,
    flags: IndexMap<String, usize>,
}

impl FlagIndex {
    /// Register every alias of every declaration.
    ///
    /// An alias registered twice keeps the later declaration.
    pub fn compile(declarations: Vec<OptionDeclaration>) -> Self {
        let mut flags: IndexMap<String, usize> = IndexMap::new();
        for (idx, decl) in declarations.iter().enumerate() {
            for flag in decl.flag_tokens() {
                if let Some(prev) = flags.insert(flag.clone(), idx) {
                    if prev != idx {
                        tracing::debug!(
                            flag = %flag,
                            previous = %declarations[prev].canonical_key(),
                            current = %decl.canonical_key(),
                            "duplicate option alias, later declaration wins"
                        );
                    }
                }
            }
        }
        Self {
            declarations,
            flags,
        }
    }

    /// Compile a table of `(alias_csv, arity_token)` rows, e.g.
    /// `[("help, h", "0"), ("select, s", "+")]`.
    pub fn from_table(table: &[(&str, &str)]) -> Result<Self, DefinitionError> {
        let declarations = table
            .iter()
            .enumerate()
            .map(|(idx, (names, arity))| {
                let arity: Arity = arity.parse()?;
                OptionDeclaration::with_index(idx, names, arity)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::compile(declarations))
    }

    /// The declaration owning `flag` (`-x` or `--name`).
    pub fn lookup(&self, flag: &str) -> Option<&OptionDeclaration> {
        self.flags.get(flag).map(|&idx| &self.declarations[idx])
    }

    pub fn declarations(&self) -> &[OptionDeclaration] {
        self.declarations.as_slice()
    }

    /// Registered flags with their owning declaration, in registration order.
    pub fn flags(&self) -> impl Iterator<Item = (&str, &OptionDeclaration)> + '_ {
        self.flags
            .iter()
            .map(|(flag, &idx)| (flag.as_str(), &self.declarations[idx]))
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Parse `argv` against this index. See [`parse`](crate::parse).
    pub fn parse<S: AsRef<str>>(&self, argv: &[S], strict: bool) -> Result<ParseResult, ParseError> {
        crate::parser::parse(self, argv, strict)
    }
}
