use thiserror::Error;

/// A declaration table that cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("option declaration {index} has no aliases")]
    NoAliases { index: usize },

    #[error("invalid arity '{token}' (expected a non-negative integer, '?', '*' or '+')")]
    InvalidArity { token: String },
}

/// Why a parse did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The declaration table was unusable, so nothing was parsed.
    #[error("invalid option definitions: {0}")]
    InvalidInput(#[from] DefinitionError),

    /// Strict mode met a flag that no declaration owns. Carries the flag token
    /// as written (`--name` for `--name=value`, `-x` for one letter of `-xyz`).
    #[error("unknown option \"{0}\"")]
    UnknownOption(String),
}

impl ParseError {
    /// The offending flag token, if this is an unknown-option error.
    pub fn unknown_option(&self) -> Option<&str> {
        match self {
            Self::UnknownOption(flag) => Some(flag.as_str()),
            Self::InvalidInput(_) => None,
        }
    }
}
