use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};

use crate::error::DefinitionError;

/// How many values an option takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly `n` values. `Exact(0)` is a plain switch.
    Exact(usize),
    /// Zero or one value (`?`).
    Optional,
    /// Zero or more values (`*`).
    ZeroOrMore,
    /// One or more values (`+`).
    OneOrMore,
}

impl Arity {
    /// Whether values for this arity are collected into a list.
    pub fn is_list(self) -> bool {
        match self {
            Self::Exact(n) => n > 1,
            Self::ZeroOrMore | Self::OneOrMore => true,
            Self::Optional => false,
        }
    }

    /// Whether seeing the bare flag already records it as present.
    pub fn accepts_bare_flag(self) -> bool {
        matches!(self, Self::Exact(0) | Self::Optional | Self::ZeroOrMore)
    }
}

impl FromStr for Arity {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "?" => Ok(Self::Optional),
            "*" => Ok(Self::ZeroOrMore),
            "+" => Ok(Self::OneOrMore),
            other => other
                .parse::<usize>()
                .map(Self::Exact)
                .map_err(|_| DefinitionError::InvalidArity {
                    token: s.to_string(),
                }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Optional => f.write_str("?"),
            Self::ZeroOrMore => f.write_str("*"),
            Self::OneOrMore => f.write_str("+"),
        }
    }
}

/// Accepts either a JSON number (`2`) or a token string (`"2"`, `"?"`, `"*"`, `"+"`).
impl<'de> Deserialize<'de> for Arity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ArityVisitor;

        impl de::Visitor<'_> for ArityVisitor {
            type Value = Arity;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or one of \"?\", \"*\", \"+\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Arity, E> {
                usize::try_from(v)
                    .map(Arity::Exact)
                    .map_err(|_| E::custom(format!("arity {v} is too large")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Arity, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom(format!("arity {v} is negative")))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Arity, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(ArityVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::Arity;
    use crate::DefinitionError;

    #[test]
    fn parses_tokens() {
        assert_eq!("0".parse::<Arity>().unwrap(), Arity::Exact(0));
        assert_eq!(" 3 ".parse::<Arity>().unwrap(), Arity::Exact(3));
        assert_eq!("?".parse::<Arity>().unwrap(), Arity::Optional);
        assert_eq!("*".parse::<Arity>().unwrap(), Arity::ZeroOrMore);
        assert_eq!("+".parse::<Arity>().unwrap(), Arity::OneOrMore);
    }

    #[test]
    fn rejects_unknown_tokens() {
        for token in ["-1", "x", "", "1.5", "**"] {
            match token.parse::<Arity>() {
                Err(DefinitionError::InvalidArity { token: t }) => assert_eq!(t, token),
                other => panic!("expected InvalidArity for {token:?}, got: {other:?}"),
            }
        }
    }

    #[test]
    fn display_matches_token() {
        for token in ["0", "2", "?", "*", "+"] {
            assert_eq!(token.parse::<Arity>().unwrap().to_string(), token);
        }
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let arities: Vec<Arity> = serde_json::from_str(r#"[0, "1", "?", "*", "+", 4]"#).unwrap();
        assert_eq!(
            arities,
            vec![
                Arity::Exact(0),
                Arity::Exact(1),
                Arity::Optional,
                Arity::ZeroOrMore,
                Arity::OneOrMore,
                Arity::Exact(4),
            ]
        );
        assert!(serde_json::from_str::<Arity>("-2").is_err());
        assert!(serde_json::from_str::<Arity>(r#""many""#).is_err());
    }

    #[test]
    fn bare_flag_arities() {
        assert!(Arity::Exact(0).accepts_bare_flag());
        assert!(Arity::Optional.accepts_bare_flag());
        assert!(Arity::ZeroOrMore.accepts_bare_flag());
        assert!(!Arity::Exact(1).accepts_bare_flag());
        assert!(!Arity::Exact(3).accepts_bare_flag());
        assert!(!Arity::OneOrMore.accepts_bare_flag());
    }

    #[test]
    fn list_arities() {
        assert!(!Arity::Exact(0).is_list());
        assert!(!Arity::Exact(1).is_list());
        assert!(Arity::Exact(2).is_list());
        assert!(!Arity::Optional.is_list());
        assert!(Arity::ZeroOrMore.is_list());
        assert!(Arity::OneOrMore.is_list());
    }
}
