use serde::{Serialize, Serializer};

/// A value stored for one option in a [`ParseResult`](crate::ParseResult).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// The flag was seen without an argument.
    ///
    /// Switches (`Exact(0)`) always hold this; `?` and `*` options hold it
    /// until a real value arrives.
    Flag,
    /// A single value (`Exact(1)` and `?` options).
    Scalar(String),
    /// Values in the order they were given (`Exact(n>1)`, `*` and `+` options).
    List(Vec<String>),
}

impl Value {
    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Flag)
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s.as_str()),
            Self::Flag | Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values.as_slice()),
            Self::Flag | Self::Scalar(_) => None,
        }
    }

    /// Number of stored entries. A flag or scalar counts as one.
    pub fn len(&self) -> usize {
        match self {
            Self::List(values) => values.len(),
            Self::Flag | Self::Scalar(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Flag => serializer.serialize_bool(true),
            Self::Scalar(s) => serializer.serialize_str(s),
            Self::List(values) => values.serialize(serializer),
        }
    }
}
