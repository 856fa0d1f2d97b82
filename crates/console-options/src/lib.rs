//! Declarative command-line option parsing.
//!
//! A tool describes its options as a table of `(aliases, arity)` rows, compiles
//! the table once into a [`FlagIndex`] and then parses any number of argument
//! vectors against it:
//!
//! ```
//! use console_options::{FlagIndex, Value};
//!
//! let index = FlagIndex::from_table(&[("help, h", "0"), ("select, s", "+")]).unwrap();
//! let argv = ["explore", "-s", "/a", "/b", "--", "-file.xml"];
//! let result = index.parse(&argv, true).unwrap();
//!
//! assert_eq!(
//!     result.get("select"),
//!     Some(&Value::List(vec!["/a".to_string(), "/b".to_string()]))
//! );
//! assert_eq!(result.positionals(), ["-file.xml"]);
//! ```
//!
//! Arity tokens are a non-negative integer (exactly that many values), `?`
//! (zero or one), `*` (zero or more) or `+` (one or more). Values are stored
//! under the first alias of each row; positional arguments are collected under
//! the `_` key.

mod arity;
mod definition;
mod error;
mod matches;
mod parser;
pub mod usage;
mod value;

pub use arity::Arity;
pub use definition::{FlagIndex, OptionDeclaration, flag_token};
pub use error::{DefinitionError, ParseError};
pub use matches::{POSITIONAL_KEY, ParseResult};
pub use parser::{parse, parse_table};
pub use value::Value;
