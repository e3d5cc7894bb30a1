//! Translates a small subset of Python into q.
//!
//! ```
//! let q = req::translate("def g(a, b):\n    return a * b\n").unwrap();
//! assert_eq!(q, "g: {[a; b] (a) * (b)}");
//! ```

pub mod ast;
pub mod driver;
pub mod error;
pub mod lexer;
pub mod literal;
pub mod options;
pub mod parser;
pub mod reflect;
pub mod token;
pub mod translator;

pub use driver::{Input, translate};
pub use error::TranslateError;
pub use literal::Literal;
pub use options::{Options, PowerToken};
pub use reflect::{DefinitionLookup, Reflect, SourceUnavailable};
pub use translator::Translator;
