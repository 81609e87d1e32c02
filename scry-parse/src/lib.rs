mod parse_to_ast;
mod parser;

pub use parser::{Parse, ParseError, ParseErrorKind, Parser, Token};
