pub use ast::*;

mod ast;
mod pretty_print;
