use miette::Diagnostic;
use thiserror::Error;

#[derive(Clone, Debug, Error, Diagnostic, PartialEq)]
pub enum LowerError {
    #[error("`return` outside of a function")]
    ReturnOutsideFunction,
}
