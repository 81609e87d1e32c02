#[cfg(test)]
mod tests;

mod lexer;
use std::rc::Rc;

use lexer::Lexer;
pub use lexer::Token;
use miette::Diagnostic;
use scry_ast::Cell;
use scry_utils::{IndexMap, SourceId, Span, SpannedItem, SymbolId, SymbolInterner};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub struct ParseError {
    kind: ParseErrorKind,
    help: Option<String>,
}

impl From<ParseErrorKind> for ParseError {
    fn from(kind: ParseErrorKind) -> Self {
        Self { kind, help: None }
    }
}

impl ParseError {
    pub fn with_help(
        mut self,
        help: Option<impl Into<String>>,
    ) -> Self {
        self.help = help.map(Into::into);
        self
    }
}

impl Diagnostic for ParseError {
    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.help.as_ref().map(|x| -> Box<dyn std::fmt::Display> { Box::new(x) })
    }

    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.kind.code()
    }

    fn severity(&self) -> Option<miette::Severity> {
        self.kind.severity()
    }

    fn url<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.kind.url()
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.kind.source_code()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        self.kind.labels()
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        self.kind.related()
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        self.kind.diagnostic_source()
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[derive(Error, Debug, Diagnostic, PartialEq)]
pub enum ParseErrorKind {
    #[error("Expected identifier, found {0}")]
    ExpectedIdentifier(String),
    #[error("Expected token {0}, found {1}")]
    ExpectedToken(Token, Token),
    #[error("Expected one of tokens {}; found {1}", format_toks(.0))]
    ExpectedOneOf(Vec<Token>, Token),
    #[error("Only a name can appear on the left-hand side of `=`")]
    InvalidAssignmentTarget,
    #[error("Integer literal {0} does not fit in 64 bits")]
    IntegerLiteralTooLarge(String),
}

impl ParseErrorKind {
    pub fn into_err(self) -> ParseError {
        self.into()
    }
}

fn format_toks(toks: &[Token]) -> String {
    let mut buf = toks
        .iter()
        .take(toks.len() - 1)
        .map(|t| format!("{}", t))
        .collect::<Vec<_>>()
        .join(", ");
    if toks.len() == 2 {
        buf.push_str(&format!(" or {}", toks.last().expect("toks is never empty")));
    } else if toks.len() > 2 {
        buf.push_str(&format!(", or {}", toks.last().expect("toks is never empty")));
    }
    buf
}

pub struct Parser {
    interner:   SymbolInterner,
    lexer:      Lexer,
    errors:     Vec<SpannedItem<ParseError>>,
    peek:       Option<SpannedItem<Token>>,
    // the tuple is the file name and content
    source_map: IndexMap<SourceId, (&'static str, &'static str)>,
    help:       Vec<String>,
    /// depth of `(`/`[` nesting, for implicit line joining
    nesting:    usize,
}

impl Parser {
    pub fn new(sources: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self::new_with_existing_interner_and_source_map(sources, Default::default(), Default::default())
    }

    /// Parse additional sources into an existing interner and source map.
    /// Symbol and source IDs stay stable across calls, which is what lets
    /// a session accumulate cells without re-keying anything.
    pub fn new_with_existing_interner_and_source_map(
        sources: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
        interner: SymbolInterner,
        mut source_map: IndexMap<SourceId, (&'static str, &'static str)>,
    ) -> Self {
        // the lexer holds a leaked copy of the source so it doesn't need
        // self-referential pointers into the parser
        let sources = sources
            .into_iter()
            .map(|(name, source)| -> (&'static str, &'static str) {
                let name = name.into();
                let source = source.into();
                (Box::leak(name.into_boxed_str()), Box::leak(source.into_boxed_str()))
            })
            .collect::<Vec<_>>();
        let sources_for_lexer = sources.iter().map(|(_, source)| *source);
        let lexer = Lexer::new_with_offset_into_sources(sources_for_lexer, source_map.len());
        for (name, source) in sources {
            source_map.insert((name, source));
        }
        Self {
            interner,
            lexer,
            errors: Default::default(),
            peek: None,
            source_map,
            help: Default::default(),
            nesting: 0,
        }
    }

    pub fn push_error(
        &mut self,
        err: SpannedItem<ParseErrorKind>,
    ) {
        if self.help.is_empty() {
            return self.errors.push(err.map(|err| err.into_err()));
        }
        let mut help_text = Vec::with_capacity(self.help.len());
        let mut indentation = 0;
        for help in &self.help {
            let text = format!("{}{}{help}", "  ".repeat(indentation), if indentation == 0 { "" } else { "↪ " });
            help_text.push(text);
            indentation += 1;
        }
        let err = err.map(|err| err.into_err().with_help(Some(help_text.join("\n"))));
        self.errors.push(err);
    }

    pub fn slice(&self) -> &str {
        self.lexer.slice()
    }

    pub fn intern(
        &mut self,
        internee: Rc<str>,
    ) -> SymbolId {
        self.interner.insert(internee)
    }

    pub fn span(&self) -> Span {
        self.lexer.span()
    }

    pub fn peek(&mut self) -> SpannedItem<Token> {
        if let Some(ref peek) = self.peek {
            *peek
        } else {
            let item = self.advance();
            self.peek = Some(item);
            item
        }
    }

    /// Newlines terminate statements, so they come through as tokens. The
    /// exception is inside an unclosed `(` or `[`, where lines join
    /// implicitly and the newline is dropped here.
    pub fn advance(&mut self) -> SpannedItem<Token> {
        if let Some(tok) = self.peek.take() {
            return tok;
        }
        loop {
            let tok = self.lexer.advance();
            match *tok.item() {
                Token::OpenParen | Token::OpenBracket => self.nesting += 1,
                Token::CloseParen | Token::CloseBracket => self.nesting = self.nesting.saturating_sub(1),
                Token::Newline if self.nesting > 0 => continue,
                _ => {},
            }
            return tok;
        }
    }

    /// Discards newline tokens where the grammar says they are
    /// insignificant: between statements and around lambda parameter pipes.
    pub fn skip_newlines(&mut self) {
        while matches!(*self.peek().item(), Token::Newline | Token::NewFile(_)) {
            self.advance();
        }
    }

    /// consume tokens until a node is produced
    pub fn into_result(
        mut self
    ) -> (
        Cell,
        Vec<SpannedItem<ParseError>>,
        SymbolInterner,
        IndexMap<SourceId, (&'static str, &'static str)>,
    ) {
        let statements = self.many::<SpannedItem<scry_ast::Statement>>();
        (Cell::new(statements), self.errors, self.interner, self.source_map)
    }

    pub fn many<P: Parse>(&mut self) -> Vec<P> {
        let mut buf = Vec::new();
        loop {
            if let Some(parsed_item) = P::parse(self) {
                buf.push(parsed_item);
            } else {
                break;
            }
        }
        buf
    }

    /// doesn't push the error to the error list and doesn't advance if the token is not found
    pub fn try_token(
        &mut self,
        tok: Token,
    ) -> Option<SpannedItem<Token>> {
        let peeked_token = self.peek();
        if *peeked_token.item() == tok {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn token(
        &mut self,
        tok: Token,
    ) -> Option<SpannedItem<Token>> {
        let peeked_token = self.peek();
        if *peeked_token.item() == tok {
            Some(self.advance())
        } else {
            let span = self.lexer.span();
            self.push_error(span.with_item(ParseErrorKind::ExpectedToken(tok, *peeked_token.item())));
            None
        }
    }

    pub fn parse<P: Parse>(&mut self) -> Option<P> {
        P::parse(self)
    }

    pub fn with_help<F, T>(
        &mut self,
        help_text: impl Into<String>,
        f: F,
    ) -> T
    where
        F: Fn(&mut Parser) -> T,
    {
        self.push_help(help_text);
        let res = f(self);
        self.pop_help();
        res
    }

    fn push_help(
        &mut self,
        arg: impl Into<String>,
    ) {
        self.help.push(arg.into())
    }

    fn pop_help(&mut self) {
        let _ = self.help.pop();
    }
}

pub trait Parse: Sized {
    fn parse(p: &mut Parser) -> Option<Self>;
}

impl<T> Parse for SpannedItem<T>
where
    T: Parse,
{
    fn parse(p: &mut Parser) -> Option<Self> {
        let before_span = p.lexer.span();
        let result = T::parse(p)?;
        let after_span = p.lexer.span();

        Some(before_span.hi_to_hi(after_span).with_item(result))
    }
}
