//! Tokenizer for cell sources. Use through `Parser::advance` rather than
//! directly; the parser owns peeking and error reporting.
#[cfg(test)]
mod tests;

use logos::Logos;
use scry_utils::{IndexMap, SourceId, Span, SpannedItem};

#[derive(Debug, Logos, PartialEq, Clone, Copy)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(",")]
    Comma,
    #[token("|")]
    Pipe,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    BangEquals,
    #[token("=")]
    Equals,
    #[token("\n")]
    Newline,
    #[regex("[0-9]+")]
    Integer,
    #[regex(r#""([^"\\]|\\["\\bnfrt]|u[a-fA-F0-9]{4})*""#)]
    String,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("fn")]
    FnKeyword,
    #[token("end")]
    EndKeyword,
    #[token("return")]
    ReturnKeyword,
    #[token("use")]
    UseKeyword,
    #[token("as")]
    AsKeyword,
    #[token("if")]
    IfKeyword,
    #[token("else")]
    ElseKeyword,
    #[regex("[_a-zA-Z][_a-zA-Z0-9]{0,30}")]
    Identifier,
    NewFile(SourceId),
    Eof,
    /// produced when the lexer hits input no pattern matches; the parser
    /// reports it and the cell fails to compile instead of panicking
    Unrecognized,
}

impl std::fmt::Display for Token {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        use Token::*;
        match self {
            OpenParen => write!(f, "("),
            CloseParen => write!(f, ")"),
            OpenBracket => write!(f, "["),
            CloseBracket => write!(f, "]"),
            Comma => write!(f, ","),
            Pipe => write!(f, "|"),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Star => write!(f, "*"),
            Slash => write!(f, "/"),
            EqualsEquals => write!(f, "=="),
            BangEquals => write!(f, "!="),
            Equals => write!(f, "="),
            Newline => write!(f, "newline"),
            Integer => write!(f, "integer"),
            String => write!(f, "string"),
            True => write!(f, "true"),
            False => write!(f, "false"),
            FnKeyword => write!(f, "fn"),
            EndKeyword => write!(f, "end"),
            ReturnKeyword => write!(f, "return"),
            UseKeyword => write!(f, "use"),
            AsKeyword => write!(f, "as"),
            IfKeyword => write!(f, "if"),
            ElseKeyword => write!(f, "else"),
            Identifier => write!(f, "identifier"),
            NewFile(source_id) => write!(f, "new file {source_id:?}"),
            Eof => write!(f, "EOF"),
            Unrecognized => write!(f, "unrecognized input"),
        }
    }
}

pub type LexedSources = IndexMap<SourceId, logos::Lexer<'static, Token>>;

#[derive(Clone)]
pub struct Lexer {
    sources: LexedSources,
    source: SourceId,
    has_started_lexing: bool,
    offset: usize,
}

impl Lexer {
    pub fn new(sources: impl IntoIterator<Item = &'static str>) -> Self {
        Self::new_with_offset_into_sources(sources, 0)
    }

    /// `offset` shifts the [`SourceId`]s this lexer hands out, so sources
    /// can be appended to an already-populated source map.
    pub fn new_with_offset_into_sources(
        sources: impl IntoIterator<Item = &'static str>,
        offset: usize,
    ) -> Self {
        let mut map: IndexMap<_, _> = Default::default();
        for source in sources {
            let lexer = Token::lexer(source);
            map.insert(lexer);
        }
        Self {
            sources: map,
            source: 0.into(),
            has_started_lexing: false,
            offset,
        }
    }

    pub fn current_source(&self) -> SourceId {
        (Into::<usize>::into(self.source) + self.offset).into()
    }

    pub fn span(&self) -> Span {
        Span::new(self.current_source(), self.current_lexer().span().into())
    }

    pub fn slice(&self) -> &str {
        self.current_lexer().slice()
    }

    pub(crate) fn advance(&mut self) -> SpannedItem<Token> {
        let pre_advance_span = self.span();
        if !self.has_started_lexing {
            self.has_started_lexing = true;
            return self.span().with_item(Token::NewFile(self.current_source()));
        }
        let current_lexer = self.current_lexer_mut();

        match current_lexer.next() {
            None => match self.advance_lexer() {
                Some(_) => self.span().with_item(Token::NewFile(self.current_source())),

                None => pre_advance_span.with_item(Token::Eof),
            },
            Some(tok) => self.span().with_item(tok.unwrap_or(Token::Unrecognized)),
        }
    }

    fn current_lexer_mut(&mut self) -> &mut logos::Lexer<'static, Token> {
        self.sources.get_mut(self.source)
    }

    fn current_lexer(&self) -> &logos::Lexer<'static, Token> {
        self.sources.get(self.source)
    }

    /// advances to the next lexer, returning a reference to it if there is one
    fn advance_lexer(&mut self) -> Option<&mut logos::Lexer<'static, Token>> {
        if Into::<usize>::into(self.source) == self.sources.len() - 1 {
            return None;
        }
        self.source = (Into::<usize>::into(self.source) + 1usize).into();
        Some(self.current_lexer_mut())
    }
}
