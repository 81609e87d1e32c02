use std::rc::Rc;

use scry_ast::{
    Assignment, BinaryExpression, BinOp, Call, Expression, FunctionDef, If, Lambda, List, Literal, Return, Statement, Use,
};
use scry_utils::{Identifier, SpannedItem};

use crate::{parser::ParseErrorKind, Parse, Parser, Token};

impl Parse for Statement {
    fn parse(p: &mut Parser) -> Option<Self> {
        p.skip_newlines();
        match *p.peek().item() {
            Token::Eof => None,
            Token::FnKeyword => Some(Statement::FunctionDef(p.parse()?)),
            Token::UseKeyword => Some(Statement::Use(p.parse()?)),
            Token::ReturnKeyword => Some(Statement::Return(p.parse()?)),
            Token::IfKeyword => Some(Statement::If(p.parse()?)),
            _ => assignment_or_expression(p),
        }
    }
}

/// Both assignments and expression statements begin with an expression, so
/// parse one and decide based on whether an `=` follows.
fn assignment_or_expression(p: &mut Parser) -> Option<Statement> {
    let expr = expression(p)?;
    if p.try_token(Token::Equals).is_none() {
        end_of_statement(p)?;
        return Some(Statement::Expression(expr));
    }
    let target = match expr.item() {
        Expression::Variable(ident) => *ident,
        _ => {
            p.push_error(expr.span().with_item(ParseErrorKind::InvalidAssignmentTarget));
            return None;
        },
    };
    let value = expression(p)?;
    end_of_statement(p)?;
    Some(Statement::Assignment(Assignment { target, value }))
}

/// Statements are newline-terminated. `end`, `else`, and EOF also close a
/// statement but belong to the enclosing block, so they are not consumed.
fn end_of_statement(p: &mut Parser) -> Option<()> {
    match *p.peek().item() {
        Token::Newline => {
            p.advance();
            Some(())
        },
        Token::Eof | Token::EndKeyword | Token::ElseKeyword | Token::NewFile(_) => Some(()),
        got => {
            let span = p.span();
            p.push_error(span.with_item(ParseErrorKind::ExpectedToken(Token::Newline, got)));
            None
        },
    }
}

/// Parse statements up to the `end` or `else` that closes the block. A
/// missing closer is reported by the caller, which knows what it expected.
fn block(p: &mut Parser) -> Option<Box<[SpannedItem<Statement>]>> {
    let mut buf = Vec::new();
    loop {
        p.skip_newlines();
        match *p.peek().item() {
            Token::EndKeyword | Token::ElseKeyword | Token::Eof => return Some(buf.into_boxed_slice()),
            _ => buf.push(p.parse()?),
        }
    }
}

impl Parse for FunctionDef {
    fn parse(p: &mut Parser) -> Option<Self> {
        p.with_help("while parsing function definition", |p| -> Option<Self> {
            p.token(Token::FnKeyword)?;
            let name = p.parse()?;
            p.token(Token::OpenParen)?;
            let parameters = comma_separated::<Identifier>(p, Token::CloseParen)?;
            end_of_statement(p)?;
            let body = block(p)?;
            p.token(Token::EndKeyword)?;
            end_of_statement(p)?;
            Some(Self {
                name,
                parameters: parameters.into_boxed_slice(),
                body,
            })
        })
    }
}

impl Parse for Use {
    fn parse(p: &mut Parser) -> Option<Self> {
        p.with_help("while parsing use statement", |p| -> Option<Self> {
            p.token(Token::UseKeyword)?;
            let module = p.parse()?;
            let alias = if p.try_token(Token::AsKeyword).is_some() { Some(p.parse()?) } else { None };
            end_of_statement(p)?;
            Some(Self { module, alias })
        })
    }
}

impl Parse for Return {
    fn parse(p: &mut Parser) -> Option<Self> {
        p.token(Token::ReturnKeyword)?;
        let value = match *p.peek().item() {
            Token::Newline | Token::Eof | Token::EndKeyword | Token::ElseKeyword | Token::NewFile(_) => None,
            _ => Some(expression(p)?),
        };
        end_of_statement(p)?;
        Some(Self { value })
    }
}

impl Parse for If {
    fn parse(p: &mut Parser) -> Option<Self> {
        p.with_help("while parsing if statement", |p| -> Option<Self> {
            p.token(Token::IfKeyword)?;
            let condition = expression(p)?;
            end_of_statement(p)?;
            let then_branch = block(p)?;
            let else_branch = if p.try_token(Token::ElseKeyword).is_some() {
                end_of_statement(p)?;
                Some(block(p)?)
            } else {
                None
            };
            p.token(Token::EndKeyword)?;
            end_of_statement(p)?;
            Some(Self {
                condition,
                then_branch,
                else_branch,
            })
        })
    }
}

impl Parse for Expression {
    fn parse(p: &mut Parser) -> Option<Self> {
        expression(p).map(SpannedItem::into_item)
    }
}

fn expression(p: &mut Parser) -> Option<SpannedItem<Expression>> {
    parse_comparison(p)
}

fn parse_comparison(p: &mut Parser) -> Option<SpannedItem<Expression>> {
    let mut lhs = parse_term(p)?;
    loop {
        let op = match *p.peek().item() {
            Token::EqualsEquals => BinOp::Equals,
            Token::BangEquals => BinOp::NotEquals,
            _ => return Some(lhs),
        };
        let op = p.advance().span().with_item(op);
        let rhs = parse_term(p)?;
        let span = lhs.span().join(rhs.span());
        lhs = span.with_item(Expression::Binary(Box::new(BinaryExpression { lhs, rhs, op })));
    }
}

fn parse_term(p: &mut Parser) -> Option<SpannedItem<Expression>> {
    let mut lhs = parse_factor(p)?;
    loop {
        let op = match *p.peek().item() {
            Token::Plus => BinOp::Add,
            Token::Minus => BinOp::Subtract,
            _ => return Some(lhs),
        };
        let op = p.advance().span().with_item(op);
        let rhs = parse_factor(p)?;
        let span = lhs.span().join(rhs.span());
        lhs = span.with_item(Expression::Binary(Box::new(BinaryExpression { lhs, rhs, op })));
    }
}

fn parse_factor(p: &mut Parser) -> Option<SpannedItem<Expression>> {
    let mut lhs = parse_postfix(p)?;
    loop {
        let op = match *p.peek().item() {
            Token::Star => BinOp::Multiply,
            Token::Slash => BinOp::Divide,
            _ => return Some(lhs),
        };
        let op = p.advance().span().with_item(op);
        let rhs = parse_postfix(p)?;
        let span = lhs.span().join(rhs.span());
        lhs = span.with_item(Expression::Binary(Box::new(BinaryExpression { lhs, rhs, op })));
    }
}

/// Calls are left-associative postfix, so `f(a)(b)` calls the result of
/// `f(a)`.
fn parse_postfix(p: &mut Parser) -> Option<SpannedItem<Expression>> {
    let mut expr = parse_primary(p)?;
    while p.try_token(Token::OpenParen).is_some() {
        let args = comma_separated::<SpannedItem<Expression>>(p, Token::CloseParen)?;
        let span = expr.span().join(p.span());
        expr = span.with_item(Expression::Call(Call {
            callee: Box::new(expr),
            args: args.into_boxed_slice(),
        }));
    }
    Some(expr)
}

fn parse_primary(p: &mut Parser) -> Option<SpannedItem<Expression>> {
    match *p.peek().item() {
        Token::Integer | Token::String | Token::True | Token::False => {
            let lit = p.parse::<SpannedItem<Literal>>()?;
            Some(lit.map(Expression::Literal))
        },
        Token::Identifier => {
            let ident: Identifier = p.parse()?;
            Some(ident.span.with_item(Expression::Variable(ident)))
        },
        Token::OpenParen => {
            p.advance();
            let expr = expression(p)?;
            p.token(Token::CloseParen)?;
            Some(expr)
        },
        Token::OpenBracket => {
            let open = p.advance();
            let elements = comma_separated::<SpannedItem<Expression>>(p, Token::CloseBracket)?;
            let span = open.span().join(p.span());
            Some(span.with_item(Expression::List(List {
                elements: elements.into_boxed_slice(),
            })))
        },
        Token::Pipe => {
            let lambda = p.parse::<SpannedItem<Lambda>>()?;
            Some(lambda.map(Expression::Lambda))
        },
        got => {
            let span = p.span();
            p.push_error(span.with_item(ParseErrorKind::ExpectedOneOf(
                vec![
                    Token::Integer,
                    Token::String,
                    Token::True,
                    Token::False,
                    Token::Identifier,
                    Token::OpenParen,
                    Token::OpenBracket,
                    Token::Pipe,
                ],
                got,
            )));
            None
        },
    }
}

impl Parse for Lambda {
    fn parse(p: &mut Parser) -> Option<Self> {
        p.with_help("while parsing lambda expression", |p| -> Option<Self> {
            p.token(Token::Pipe)?;
            let parameters = comma_separated::<Identifier>(p, Token::Pipe)?;
            let body = expression(p)?;
            Some(Self {
                parameters: parameters.into_boxed_slice(),
                body: Box::new(body),
            })
        })
    }
}

impl Parse for Literal {
    fn parse(p: &mut Parser) -> Option<Self> {
        let tok = p.advance();
        match *tok.item() {
            Token::Integer => {
                let slice = p.slice().to_string();
                match slice.parse::<i64>() {
                    Ok(value) => Some(Literal::Integer(value)),
                    Err(_) => {
                        p.push_error(tok.span().with_item(ParseErrorKind::IntegerLiteralTooLarge(slice)));
                        None
                    },
                }
            },
            Token::String => {
                let text = p.slice();
                // trim the quotes
                Some(Literal::String(Rc::from(&text[1..text.len() - 1])))
            },
            Token::True => Some(Literal::Boolean(true)),
            Token::False => Some(Literal::Boolean(false)),
            got => {
                let span = p.span();
                p.push_error(span.with_item(ParseErrorKind::ExpectedOneOf(
                    vec![Token::Integer, Token::String, Token::True, Token::False],
                    got,
                )));
                None
            },
        }
    }
}

impl Parse for Identifier {
    fn parse(p: &mut Parser) -> Option<Self> {
        let identifier_token = p.advance();
        if *identifier_token.item() != Token::Identifier {
            p.push_error(p.span().with_item(ParseErrorKind::ExpectedIdentifier(p.slice().to_string())));
            return None;
        }
        let slice = Rc::from(p.slice());
        let id = p.intern(slice);

        Some(Identifier { id, span: p.span() })
    }
}

/// Comma-separated items up to a closing token. Newlines between items are
/// insignificant, which is what lets call arguments span multiple lines.
fn comma_separated<P: Parse>(
    p: &mut Parser,
    close: Token,
) -> Option<Vec<P>> {
    let mut buf = Vec::new();
    p.skip_newlines();
    if p.try_token(close).is_some() {
        return Some(buf);
    }
    loop {
        buf.push(P::parse(p)?);
        p.skip_newlines();
        if p.try_token(Token::Comma).is_some() {
            p.skip_newlines();
            continue;
        }
        p.token(close)?;
        return Some(buf);
    }
}
