use std::rc::Rc;

use scry_utils::{Identifier, SpannedItem};

/// One parsed notebook cell.
pub struct Cell {
    pub statements: Vec<SpannedItem<Statement>>,
}

impl Cell {
    pub fn new(statements: Vec<SpannedItem<Statement>>) -> Cell {
        Self { statements }
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "Cell")?;
        for stmt in self.statements.iter() {
            match stmt.item() {
                Statement::Assignment(a) => writeln!(f, "  Assignment: {}", a.target.id)?,
                Statement::Expression(_) => writeln!(f, "  Expression")?,
                Statement::FunctionDef(fun) => writeln!(f, "  FunctionDef: {}", fun.name.id)?,
                Statement::Return(_) => writeln!(f, "  Return")?,
                Statement::Use(u) => writeln!(f, "  Use: {}", u.module.id)?,
                Statement::If(_) => writeln!(f, "  If")?,
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
pub enum Statement {
    Assignment(Assignment),
    Expression(SpannedItem<Expression>),
    FunctionDef(FunctionDef),
    Return(Return),
    Use(Use),
    If(If),
}

#[derive(Clone)]
pub struct Assignment {
    pub target: Identifier,
    pub value:  SpannedItem<Expression>,
}

#[derive(Clone)]
pub struct FunctionDef {
    pub name:       Identifier,
    pub parameters: Box<[Identifier]>,
    pub body:       Box<[SpannedItem<Statement>]>,
}

#[derive(Clone)]
pub struct Return {
    pub value: Option<SpannedItem<Expression>>,
}

/// `use telemetry as tm` binds `tm`; without the alias it binds the
/// module name itself.
#[derive(Clone)]
pub struct Use {
    pub module: Identifier,
    pub alias:  Option<Identifier>,
}

impl Use {
    /// the name this statement introduces into scope
    pub fn bound_name(&self) -> Identifier {
        self.alias.unwrap_or(self.module)
    }
}

#[derive(Clone)]
pub struct If {
    pub condition:   SpannedItem<Expression>,
    pub then_branch: Box<[SpannedItem<Statement>]>,
    pub else_branch: Option<Box<[SpannedItem<Statement>]>>,
}

#[derive(Clone)]
pub enum Expression {
    Literal(Literal),
    Variable(Identifier),
    Call(Call),
    Binary(Box<BinaryExpression>),
    List(List),
    Lambda(Lambda),
}

#[derive(Clone)]
pub struct Call {
    pub callee: Box<SpannedItem<Expression>>,
    pub args:   Box<[SpannedItem<Expression>]>,
}

#[derive(Clone)]
pub struct BinaryExpression {
    pub lhs: SpannedItem<Expression>,
    pub rhs: SpannedItem<Expression>,
    pub op:  SpannedItem<BinOp>,
}

#[derive(Clone)]
pub struct List {
    pub elements: Box<[SpannedItem<Expression>]>,
}

/// `|a, b| expr` — the body is compiled as its own code unit.
#[derive(Clone)]
pub struct Lambda {
    pub parameters: Box<[Identifier]>,
    pub body:       Box<SpannedItem<Expression>>,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Literal {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
}

impl std::fmt::Display for Literal {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BinOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equals,
    NotEquals,
}

impl std::fmt::Display for BinOp {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "add"),
            BinOp::Subtract => write!(f, "sub"),
            BinOp::Multiply => write!(f, "mul"),
            BinOp::Divide => write!(f, "div"),
            BinOp::Equals => write!(f, "eq"),
            BinOp::NotEquals => write!(f, "neq"),
        }
    }
}
