//! Pretty-print the AST for tests and ease of development.

use scry_utils::{PrettyPrint, SymbolInterner};

use crate::*;

impl PrettyPrint for Cell {
    fn pretty_print(
        &self,
        interner: &SymbolInterner,
        indentation: usize,
    ) -> String {
        let mut buf = String::from("Cell\n");
        for stmt in &self.statements {
            buf.push_str(&stmt.pretty_print(interner, indentation + 1));
        }
        buf
    }
}

impl PrettyPrint for Statement {
    fn pretty_print(
        &self,
        interner: &SymbolInterner,
        indentation: usize,
    ) -> String {
        let indent = "  ".repeat(indentation);
        match self {
            Statement::Assignment(a) => format!(
                "{indent}assign {} = {}\n",
                a.target.pretty_print(interner, 0),
                a.value.pretty_print(interner, 0)
            ),
            Statement::Expression(e) => format!("{indent}expr {}\n", e.pretty_print(interner, 0)),
            Statement::FunctionDef(fun) => {
                let params = fun
                    .parameters
                    .iter()
                    .map(|param| param.pretty_print(interner, 0))
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut buf = format!("{indent}fn {}({params})\n", fun.name.pretty_print(interner, 0));
                for stmt in fun.body.iter() {
                    buf.push_str(&stmt.pretty_print(interner, indentation + 1));
                }
                buf
            },
            Statement::Return(ret) => match &ret.value {
                Some(value) => format!("{indent}return {}\n", value.pretty_print(interner, 0)),
                None => format!("{indent}return\n"),
            },
            Statement::Use(u) => match u.alias {
                Some(alias) => format!(
                    "{indent}use {} as {}\n",
                    u.module.pretty_print(interner, 0),
                    alias.pretty_print(interner, 0)
                ),
                None => format!("{indent}use {}\n", u.module.pretty_print(interner, 0)),
            },
            Statement::If(if_stmt) => {
                let mut buf = format!("{indent}if {}\n", if_stmt.condition.pretty_print(interner, 0));
                for stmt in if_stmt.then_branch.iter() {
                    buf.push_str(&stmt.pretty_print(interner, indentation + 1));
                }
                if let Some(else_branch) = &if_stmt.else_branch {
                    buf.push_str(&format!("{indent}else\n"));
                    for stmt in else_branch.iter() {
                        buf.push_str(&stmt.pretty_print(interner, indentation + 1));
                    }
                }
                buf
            },
        }
    }
}

impl PrettyPrint for Expression {
    fn pretty_print(
        &self,
        interner: &SymbolInterner,
        indentation: usize,
    ) -> String {
        match self {
            Expression::Literal(lit) => format!("{lit}"),
            Expression::Variable(v) => format!("var({})", v.pretty_print(interner, 0)),
            Expression::Call(call) => {
                let args = call
                    .args
                    .iter()
                    .map(|arg| arg.pretty_print(interner, 0))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("call({} [{args}])", call.callee.pretty_print(interner, 0))
            },
            Expression::Binary(bin) => format!(
                "{}({} {})",
                bin.op.item(),
                bin.lhs.pretty_print(interner, indentation),
                bin.rhs.pretty_print(interner, indentation)
            ),
            Expression::List(list) => {
                let elements = list
                    .elements
                    .iter()
                    .map(|elt| elt.pretty_print(interner, 0))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{elements}]")
            },
            Expression::Lambda(lambda) => {
                let params = lambda
                    .parameters
                    .iter()
                    .map(|param| param.pretty_print(interner, 0))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("lambda(|{params}| {})", lambda.body.pretty_print(interner, 0))
            },
        }
    }
}
