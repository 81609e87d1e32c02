//! Lowering from the cell AST to flat instruction streams.
//!
//! Each function or lambda body becomes its own [`CodeUnit`] with a
//! private constant pool. Nested bodies are reachable only through the
//! `make_fn` and `ld_const` payloads of their parent, never by scanning
//! the cell as a whole.

use std::collections::BTreeSet;

use scry_ast::{Cell, Expression, Literal, Statement};
use scry_utils::{Identifier, IndexMap, SpannedItem, SymbolId};

mod error;
mod ops;
mod unit;

pub use error::LowerError;
pub use ops::{ConstId, LabelId, Op, UnitId};
pub use unit::{CodeUnit, CompiledCell, Const, UnitName};

pub fn lower(cell: &Cell) -> (CompiledCell, Vec<SpannedItem<LowerError>>) {
    let mut lowerer = Lowerer::default();
    let root = lowerer.lower_root(cell);
    (
        CompiledCell {
            units: lowerer.units,
            root,
        },
        lowerer.errors,
    )
}

#[derive(Default)]
struct Lowerer {
    units:           IndexMap<UnitId, CodeUnit>,
    errors:          Vec<SpannedItem<LowerError>>,
    /// the local names of each function body currently being lowered,
    /// innermost last; empty at the top level of the cell
    locals_in_scope: Vec<BTreeSet<SymbolId>>,
    label_assigner:  usize,
}

impl Lowerer {
    fn lower_root(
        &mut self,
        cell: &Cell,
    ) -> UnitId {
        let mut unit = CodeUnit::new(UnitName::Cell, vec![]);
        self.lower_statements_into(&mut unit, &cell.statements);
        finish_unit(&mut unit);
        self.units.insert(unit)
    }

    fn lower_function_unit(
        &mut self,
        name: UnitName,
        params: &[Identifier],
        body: &[SpannedItem<Statement>],
    ) -> UnitId {
        let mut locals: BTreeSet<SymbolId> = params.iter().map(|param| param.id).collect();
        collect_bound_names(body, &mut locals);
        let mut unit = CodeUnit::new(name, params.to_vec());
        for param in params {
            unit.instructions.push(Op::StoreLocal(param.id));
        }
        self.with_locals_scope(locals, |ctx| {
            ctx.lower_statements_into(&mut unit, body);
        });
        finish_unit(&mut unit);
        self.units.insert(unit)
    }

    fn lower_lambda_unit(
        &mut self,
        params: &[Identifier],
        body: &SpannedItem<Expression>,
    ) -> UnitId {
        let locals: BTreeSet<SymbolId> = params.iter().map(|param| param.id).collect();
        let mut unit = CodeUnit::new(UnitName::Lambda, params.to_vec());
        for param in params {
            unit.instructions.push(Op::StoreLocal(param.id));
        }
        self.with_locals_scope(locals, |ctx| {
            ctx.lower_expression(&mut unit, body);
        });
        unit.instructions.push(Op::Return());
        self.units.insert(unit)
    }

    fn lower_statements_into(
        &mut self,
        unit: &mut CodeUnit,
        statements: &[SpannedItem<Statement>],
    ) {
        for stmt in statements {
            self.lower_statement(unit, stmt);
        }
    }

    fn lower_statement(
        &mut self,
        unit: &mut CodeUnit,
        stmt: &SpannedItem<Statement>,
    ) {
        match stmt.item() {
            Statement::Assignment(assignment) => {
                self.lower_expression(unit, &assignment.value);
                self.store(unit, assignment.target);
            },
            Statement::Expression(expr) => {
                self.lower_expression(unit, expr);
                unit.instructions.push(Op::Pop());
            },
            Statement::FunctionDef(func) => {
                let child = self.lower_function_unit(UnitName::Function(func.name), &func.parameters, &func.body);
                unit.instructions.push(Op::MakeFunction(child));
                self.store(unit, func.name);
            },
            Statement::Return(ret) => {
                if self.locals_in_scope.is_empty() {
                    self.errors.push(stmt.span().with_item(LowerError::ReturnOutsideFunction));
                }
                if let Some(value) = &ret.value {
                    self.lower_expression(unit, value);
                }
                unit.instructions.push(Op::Return());
            },
            Statement::Use(import) => {
                unit.instructions.push(Op::Import(import.module.id));
                self.store(unit, import.bound_name());
            },
            Statement::If(if_stmt) => {
                self.lower_expression(unit, &if_stmt.condition);
                let else_label = self.fresh_label();
                unit.instructions.push(Op::JumpIfFalse(else_label));
                self.lower_statements_into(unit, &if_stmt.then_branch);
                match &if_stmt.else_branch {
                    Some(else_branch) => {
                        let end_label = self.fresh_label();
                        unit.instructions.push(Op::Jump(end_label));
                        unit.instructions.push(Op::Label(else_label));
                        self.lower_statements_into(unit, else_branch);
                        unit.instructions.push(Op::Label(end_label));
                    },
                    None => {
                        unit.instructions.push(Op::Label(else_label));
                    },
                }
            },
        }
    }

    fn lower_expression(
        &mut self,
        unit: &mut CodeUnit,
        expr: &SpannedItem<Expression>,
    ) {
        match expr.item() {
            Expression::Literal(lit) => {
                let constant = unit.consts.insert(literal_to_const(lit));
                unit.instructions.push(Op::LoadConst(constant));
            },
            Expression::Variable(name) => self.load(unit, *name),
            Expression::Call(call) => {
                self.lower_expression(unit, &call.callee);
                for arg in call.args.iter() {
                    self.lower_expression(unit, arg);
                }
                unit.instructions.push(Op::Call(call.args.len()));
            },
            Expression::Binary(binary) => {
                self.lower_expression(unit, &binary.lhs);
                self.lower_expression(unit, &binary.rhs);
                unit.instructions.push(Op::Binary(*binary.op.item()));
            },
            Expression::List(list) => {
                for element in list.elements.iter() {
                    self.lower_expression(unit, element);
                }
                unit.instructions.push(Op::BuildList(list.elements.len()));
            },
            Expression::Lambda(lambda) => {
                let child = self.lower_lambda_unit(&lambda.parameters, &lambda.body);
                let constant = unit.consts.insert(Const::Unit(child));
                unit.instructions.push(Op::LoadConst(constant));
            },
        }
    }

    /// A store binds into the innermost function scope, or into the
    /// cell's global namespace at the top level.
    fn store(
        &mut self,
        unit: &mut CodeUnit,
        name: Identifier,
    ) {
        match self.locals_in_scope.last() {
            Some(_) => unit.instructions.push(Op::StoreLocal(name.id)),
            None => unit.instructions.push(Op::StoreName(name.id)),
        }
    }

    fn load(
        &mut self,
        unit: &mut CodeUnit,
        name: Identifier,
    ) {
        let op = match self.locals_in_scope.last() {
            None => Op::LoadName(name.id),
            Some(locals) if locals.contains(&name.id) => Op::LoadLocal(name.id),
            Some(_) => {
                let enclosing = &self.locals_in_scope[..self.locals_in_scope.len() - 1];
                if enclosing.iter().any(|scope| scope.contains(&name.id)) {
                    Op::LoadFree(name.id)
                } else {
                    Op::LoadGlobal(name.id)
                }
            },
        };
        unit.instructions.push(op);
    }

    /// Produces a new locals scope for the duration of `func`
    fn with_locals_scope<F, T>(
        &mut self,
        locals: BTreeSet<SymbolId>,
        func: F,
    ) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        self.locals_in_scope.push(locals);
        let res = func(self);
        self.locals_in_scope.pop();
        res
    }

    fn fresh_label(&mut self) -> LabelId {
        let label = self.label_assigner;
        self.label_assigner += 1;
        LabelId::from(label)
    }
}

/// Every unit ends in `ret`. An explicit trailing `return` already
/// provides one.
fn finish_unit(unit: &mut CodeUnit) {
    if !matches!(unit.instructions.last(), Some(Op::Return())) {
        unit.instructions.push(Op::Return());
    }
}

/// Names assigned anywhere in a function body are locals of the whole
/// body, even where a load appears before the store. Nested function and
/// lambda bodies bind their own scopes and are not descended into.
fn collect_bound_names(
    statements: &[SpannedItem<Statement>],
    bound: &mut BTreeSet<SymbolId>,
) {
    for stmt in statements {
        match stmt.item() {
            Statement::Assignment(assignment) => {
                bound.insert(assignment.target.id);
            },
            Statement::FunctionDef(func) => {
                bound.insert(func.name.id);
            },
            Statement::Use(import) => {
                bound.insert(import.bound_name().id);
            },
            Statement::If(if_stmt) => {
                collect_bound_names(&if_stmt.then_branch, bound);
                if let Some(else_branch) = &if_stmt.else_branch {
                    collect_bound_names(else_branch, bound);
                }
            },
            Statement::Expression(_) | Statement::Return(_) => {},
        }
    }
}

fn literal_to_const(lit: &Literal) -> Const {
    match lit {
        Literal::Integer(value) => Const::Int64(*value),
        Literal::Boolean(value) => Const::Bool(*value),
        Literal::String(value) => Const::String(value.clone()),
    }
}
