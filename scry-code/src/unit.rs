use std::rc::Rc;

use scry_utils::{Identifier, IndexMap, SymbolInterner};

use crate::ops::{ConstId, Op, UnitId};

/// What a unit is called in dumps and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitName {
    Cell,
    Function(Identifier),
    Lambda,
}

/// An entry in a unit's constant pool. `Unit` is how a lambda body
/// travels: the pool entry points at the nested unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Const {
    Int64(i64),
    String(Rc<str>),
    Bool(bool),
    Unit(UnitId),
}

/// One compiled body: the cell itself, a named function, or a lambda.
pub struct CodeUnit {
    pub name:         UnitName,
    pub params:       Vec<Identifier>,
    pub consts:       IndexMap<ConstId, Const>,
    pub instructions: Vec<Op>,
}

impl CodeUnit {
    pub fn new(
        name: UnitName,
        params: Vec<Identifier>,
    ) -> Self {
        Self {
            name,
            params,
            consts: Default::default(),
            instructions: Default::default(),
        }
    }

    fn render_name(
        &self,
        interner: &SymbolInterner,
    ) -> String {
        match self.name {
            UnitName::Cell => "<cell>".to_string(),
            UnitName::Lambda => "<lambda>".to_string(),
            UnitName::Function(name) => interner.get(name.id).to_string(),
        }
    }
}

/// All units produced from one cell. Nested units are inserted before
/// their parent, so the root is always the last entry.
pub struct CompiledCell {
    pub units: IndexMap<UnitId, CodeUnit>,
    pub root:  UnitId,
}

impl CompiledCell {
    pub fn pretty_print(
        &self,
        interner: &SymbolInterner,
    ) -> String {
        let mut result = String::new();
        for (id, unit) in self.units.iter() {
            if Into::<usize>::into(id) != 0 {
                result.push('\n');
            }
            if id == self.root {
                result.push_str("ENTRY: ");
            }
            result.push_str(&format!("unit {} ({}):\n", Into::<usize>::into(id), unit.render_name(interner)));
            if !unit.consts.is_empty() {
                result.push_str("; consts:\n");
                for (const_id, constant) in unit.consts.iter() {
                    result.push_str(&format!("{}: {:?}\n", Into::<usize>::into(const_id), constant));
                }
            }
            for (pc, op) in unit.instructions.iter().enumerate() {
                result.push_str(&format!(" {pc}\t{}\n", render_op(op, interner)));
            }
        }
        result
    }
}

fn render_op(
    op: &Op,
    interner: &SymbolInterner,
) -> String {
    match op {
        Op::StoreName(name) => format!("store_name {}", interner.get(*name)),
        Op::LoadName(name) => format!("load_name {}", interner.get(*name)),
        Op::StoreLocal(name) => format!("store_local {}", interner.get(*name)),
        Op::LoadLocal(name) => format!("load_local {}", interner.get(*name)),
        Op::LoadFree(name) => format!("load_free {}", interner.get(*name)),
        Op::LoadGlobal(name) => format!("load_global {}", interner.get(*name)),
        Op::Import(module) => format!("import {}", interner.get(*module)),
        other => format!("{other}"),
    }
}
