use std::collections::{BTreeSet, VecDeque};

use scry_code::{CodeUnit, CompiledCell, Const, Op, UnitId};
use scry_utils::{SymbolId, SymbolInterner};

use crate::BuiltinNames;

/// The classification of every interesting name in one cell, in the
/// order each name was first seen during the walk.
#[derive(Debug, Clone)]
pub struct Resolution {
    stored:  Vec<SymbolId>,
    unbound: Vec<SymbolId>,
}

impl Resolution {
    /// Names the cell binds at the top level.
    pub fn stored_names(&self) -> &[SymbolId] {
        &self.stored
    }

    /// Names the cell reads without binding them first and which no
    /// builtin provides.
    pub fn unbound_names(&self) -> &[SymbolId] {
        &self.unbound
    }

    pub fn pretty_print(
        &self,
        interner: &SymbolInterner,
    ) -> String {
        let mut result = String::new();
        result.push_str(&render_names("stored", &self.stored, interner));
        result.push_str(&render_names("unbound", &self.unbound, interner));
        result
    }
}

fn render_names(
    label: &str,
    names: &[SymbolId],
    interner: &SymbolInterner,
) -> String {
    if names.is_empty() {
        return format!("{label}:\n");
    }
    let names = names.iter().map(|name| interner.get(*name).to_string()).collect::<Vec<_>>().join(", ");
    format!("{label}: {names}\n")
}

pub struct Resolver<'a> {
    compiled:     &'a CompiledCell,
    builtins:     &'a BuiltinNames,
    stored:       Vec<SymbolId>,
    unbound:      Vec<SymbolId>,
    /// shadows of the two ordered lists, for membership checks
    seen_stored:  BTreeSet<SymbolId>,
    seen_unbound: BTreeSet<SymbolId>,
    queue:        VecDeque<UnitId>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        compiled: &'a CompiledCell,
        builtins: &'a BuiltinNames,
    ) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(compiled.root);
        Self {
            compiled,
            builtins,
            stored: Default::default(),
            unbound: Default::default(),
            seen_stored: Default::default(),
            seen_unbound: Default::default(),
            queue,
        }
    }

    /// Drains the worklist. Units run in the order they were discovered,
    /// so the root finishes before any unit it embeds begins.
    pub fn into_resolution(mut self) -> Resolution {
        let compiled = self.compiled;
        while let Some(unit_id) = self.queue.pop_front() {
            self.visit_unit(compiled.units.get(unit_id));
        }
        Resolution {
            stored:  self.stored,
            unbound: self.unbound,
        }
    }

    fn visit_unit(
        &mut self,
        unit: &CodeUnit,
    ) {
        for op in &unit.instructions {
            match op {
                Op::StoreName(name) => self.record_store(*name),
                Op::LoadName(name) | Op::LoadGlobal(name) => self.record_load(*name),
                Op::MakeFunction(child) => self.queue.push_back(*child),
                Op::LoadConst(constant) => {
                    if let Const::Unit(child) = unit.consts.get(*constant) {
                        self.queue.push_back(*child);
                    }
                },
                // locals, free loads, and imports never affect the
                // stored or unbound sets
                _ => {},
            }
        }
    }

    /// A name whose first appearance was a load stays unbound; a later
    /// store does not reclassify it.
    fn record_store(
        &mut self,
        name: SymbolId,
    ) {
        if self.seen_stored.contains(&name) || self.seen_unbound.contains(&name) {
            return;
        }
        self.seen_stored.insert(name);
        self.stored.push(name);
    }

    fn record_load(
        &mut self,
        name: SymbolId,
    ) {
        if self.seen_stored.contains(&name) || self.seen_unbound.contains(&name) || self.builtins.contains(name) {
            return;
        }
        self.seen_unbound.insert(name);
        self.unbound.push(name);
    }
}

#[cfg(test)]
mod tests {
    use expect_test::{expect, Expect};
    use scry_utils::render_error;

    use crate::{resolve_cell, BuiltinNames};

    fn check(
        input: impl Into<String>,
        expect: Expect,
    ) {
        let input = input.into();
        let parser = scry_parse::Parser::new(vec![("test", input)]);
        let (cell, errs, mut interner, source_map) = parser.into_result();
        if !errs.is_empty() {
            errs.into_iter().for_each(|err| eprintln!("{:?}", render_error(&source_map, err)));
            panic!("test failed: code didn't parse");
        }
        let (compiled, errs) = scry_code::lower(&cell);
        assert!(errs.is_empty(), "test failed: code didn't lower: {errs:?}");

        let builtins = BuiltinNames::new(&mut interner, ["print", "len", "sum"]);
        let resolution = resolve_cell(&compiled, &builtins);

        expect.assert_eq(&resolution.pretty_print(&interner));
    }

    #[test]
    fn stored_then_loaded() {
        check(
            "x = 1\nprint(x)",
            expect![[r#"
                stored: x
                unbound:
            "#]],
        );
    }

    #[test]
    fn load_before_store_stays_unbound() {
        check(
            "print(x)\nx = 1",
            expect![[r#"
                stored:
                unbound: x
            "#]],
        );
    }

    #[test]
    fn first_occurrence_order_is_kept() {
        check(
            "b = 1\na = 2\nprint(zeta)\nprint(alpha)",
            expect![[r#"
                stored: b, a
                unbound: zeta, alpha
            "#]],
        );
    }

    #[test]
    fn repeated_names_appear_once() {
        check(
            "x = 1\nx = 2\nprint(x)",
            expect![[r#"
                stored: x
                unbound:
            "#]],
        );
    }

    #[test]
    fn nested_units_discovered_through_payloads() {
        check(
            "fn f()\nreturn g()\nend\nh = |x| f(x) + q",
            expect![[r#"
                stored: f, h
                unbound: g, q
            "#]],
        );
    }

    #[test]
    fn store_after_definition_reaches_the_body() {
        check(
            "fn f()\nreturn later\nend\nlater = 1",
            expect![[r#"
                stored: f, later
                unbound:
            "#]],
        );
    }

    #[test]
    fn locals_are_invisible() {
        check(
            "fn f(a)\nb = a + 1\nreturn b\nend\nf(2)",
            expect![[r#"
                stored: f
                unbound:
            "#]],
        );
    }

    #[test]
    fn builtins_never_count_as_unbound() {
        check(
            "n = len(data)",
            expect![[r#"
                stored: n
                unbound: data
            "#]],
        );
    }

    #[test]
    fn imports_bind_their_name() {
        check(
            "use telemetry as tm\ntm",
            expect![[r#"
                stored: tm
                unbound:
            "#]],
        );
    }

    #[test]
    fn lambda_in_lambda() {
        check(
            "make = |a| |b| a + b + seed",
            expect![[r#"
                stored: make
                unbound: seed
            "#]],
        );
    }

    #[test]
    fn both_if_branches_are_walked() {
        check(
            "if cond\nx = use_then\nelse\ny = use_else\nend",
            expect![[r#"
                stored: x, y
                unbound: cond, use_then, use_else
            "#]],
        );
    }
}
