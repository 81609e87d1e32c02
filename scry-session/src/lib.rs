//! The live session around the cell pipeline.
//!
//! A [`Session`] plays the host shell: it owns the builtin vocabulary,
//! keeps one symbol interner and source map alive across cells, and
//! tracks which names running a cell would bind. [`Session::inspect`]
//! answers what one cell stores and what it reads unbound, as JSON;
//! [`Session::run_cell`] additionally commits the stored names to the
//! live variable table.
//!
//! Cells are analyzed in isolation: a name bound by an earlier cell
//! still shows up as unbound in a later cell's report. That is the
//! signal front ends use to work out which cells feed which.

use std::{collections::BTreeSet, mem};

use scry_code::CompiledCell;
use scry_resolve::{resolve_cell, BuiltinNames, Resolution};
use scry_utils::{render_error, IndexMap, SourceId, SpannedItem, SymbolId, SymbolInterner};
use serde::Serialize;

pub use builtins::DEFAULT_BUILTINS;
pub use config::{find_config, BuiltinsConfig, ScryConfig, SessionConfig};
pub use error::SessionError;
pub use normalize::{normalize_cell, split_cells};

mod builtins;
mod config;
mod normalize;

pub mod error {
    use thiserror::Error;
    #[derive(Debug, Error)]
    pub enum SessionError {
        /// The cell could not be turned into code units. The rendered
        /// diagnostics are ready to print; there is no partial report.
        #[error("cell failed to compile")]
        Compile { diagnostics: Vec<String> },
        #[error(transparent)]
        Io(#[from] std::io::Error),
        #[error(transparent)]
        Toml(#[from] toml::de::Error),
    }
}

/// The wire form of one inspection: exactly the two name arrays, in
/// first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    stored_names:  Vec<String>,
    unbound_names: Vec<String>,
}

impl InspectReport {
    /// Names the cell binds at the top level.
    pub fn stored_names(&self) -> &[String] {
        &self.stored_names
    }

    /// Names the cell reads without binding them first and which no
    /// builtin provides.
    pub fn unbound_names(&self) -> &[String] {
        &self.unbound_names
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("name arrays always serialize")
    }
}

pub struct Session {
    builtins:     BuiltinNames,
    interner:     SymbolInterner,
    source_map:   IndexMap<SourceId, (&'static str, &'static str)>,
    /// names bound by the cells run so far, in binding order
    variables:    Vec<SymbolId>,
    /// shadow of `variables`, for membership checks
    bound:        BTreeSet<SymbolId>,
    cell_counter: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    /// Captures the builtin vocabulary. The set is fixed for the life
    /// of the session.
    pub fn new(config: SessionConfig) -> Self {
        let mut interner = SymbolInterner::default();
        let builtins = BuiltinNames::new(&mut interner, config.builtins());
        Self {
            builtins,
            interner,
            source_map: Default::default(),
            variables: Default::default(),
            bound: Default::default(),
            cell_counter: 0,
        }
    }

    /// Classifies one cell without committing anything.
    pub fn inspect(
        &mut self,
        source: &str,
    ) -> Result<InspectReport, SessionError> {
        let resolution = self.analyze(source)?;
        Ok(self.report(&resolution))
    }

    /// [`Session::inspect`], plus the host-shell effect of executing
    /// the cell: its stored names join the live variable table.
    pub fn run_cell(
        &mut self,
        source: &str,
    ) -> Result<InspectReport, SessionError> {
        let resolution = self.analyze(source)?;
        for name in resolution.stored_names() {
            if self.bound.insert(*name) {
                self.variables.push(*name);
            }
        }
        Ok(self.report(&resolution))
    }

    /// Names bound in the live session, in binding order.
    pub fn variables(&self) -> Vec<String> {
        self.render_names(&self.variables)
    }

    /// The `who` wire form: a bare JSON array of variable names.
    pub fn variables_json(&self) -> String {
        serde_json::to_string(&self.variables()).expect("variable names always serialize")
    }

    /// Debug dump of the compiled unit graph, for the `units` command.
    pub fn dump_units(
        &mut self,
        source: &str,
    ) -> Result<String, SessionError> {
        let compiled = self.compile(source)?;
        Ok(compiled.pretty_print(&self.interner))
    }

    fn analyze(
        &mut self,
        source: &str,
    ) -> Result<Resolution, SessionError> {
        let compiled = self.compile(source)?;
        Ok(resolve_cell(&compiled, &self.builtins))
    }

    fn compile(
        &mut self,
        source: &str,
    ) -> Result<CompiledCell, SessionError> {
        let name = format!("cell-{}", self.cell_counter);
        self.cell_counter += 1;
        let source = normalize_cell(source);

        // the interner and source map round-trip through the parser so
        // symbol and source IDs stay stable across cells
        let interner = mem::take(&mut self.interner);
        let source_map = mem::take(&mut self.source_map);
        let parser = scry_parse::Parser::new_with_existing_interner_and_source_map(vec![(name, source)], interner, source_map);
        let (cell, parse_errs, interner, source_map) = parser.into_result();
        self.interner = interner;
        self.source_map = source_map;

        let (compiled, lower_errs) = scry_code::lower(&cell);

        let mut diagnostics = self.render_diagnostics(parse_errs);
        diagnostics.append(&mut self.render_diagnostics(lower_errs));
        if !diagnostics.is_empty() {
            return Err(SessionError::Compile { diagnostics });
        }
        Ok(compiled)
    }

    fn render_diagnostics<T>(
        &self,
        errs: Vec<SpannedItem<T>>,
    ) -> Vec<String>
    where
        T: miette::Diagnostic + Send + Sync + 'static,
    {
        errs.into_iter().map(|err| format!("{:?}", render_error(&self.source_map, err))).collect()
    }

    fn report(
        &self,
        resolution: &Resolution,
    ) -> InspectReport {
        InspectReport {
            stored_names:  self.render_names(resolution.stored_names()),
            unbound_names: self.render_names(resolution.unbound_names()),
        }
    }

    fn render_names(
        &self,
        names: &[SymbolId],
    ) -> Vec<String> {
        names.iter().map(|name| self.interner.get(*name).to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use expect_test::{expect, Expect};

    use super::*;

    fn check_inspect(
        source: &str,
        expect: Expect,
    ) {
        let mut session = Session::default();
        let report = session.inspect(source).expect("cell should compile");
        expect.assert_eq(&report.to_json());
    }

    #[test]
    fn inspect_reports_stored_and_unbound() {
        check_inspect(
            "x = 1\nprint(x / y)",
            expect![[r#"{"stored_names":["x"],"unbound_names":["y"]}"#]],
        );
    }

    #[test]
    fn shadowing_a_builtin_counts_as_stored() {
        check_inspect(
            "len = 1\nprint(len)",
            expect![[r#"{"stored_names":["len"],"unbound_names":[]}"#]],
        );
    }

    #[test]
    fn nested_bodies_are_inspected() {
        check_inspect(
            "fn f()\nreturn missing_name\nend",
            expect![[r#"{"stored_names":["f"],"unbound_names":["missing_name"]}"#]],
        );
    }

    #[test]
    fn forward_reference_stays_unbound() {
        check_inspect(
            "print(x)\nx = 1",
            expect![[r#"{"stored_names":[],"unbound_names":["x"]}"#]],
        );
    }

    #[test]
    fn empty_cell_reports_nothing() {
        check_inspect("", expect![[r#"{"stored_names":[],"unbound_names":[]}"#]]);
    }

    #[test]
    fn magic_lines_are_blanked_before_parsing() {
        check_inspect(
            "%load_ext viz\nx = 1\n!ls\nprint(x)",
            expect![[r#"{"stored_names":["x"],"unbound_names":[]}"#]],
        );
    }

    #[test]
    fn repeated_inspects_are_deterministic() {
        let mut session = Session::default();
        let first = session.inspect("q = w\ne = q").expect("cell should compile").to_json();
        let second = session.inspect("q = w\ne = q").expect("cell should compile").to_json();
        assert_eq!(first, second);
        expect![[r#"{"stored_names":["q","e"],"unbound_names":["w"]}"#]].assert_eq(&second);
    }

    #[test]
    fn run_cell_accumulates_variables() {
        let mut session = Session::default();
        session.run_cell("a = 1\nb = a + 2").expect("cell should compile");
        session.run_cell("use tools as t\nc = t").expect("cell should compile");
        assert_eq!(session.variables(), vec!["a", "b", "t", "c"]);

        // re-binding an existing variable does not duplicate it
        session.run_cell("a = 9").expect("cell should compile");
        expect![[r#"["a","b","t","c"]"#]].assert_eq(&session.variables_json());
    }

    #[test]
    fn inspect_does_not_commit_variables() {
        let mut session = Session::default();
        session.inspect("z = 1").expect("cell should compile");
        assert!(session.variables().is_empty());
    }

    #[test]
    fn cells_are_analyzed_in_isolation() {
        let mut session = Session::default();
        session.run_cell("a = 1").expect("cell should compile");
        let report = session.inspect("b = a").expect("cell should compile");
        expect![[r#"{"stored_names":["b"],"unbound_names":["a"]}"#]].assert_eq(&report.to_json());
    }

    #[test]
    fn compile_errors_are_reported_not_fatal() {
        let mut session = Session::default();
        match session.inspect("fn broken(") {
            Err(SessionError::Compile { diagnostics }) => assert!(!diagnostics.is_empty()),
            other => panic!("expected a compile error, got {other:?}"),
        }

        // the session survives the bad cell
        let report = session.inspect("x = 1").expect("cell should compile");
        expect![[r#"{"stored_names":["x"],"unbound_names":[]}"#]].assert_eq(&report.to_json());
    }

    #[test]
    fn extended_builtins_are_never_unbound() {
        let mut session = Session::new(SessionConfig::default().extend_builtins(["display"]));
        let report = session.inspect("display(data)").expect("cell should compile");
        expect![[r#"{"stored_names":[],"unbound_names":["data"]}"#]].assert_eq(&report.to_json());
    }

    #[test]
    fn units_dump_shows_the_compiled_cell() {
        let mut session = Session::default();
        let dump = session.dump_units("f = |x| x").expect("cell should compile");
        expect![[r#"
            unit 0 (<lambda>):
             0	store_local x
             1	load_local x
             2	ret

            ENTRY: unit 1 (<cell>):
            ; consts:
            0: Unit(UnitId(0))
             0	ld_const constid0
             1	store_name f
             2	ret
        "#]]
        .assert_eq(&dump);
    }
}
