//! Classifies the names a compiled cell stores and loads.
//!
//! The walk starts at a cell's root unit and follows embedded-unit
//! payloads in first-in-first-out order, so every top-level store is
//! recorded before any nested body is examined. Scoping is flat: a
//! nested body's loads are checked against everything the cell stores
//! at the top level, not against what is in scope at the point the
//! body is defined. Resolution never fails: a name is either stored,
//! unbound, or uninteresting.

pub use builtins::BuiltinNames;
pub use resolver::Resolution;
use resolver::Resolver;

mod builtins;
mod resolver;

pub fn resolve_cell(
    compiled: &scry_code::CompiledCell,
    builtins: &BuiltinNames,
) -> Resolution {
    let resolver = Resolver::new(compiled, builtins);
    resolver.into_resolution()
}
