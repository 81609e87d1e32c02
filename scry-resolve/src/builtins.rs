use std::{collections::BTreeSet, rc::Rc};

use scry_utils::{SymbolId, SymbolInterner};

/// The ambient vocabulary a session provides: names that resolve without
/// ever being stored by a cell. Fixed at construction time.
#[derive(Debug, Clone)]
pub struct BuiltinNames {
    names: BTreeSet<SymbolId>,
}

impl BuiltinNames {
    /// Interns each builtin so later membership checks are id comparisons.
    pub fn new(
        interner: &mut SymbolInterner,
        names: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        let names = names.into_iter().map(|name| interner.insert(Rc::from(name.as_ref()))).collect();
        Self { names }
    }

    pub fn contains(
        &self,
        name: SymbolId,
    ) -> bool {
        self.names.contains(&name)
    }
}
