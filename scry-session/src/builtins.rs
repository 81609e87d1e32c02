/// The default always-bound vocabulary of a session.
///
/// These are the names a fresh kernel provides before any cell runs;
/// loading one never makes a cell depend on another cell. `scry.toml`
/// can extend the list for preludes injected by the host environment.
pub const DEFAULT_BUILTINS: &[&str] = &[
    "abs", "bool", "filter", "input", "int", "len", "map", "max", "min", "print", "range", "sort", "str", "sum", "type_of",
];
