use scry_ast::BinOp;
use scry_utils::{idx_map_key, SymbolId};

idx_map_key!(UnitId);

idx_map_key!(ConstId);

idx_map_key!(LabelId);

macro_rules! ops {
    ($($op_name:ident $op_code:literal $($args:ident $arg_name:ident),*);+) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
        pub enum Op {
            $(
                $op_name($($args),*),
            )+
        }


        impl std::fmt::Display for Op {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Op::$op_name($($arg_name),*) => {
                            write!(f, "{}", $op_code)?;
                            $(
                                write!(f, " {}", $arg_name)?;
                            )*
                            Ok(())
                        }
                    )+
                }
            }
        }
    };
}

ops! {
    StoreName "store_name" SymbolId name;
    LoadName "load_name" SymbolId name;
    StoreLocal "store_local" SymbolId name;
    LoadLocal "load_local" SymbolId name;
    LoadFree "load_free" SymbolId name;
    LoadGlobal "load_global" SymbolId name;
    Import "import" SymbolId module;
    LoadConst "ld_const" ConstId constant;
    MakeFunction "make_fn" UnitId unit;
    Call "call" usize arity;
    Binary "binary" BinOp op;
    BuildList "build_list" usize len;
    Pop "pop";
    Jump "jump" LabelId label;
    JumpIfFalse "jump_if_false" LabelId label;
    Label "label" LabelId label;
    Return "ret"
}
