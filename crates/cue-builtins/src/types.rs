//! Predeclared basic-type identifiers: `string`, `int`, `float`, `number`,
//! `bool`, `bytes` (spec.md §4.5). Each compiles through the ordinary
//! rule-5 builtin-lookup path to `Expr::Builtin` (there is no dedicated
//! "BasicType" AST node) and evaluates with zero arguments to a bare
//! `Value::TypeConstraint`.

use cue_core::adt::Value;
use cue_core::Kind;

pub fn kind_for(name: &str) -> Option<Kind> {
    Some(match name {
        "string" => Kind::STRING,
        "int" => Kind::INT,
        "float" => Kind::FLOAT,
        "number" => Kind::NUMBER,
        "bool" => Kind::BOOL,
        "bytes" => Kind::BYTES,
        _ => return None,
    })
}

pub fn eval(name: &str) -> Option<Value> {
    kind_for(name).map(Value::TypeConstraint)
}
