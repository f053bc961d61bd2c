//! `error(msg)` (spec.md §4.5): an explicit, user-raised `Bottom`.

use cue_core::adt::Value;
use cue_core::errors::Bottom;

pub fn eval(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::String(s)) => Value::Bottom(Box::new(Bottom::user(s.to_string()))),
        Some(other) if other.is_bottom() => other.clone(),
        Some(_) => Value::Bottom(Box::new(Bottom::eval("error() requires a string argument"))),
        None => Value::Bottom(Box::new(Bottom::user("explicit error"))),
    }
}
