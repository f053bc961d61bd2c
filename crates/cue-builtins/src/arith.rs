//! `div`, `mod`, `quo`, `rem` (spec.md §4.5): the integer division family,
//! distinct from `/` and `%` (which CUE also defines but are compiled as
//! `BinaryExpr`, not these builtins).
//!
//! `div`/`mod` are Euclidean (`Kind::INT` only); `quo`/`rem` truncate
//! toward zero, matching Rust's native `/`/`%` on integers.

use cue_core::adt::{NumValue, Value};
use cue_core::errors::Bottom;

fn two_ints(name: &str, args: &[Value]) -> Result<(i64, i64), Value> {
    if let Some(bottom) = args.iter().find_map(|v| v.as_bottom()) {
        return Err(Value::Bottom(Box::new(bottom.clone())));
    }
    let [a, b] = args else {
        return Err(Value::Bottom(Box::new(Bottom::eval(format!(
            "{name}() takes exactly two arguments"
        )))));
    };
    match (a, b) {
        (Value::Num(NumValue::Int(x)), Value::Num(NumValue::Int(y))) => Ok((*x, *y)),
        _ => Err(Value::Bottom(Box::new(Bottom::eval(format!(
            "{name}() requires two int arguments"
        ))))),
    }
}

fn zero_check(name: &str, divisor: i64) -> Option<Value> {
    if divisor == 0 {
        Some(Value::Bottom(Box::new(Bottom::eval(format!(
            "division by zero in {name}()"
        )))))
    } else {
        None
    }
}

pub fn div(args: &[Value]) -> Value {
    match two_ints("div", args) {
        Ok((x, y)) => zero_check("div", y)
            .unwrap_or_else(|| Value::Num(NumValue::Int(x.div_euclid(y)))),
        Err(bottom) => bottom,
    }
}

pub fn cue_mod(args: &[Value]) -> Value {
    match two_ints("mod", args) {
        Ok((x, y)) => {
            zero_check("mod", y).unwrap_or_else(|| Value::Num(NumValue::Int(x.rem_euclid(y))))
        }
        Err(bottom) => bottom,
    }
}

pub fn quo(args: &[Value]) -> Value {
    match two_ints("quo", args) {
        Ok((x, y)) => zero_check("quo", y).unwrap_or_else(|| Value::Num(NumValue::Int(x / y))),
        Err(bottom) => bottom,
    }
}

pub fn rem(args: &[Value]) -> Value {
    match two_ints("rem", args) {
        Ok((x, y)) => zero_check("rem", y).unwrap_or_else(|| Value::Num(NumValue::Int(x % y))),
        Err(bottom) => bottom,
    }
}
