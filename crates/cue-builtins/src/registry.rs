//! The builtin table: one `Registry` implementing both `cue-compile`'s
//! compile-time `BuiltinLookup` and `cue-eval`'s eval-time `BuiltinRegistry`
//! over the same canonical `(id, name)` list, so a name always resolves to
//! the same id on both sides of compilation.

use std::rc::Rc;

use cue_compile::{BuiltinInfo, BuiltinLookup};
use cue_core::adt::{Expr, Value};
use cue_core::errors::Bottom;
use cue_core::{EnvId, Runtime, VertexId};
use cue_eval::registry::BuiltinRegistry;
use cue_eval::OpContext;

use crate::{and_or, arith, close, error_builtin, len, matchn, types};

const BUILTINS: &[&str] = &[
    "len", "close", "and", "or", "div", "mod", "quo", "rem", "error", "matchN", "string", "int",
    "float", "number", "bool", "bytes",
];

pub struct Registry;

impl BuiltinLookup for Registry {
    fn lookup(&self, name: &str) -> Option<BuiltinInfo> {
        let id = BUILTINS.iter().position(|&n| n == name)?;
        Some(BuiltinInfo {
            id: id as u32,
            name: Rc::from(name),
            since_version: None,
            required_experiment: None,
        })
    }
}

impl BuiltinRegistry for Registry {
    fn call(&self, rt: &mut Runtime, id: u32, name: &str, args: &[Value]) -> Value {
        match name {
            "len" => len::eval(rt, args, None),
            "close" => close::eval(rt, args, None),
            "and" => and_or::and(rt, args, None),
            "or" => and_or::or(rt, args, None),
            "div" => arith::div(args),
            "mod" => arith::cue_mod(args),
            "quo" => arith::quo(args),
            "rem" => arith::rem(args),
            "error" => error_builtin::eval(args),
            "string" | "int" | "float" | "number" | "bool" | "bytes" => {
                types::eval(name).unwrap_or_else(|| unreachable!("id {id} names a basic type"))
            }
            _ => Value::Bottom(Box::new(Bottom::eval(format!("unknown builtin `{name}`")))),
        }
    }

    fn call_with_arcs(
        &self,
        rt: &mut Runtime,
        id: u32,
        name: &str,
        args: &[Value],
        arg_vertices: &[Option<VertexId>],
    ) -> Value {
        match name {
            "len" => len::eval(rt, args, arg_vertices.first().copied().flatten()),
            "close" => close::eval(rt, args, arg_vertices.first().copied().flatten()),
            "and" => and_or::and(rt, args, arg_vertices.first().copied().flatten()),
            "or" => and_or::or(rt, args, arg_vertices.first().copied().flatten()),
            _ => self.call(rt, id, name, args),
        }
    }

    fn validator(
        &self,
        ctx: &mut OpContext,
        rt: &mut Runtime,
        registry: &dyn BuiltinRegistry,
        env: EnvId,
        _id: u32,
        name: &str,
        args: &[Expr],
    ) -> Value {
        match name {
            "matchN" => matchn::eval(ctx, rt, registry, env, args),
            _ => Value::Bottom(Box::new(Bottom::eval(format!(
                "unknown builtin validator `{name}`"
            )))),
        }
    }
}
