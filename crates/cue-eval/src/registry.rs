//! Consulted for `Expr::Builtin`/`Expr::BuiltinValidator` (spec.md §4.5).
//!
//! `cue-builtins` implements this trait so `cue-eval` never has to depend
//! on it directly, mirroring `cue-compile`'s `BuiltinLookup` split.

use cue_core::adt::{Expr, Value};
use cue_core::errors::Bottom;
use cue_core::{EnvId, Runtime, VertexId};

use crate::op_context::OpContext;

pub trait BuiltinRegistry {
    /// Invoke the builtin named `name` (registered under `id`) with
    /// already-evaluated `args`.
    fn call(&self, rt: &mut Runtime, id: u32, name: &str, args: &[Value]) -> Value;

    /// Build the validator `Value` a `BuiltinValidator` expression
    /// compiles to (`matchN`'s `Value::MatchN`, currently the only one).
    /// Takes the raw argument expressions rather than pre-evaluated
    /// `Value`s: `matchN`'s schema list must stay unevaluated until each
    /// schema is unified against a concrete operand, which a flat `&[Value]`
    /// can't express once the list collapses to `Value::ListMarker`.
    #[allow(clippy::too_many_arguments)]
    fn validator(
        &self,
        ctx: &mut OpContext,
        rt: &mut Runtime,
        registry: &dyn BuiltinRegistry,
        env: EnvId,
        id: u32,
        name: &str,
        args: &[Expr],
    ) -> Value;

    /// Like `call`, but also given the vertex each argument evaluated from
    /// when it resolved to one (`None` for a literal or computed value with
    /// no backing vertex). `len`, `and`, and `or` need an argument's arcs,
    /// which `Value` alone can't carry; by the time a builtin call sees an
    /// argument, `finalize_vertex` has already finalized that vertex's
    /// children, so their `base_value`s are safe to read directly. Defaults
    /// to ignoring the vertices.
    fn call_with_arcs(
        &self,
        rt: &mut Runtime,
        id: u32,
        name: &str,
        args: &[Value],
        _arg_vertices: &[Option<VertexId>],
    ) -> Value {
        self.call(rt, id, name, args)
    }
}

/// A registry with nothing registered, for evaluating closed expressions
/// with no builtin surface.
pub struct NoBuiltins;

impl BuiltinRegistry for NoBuiltins {
    fn call(&self, _rt: &mut Runtime, _id: u32, name: &str, _args: &[Value]) -> Value {
        Value::Bottom(Box::new(Bottom::eval(format!("unknown builtin `{name}`"))))
    }

    fn validator(
        &self,
        _ctx: &mut OpContext,
        _rt: &mut Runtime,
        _registry: &dyn BuiltinRegistry,
        _env: EnvId,
        _id: u32,
        name: &str,
        _args: &[Rc<Expr>],
    ) -> Value {
        Value::Bottom(Box::new(Bottom::eval(format!(
            "unknown builtin validator `{name}`"
        ))))
    }
}
