//! The facade tying the compiler, evaluator, builtins, and exporter
//! together (spec.md §6 "Exposed operations on the runtime"), in the shape
//! of the teacher's `plotnik-lib` `Query`/`QueryBuilder` facade: one struct
//! owning the shared mutable state (`Runtime`), with the pipeline stages as
//! methods on it rather than free functions threading the state by hand.

use cue_core::adt::{CloseInfo, Conjunct, Value};
use cue_core::{ast, Errors, Feature, Runtime, VertexId};

use cue_builtins::Registry;
use cue_compile::{Compiler, CompilerBuilder, Config};
use cue_eval::{collect_bottoms, finalize_vertex, OpContext};

use crate::error::{Error, Result};

/// One evaluation session: the `Runtime` plus the one builtin registry
/// consulted both at compile time (resolution rule 5, spec.md §4.2) and at
/// eval time (`Expr::Builtin`/`Expr::BuiltinValidator`, spec.md §4.5).
pub struct Engine {
    pub runtime: Runtime,
    registry: Registry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            runtime: Runtime::new(),
            registry: Registry,
        }
    }

    fn compiler<'c>(&self, config: Config<'c>) -> Compiler<'c> {
        CompilerBuilder::new(config, &self.registry).build()
    }

    /// `compile_files` (spec.md §6): lowers a package's files into one root
    /// vertex. A `CompileError` is fatal to the whole compilation (spec.md
    /// §7), so unlike `finalize`'s per-vertex `Bottom`s this surfaces as a
    /// `Result` rather than an `Errors` list.
    pub fn compile_files(&mut self, config: Config<'_>, files: &[ast::File]) -> Result<VertexId> {
        let compiler = self.compiler(config);
        compiler
            .compile_files(&mut self.runtime, files)
            .map_err(Error::from)
    }

    /// `compile_expr` (spec.md §6): compiles a single closed expression
    /// against the same scope rules, returning it as a `Conjunct` ready to
    /// be pushed onto a caller-owned vertex (e.g. a REPL's working value).
    pub fn compile_expr(
        &mut self,
        config: Config<'_>,
        expr: &ast::Expr,
        language: ast::LanguageVersion,
    ) -> Result<Conjunct> {
        let compiler = self.compiler(config);
        let (compiled, env) = compiler
            .compile_expr(&mut self.runtime, expr, language)
            .map_err(Error::from)?;
        Ok(Conjunct::new(env, compiled, CloseInfo::open()))
    }

    /// `finalize` (spec.md §6): evaluates `v` and every vertex it
    /// transitively reaches. Idempotent (spec.md §8 "finalize idempotence");
    /// calling it again on an already-finalized vertex just returns its
    /// settled value.
    pub fn finalize(&mut self, v: VertexId) -> Value {
        let mut ctx = OpContext::new();
        finalize_vertex(&mut ctx, &mut self.runtime, &self.registry, v)
    }

    /// `value_at_path` (spec.md §6): walks `path`'s features from `v`,
    /// stopping at the first arc that doesn't exist.
    pub fn value_at_path(&self, v: VertexId, path: &[Feature]) -> Option<VertexId> {
        path.iter()
            .try_fold(v, |cur, f| self.runtime.vertex(cur).get_arc(*f))
    }

    /// Supplemented convenience over `value_at_path`: a dotted selector
    /// string (`"a.b.c"`), interned against the live `Runtime` so each
    /// segment resolves to the same `Feature` a compiled field label would.
    /// Every embedding of this kind of engine needs to project a sub-vertex
    /// by human-readable path, for tests and error messages.
    pub fn value_at_dotted_path(&mut self, v: VertexId, path: &str) -> Option<VertexId> {
        let features: Vec<Feature> = path
            .split('.')
            .filter(|seg| !seg.is_empty())
            .map(|seg| self.runtime.interner.intern(seg))
            .collect();
        self.value_at_path(v, &features)
    }

    /// `export` (spec.md §6): regenerates an AST from a finalized vertex.
    /// Kept thin per spec.md's explicit scope note; see `cue-export`.
    pub fn export(&self, v: VertexId) -> ast::File {
        cue_export::export_vertex(&self.runtime, v)
    }

    /// The top-level Bottom-collecting walk spec.md §7 requires: "users
    /// observe errors by walking the finalized tree; a top-level function
    /// that concatenates all Bottoms beneath a vertex is provided."
    pub fn collect_errors(&self, v: VertexId) -> Errors {
        collect_bottoms(&self.runtime, &self.runtime.interner, v)
    }
}

#[cfg(test)]
mod engine_tests {
    use super::*;
    use cue_compile::NoImports;
    use rowan::{TextRange, TextSize};

    fn zero_range() -> TextRange {
        TextRange::new(TextSize::from(0), TextSize::from(0))
    }

    fn ident(text: &str) -> ast::Ident {
        ast::Ident {
            text: text.to_string(),
            range: zero_range(),
            bound: ast::BoundTo::Unresolved,
        }
    }

    fn field(name: &str, value: ast::Expr) -> ast::Decl {
        ast::Decl::Field(ast::FieldDecl {
            label: ident(name),
            label_alias: None,
            value: Box::new(value),
            range: zero_range(),
        })
    }

    fn file(decls: Vec<ast::Decl>) -> ast::File {
        ast::File {
            decls,
            language: ast::LanguageVersion::default(),
            range: zero_range(),
        }
    }

    #[test]
    fn compiles_finalizes_and_projects_a_value() {
        let mut engine = Engine::new();
        let no_imports = NoImports;
        let config = Config::new("test/pkg", &no_imports);

        let f = file(vec![field("a", ast::Expr::Int(1, zero_range()))]);
        let root = engine.compile_files(config, &[f]).unwrap();
        engine.finalize(root);

        let a = engine.value_at_dotted_path(root, "a").unwrap();
        assert!(matches!(
            engine.runtime.vertex(a).base_value,
            Some(Value::Num(cue_core::adt::NumValue::Int(1)))
        ));
        assert!(engine.collect_errors(root).is_empty());
    }

    #[test]
    fn unresolved_reference_is_a_fatal_compile_error() {
        let mut engine = Engine::new();
        let no_imports = NoImports;
        let config = Config::new("test/pkg", &no_imports);

        let f = file(vec![field(
            "a",
            ast::Expr::Ident(ident("nope")),
        )]);
        let err = engine.compile_files(config, &[f]).unwrap_err();
        assert!(matches!(
            err,
            Error::Compile(cue_compile::CompileError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn export_round_trips_a_scalar_field() {
        let mut engine = Engine::new();
        let no_imports = NoImports;
        let config = Config::new("test/pkg", &no_imports);
        let f = file(vec![field("a", ast::Expr::Int(7, zero_range()))]);
        let root = engine.compile_files(config, &[f]).unwrap();
        engine.finalize(root);

        let exported = engine.export(root);
        let ast::Decl::Embedding(expr) = &exported.decls[0] else {
            panic!("expected an embedding");
        };
        assert!(matches!(expr.as_ref(), ast::Expr::StructLit(decls, _) if decls.len() == 1));
    }
}
