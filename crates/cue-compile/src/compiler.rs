//! The AST-to-ADT compiler (spec.md §4.2).
//!
//! `Compiler` is a thin builder around [`Lowerer`], the struct that
//! actually walks the AST; splitting the two keeps the public entry points
//! (`compile_files`/`compile_expr`) free of the recursive-descent
//! machinery.

use std::rc::Rc;

use indexmap::IndexMap;

use cue_core::adt::{CloseInfo, Conjunct, Decl as AdtDecl, Expr as AdtExpr, SourceInfo};
use cue_core::ast::{self, BinaryOp as AstBinaryOp, BoundOp as AstBoundOp, UnaryOp as AstUnaryOp};
use cue_core::env::Environment;
use cue_core::vertex::Vertex;
use cue_core::{EnvId, Feature, Runtime, VertexId};

use crate::alias::{self, Alloc};
use crate::config::Config;
use crate::error::{CompileError, CompileResult};
use crate::frame::{Frame, FrameStack};
use crate::resolve::{self, BuiltinLookup};
use crate::{closedness, comprehension, disjunction, fields, let_compile};

/// Walks a resolved AST, lowering it into ADT `Expr`/`Decl` trees. One
/// `Lowerer` handles one compilation unit (one call to `compile_files` or
/// `compile_expr`); `unit_id` scopes every `let` feature it allocates.
pub struct Lowerer<'r, 'c> {
    runtime: &'r mut Runtime,
    config: &'c Config<'c>,
    builtins: &'c dyn BuiltinLookup,
    language: ast::LanguageVersion,
    frames: FrameStack,
    file_top_level: IndexMap<String, Feature>,
    unit_id: u32,
    env: EnvId,
}

impl<'r, 'c> Lowerer<'r, 'c> {
    fn new(
        runtime: &'r mut Runtime,
        config: &'c Config<'c>,
        builtins: &'c dyn BuiltinLookup,
        language: ast::LanguageVersion,
        env: EnvId,
    ) -> Self {
        let unit_id = runtime.fresh_compilation_unit();
        Self {
            runtime,
            config,
            builtins,
            language,
            frames: FrameStack::new(),
            file_top_level: IndexMap::new(),
            unit_id,
            env,
        }
    }

    fn intern_label(&mut self, raw: &str) -> Feature {
        if raw == "_" {
            // Caller must have already rejected this as a label; reachable
            // only from defensive callers. Treat as an ordinary hidden name
            // rather than panicking.
        }
        if let Some(rest) = raw.strip_prefix('_') {
            let definition = rest.starts_with('#');
            self.runtime
                .interner
                .make_hidden(raw, &self.config.package_path, definition)
        } else {
            self.runtime.interner.intern(raw)
        }
    }

    /// Lowers every file's top-level declarations as conjuncts on `root`,
    /// sharing the one file-level environment (spec.md §4.2 "Output"). All
    /// files in a package share one file-scope frame, so a field in one
    /// file may forward-reference a field declared in another.
    fn compile_files(&mut self, files: &[ast::File], root: VertexId) -> CompileResult<()> {
        for file in files {
            let names = fields::collect_own_fields(&file.decls, |name| self.intern_label(name));
            for (name, feature) in names {
                self.file_top_level.entry(name).or_insert(feature);
            }
        }

        let mut file_frame = Frame::new(1);
        file_frame.own_fields = self.file_top_level.clone().into_iter().collect();
        for file in files {
            let unit_id = self.unit_id;
            let runtime = &mut self.runtime;
            alias::mark_aliases(&mut file_frame, &file.decls, |kind, name| match kind {
                Alloc::Label => runtime.interner.intern(name),
                Alloc::Let => runtime.interner.make_let(name, unit_id),
            })?;
        }
        self.frames.push(file_frame);

        let close_info = CloseInfo::open();
        for file in files {
            self.language = file.language.clone();
            let decls = self.lower_decls(&file.decls, &close_info)?;
            for decl in decls {
                if let AdtDecl::Embedding(expr) = &decl {
                    self.runtime.vertex_mut(root).push_conjunct(Conjunct::new(
                        self.env,
                        Rc::clone(expr),
                        close_info.clone(),
                    ));
                } else {
                    let wrapped = Rc::new(AdtExpr::StructLit {
                        decls: Rc::from(vec![decl].into_boxed_slice()),
                        info: SourceInfo::none(),
                    });
                    self.runtime.vertex_mut(root).push_conjunct(Conjunct::new(
                        self.env,
                        wrapped,
                        close_info.clone(),
                    ));
                }
            }
        }

        let popped = self.frames.pop().expect("file frame pushed above");
        alias::check_unused(&popped)?;
        Ok(())
    }

    /// Lowers a struct body: push a frame, `markAlias`, lower each
    /// declaration, then pop and check for unused aliases (spec.md §4.2
    /// "Alias registration").
    fn lower_struct_body(
        &mut self,
        decls: &[ast::Decl],
        close_info: &CloseInfo,
        up_count: u32,
    ) -> CompileResult<Vec<AdtDecl>> {
        let own_fields = fields::collect_own_fields(decls, |name| self.intern_label(name));
        let mut frame = Frame::new(up_count);
        frame.own_fields = own_fields;
        {
            let unit_id = self.unit_id;
            let runtime = &mut self.runtime;
            alias::mark_aliases(&mut frame, decls, |kind, name| match kind {
                Alloc::Label => runtime.interner.intern(name),
                Alloc::Let => runtime.interner.make_let(name, unit_id),
            })?;
        }
        self.frames.push(frame);

        let lowered = self.lower_decls(decls, close_info);

        let popped = self.frames.pop().expect("frame pushed above");
        alias::check_unused(&popped)?;
        lowered
    }

    fn lower_decls(
        &mut self,
        decls: &[ast::Decl],
        close_info: &CloseInfo,
    ) -> CompileResult<Vec<AdtDecl>> {
        let mut out = Vec::with_capacity(decls.len());
        for decl in decls {
            if let Some(lowered) = self.lower_decl(decl, close_info)? {
                out.push(lowered);
            }
        }
        Ok(out)
    }

    fn lower_decl(
        &mut self,
        decl: &ast::Decl,
        close_info: &CloseInfo,
    ) -> CompileResult<Option<AdtDecl>> {
        match decl {
            ast::Decl::Field(f) => self.lower_field(f, true, close_info).map(Some),
            ast::Decl::OptionalField(f) => self.lower_field(f, false, close_info).map(Some),
            ast::Decl::BulkOptionalField { filter, value, range } => {
                let info = SourceInfo::new(*range);
                let alias = bulk_pattern_alias(filter);
                let filter_expr = self.lower_expr(filter)?;
                let value_expr = self.lower_expr(value)?;
                Ok(Some(fields::bulk_optional(filter_expr, value_expr, alias, info)))
            }
            ast::Decl::DynamicField { label_expr, value, range } => {
                let info = SourceInfo::new(*range);
                let label = self.lower_expr(label_expr)?;
                let value_expr = self.lower_expr(value)?;
                Ok(Some(fields::dynamic(label, value_expr, info)))
            }
            ast::Decl::LetField { name, value, range } => {
                let info = SourceInfo::new(*range);
                let (binding, _) = self
                    .frames
                    .resolve(&name.text)
                    .ok_or_else(|| CompileError::UnresolvedReference {
                        name: name.text.clone(),
                    })?;
                let feature = match binding {
                    crate::frame::AliasBinding::Let(f) => f,
                    _ => {
                        return Err(CompileError::InvalidLabel {
                            reason: format!("`{}` is not a let binding", name.text),
                        })
                    }
                };
                let mut bound = std::collections::HashSet::new();
                collect_for_names(&self.frames, &mut bound);
                let is_multi = let_compile::references_any(value, &bound);
                let value_expr = self.lower_expr(value)?;
                Ok(Some(fields::let_field(feature, value_expr, is_multi, info)))
            }
            ast::Decl::Ellipsis { element, range } => {
                let info = SourceInfo::new(*range);
                let element_expr = match element {
                    Some(e) => Some(self.lower_expr(e)?),
                    None => None,
                };
                Ok(Some(fields::ellipsis(element_expr, info)))
            }
            ast::Decl::Embedding(e) => {
                let expr = self.lower_expr(e)?;
                Ok(Some(fields::embedding(expr)))
            }
            ast::Decl::Comprehension(c) => {
                let lowered = self.lower_comprehension(c, close_info)?;
                Ok(Some(AdtDecl::Comprehension(lowered)))
            }
            ast::Decl::Import { path, alias: import_alias, range } => {
                let _ = range;
                // Registers the import's local name so subsequent idents
                // resolve it via rule 1; the actual package load is lazy,
                // left to the `ImportReference`'s consumer.
                self.config.import_resolver.resolve(path)?;
                let local_name = import_alias
                    .as_ref()
                    .map(|a| a.text.clone())
                    .unwrap_or_else(|| default_import_name(path));
                if let Some(frame) = self.frames.top_mut() {
                    frame.declare_alias(
                        &local_name,
                        crate::frame::AliasBinding::Import(Rc::from(path.as_str())),
                    );
                }
                Ok(None)
            }
        }
    }

    fn lower_field(
        &mut self,
        f: &ast::FieldDecl,
        required: bool,
        close_info: &CloseInfo,
    ) -> CompileResult<AdtDecl> {
        if f.label.text == "_" {
            return Err(CompileError::UnderscoreLabel);
        }
        let feature = self.intern_label(&f.label.text);
        let field_close = closedness::close_info_for_field(close_info, feature);
        let value = self.lower_value_under(&f.value, &field_close)?;
        Ok(fields::field(feature, value, required, SourceInfo::new(f.range)))
    }

    /// Lowers a field's value expression. A struct literal nested directly
    /// as a field's value compiles its body under `field_close` (so
    /// definitions close); any other expression shape lowers normally.
    fn lower_value_under(
        &mut self,
        expr: &ast::Expr,
        field_close: &CloseInfo,
    ) -> CompileResult<Rc<AdtExpr>> {
        if let ast::Expr::StructLit(decls, range) = expr {
            let body = self.lower_struct_body(decls, field_close, 1)?;
            return Ok(Rc::new(AdtExpr::StructLit {
                decls: Rc::from(body.into_boxed_slice()),
                info: SourceInfo::new(*range),
            }));
        }
        self.lower_expr(expr)
    }

    fn lower_comprehension(
        &mut self,
        c: &ast::Comprehension,
        close_info: &CloseInfo,
    ) -> CompileResult<cue_core::adt::Comprehension> {
        let mut clauses = Vec::with_capacity(c.clauses.len());
        // Tracks, per pushed frame, whether it scopes a `let` clause (and
        // so must fail with `UnusedLet` if never referenced) or a `for`
        // clause (whose loop variables are not subject to the unused
        // check).
        let mut pushed_is_let = Vec::new();
        for clause in &c.clauses {
            match clause {
                ast::ClauseNode::For { key, value, source } => {
                    let source_expr = self.lower_expr(source)?;
                    let key_feature = key
                        .as_ref()
                        .map(|k| self.runtime.interner.make_let(&k.text, self.unit_id));
                    let value_feature = self
                        .runtime
                        .interner
                        .make_let(&value.text, self.unit_id);
                    let mut frame = Frame::new(1);
                    if let (Some(k), Some(kf)) = (key, key_feature) {
                        frame.declare_alias(&k.text, crate::frame::AliasBinding::Let(kf));
                    }
                    frame.declare_alias(&value.text, crate::frame::AliasBinding::Let(value_feature));
                    self.frames.push(frame);
                    pushed_is_let.push(false);
                    clauses.push(cue_core::adt::Clause::For {
                        key: key_feature,
                        value: value_feature,
                        source: source_expr,
                    });
                }
                ast::ClauseNode::If { cond } => {
                    let cond_expr = self.lower_expr(cond)?;
                    clauses.push(cue_core::adt::Clause::If { cond: cond_expr });
                }
                ast::ClauseNode::Let { name, value } => {
                    let feature = self.runtime.interner.make_let(&name.text, self.unit_id);
                    let value_expr = self.lower_expr(value)?;
                    let mut frame = Frame::new(1);
                    frame.declare_alias(&name.text, crate::frame::AliasBinding::Let(feature));
                    self.frames.push(frame);
                    pushed_is_let.push(true);
                    clauses.push(cue_core::adt::Clause::Let {
                        feature,
                        value: value_expr,
                    });
                }
            }
        }

        let value = self.lower_struct_body(&c.value, close_info, 1)?;

        let mut unused_let_err = None;
        for is_let in pushed_is_let.into_iter().rev() {
            if let Some(frame) = self.frames.pop() {
                if is_let && unused_let_err.is_none() {
                    unused_let_err = alias::check_unused_let(&frame).err();
                }
            }
        }
        if let Some(err) = unused_let_err {
            return Err(err);
        }

        comprehension::build(clauses, value, SourceInfo::new(c.range))
    }

    fn lower_expr(&mut self, expr: &ast::Expr) -> CompileResult<Rc<AdtExpr>> {
        let info = SourceInfo::new(expr_range(expr));
        let out = match expr {
            ast::Expr::Null(_) => AdtExpr::Null(info),
            ast::Expr::Bool(b, _) => AdtExpr::Bool(*b, info),
            ast::Expr::Int(i, _) => AdtExpr::Int(*i, info),
            ast::Expr::Float(f, _) => AdtExpr::Float(*f, info),
            ast::Expr::Bytes(b, _) => AdtExpr::Bytes(Rc::from(b.as_slice()), info),
            ast::Expr::Top(_) => AdtExpr::Top(info),
            ast::Expr::Bottom(_) => AdtExpr::Bottom(info),
            ast::Expr::String(parts, _) => {
                if let [ast::StringPart::Literal(s)] = parts.as_slice() {
                    AdtExpr::String(Rc::from(s.as_str()), info)
                } else {
                    let mut lowered = Vec::with_capacity(parts.len());
                    for part in parts {
                        lowered.push(match part {
                            ast::StringPart::Literal(s) => {
                                cue_core::adt::StringPart::Literal(Rc::from(s.as_str()))
                            }
                            ast::StringPart::Interpolation(e) => {
                                cue_core::adt::StringPart::Expr(self.lower_expr(e)?)
                            }
                        });
                    }
                    AdtExpr::Interpolation {
                        parts: Rc::from(lowered.into_boxed_slice()),
                        info,
                    }
                }
            }
            ast::Expr::StructLit(decls, _) => {
                let body = self.lower_struct_body(decls, &CloseInfo::open(), 1)?;
                AdtExpr::StructLit {
                    decls: Rc::from(body.into_boxed_slice()),
                    info,
                }
            }
            ast::Expr::ListLit { elements, ellipsis, .. } => {
                let mut lowered = Vec::with_capacity(elements.len());
                for e in elements {
                    lowered.push((*self.lower_expr(e)?).clone());
                }
                let ellipsis_expr = match ellipsis {
                    Some(e) => Some(self.lower_expr(e)?),
                    None => None,
                };
                AdtExpr::ListLit {
                    elements: Rc::from(lowered.into_boxed_slice()),
                    ellipsis: ellipsis_expr,
                    info,
                }
            }
            ast::Expr::Ident(ident) => {
                return resolve::resolve_ident(
                    ident,
                    &mut self.frames,
                    &self.file_top_level,
                    self.config,
                    self.builtins,
                    cue_core::Kind::TOP,
                )
            }
            ast::Expr::Selector { base, field, .. } => {
                let base_expr = self.lower_expr(base)?;
                let feature = self.intern_label(&field.text);
                AdtExpr::SelectorExpr {
                    base: base_expr,
                    field: feature,
                    info,
                }
            }
            ast::Expr::Index { base, index, .. } => {
                let base_expr = self.lower_expr(base)?;
                let index_expr = self.lower_expr(index)?;
                AdtExpr::IndexExpr {
                    base: base_expr,
                    index: index_expr,
                    info,
                }
            }
            ast::Expr::Slice { base, low, high, .. } => {
                let base_expr = self.lower_expr(base)?;
                let low_expr = match low {
                    Some(e) => Some(self.lower_expr(e)?),
                    None => None,
                };
                let high_expr = match high {
                    Some(e) => Some(self.lower_expr(e)?),
                    None => None,
                };
                AdtExpr::SliceExpr {
                    base: base_expr,
                    low: low_expr,
                    high: high_expr,
                    info,
                }
            }
            ast::Expr::Call { func, args, .. } => {
                let func_expr = self.lower_expr(func)?;
                let mut lowered_args = Vec::with_capacity(args.len());
                for a in args {
                    lowered_args.push((*self.lower_expr(a)?).clone());
                }
                match func_expr.as_ref() {
                    AdtExpr::Builtin { id, name, .. } if name.as_ref() == "matchN" => {
                        AdtExpr::BuiltinValidator {
                            id: *id,
                            name: Rc::clone(name),
                            args: Rc::from(lowered_args.into_boxed_slice()),
                            info,
                        }
                    }
                    _ => AdtExpr::CallExpr {
                        func: func_expr,
                        args: Rc::from(lowered_args.into_boxed_slice()),
                        info,
                    },
                }
            }
            ast::Expr::Unary { op, operand, .. } => AdtExpr::UnaryExpr {
                op: lower_unary_op(*op),
                operand: self.lower_expr(operand)?,
                info,
            },
            ast::Expr::Binary { op, lhs, rhs, .. } => AdtExpr::BinaryExpr {
                op: lower_binary_op(*op),
                lhs: self.lower_expr(lhs)?,
                rhs: self.lower_expr(rhs)?,
                info,
            },
            ast::Expr::Bound { op, operand, .. } => AdtExpr::BoundExpr {
                op: lower_bound_op(*op),
                operand: self.lower_expr(operand)?,
                info,
            },
            ast::Expr::Disjunction { values, .. } => {
                let mut lowered = Vec::with_capacity(values.len());
                for alt in values {
                    let v = self.lower_expr(&alt.value)?;
                    lowered.push(((*v).clone(), alt.is_default));
                }
                disjunction::build_disjunction(lowered, info)
            }
        };
        Ok(Rc::new(out))
    }
}

fn default_import_name(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

fn bulk_pattern_alias(filter: &ast::Expr) -> Option<Feature> {
    // `[Name=string]: v` binds `Name`; the parser represents the bound name
    // as part of the filter expression's own scope, which is out of this
    // module's concern until `Decl::BulkOptionalField` carries one
    // explicitly. No pattern alias is produced without that AST support.
    let _ = filter;
    None
}

fn collect_for_names(frames: &FrameStack, out: &mut std::collections::HashSet<String>) {
    for i in 0..frames.depth() {
        if let Some(frame) = frames.top_at(i) {
            for (name, binding) in &frame.aliases {
                if matches!(binding, crate::frame::AliasBinding::Let(_)) {
                    out.insert(name.clone());
                }
            }
        }
    }
}

fn lower_unary_op(op: AstUnaryOp) -> cue_core::adt::UnaryOp {
    match op {
        AstUnaryOp::Neg => cue_core::adt::UnaryOp::Neg,
        AstUnaryOp::Plus => cue_core::adt::UnaryOp::Plus,
        AstUnaryOp::Not => cue_core::adt::UnaryOp::Not,
    }
}

fn lower_binary_op(op: AstBinaryOp) -> cue_core::adt::BinaryOp {
    use cue_core::adt::BinaryOp as B;
    match op {
        AstBinaryOp::And => B::And,
        AstBinaryOp::Or => B::Or,
        AstBinaryOp::Add => B::Add,
        AstBinaryOp::Sub => B::Sub,
        AstBinaryOp::Mul => B::Mul,
        AstBinaryOp::Div => B::Div,
        AstBinaryOp::Eq => B::Eq,
        AstBinaryOp::Neq => B::Neq,
        AstBinaryOp::Lt => B::Lt,
        AstBinaryOp::Lte => B::Lte,
        AstBinaryOp::Gt => B::Gt,
        AstBinaryOp::Gte => B::Gte,
        AstBinaryOp::Matches => B::Matches,
        AstBinaryOp::NotMatches => B::NotMatches,
    }
}

fn lower_bound_op(op: AstBoundOp) -> cue_core::adt::BoundOp {
    use cue_core::adt::BoundOp as B;
    match op {
        AstBoundOp::Lt => B::Lt,
        AstBoundOp::Lte => B::Lte,
        AstBoundOp::Gt => B::Gt,
        AstBoundOp::Gte => B::Gte,
        AstBoundOp::Neq => B::Neq,
        AstBoundOp::Matches => B::Matches,
        AstBoundOp::NotMatches => B::NotMatches,
    }
}

fn expr_range(expr: &ast::Expr) -> rowan::TextRange {
    use ast::Expr;
    match expr {
        Expr::Null(r)
        | Expr::Bool(_, r)
        | Expr::Int(_, r)
        | Expr::Float(_, r)
        | Expr::String(_, r)
        | Expr::Bytes(_, r)
        | Expr::Top(r)
        | Expr::Bottom(r)
        | Expr::StructLit(_, r)
        | Expr::ListLit { range: r, .. }
        | Expr::Selector { range: r, .. }
        | Expr::Index { range: r, .. }
        | Expr::Slice { range: r, .. }
        | Expr::Call { range: r, .. }
        | Expr::Unary { range: r, .. }
        | Expr::Binary { range: r, .. }
        | Expr::Bound { range: r, .. }
        | Expr::Disjunction { range: r, .. } => *r,
        Expr::Ident(ident) => ident.range,
    }
}

/// Builder for a compilation pass, mirroring the teacher's
/// `Compiler`/`CompilerBuilder` split: construction-time configuration
/// lives on the builder, the one-shot walk lives on the value it builds.
pub struct CompilerBuilder<'c> {
    config: Config<'c>,
    builtins: &'c dyn BuiltinLookup,
}

impl<'c> CompilerBuilder<'c> {
    pub fn new(config: Config<'c>, builtins: &'c dyn BuiltinLookup) -> Self {
        Self { config, builtins }
    }

    pub fn build(self) -> Compiler<'c> {
        Compiler {
            config: self.config,
            builtins: self.builtins,
        }
    }
}

pub struct Compiler<'c> {
    config: Config<'c>,
    builtins: &'c dyn BuiltinLookup,
}

impl<'c> Compiler<'c> {
    /// Compiles a package's files into one root `Vertex`, returning its id
    /// (spec.md §4.2 "Output").
    pub fn compile_files(&self, runtime: &mut Runtime, files: &[ast::File]) -> CompileResult<VertexId> {
        let root = runtime.alloc_vertex(Vertex::root());
        let env = runtime.alloc_env(Environment::root(root));
        let language = files
            .first()
            .map(|f| f.language.clone())
            .unwrap_or_default();
        for file in files {
            for decl in &file.decls {
                check_version_of_decl(decl, &file.language)?;
            }
        }
        let mut lowerer = Lowerer::new(runtime, &self.config, self.builtins, language, env);
        lowerer.compile_files(files, root)?;
        Ok(root)
    }

    /// Compiles a single, closed expression against the same scope rules
    /// (used by REPL-style embedding and by `cue-lib`'s convenience API).
    pub fn compile_expr(
        &self,
        runtime: &mut Runtime,
        expr: &ast::Expr,
        language: ast::LanguageVersion,
    ) -> CompileResult<(Rc<AdtExpr>, EnvId)> {
        let root = runtime.alloc_vertex(Vertex::root());
        let env = runtime.alloc_env(Environment::root(root));
        let mut lowerer = Lowerer::new(runtime, &self.config, self.builtins, language, env);
        let compiled = lowerer.lower_expr(expr)?;
        Ok((compiled, env))
    }
}

fn check_version_of_decl(_decl: &ast::Decl, _language: &ast::LanguageVersion) -> CompileResult<()> {
    // Per-declaration version gates (e.g. an experiment-only syntax form)
    // are checked at the point the compiler recognizes the form; this hook
    // exists so `compile_files` has one place to extend if a future form
    // needs a pre-pass instead of an in-line check. `version::check_version`
    // is exercised directly from builtin resolution (`resolve.rs`).
    Ok(())
}

#[cfg(test)]
mod compiler_tests {
    use super::*;
    use crate::config::NoImports;
    use crate::resolve::NoBuiltins;
    use rowan::{TextRange, TextSize};

    fn zero_range() -> TextRange {
        TextRange::new(TextSize::from(0), TextSize::from(0))
    }

    #[test]
    fn compiles_a_trivial_struct() {
        let mut runtime = Runtime::new();
        let no_imports = NoImports;
        let config = Config::new("", &no_imports);
        let compiler = CompilerBuilder::new(config, &NoBuiltins).build();

        let file = ast::File {
            decls: vec![ast::Decl::Field(ast::FieldDecl {
                label: ast::Ident {
                    text: "x".to_string(),
                    range: zero_range(),
                    bound: ast::BoundTo::Unresolved,
                },
                label_alias: None,
                value: Box::new(ast::Expr::Int(1, zero_range())),
                range: zero_range(),
            })],
            language: ast::LanguageVersion::default(),
            range: zero_range(),
        };

        let root = compiler.compile_files(&mut runtime, &[file]).unwrap();
        assert_eq!(runtime.vertex(root).conjuncts.len(), 1);
    }

    #[test]
    fn unresolved_identifier_is_an_error() {
        let mut runtime = Runtime::new();
        let no_imports = NoImports;
        let config = Config::new("", &no_imports);
        let compiler = CompilerBuilder::new(config, &NoBuiltins).build();

        let expr = ast::Expr::Ident(ast::Ident {
            text: "nope".to_string(),
            range: zero_range(),
            bound: ast::BoundTo::Unresolved,
        });
        let err = compiler
            .compile_expr(&mut runtime, &expr, ast::LanguageVersion::default())
            .unwrap_err();
        assert!(matches!(err, CompileError::UnresolvedReference { .. }));
    }
}
