//! End-to-end scenarios (spec.md §8): each compiles a single hand-built
//! file against an empty `OuterScope` through `Engine`, finalizes it, and
//! checks the value at the named path. Hand-built rather than parsed from
//! source text since this workspace's scope stops at the compiled `ast`
//! contract (spec.md §1 "Non-goals": no parser).

use rowan::{TextRange, TextSize};

use cue_lib::ast::{
    BinaryOp, BoundTo, ClauseNode, Decl, DisjunctAlt, Expr, FieldDecl, File, Ident,
    LanguageVersion,
};
use cue_lib::{Config, Engine, NoImports};
use cue_core::adt::{NumValue, Value};
use cue_core::errors::ErrorCode;
use cue_core::Status;

fn zero_range() -> TextRange {
    TextRange::new(TextSize::from(0), TextSize::from(0))
}

fn ident(text: &str) -> Ident {
    Ident {
        text: text.to_string(),
        range: zero_range(),
        bound: BoundTo::Unresolved,
    }
}

fn field(name: &str, value: Expr) -> Decl {
    Decl::Field(FieldDecl {
        label: ident(name),
        label_alias: None,
        value: Box::new(value),
        range: zero_range(),
    })
}

fn struct_lit(decls: Vec<Decl>) -> Expr {
    Expr::StructLit(decls, zero_range())
}

fn file(decls: Vec<Decl>) -> File {
    File {
        decls,
        language: LanguageVersion::default(),
        range: zero_range(),
    }
}

fn int(i: i64) -> Expr {
    Expr::Int(i, zero_range())
}

fn string(s: &str) -> Expr {
    Expr::String(vec![cue_lib::ast::StringPart::Literal(s.to_string())], zero_range())
}

fn compile(engine: &mut Engine, f: File) -> cue_lib::VertexId {
    let no_imports = NoImports;
    let config = Config::new("scenario/pkg", &no_imports);
    let root = engine
        .compile_files(config, std::slice::from_ref(&f))
        .expect("compiles");
    engine.finalize(root);
    root
}

fn bottom_at<'a>(engine: &'a Engine, v: cue_lib::VertexId) -> &'a cue_core::errors::Bottom {
    match &engine.runtime.vertex(v).base_value {
        Some(Value::Bottom(b)) => b.as_ref(),
        other => panic!("expected a Bottom, got {other:?}"),
    }
}

fn int_at(engine: &Engine, v: cue_lib::VertexId) -> i64 {
    match &engine.runtime.vertex(v).base_value {
        Some(Value::Num(NumValue::Int(i))) => *i,
        other => panic!("expected an Int, got {other:?}"),
    }
}

#[test]
fn scenario_1_conflict() {
    let mut engine = Engine::new();
    let f = file(vec![field("a", int(4)), field("a", int(5))]);
    let root = compile(&mut engine, f);

    let a = engine.value_at_dotted_path(root, "a").unwrap();
    let bottom = bottom_at(&engine, a);
    assert_eq!(bottom.code, ErrorCode::EvalError);
    assert!(bottom.message.contains('4') && bottom.message.contains('5'));
}

#[test]
fn scenario_2_list_merge() {
    let mut engine = Engine::new();
    let l1 = Expr::ListLit {
        elements: vec![int(1), int(2)],
        ellipsis: None,
        range: zero_range(),
    };
    let l2 = Expr::ListLit {
        elements: vec![int(1), int(3)],
        ellipsis: None,
        range: zero_range(),
    };
    let f = file(vec![field("l", l1), field("l", l2)]);
    let root = compile(&mut engine, f);

    let l = engine.value_at_dotted_path(root, "l").unwrap();
    let idx0 = engine.runtime.interner.intern_int(0);
    let idx1 = engine.runtime.interner.intern_int(1);
    let e0 = engine.value_at_path(l, &[idx0]).unwrap();
    let e1 = engine.value_at_path(l, &[idx1]).unwrap();
    assert_eq!(int_at(&engine, e0), 1);
    let b1 = bottom_at(&engine, e1);
    assert_eq!(b1.code, ErrorCode::EvalError);
}

#[test]
fn scenario_3_struct_merge() {
    let mut engine = Engine::new();
    let s1 = struct_lit(vec![field("x", int(1))]);
    let s2 = struct_lit(vec![field("y", int(2))]);
    let f = file(vec![field("s", s1), field("s", s2)]);
    let root = compile(&mut engine, f);

    let x = engine.value_at_dotted_path(root, "s.x").unwrap();
    let y = engine.value_at_dotted_path(root, "s.y").unwrap();
    assert_eq!(int_at(&engine, x), 1);
    assert_eq!(int_at(&engine, y), 2);
    assert!(engine.collect_errors(root).is_empty());
}

#[test]
fn scenario_4_cycle_broken_by_concrete() {
    let mut engine = Engine::new();
    // x: 200; x: y + 100; y: x - 100
    let x_plus = Expr::Binary {
        op: BinaryOp::Add,
        lhs: Box::new(Expr::Ident(ident("y"))),
        rhs: Box::new(int(100)),
        range: zero_range(),
    };
    let y_minus = Expr::Binary {
        op: BinaryOp::Sub,
        lhs: Box::new(Expr::Ident(ident("x"))),
        rhs: Box::new(int(100)),
        range: zero_range(),
    };
    let f = file(vec![
        field("x", int(200)),
        field("x", x_plus),
        field("y", y_minus),
    ]);
    let root = compile(&mut engine, f);

    let x = engine.value_at_dotted_path(root, "x").unwrap();
    let y = engine.value_at_dotted_path(root, "y").unwrap();
    assert_eq!(int_at(&engine, x), 200);
    assert_eq!(int_at(&engine, y), 100);
}

#[test]
fn scenario_5_disjunction_with_default() {
    let mut engine = Engine::new();
    // replicas: int | *1, left unspecified by any other conjunct.
    let disjunction = Expr::Disjunction {
        values: vec![
            DisjunctAlt {
                value: Expr::Ident(ident("int")),
                is_default: false,
            },
            DisjunctAlt {
                value: int(1),
                is_default: true,
            },
        ],
        range: zero_range(),
    };
    let f = file(vec![field("replicas", disjunction)]);
    let root = compile(&mut engine, f);

    let replicas = engine.value_at_dotted_path(root, "replicas").unwrap();
    assert_eq!(int_at(&engine, replicas), 1);
}

#[test]
fn scenario_6_pattern_field_and_closedness() {
    let mut engine = Engine::new();
    // #A: {b: {c: string}}
    let def = struct_lit(vec![field(
        "b",
        struct_lit(vec![field("c", Expr::Ident(ident("string")))]),
    )]);
    // v: #A & {b: {c: "x", d: "y"}}
    let v_value = Expr::Binary {
        op: BinaryOp::And,
        lhs: Box::new(Expr::Ident(ident("#A"))),
        rhs: Box::new(struct_lit(vec![field(
            "b",
            struct_lit(vec![field("c", string("x")), field("d", string("y"))]),
        )])),
        range: zero_range(),
    };
    let f = file(vec![field("#A", def), field("v", v_value)]);
    let root = compile(&mut engine, f);

    let v_b = engine.value_at_dotted_path(root, "v.b").unwrap();
    let bottom = bottom_at(&engine, v_b);
    assert_eq!(bottom.code, ErrorCode::EvalError);
}

#[test]
fn scenario_7_comprehension() {
    let mut engine = Engine::new();
    // for k, v in ["a", "b"] { "\(v)": k }
    let source = Expr::ListLit {
        elements: vec![string("a"), string("b")],
        ellipsis: None,
        range: zero_range(),
    };
    let comprehension = cue_lib::ast::Comprehension {
        clauses: vec![ClauseNode::For {
            key: Some(ident("k")),
            value: ident("v"),
            source: Box::new(source),
        }],
        value: vec![Decl::DynamicField {
            label_expr: Box::new(Expr::String(
                vec![cue_lib::ast::StringPart::Interpolation(Box::new(Expr::Ident(ident("v"))))],
                zero_range(),
            )),
            value: Box::new(Expr::Ident(ident("k"))),
            range: zero_range(),
        }],
        range: zero_range(),
    };
    let f = file(vec![Decl::Comprehension(comprehension)]);
    let root = compile(&mut engine, f);

    let a = engine.value_at_dotted_path(root, "a").unwrap();
    let b = engine.value_at_dotted_path(root, "b").unwrap();
    assert_eq!(int_at(&engine, a), 0);
    assert_eq!(int_at(&engine, b), 1);
}

#[test]
fn scenario_8_matchn() {
    // #E: matchN(1, [string, int]); x: #E & 3 ⇒ x = 3
    let matchn_call = |value: Expr| Expr::Binary {
        op: BinaryOp::And,
        lhs: Box::new(Expr::Call {
            func: Box::new(Expr::Ident(ident("matchN"))),
            args: vec![
                int(1),
                Expr::ListLit {
                    elements: vec![Expr::Ident(ident("string")), Expr::Ident(ident("int"))],
                    ellipsis: None,
                    range: zero_range(),
                },
            ],
            range: zero_range(),
        }),
        rhs: Box::new(value),
        range: zero_range(),
    };

    {
        let mut engine = Engine::new();
        let f = file(vec![field("x", matchn_call(int(3)))]);
        let root = compile(&mut engine, f);
        let x = engine.value_at_dotted_path(root, "x").unwrap();
        assert_eq!(int_at(&engine, x), 3);
    }
    {
        let mut engine = Engine::new();
        let f = file(vec![field("x", matchn_call(Expr::Bool(true, zero_range())))]);
        let root = compile(&mut engine, f);
        let x = engine.value_at_dotted_path(root, "x").unwrap();
        let bottom = bottom_at(&engine, x);
        assert_eq!(bottom.code, ErrorCode::EvalError);
    }
}

#[test]
fn finalize_is_idempotent() {
    let mut engine = Engine::new();
    let f = file(vec![field("a", int(1))]);
    let root = compile(&mut engine, f);
    let first = engine.finalize(root);
    let second = engine.finalize(root);
    assert_eq!(first, second);
    assert_eq!(engine.runtime.vertex(root).status, Status::Finalized);
}
