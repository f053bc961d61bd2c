//! Disjunction flattening (spec.md §4.2 "Disjunction flattening").
//!
//! `a | b | c` parses to a flat `Expr::Disjunction` already (the parser
//! does the flattening of chained `|` into one node); compiling it is just
//! lowering each alternative and carrying its default marker through.

use std::rc::Rc;

use cue_core::adt::{Expr, SourceInfo};

/// Assemble a `DisjunctionExpr` from already-lowered alternatives.
pub fn build_disjunction(values: Vec<(Expr, bool)>, info: SourceInfo) -> Expr {
    Expr::DisjunctionExpr {
        values: Rc::from(values.into_boxed_slice()),
        info,
    }
}

#[cfg(test)]
mod disjunction_tests {
    use super::*;

    #[test]
    fn builds_flat_disjunction_with_default_markers() {
        let info = SourceInfo::none();
        let values = vec![
            (Expr::Int(1, info), true),
            (Expr::Int(2, info), false),
            (Expr::Int(3, info), false),
        ];
        let expr = build_disjunction(values, info);
        match expr {
            Expr::DisjunctionExpr { values, .. } => {
                assert_eq!(values.len(), 3);
                assert!(values[0].1);
                assert!(!values[1].1);
            }
            _ => panic!("expected DisjunctionExpr"),
        }
    }
}
