//! Field declaration assembly (spec.md §4.2 "Dynamic and pattern fields").
//!
//! `compiler.rs` lowers each declaration's sub-expressions recursively and
//! hands the results here to assemble the final [`Decl`]; keeping assembly
//! separate from the walk keeps the one non-trivial rule — a parenthesized
//! or interpolated label compiles to `DynamicField`, while a `[E]: v`
//! pattern label compiles to `BulkOptionalField` — next to the types it
//! produces instead of buried in the recursion.

use std::collections::HashMap;
use std::rc::Rc;

use cue_core::adt::{Decl, Expr, FieldDecl, FieldMeta, SourceInfo};
use cue_core::Feature;

/// Every field this struct declares under its own literal label, so a
/// sibling field can reference it by bare name (spec.md §4.2 rule 1) with
/// no alias declared at all. Dynamic/bulk-optional labels contribute
/// nothing here since they have no static name to register.
pub fn collect_own_fields(
    decls: &[cue_core::ast::Decl],
    mut intern_label: impl FnMut(&str) -> Feature,
) -> HashMap<String, Feature> {
    use cue_core::ast::Decl as AstDecl;
    let mut map = HashMap::new();
    for decl in decls {
        if let AstDecl::Field(f) | AstDecl::OptionalField(f) = decl {
            map.entry(f.label.text.clone())
                .or_insert_with(|| intern_label(&f.label.text));
        }
    }
    map
}

pub fn field(feature: Feature, value: Rc<Expr>, required: bool, info: SourceInfo) -> Decl {
    Decl::Field(FieldDecl {
        feature,
        value,
        meta: if required {
            FieldMeta::Required
        } else {
            FieldMeta::Optional
        },
        info,
    })
}

pub fn bulk_optional(
    filter: Rc<Expr>,
    value: Rc<Expr>,
    alias: Option<Feature>,
    info: SourceInfo,
) -> Decl {
    Decl::BulkOptionalField {
        filter,
        value,
        alias,
        info,
    }
}

pub fn dynamic(label_expr: Rc<Expr>, value: Rc<Expr>, info: SourceInfo) -> Decl {
    Decl::DynamicField {
        label_expr,
        value,
        info,
    }
}

pub fn ellipsis(element: Option<Rc<Expr>>, info: SourceInfo) -> Decl {
    Decl::Ellipsis { element, info }
}

pub fn let_field(feature: Feature, value: Rc<Expr>, is_multi: bool, info: SourceInfo) -> Decl {
    Decl::LetField {
        feature,
        value,
        is_multi,
        info,
    }
}

pub fn embedding(value: Rc<Expr>) -> Decl {
    Decl::Embedding(value)
}

#[cfg(test)]
mod fields_tests {
    use super::*;

    #[test]
    fn field_required_vs_optional_meta() {
        let mut interner = cue_core::Interner::new();
        let f = interner.intern("x");
        let v = Rc::new(Expr::Top(SourceInfo::none()));
        match field(f, v.clone(), true, SourceInfo::none()) {
            Decl::Field(fd) => assert_eq!(fd.meta, FieldMeta::Required),
            _ => panic!(),
        }
        match field(f, v, false, SourceInfo::none()) {
            Decl::Field(fd) => assert_eq!(fd.meta, FieldMeta::Optional),
            _ => panic!(),
        }
    }
}
