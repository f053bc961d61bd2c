//! Two-pass alias registration (spec.md §4.2 rule 1: "a name may be used
//! before its declaration within the same struct").
//!
//! Before lowering a struct's declarations, `mark_aliases` walks them once
//! to register every label alias, postfix alias and `let` name into the
//! current frame, so that forward references resolve. The second pass (in
//! `fields.rs`/`let_compile.rs`) lowers each declaration's value expression
//! against the now-complete frame.

use cue_core::ast::Decl;
use cue_core::Feature;

use crate::error::{CompileError, CompileResult};
use crate::frame::{AliasBinding, Frame};

/// Registers every alias-producing declaration in `decls` into `frame`,
/// using `label_feature` to resolve each field's own label to a [`Feature`].
/// Returns an error on the first duplicate alias name found in this frame.
/// Which kind of feature `mark_aliases` needs allocated for a given
/// declaration — a plain label intern for a field alias, or a fresh
/// globally-unique feature for a `let`.
pub enum Alloc {
    Label,
    Let,
}

pub fn mark_aliases(
    frame: &mut Frame,
    decls: &[Decl],
    mut alloc_feature: impl FnMut(Alloc, &str) -> Feature,
) -> CompileResult<()> {
    for decl in decls {
        match decl {
            Decl::Field(field) | Decl::OptionalField(field) => {
                if let Some(alias) = &field.label_alias {
                    if alias.text == "_" {
                        return Err(CompileError::UnderscoreLabel);
                    }
                    let feature = alloc_feature(Alloc::Label, &field.label.text);
                    if !frame.declare_alias(&alias.text, AliasBinding::Label(feature)) {
                        return Err(CompileError::DuplicateAlias {
                            name: alias.text.clone(),
                        });
                    }
                }
            }
            Decl::LetField { name, .. } => {
                if name.text == "_" {
                    return Err(CompileError::UnderscoreLabel);
                }
                // Allocate the let's real, globally-unique feature up front
                // so every forward reference captured while lowering
                // sibling declarations resolves to the same feature the
                // let itself is later compiled with.
                let feature = alloc_feature(Alloc::Let, &name.text);
                if !frame.declare_alias(&name.text, AliasBinding::Let(feature)) {
                    return Err(CompileError::DuplicateAlias {
                        name: name.text.clone(),
                    });
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Checks a popped frame for aliases that were never referenced
/// (spec.md §4.2 "unused aliases are a compile error").
pub fn check_unused(frame: &Frame) -> CompileResult<()> {
    if let Some(name) = frame.unused.first() {
        return Err(CompileError::UnusedAlias {
            name: name.clone(),
        });
    }
    Ok(())
}

/// Same check, but for a frame pushed solely to scope a `let` clause
/// (spec.md §9 Open Question: an unused `let` is a compile-time error
/// regardless of whether a guarding `if` could ever fire).
pub fn check_unused_let(frame: &Frame) -> CompileResult<()> {
    if let Some(name) = frame.unused.first() {
        return Err(CompileError::UnusedLet {
            name: name.clone(),
        });
    }
    Ok(())
}
