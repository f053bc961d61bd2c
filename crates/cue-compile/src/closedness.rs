//! Closedness origin tracking (spec.md §4.2 "Closedness origin").
//!
//! Definitions (labels beginning with `#`) contribute conjuncts with a
//! `CloseInfo` marking them as definition-rooted. Embeddings of definitions
//! inherit the flag — which falls straight out of `CloseInfo::embed`
//! preserving the enclosing `CloseInfo` unchanged, so no special case is
//! needed here beyond deciding when to call `enter_definition`.

use cue_core::adt::CloseInfo;
use cue_core::{Feature, FeatureTag};

/// The `CloseInfo` a field's nested struct literal should compile with,
/// given the enclosing `CloseInfo` and the field's own feature.
pub fn close_info_for_field(enclosing: &CloseInfo, feature: Feature) -> CloseInfo {
    if feature.tag().is_definition() {
        enclosing.enter_definition(feature)
    } else {
        enclosing.clone()
    }
}

#[cfg(test)]
mod closedness_tests {
    use super::*;
    use cue_core::Interner;

    #[test]
    fn definition_label_closes() {
        let mut interner = Interner::new();
        let def = interner.intern("#Foo");
        let info = close_info_for_field(&CloseInfo::open(), def);
        assert!(info.is_closed);
    }

    #[test]
    fn plain_label_does_not_close() {
        let mut interner = Interner::new();
        let plain = interner.intern("foo");
        let info = close_info_for_field(&CloseInfo::open(), plain);
        assert!(!info.is_closed);
    }

    #[test]
    fn hidden_definition_label_closes_too() {
        let mut interner = Interner::new();
        let def = interner.make_hidden("foo", "pkg", true);
        assert_eq!(def.tag(), FeatureTag::HiddenDefinitionLabel);
        let info = close_info_for_field(&CloseInfo::open(), def);
        assert!(info.is_closed);
    }
}
