//! Compact, tagged field identifiers (spec.md §3 "Feature", §4.1).
//!
//! A `Feature` packs a [`FeatureTag`] into the low bits of a `u32` and an
//! index into the interner's string table into the high bits. Two features
//! are equal iff their tag and interned string agree; hidden features are
//! additionally qualified by a package-path id baked into the interned
//! string itself (see [`Interner::make_hidden`]).

use std::fmt;

use indexmap::IndexSet;

const TAG_BITS: u32 = 3;
const TAG_MASK: u32 = (1 << TAG_BITS) - 1;

/// The kind of identifier a [`Feature`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FeatureTag {
    /// A plain string label: `foo: 1`.
    StringLabel = 0,
    /// An integer label, used for list-element arcs.
    IntLabel = 1,
    /// `#Foo: …` — implicitly closed.
    DefinitionLabel = 2,
    /// `_foo: …` — hidden, qualified by package path.
    HiddenLabel = 3,
    /// `_#Foo: …` — hidden and implicitly closed.
    HiddenDefinitionLabel = 4,
    /// A `let` binding; hidden and scoped to its compilation unit.
    LetLabel = 5,
}

impl FeatureTag {
    /// Derive the tag implied by a source-level label spelling.
    pub fn from_prefix(text: &str) -> Self {
        if let Some(rest) = text.strip_prefix("_#") {
            let _ = rest;
            FeatureTag::HiddenDefinitionLabel
        } else if text.starts_with('#') {
            FeatureTag::DefinitionLabel
        } else if text.starts_with('_') {
            FeatureTag::HiddenLabel
        } else if text.bytes().all(|b| b.is_ascii_digit()) && !text.is_empty() {
            FeatureTag::IntLabel
        } else {
            FeatureTag::StringLabel
        }
    }

    pub fn is_definition(self) -> bool {
        matches!(
            self,
            FeatureTag::DefinitionLabel | FeatureTag::HiddenDefinitionLabel
        )
    }

    pub fn is_hidden(self) -> bool {
        matches!(
            self,
            FeatureTag::HiddenLabel | FeatureTag::HiddenDefinitionLabel | FeatureTag::LetLabel
        )
    }
}

/// A compact identifier for a struct field.
///
/// `Copy`, 4 bytes, comparable and hashable; the low [`TAG_BITS`] carry the
/// [`FeatureTag`] and the remaining bits index into the owning
/// [`Interner`]'s string table.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Feature(u32);

impl Feature {
    pub(crate) fn new(index: u32, tag: FeatureTag) -> Self {
        debug_assert!(index <= (u32::MAX >> TAG_BITS));
        Feature((index << TAG_BITS) | (tag as u32 & TAG_MASK))
    }

    pub fn tag(self) -> FeatureTag {
        match self.0 & TAG_MASK {
            0 => FeatureTag::StringLabel,
            1 => FeatureTag::IntLabel,
            2 => FeatureTag::DefinitionLabel,
            3 => FeatureTag::HiddenLabel,
            4 => FeatureTag::HiddenDefinitionLabel,
            5 => FeatureTag::LetLabel,
            _ => unreachable!("feature tag is 3 bits wide"),
        }
    }

    fn index(self) -> u32 {
        self.0 >> TAG_BITS
    }

    /// Order integer labels before string labels, both below definitions;
    /// ties broken lexicographically by the caller via [`Interner::ident`].
    pub fn sort_rank(self) -> u8 {
        match self.tag() {
            FeatureTag::IntLabel => 0,
            FeatureTag::StringLabel => 1,
            FeatureTag::DefinitionLabel | FeatureTag::HiddenDefinitionLabel => 2,
            FeatureTag::HiddenLabel => 3,
            FeatureTag::LetLabel => 4,
        }
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("tag", &self.tag())
            .field("index", &self.index())
            .finish()
    }
}

/// Append-only string interner producing [`Feature`]s.
///
/// Lookups are pure reads once a string has been interned; interning itself
/// is idempotent (spec.md §4.1: "Fails: never").
#[derive(Debug, Default)]
pub struct Interner {
    strings: IndexSet<String>,
    /// One entry per interned string, recording the tag it was interned
    /// with; the same text interned under two different tags yields two
    /// distinct table entries (the tag is part of the key).
    tagged: IndexSet<(FeatureTag, String)>,
    let_counter: u32,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text`, deriving its tag from source-level prefix conventions.
    pub fn intern(&mut self, text: &str) -> Feature {
        let tag = FeatureTag::from_prefix(text);
        self.intern_tagged(tag, text)
    }

    fn intern_tagged(&mut self, tag: FeatureTag, text: &str) -> Feature {
        let (index, _) = self.tagged.insert_full((tag, text.to_string()));
        Feature::new(index as u32, tag)
    }

    /// Intern a hidden feature qualified by its declaring package path, per
    /// spec.md §4.1: "two hidden fields with the same name in different
    /// packages are distinct".
    pub fn make_hidden(&mut self, name: &str, pkg_path: &str, definition: bool) -> Feature {
        let qualified = format!("{pkg_path}\u{0}{name}");
        let tag = if definition {
            FeatureTag::HiddenDefinitionLabel
        } else {
            FeatureTag::HiddenLabel
        };
        self.intern_tagged(tag, &qualified)
    }

    /// Allocate a fresh, globally unique `let` feature scoped to a
    /// compilation unit (spec.md §4.2 "Let semantics").
    pub fn make_let(&mut self, name: &str, unit_id: u32) -> Feature {
        self.let_counter += 1;
        let qualified = format!("{unit_id}\u{0}{name}\u{0}{}", self.let_counter);
        self.intern_tagged(FeatureTag::LetLabel, &qualified)
    }

    pub fn intern_int(&mut self, i: u64) -> Feature {
        self.intern_tagged(FeatureTag::IntLabel, &i.to_string())
    }

    /// The source-level spelling of a feature, without package/unit
    /// qualification for hidden/let features.
    pub fn ident(&self, f: Feature) -> &str {
        let (_, qualified) = &self.tagged[f.index() as usize];
        match f.tag() {
            FeatureTag::HiddenLabel | FeatureTag::HiddenDefinitionLabel => qualified
                .split('\u{0}')
                .nth(1)
                .unwrap_or(qualified.as_str()),
            FeatureTag::LetLabel => qualified
                .split('\u{0}')
                .nth(1)
                .unwrap_or(qualified.as_str()),
            _ => qualified.as_str(),
        }
    }

    /// The raw, fully-qualified interned text (used for equality-sensitive
    /// diagnostics and snapshot tests).
    pub fn raw(&self, f: Feature) -> &str {
        &self.tagged[f.index() as usize].1
    }
}

#[cfg(test)]
mod feature_tests {
    use super::*;

    #[test]
    fn tag_from_prefix() {
        assert_eq!(FeatureTag::from_prefix("foo"), FeatureTag::StringLabel);
        assert_eq!(FeatureTag::from_prefix("#Foo"), FeatureTag::DefinitionLabel);
        assert_eq!(FeatureTag::from_prefix("_foo"), FeatureTag::HiddenLabel);
        assert_eq!(
            FeatureTag::from_prefix("_#Foo"),
            FeatureTag::HiddenDefinitionLabel
        );
        assert_eq!(FeatureTag::from_prefix("3"), FeatureTag::IntLabel);
    }

    #[test]
    fn intern_idempotent() {
        let mut interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        assert_eq!(a, b);
        assert_eq!(interner.ident(a), "foo");
    }

    #[test]
    fn hidden_features_qualified_by_package() {
        let mut interner = Interner::new();
        let a = interner.make_hidden("x", "pkg/a", false);
        let b = interner.make_hidden("x", "pkg/b", false);
        assert_ne!(a, b);
        assert_eq!(interner.ident(a), "x");
        assert_eq!(interner.ident(b), "x");
    }

    #[test]
    fn let_features_are_unique_per_call() {
        let mut interner = Interner::new();
        let a = interner.make_let("x", 0);
        let b = interner.make_let("x", 0);
        assert_ne!(a, b);
    }

    #[test]
    fn sort_rank_orders_ints_before_strings_before_definitions() {
        let mut interner = Interner::new();
        let int_f = interner.intern("3");
        let str_f = interner.intern("foo");
        let def_f = interner.intern("#Foo");
        assert!(int_f.sort_rank() < str_f.sort_rank());
        assert!(str_f.sort_rank() < def_f.sort_rank());
    }
}
