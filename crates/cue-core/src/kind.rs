//! Value kinds as a bitset, and kind unification by intersection (spec.md §4.3).

use std::fmt;
use std::ops::{BitAnd, BitOr};

/// A bitset of value kinds. `IntKind` and `FloatKind` both fall within
/// `NumberKind`; unifying two kinds intersects the sets, and an empty
/// intersection signals a type-mismatch Bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Kind(u16);

impl Kind {
    pub const NULL: Kind = Kind(1 << 0);
    pub const BOOL: Kind = Kind(1 << 1);
    pub const INT: Kind = Kind(1 << 2);
    pub const FLOAT: Kind = Kind(1 << 3);
    pub const STRING: Kind = Kind(1 << 4);
    pub const BYTES: Kind = Kind(1 << 5);
    pub const LIST: Kind = Kind(1 << 6);
    pub const STRUCT: Kind = Kind(1 << 7);
    pub const BOTTOM: Kind = Kind(1 << 8);

    pub const NUMBER: Kind = Kind(Self::INT.0 | Self::FLOAT.0);
    pub const TOP: Kind = Kind(
        Self::NULL.0
            | Self::BOOL.0
            | Self::INT.0
            | Self::FLOAT.0
            | Self::STRING.0
            | Self::BYTES.0
            | Self::LIST.0
            | Self::STRUCT.0,
    );
    pub const NONE: Kind = Kind(0);

    pub fn contains(self, other: Kind) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: Kind) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// A kind with exactly one bit set names a single concrete value kind.
    pub fn is_scalar_kind(self) -> bool {
        self.0.count_ones() == 1 && !self.intersects(Kind::BOTTOM)
    }
}

impl BitAnd for Kind {
    type Output = Kind;
    fn bitand(self, rhs: Kind) -> Kind {
        Kind(self.0 & rhs.0)
    }
}

impl BitOr for Kind {
    type Output = Kind;
    fn bitor(self, rhs: Kind) -> Kind {
        Kind(self.0 | rhs.0)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Kind::TOP {
            return write!(f, "_");
        }
        if self.is_empty() {
            return write!(f, "_|_");
        }
        let names: &[(Kind, &str)] = &[
            (Kind::NULL, "null"),
            (Kind::BOOL, "bool"),
            (Kind::NUMBER, "number"),
            (Kind::INT, "int"),
            (Kind::FLOAT, "float"),
            (Kind::STRING, "string"),
            (Kind::BYTES, "bytes"),
            (Kind::LIST, "list"),
            (Kind::STRUCT, "struct"),
        ];
        // Prefer the combined "number" label when both int and float are set.
        let mut remaining = *self;
        let mut parts = Vec::new();
        for (k, name) in names {
            if remaining.contains(*k) && !(*k == Kind::INT && remaining.contains(Kind::NUMBER)) {
                if *k == Kind::NUMBER {
                    remaining = Kind(remaining.0 & !Kind::NUMBER.0);
                }
                parts.push(*name);
            }
        }
        write!(f, "{}", parts.join("|"))
    }
}

#[cfg(test)]
mod kind_tests {
    use super::*;

    #[test]
    fn intersection_of_disjoint_kinds_is_empty() {
        assert!((Kind::STRING & Kind::INT).is_empty());
    }

    #[test]
    fn int_is_subset_of_number() {
        assert!(Kind::NUMBER.contains(Kind::INT));
        assert!(Kind::NUMBER.contains(Kind::FLOAT));
        assert!(!Kind::INT.contains(Kind::FLOAT));
    }

    #[test]
    fn top_unifies_with_anything_kind_wise() {
        assert_eq!(Kind::TOP & Kind::STRING, Kind::STRING);
    }

    #[test]
    fn display_empty_is_bottom() {
        assert_eq!(Kind::NONE.to_string(), "_|_");
    }
}
