//! The fixed catalogue of RR type tags.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, FromRepr};

/// A type tag indexing the fixed, ordered catalogue of RR types.
///
/// The order is the disambiguation order: overload resolution checks
/// candidates against argument tags in registration order, and the tag's
/// discriminant is its position in the catalogue. `Any` is never the type
/// of a value; it is legal only inside a function's parameter signature,
/// where it matches any single argument tag.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    FromRepr,
)]
#[repr(u8)]
pub enum TypeTag {
    Bool,
    Int,
    Float,
    Str,
    Pair,
    Set,
    Vec,
    Map,
    List,
    Fn,
    None,
    Any,
}

impl TypeTag {
    /// Position of this tag in the catalogue.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Tag at catalogue position `idx`, if in range.
    pub fn from_index(idx: u8) -> Option<TypeTag> {
        TypeTag::from_repr(idx)
    }

    /// Signature equivalence. Asymmetric: `Any` matches only on the
    /// right-hand (parameter) side.
    pub fn equivalent_to(self, rhs: TypeTag) -> bool {
        self == rhs || rhs == TypeTag::Any
    }
}

/// Render a tag sequence as `<T1,T2,...>` for diagnostics.
pub fn type_tuple(tags: &[TypeTag]) -> String {
    let names: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
    format!("<{}>", names.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_catalogue_order() {
        let names: Vec<String> = TypeTag::iter().map(|t| t.to_string()).collect();
        assert_eq!(
            names,
            [
                "Bool", "Int", "Float", "Str", "Pair", "Set", "Vec", "Map", "List", "Fn", "None",
                "Any"
            ]
        );
    }

    #[test]
    fn test_index_round_trip() {
        for tag in TypeTag::iter() {
            assert_eq!(TypeTag::from_index(tag.index()), Some(tag));
        }
        assert_eq!(TypeTag::from_index(12), None);
    }

    #[test]
    fn test_name_lookup() {
        assert_eq!(TypeTag::from_str("Int").unwrap(), TypeTag::Int);
        assert_eq!(TypeTag::from_str("List").unwrap(), TypeTag::List);
        assert!(TypeTag::from_str("int").is_err());
    }

    #[test]
    fn test_any_equivalence_is_asymmetric() {
        assert!(TypeTag::Int.equivalent_to(TypeTag::Any));
        assert!(!TypeTag::Any.equivalent_to(TypeTag::Int));
        assert!(TypeTag::Any.equivalent_to(TypeTag::Any));
        assert!(!TypeTag::Int.equivalent_to(TypeTag::Float));
    }

    #[test]
    fn test_type_tuple_rendering() {
        assert_eq!(type_tuple(&[TypeTag::Int, TypeTag::Str]), "<Int,Str>");
        assert_eq!(type_tuple(&[]), "<>");
    }
}
