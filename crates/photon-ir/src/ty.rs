//! `Type`: spec §3's `{type, known, isClass, isModule, isPackage, native,
//! elementType?, keyType?, valType?, name?}` record, with structural equality.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Type {
    pub type_name: String,
    pub known: bool,
    pub is_class: bool,
    pub is_module: bool,
    pub is_package: bool,
    pub native: bool,
    pub element_type: Option<Box<Type>>,
    pub key_type: Option<Box<Type>>,
    pub val_type: Option<Box<Type>>,
    pub name: Option<String>,
}

impl Type {
    pub fn unknown() -> Self {
        Type {
            type_name: "unknown".to_string(),
            known: false,
            is_class: false,
            is_module: false,
            is_package: false,
            native: false,
            element_type: None,
            key_type: None,
            val_type: None,
            name: None,
        }
    }

    /// A known native scalar type (`int`, `float`, `str`, `bool`, ...).
    pub fn native(type_name: impl Into<String>) -> Self {
        Type {
            type_name: type_name.into(),
            known: true,
            native: true,
            ..Type::unknown()
        }
    }

    pub fn class(index: impl Into<String>) -> Self {
        Type {
            type_name: index.into(),
            known: true,
            is_class: true,
            ..Type::unknown()
        }
    }

    pub fn module(name: impl Into<String>) -> Self {
        Type {
            type_name: "module".to_string(),
            known: true,
            is_module: true,
            name: Some(name.into()),
            ..Type::unknown()
        }
    }

    pub fn package(name: impl Into<String>) -> Self {
        Type {
            type_name: "package".to_string(),
            known: true,
            is_package: true,
            name: Some(name.into()),
            ..Type::unknown()
        }
    }

    pub fn array(element_type: Type) -> Self {
        Type {
            type_name: "array".to_string(),
            known: element_type.known,
            element_type: Some(Box::new(element_type)),
            ..Type::unknown()
        }
    }

    pub fn map(key_type: Type, val_type: Type) -> Self {
        Type {
            type_name: "map".to_string(),
            known: key_type.known && val_type.known,
            key_type: Some(Box::new(key_type)),
            val_type: Some(Box::new(val_type)),
            ..Type::unknown()
        }
    }

    /// The bidirectional-inference / element-inference promotion rule from
    /// spec §4.F: identical types promote to themselves; `int`+`float`
    /// promotes to `float`; anything else is `unknown`.
    pub fn promote(a: &Type, b: &Type) -> Type {
        if a == b {
            return a.clone();
        }
        let names: std::collections::HashSet<&str> =
            [a.type_name.as_str(), b.type_name.as_str()].into_iter().collect();
        if names == ["int", "float"].into_iter().collect() {
            Type::native("float")
        } else {
            Type::unknown()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality() {
        assert_eq!(Type::native("int"), Type::native("int"));
        assert_ne!(Type::native("int"), Type::native("float"));
    }

    #[test]
    fn promote_identical() {
        assert_eq!(Type::promote(&Type::native("int"), &Type::native("int")), Type::native("int"));
    }

    #[test]
    fn promote_int_float() {
        assert_eq!(Type::promote(&Type::native("int"), &Type::native("float")), Type::native("float"));
    }

    #[test]
    fn promote_mismatched_is_unknown() {
        let result = Type::promote(&Type::native("str"), &Type::native("bool"));
        assert!(!result.known);
    }

    #[test]
    fn array_known_iff_element_known() {
        assert!(Type::array(Type::native("int")).known);
        assert!(!Type::array(Type::unknown()).known);
    }
}
