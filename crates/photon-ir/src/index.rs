//! The canonical scope key (`index`, per the GLOSSARY) derived from an IR
//! node's namespace, name, and optional attribute.

/// Build the canonical index for a binding named `name` in `namespace`,
/// optionally qualified by `attribute` (a class member access).
pub fn make_index(namespace: &str, name: &str, attribute: Option<&str>) -> String {
    let base = if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}::{name}")
    };
    match attribute {
        Some(attr) => format!("{base}.{attr}"),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_index_has_no_namespace_prefix() {
        assert_eq!(make_index("", "x", None), "x");
    }

    #[test]
    fn module_index_is_namespaced() {
        assert_eq!(make_index("Main", "x", None), "Main::x");
    }

    #[test]
    fn member_index_carries_attribute() {
        assert_eq!(make_index("Point", "new", Some("x")), "Point::new.x");
    }
}
