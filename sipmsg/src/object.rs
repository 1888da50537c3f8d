//! Generic structural behavior shared by every parsed entity.
//!
//! Every header, URI and field entity implements [`Structured`], which
//! gives it uniform template matching, merging, recursive text
//! replacement and a diagnostic dump, in addition to the `Clone`,
//! `PartialEq` and `Display` (canonical encoding) implementations each
//! type carries itself. Implementations are generated per type by the
//! `structured!` macro, which enumerates the type's fields at compile
//! time; per-field semantics live in [`field::Value`].

use std::any::Any;
use std::fmt;

use crate::error::{Error, Result};

/// Maximum nesting depth structural traversals will follow.
pub const MAX_DEPTH: usize = 100;

/// A node in a parsed object tree.
///
/// The tree is strictly ownership-shaped: parameter lists and
/// addresses nest but never refer back to an ancestor, so traversals
/// terminate. [`MAX_DEPTH`] bounds them anyway.
pub trait Structured: fmt::Debug + fmt::Display + Any {
    /// Short label identifying the concrete type in errors and dumps.
    fn type_label(&self) -> &'static str;

    /// Upcast used for the concrete-type checks `merge` and `replace`
    /// are required to make.
    fn as_any(&self) -> &dyn Any;

    /// Field-wise template match against `template`.
    ///
    /// Entities of different concrete types never match. An unset
    /// (`None`) template field matches anything; set string fields
    /// compare case-insensitively after trimming; nested entities
    /// recurse.
    fn matches_dyn(&self, template: &dyn Structured) -> bool;

    /// Field-wise merge of `other` into `self`.
    ///
    /// Unset fields of `other` are skipped, nested entities merge
    /// recursively, any other set field of `other` overwrites. Fails
    /// with [`Error::TypeMismatch`] when `other` is a different
    /// concrete type.
    fn merge_dyn(&mut self, other: &dyn Structured) -> Result<()>;

    /// Replace `self` wholesale with `other` if the concrete types
    /// agree. Returns `false` (and leaves `self` untouched) otherwise.
    fn assign_from(&mut self, other: &dyn Structured) -> bool;

    /// The nested entities among this entity's fields, in field order.
    fn children(&self) -> Vec<(&'static str, &dyn Structured)>;

    /// Mutable access to the nested entities.
    fn children_mut(&mut self) -> Vec<(&'static str, &mut dyn Structured)>;

    /// The set scalar fields, rendered for diagnostics.
    fn scalar_fields(&self) -> Vec<(&'static str, String)>;
}

/// Returns `true` if `obj` matches `template`.
///
/// An absent template matches every instance.
pub fn matches<T: Structured>(obj: &T, template: Option<&T>) -> bool {
    match template {
        None => true,
        Some(template) => obj.matches_dyn(template),
    }
}

/// Matches `obj` by applying `predicate` to its canonical encoding,
/// bypassing tree comparison entirely.
pub fn matches_encoding<F>(obj: &dyn Structured, predicate: F) -> bool
where
    F: Fn(&str) -> bool,
{
    predicate(&obj.to_string())
}

/// Merges `other` into `obj` field by field. See
/// [`Structured::merge_dyn`]; with both sides statically the same
/// type the merge cannot fail.
pub fn merge<T: Structured>(obj: &mut T, other: &T) {
    let _ = obj.merge_dyn(other);
}

/// Depth-first search for nested entities whose canonical encoding
/// equals `target` (or contains it, when `substring` is set) and whose
/// concrete type matches `replacement`'s, substituting `replacement`
/// in place. Returns whether anything was replaced.
pub fn replace(
    root: &mut dyn Structured,
    target: &str,
    replacement: &dyn Structured,
    substring: bool,
) -> Result<bool> {
    replace_at(root, target, replacement, substring, 0)
}

fn replace_at(
    node: &mut dyn Structured,
    target: &str,
    replacement: &dyn Structured,
    substring: bool,
    depth: usize,
) -> Result<bool> {
    if depth > MAX_DEPTH {
        return Err(Error::TooDeep(MAX_DEPTH));
    }

    let mut changed = false;
    for (_, child) in node.children_mut() {
        let encoded = child.to_string();
        let hit = if substring {
            encoded.contains(target)
        } else {
            encoded == target
        };
        if hit && child.assign_from(replacement) {
            changed = true;
            continue;
        }
        changed |= replace_at(child, target, replacement, substring, depth + 1)?;
    }

    Ok(changed)
}

/// Pretty-printed field-by-field dump for diagnostics. Not part of
/// the wire contract.
pub fn debug_dump(obj: &dyn Structured) -> String {
    let mut out = String::new();
    dump_at(obj, None, 0, &mut out);
    out
}

fn dump_at(node: &dyn Structured, name: Option<&str>, depth: usize, out: &mut String) {
    if depth > MAX_DEPTH {
        return;
    }

    let pad = "  ".repeat(depth);
    match name {
        Some(name) => out.push_str(&format!("{pad}{name} = {} {{\n", node.type_label())),
        None => out.push_str(&format!("{pad}{} {{\n", node.type_label())),
    }
    for (field, text) in node.scalar_fields() {
        out.push_str(&format!("{pad}  {field} = {text}\n"));
    }
    for (field, child) in node.children() {
        dump_at(child, Some(field), depth + 1, out);
    }
    out.push_str(&format!("{pad}}}\n"));
}

pub mod field {
    //! Per-field-type semantics backing the structural algorithms.

    use super::Structured;
    use sipmsg_util::ArcStr;
    use std::net::IpAddr;

    /// How a single field of a structured entity takes part in
    /// matching, merging, traversal and dumps.
    pub trait Value {
        /// Whether this field accepts the corresponding template field.
        fn matches_field(&self, template: &Self) -> bool;

        /// Merge the corresponding field of another instance into this
        /// one.
        fn merge_field(&mut self, other: &Self);

        /// This field as a nested entity, if it is one.
        fn as_node(&self) -> Option<&dyn Structured> {
            None
        }

        /// Mutable form of [`Value::as_node`].
        fn as_node_mut(&mut self) -> Option<&mut dyn Structured> {
            None
        }

        /// Render the field for a diagnostic dump. `None` for unset
        /// fields and for nested entities (dumped recursively).
        fn render(&self) -> Option<String>;
    }

    impl Value for ArcStr {
        fn matches_field(&self, template: &Self) -> bool {
            self.trim().eq_ignore_ascii_case(template.trim())
        }

        fn merge_field(&mut self, other: &Self) {
            *self = other.clone();
        }

        fn render(&self) -> Option<String> {
            Some(self.to_string())
        }
    }

    crate::macros::scalar_value!(bool, u8, u16, u32, u64, usize, IpAddr);

    impl<T> Value for Option<T>
    where
        T: Value + Clone,
    {
        fn matches_field(&self, template: &Self) -> bool {
            match template {
                None => true,
                Some(t) => self.as_ref().is_some_and(|v| v.matches_field(t)),
            }
        }

        fn merge_field(&mut self, other: &Self) {
            if let Some(other) = other {
                match self {
                    Some(v) => v.merge_field(other),
                    None => *self = Some(other.clone()),
                }
            }
        }

        fn as_node(&self) -> Option<&dyn Structured> {
            self.as_ref().and_then(Value::as_node)
        }

        fn as_node_mut(&mut self) -> Option<&mut dyn Structured> {
            self.as_mut().and_then(Value::as_node_mut)
        }

        fn render(&self) -> Option<String> {
            self.as_ref().and_then(Value::render)
        }
    }

    impl<T> Value for Vec<T>
    where
        T: PartialEq + Clone + std::fmt::Display,
    {
        fn matches_field(&self, template: &Self) -> bool {
            template.is_empty() || self == template
        }

        fn merge_field(&mut self, other: &Self) {
            if !other.is_empty() {
                *self = other.clone();
            }
        }

        fn render(&self) -> Option<String> {
            if self.is_empty() {
                return None;
            }
            let items: Vec<String> = self.iter().map(|v| v.to_string()).collect();
            Some(items.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Host, HostPort, Scheme, SipAddr, Uri, UriBuilder};

    fn uri(s: &str) -> Uri {
        Uri::parse_str(s).unwrap()
    }

    #[test]
    fn test_matches_absent_template() {
        let host = Host::new("atlanta.com");
        assert!(matches(&host, None));
        assert!(matches(&host, Some(&Host::new("ATLANTA.COM"))));
        assert!(!matches(&host, Some(&Host::new("biloxi.com"))));
    }

    #[test]
    fn test_matches_unset_fields() {
        let full = uri("sip:alice@atlanta.com:5060;transport=tcp");
        let template = UriBuilder::new()
            .host(HostPort::from(Host::new("atlanta.com")))
            .get();

        assert!(matches(&full, Some(&template)));

        let other = UriBuilder::new()
            .scheme(Scheme::Sips)
            .host(HostPort::from(Host::new("atlanta.com")))
            .get();
        assert!(!matches(&full, Some(&other)));
    }

    #[test]
    fn test_merge_skips_unset() {
        let mut uri_a = uri("sip:alice@atlanta.com");
        let uri_b = uri("sip:bob@biloxi.com:5080");

        merge(&mut uri_a, &uri_b);
        assert_eq!(uri_a.to_string(), "sip:bob@biloxi.com:5080");

        // Merging a template with no user set must not clear the user.
        let mut uri_c = uri("sip:carol@chicago.com");
        let template = UriBuilder::new()
            .host(HostPort::from(Host::new("chicago.com")))
            .get();
        merge(&mut uri_c, &template);
        assert_eq!(uri_c.user().map(|u| u.user.as_ref()), Some("carol"));
    }

    #[test]
    fn test_matches_encoding_predicate() {
        let host = Host::new("atlanta.com");
        assert!(matches_encoding(&host, |text| text.contains("atlanta")));
        assert!(!matches_encoding(&host, |text| text.contains("biloxi")));
    }

    #[test]
    fn test_merge_type_mismatch() {
        let mut host = Host::new("atlanta.com");
        let port = HostPort::from(Host::new("biloxi.com"));

        let err = host.merge_dyn(&port).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_replace_nested_uri() {
        let mut addr = SipAddr::parse_str("Alice <sip:alice@atlanta.com>").unwrap();
        let replacement = uri("sip:alice@backup.atlanta.com");

        let changed = replace(&mut addr, "sip:alice@atlanta.com", &replacement, false).unwrap();
        assert!(changed);
        assert_eq!(addr.to_string(), "Alice <sip:alice@backup.atlanta.com>");
    }

    #[test]
    fn test_debug_dump_lists_fields() {
        let uri = uri("sip:alice@atlanta.com:5060");
        let dump = debug_dump(&uri);

        assert!(dump.contains("scheme"));
        assert!(dump.contains("host_port"));
        assert!(dump.contains("atlanta.com"));
    }
}
