use std::fmt;
use std::str::FromStr;

use sipmsg_util::ArcStr;

use crate::error::{Error, Result};
use crate::object::Structured;
use crate::parser::Parser;

/// A single `name=value` unit.
///
/// This is the atomic unit for all SIP parameters: URI parameters,
/// header parameters and authentication parameters. The name may be
/// absent (a bare value embedded in a list), the value may be absent
/// (a flag parameter such as `;lr`), and a value parsed from a quoted
/// string keeps its quoting for re-encoding.
///
/// # Examples
///
/// ```
/// use sipmsg::message::Param;
///
/// let param: Param = "branch=z9hG4bK776".parse().unwrap();
///
/// assert_eq!(param.name(), Some("branch"));
/// assert_eq!(param.value(), Some("z9hG4bK776"));
/// ```
#[derive(Debug, Eq, Clone)]
pub struct Param {
    name: Option<ArcStr>,
    value: Option<ArcStr>,
    quoted: bool,
    separator: char,
}

impl Param {
    /// Creates a `name[=value]` parameter.
    pub fn new(name: &str, value: Option<&str>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.map(|v| v.into()),
            quoted: false,
            separator: '=',
        }
    }

    /// Creates a flag parameter (name, no value).
    pub fn flag(name: &str) -> Self {
        Self::new(name, None)
    }

    /// Creates a bare value with no name.
    pub fn unnamed(value: &str) -> Self {
        Self {
            name: None,
            value: Some(value.into()),
            quoted: false,
            separator: '=',
        }
    }

    /// Creates a parameter whose value re-encodes inside double
    /// quotes.
    pub fn quoted(name: &str, value: &str) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            quoted: true,
            separator: '=',
        }
    }

    /// Returns the parameter name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the parameter value, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns `true` if the value was quoted on the wire.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Returns `true` if the parameter has a name and no value.
    pub fn is_flag(&self) -> bool {
        self.name.is_some() && self.value.is_none()
    }

    /// Case-insensitive name comparison.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name))
    }

    /// Consumes the parameter, returning its value.
    pub fn into_value(self) -> Option<ArcStr> {
        self.value
    }

    /// Replaces the value.
    pub fn set_value(&mut self, value: Option<&str>) {
        self.value = value.map(|v| v.into());
    }

    pub(crate) fn with_quoting(name: &str, value: Option<&str>, quoted: bool) -> Self {
        Self {
            name: Some(name.into()),
            value: value.map(|v| v.into()),
            quoted,
            separator: '=',
        }
    }
}

// Names compare case-insensitively; values compare case-sensitively
// only when the value was explicitly quoted.
impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        let names = match (&self.name, &other.name) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        };
        let values = match (&self.value, &other.value) {
            (Some(a), Some(b)) if self.quoted || other.quoted => a == b,
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        };
        names && values
    }
}

impl FromStr for Param {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Parser::new(s.as_bytes()).parse_param_ref()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.value) {
            (Some(name), Some(value)) if self.quoted => {
                write!(f, "{name}{}\"{value}\"", self.separator)
            }
            (Some(name), Some(value)) => write!(f, "{name}{}{value}", self.separator),
            (Some(name), None) => write!(f, "{name}"),
            (None, Some(value)) => write!(f, "{value}"),
            (None, None) => Ok(()),
        }
    }
}

impl Structured for Param {
    fn type_label(&self) -> &'static str {
        "param"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn matches_dyn(&self, template: &dyn Structured) -> bool {
        let Some(template) = template.as_any().downcast_ref::<Param>() else {
            return false;
        };
        let name_ok = match &template.name {
            None => true,
            Some(t) => self.name.as_ref().is_some_and(|n| n.eq_ignore_ascii_case(t)),
        };
        let value_ok = match &template.value {
            None => true,
            Some(t) => self.value.as_ref().is_some_and(|v| {
                if template.quoted || self.quoted {
                    v == t
                } else {
                    v.trim().eq_ignore_ascii_case(t.trim())
                }
            }),
        };
        name_ok && value_ok
    }

    fn merge_dyn(&mut self, other: &dyn Structured) -> Result<()> {
        let Some(other) = other.as_any().downcast_ref::<Param>() else {
            return Err(Error::TypeMismatch {
                expected: "param",
                found: other.type_label(),
            });
        };
        if other.name.is_some() {
            self.name = other.name.clone();
        }
        if other.value.is_some() {
            self.value = other.value.clone();
            self.quoted = other.quoted;
        }
        Ok(())
    }

    fn assign_from(&mut self, other: &dyn Structured) -> bool {
        match other.as_any().downcast_ref::<Param>() {
            Some(other) => {
                *self = other.clone();
                true
            }
            None => false,
        }
    }

    fn children(&self) -> Vec<(&'static str, &dyn Structured)> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<(&'static str, &mut dyn Structured)> {
        Vec::new()
    }

    fn scalar_fields(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(name) = &self.name {
            out.push(("name", name.to_string()));
        }
        if let Some(value) = &self.value {
            out.push(("value", value.to_string()));
        }
        out
    }
}

crate::macros::node_value!(Param);

/// An ordered collection of [`Param`]s.
///
/// Lookups are always case-insensitive on the name. Duplicate names
/// are permitted (some parameters legally repeat); [`Params::get`]
/// returns the first occurrence and [`Params::get_all`] iterates every
/// one.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Params {
    inner: Vec<Param>,
    separator: char,
}

impl Params {
    /// Creates an empty `;`-separated list.
    pub fn new() -> Self {
        Self {
            inner: Vec::new(),
            separator: ';',
        }
    }

    /// Creates an empty list with the given top-level separator
    /// (`;` for header/URI parameters, `,` for challenge parameters).
    pub fn with_separator(separator: char) -> Self {
        Self {
            inner: Vec::new(),
            separator,
        }
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the first parameter with the given name.
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.inner.iter().find(|p| p.name_matches(name))
    }

    /// Returns the value of the first parameter with the given name.
    ///
    /// The outer `Option` is the presence of the parameter, the inner
    /// value its (possibly absent) value.
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|p| p.value())
    }

    /// Iterates every parameter with the given name.
    pub fn get_all<'p>(&'p self, name: &'p str) -> impl Iterator<Item = &'p Param> {
        self.inner.iter().filter(move |p| p.name_matches(name))
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.inner.iter()
    }

    /// Appends a parameter.
    pub fn push(&mut self, param: Param) {
        self.inner.push(param);
    }

    /// Sets a parameter, replacing the first occurrence of the same
    /// name or appending.
    pub fn set(&mut self, name: &str, value: Option<&str>) {
        match self.inner.iter_mut().find(|p| p.name_matches(name)) {
            Some(param) => param.set_value(value),
            None => self.inner.push(Param::new(name, value)),
        }
    }

    /// Removes every parameter with the given name, returning whether
    /// anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.inner.len();
        self.inner.retain(|p| !p.name_matches(name));
        self.inner.len() != before
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> From<[(&'a str, &'a str); N]> for Params {
    fn from(params: [(&'a str, &'a str); N]) -> Self {
        Self {
            inner: params.map(|(name, value)| Param::new(name, Some(value))).to_vec(),
            separator: ';',
        }
    }
}

impl FromIterator<Param> for Params {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
            separator: ';',
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joiner = if self.separator == ',' { ", " } else { ";" };
        let mut first = true;
        for param in &self.inner {
            if !first {
                f.write_str(joiner)?;
            }
            write!(f, "{param}")?;
            first = false;
        }
        Ok(())
    }
}

impl Structured for Params {
    fn type_label(&self) -> &'static str {
        "params"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    // Every template entry must be matched by some entry of `self`;
    // extra entries in `self` are irrelevant.
    fn matches_dyn(&self, template: &dyn Structured) -> bool {
        let Some(template) = template.as_any().downcast_ref::<Params>() else {
            return false;
        };
        template
            .inner
            .iter()
            .all(|t| self.inner.iter().any(|p| p.matches_dyn(t)))
    }

    fn merge_dyn(&mut self, other: &dyn Structured) -> Result<()> {
        let Some(other) = other.as_any().downcast_ref::<Params>() else {
            return Err(Error::TypeMismatch {
                expected: "params",
                found: other.type_label(),
            });
        };
        for param in &other.inner {
            match param.name() {
                Some(name) => match self.inner.iter_mut().find(|p| p.name_matches(name)) {
                    Some(existing) => *existing = param.clone(),
                    None => self.inner.push(param.clone()),
                },
                None => self.inner.push(param.clone()),
            }
        }
        Ok(())
    }

    fn assign_from(&mut self, other: &dyn Structured) -> bool {
        match other.as_any().downcast_ref::<Params>() {
            Some(other) => {
                *self = other.clone();
                true
            }
            None => false,
        }
    }

    fn children(&self) -> Vec<(&'static str, &dyn Structured)> {
        self.inner.iter().map(|p| ("entry", p as &dyn Structured)).collect()
    }

    fn children_mut(&mut self) -> Vec<(&'static str, &mut dyn Structured)> {
        self.inner
            .iter_mut()
            .map(|p| ("entry", p as &mut dyn Structured))
            .collect()
    }

    fn scalar_fields(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

crate::macros::node_value!(Params);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_from_str() {
        let param: Param = "param=value".parse().unwrap();
        assert_eq!(param.name(), Some("param"));
        assert_eq!(param.value(), Some("value"));
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Param::new("ttl", Some("4")).to_string(), "ttl=4");
        assert_eq!(Param::flag("lr").to_string(), "lr");
        assert_eq!(Param::unnamed("tcp").to_string(), "tcp");
        assert_eq!(Param::quoted("realm", "atlanta.com").to_string(), "realm=\"atlanta.com\"");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut params = Params::new();
        params.push(Param::new("Realm", Some("x")));

        assert_eq!(params.get_value("realm"), Some("x"));
        assert_eq!(params.get_value("REALM"), Some("x"));
        assert_eq!(params.get_value("nonce"), None);
    }

    #[test]
    fn test_duplicate_names() {
        let mut params = Params::new();
        params.push(Param::new("route", Some("a")));
        params.push(Param::new("route", Some("b")));

        assert_eq!(params.get_value("route"), Some("a"));
        assert_eq!(params.get_all("route").count(), 2);
    }

    #[test]
    fn test_equality_quoting_rules() {
        // Unquoted values compare case-insensitively.
        assert_eq!(Param::new("transport", Some("TCP")), Param::new("transport", Some("tcp")));
        // Quoted values compare case-sensitively.
        assert_ne!(Param::quoted("nonce", "AbC"), Param::quoted("nonce", "abc"));
    }

    #[test]
    fn test_display_separators() {
        let mut params = Params::new();
        params.push(Param::new("a", Some("1")));
        params.push(Param::flag("lr"));
        assert_eq!(params.to_string(), "a=1;lr");

        let mut params = Params::with_separator(',');
        params.push(Param::quoted("realm", "x"));
        params.push(Param::new("algorithm", Some("MD5")));
        assert_eq!(params.to_string(), "realm=\"x\", algorithm=MD5");
    }
}
