use core::fmt;

use enum_as_inner::EnumAsInner;
use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::object::Structured;

use super::*;

/// An unrecognized header line, kept verbatim.
///
/// Header names this crate has no parser for are stored as raw
/// name/value text and re-emitted unchanged at encode time rather
/// than dropped.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RawHeader {
    /// The header name exactly as received.
    pub name: ArcStr,
    /// The header value exactly as received.
    pub value: ArcStr,
}

impl RawHeader {
    /// Creates a `RawHeader` from its parts.
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub(crate) fn append_folded_line(&mut self, continuation: &str) {
        let mut value = self.value.to_string();
        value.push(' ');
        value.push_str(continuation);
        self.value = value.into();
    }
}

impl fmt::Display for RawHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

crate::macros::structured!(RawHeader, "raw-header" { name, value });

macro_rules! header_enum {
    ($($variant:ident),* $(,)?) => {
        /// One parsed SIP header, whichever type it is.
        #[derive(Debug, PartialEq, Clone, EnumAsInner)]
        pub enum Header {
            $(
                #[doc = concat!("The `", stringify!($variant), "` header.")]
                $variant($variant),
            )*
            /// A header this crate has no parser for.
            Raw(RawHeader),
        }

        impl Header {
            /// The canonical name this header encodes under. `Raw`
            /// headers keep the name they arrived with.
            pub fn name(&self) -> &str {
                match self {
                    $( Header::$variant(_) => $variant::NAME, )*
                    Header::Raw(raw) => &raw.name,
                }
            }

            /// The canonical encoding of the header value, without the
            /// `Name: ` prefix.
            pub fn encode_body(&self) -> String {
                match self {
                    $( Header::$variant(v) => EncodeBody::encode_body(v), )*
                    Header::Raw(raw) => raw.value.to_string(),
                }
            }

            fn inner(&self) -> &dyn Structured {
                match self {
                    $( Header::$variant(v) => v, )*
                    Header::Raw(raw) => raw,
                }
            }

            fn inner_mut(&mut self) -> &mut dyn Structured {
                match self {
                    $( Header::$variant(v) => v, )*
                    Header::Raw(raw) => raw,
                }
            }
        }

        impl fmt::Display for Header {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( Header::$variant(v) => write!(f, "{v}"), )*
                    Header::Raw(raw) => write!(f, "{raw}"),
                }
            }
        }
    };
}

header_enum!(
    Accept,
    Allow,
    Authorization,
    CallId,
    Contact,
    ContentLength,
    ContentType,
    CSeq,
    Expires,
    From,
    MaxForwards,
    MinExpires,
    Organization,
    Priority,
    ProxyAuthenticate,
    ProxyAuthorization,
    ProxyRequire,
    RecordRoute,
    Require,
    Route,
    Server,
    Subject,
    Supported,
    To,
    Unsupported,
    UserAgent,
    Via,
    Warning,
    WWWAuthenticate,
);

impl Structured for Header {
    fn type_label(&self) -> &'static str {
        "header"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn matches_dyn(&self, template: &dyn Structured) -> bool {
        match template.as_any().downcast_ref::<Header>() {
            Some(template) => self.inner().matches_dyn(template.inner()),
            None => false,
        }
    }

    fn merge_dyn(&mut self, other: &dyn Structured) -> Result<()> {
        let Some(other) = other.as_any().downcast_ref::<Header>() else {
            return Err(crate::Error::TypeMismatch {
                expected: "header",
                found: other.type_label(),
            });
        };
        self.inner_mut().merge_dyn(other.inner())
    }

    fn assign_from(&mut self, other: &dyn Structured) -> bool {
        match other.as_any().downcast_ref::<Header>() {
            Some(other) if std::mem::discriminant(self) == std::mem::discriminant(other) => {
                *self = other.clone();
                true
            }
            _ => false,
        }
    }

    fn children(&self) -> Vec<(&'static str, &dyn Structured)> {
        vec![("value", self.inner())]
    }

    fn children_mut(&mut self) -> Vec<(&'static str, &mut dyn Structured)> {
        vec![("value", self.inner_mut())]
    }

    fn scalar_fields(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

crate::macros::node_value!(Header);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_and_body() {
        let hdr = Header::ContentLength(ContentLength::new(42));
        assert_eq!(hdr.name(), "Content-Length");
        assert_eq!(hdr.encode_body(), "42");
        assert_eq!(hdr.to_string(), "Content-Length: 42");
    }

    #[test]
    fn test_raw_passthrough() {
        let hdr = Header::Raw(RawHeader::new("X-Custom-Id", "abc; x=1"));
        assert_eq!(hdr.name(), "X-Custom-Id");
        assert_eq!(hdr.to_string(), "X-Custom-Id: abc; x=1");
    }

    #[test]
    fn test_merge_across_header_types_fails() {
        let mut from = Header::Expires(Expires::new(10));
        let other = Header::ContentLength(ContentLength::new(0));

        let err = from.merge_dyn(&other).unwrap_err();
        assert!(matches!(err, crate::Error::TypeMismatch { .. }));
    }
}
