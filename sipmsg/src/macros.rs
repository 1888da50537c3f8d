macro_rules! lookup_table {
    ($name:ident => $( $slice:expr ),+) => {
        const $name: [bool; 256] = {
            let mut arr = [false; 256];
            $(
                let mut i = 0;
                while i < $slice.len() {
                    arr[$slice[i] as usize] = true;
                    i += 1;
                }
            )*
            arr
        };
    };
}

macro_rules! parse_header_param {
    ($parser:ident) => (
        $crate::macros::parse_param!(
            $parser,
            $crate::parser::Parser::parse_param_ref,
        )
    );

    ($parser:ident, $($name:ident = $var:expr),*) => (
        $crate::macros::parse_param!(
            $parser,
            $crate::parser::Parser::parse_param_ref,
            $($name = $var),*
        )
    );
}

macro_rules! parse_param {
    (
        $parser:ident,
        $func:expr
        $(, $name:ident = $var:expr)* $(,)?
    ) =>  {{
        $parser.skip_lws();
        match $parser.peek() {
            Some(&b';') => {
                let mut params = $crate::message::Params::new();
                while let Some(&b';') = $parser.peek() {
                    // take ';' character
                    $parser.advance(1);
                    let param = $func($parser)?;
                    $(
                        if param.name_matches($name) {
                            $var = param.into_value();
                            $parser.skip_lws();
                            continue;
                        }
                    )*
                    params.push(param);
                    $parser.skip_lws();
                }
                if params.is_empty() {
                    None
                } else {
                    Some(params)
                }
            }
            _ => None,
        }
    }};
}

macro_rules! hdr_list {
    ($parser:ident => $body:expr) => {{
        let mut hdr_items = Vec::with_capacity(1);
        $crate::macros::comma_separated!($parser => {
            hdr_items.push($body);
        });
        hdr_items
    }};
}

macro_rules! comma_separated {
    ($parser:ident => $body:expr) => {{
        $parser.skip_lws();
        $body

        while let Some(&b',') = $parser.peek() {
            $parser.advance(1);
            $parser.skip_lws();
            $body
        }
    }};
}

/// Creates a [`Headers`](crate::headers::Headers) collection from a
/// list of headers.
#[macro_export]
macro_rules! headers {
    () => (
        $crate::headers::Headers::new()
    );
    ($($x:expr),+ $(,)?) => (
        $crate::headers::Headers::from(vec![$($x),+])
    );
}

/// Iterates the headers, yielding references to the inner value of
/// every header of the given variant.
#[macro_export]
macro_rules! filter_map_header {
    ($hdrs:expr, $header:ident) => {
        $hdrs.iter().filter_map(|hdr| {
            if let $crate::headers::Header::$header(v) = hdr {
                Some(v)
            } else {
                None
            }
        })
    };
}

/// Finds the first header of the given variant and returns a reference
/// to its inner value.
#[macro_export]
macro_rules! find_map_header {
    ($hdrs:expr, $header:ident) => {
        $hdrs.iter().find_map(|hdr| {
            if let $crate::headers::Header::$header(v) = hdr {
                Some(v)
            } else {
                None
            }
        })
    };
}

/// Finds the first header of the given variant and returns a mutable
/// reference to its inner value.
#[macro_export]
macro_rules! find_map_mut_header {
    ($hdrs:expr, $header:ident) => {
        $hdrs.iter_mut().find_map(|hdr| {
            if let $crate::headers::Header::$header(v) = hdr {
                Some(v)
            } else {
                None
            }
        })
    };
}

// Generates the structural-object implementations for a parsed entity
// by enumerating its fields at compile time. Field semantics (match,
// merge, child traversal, dump rendering) are supplied per field type
// by `object::field::Value`.
macro_rules! structured {
    ($ty:ident, $label:literal { $($field:ident),* $(,)? }) => {
        impl $crate::object::Structured for $ty {
            fn type_label(&self) -> &'static str {
                $label
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn matches_dyn(&self, template: &dyn $crate::object::Structured) -> bool {
                let Some(template) = template.as_any().downcast_ref::<$ty>() else {
                    return false;
                };
                $( $crate::object::field::Value::matches_field(&self.$field, &template.$field) && )* true
            }

            fn merge_dyn(&mut self, other: &dyn $crate::object::Structured) -> $crate::Result<()> {
                let Some(other) = other.as_any().downcast_ref::<$ty>() else {
                    return Err($crate::Error::TypeMismatch {
                        expected: $label,
                        found: other.type_label(),
                    });
                };
                $( $crate::object::field::Value::merge_field(&mut self.$field, &other.$field); )*
                Ok(())
            }

            fn assign_from(&mut self, other: &dyn $crate::object::Structured) -> bool {
                match other.as_any().downcast_ref::<$ty>() {
                    Some(other) => {
                        *self = other.clone();
                        true
                    }
                    None => false,
                }
            }

            fn children(&self) -> Vec<(&'static str, &dyn $crate::object::Structured)> {
                let mut out: Vec<(&'static str, &dyn $crate::object::Structured)> = Vec::new();
                $(
                    if let Some(node) = $crate::object::field::Value::as_node(&self.$field) {
                        out.push((stringify!($field), node));
                    }
                )*
                out
            }

            fn children_mut(&mut self) -> Vec<(&'static str, &mut dyn $crate::object::Structured)> {
                let mut out: Vec<(&'static str, &mut dyn $crate::object::Structured)> = Vec::new();
                $(
                    if let Some(node) = $crate::object::field::Value::as_node_mut(&mut self.$field) {
                        out.push((stringify!($field), node));
                    }
                )*
                out
            }

            fn scalar_fields(&self) -> Vec<(&'static str, String)> {
                let mut out: Vec<(&'static str, String)> = Vec::new();
                $(
                    if let Some(text) = $crate::object::field::Value::render(&self.$field) {
                        out.push((stringify!($field), text));
                    }
                )*
                out
            }
        }

        $crate::macros::node_value!($ty);
    };
}

// Marks a type that implements `Structured` as usable as a nested
// field of another structured entity.
macro_rules! node_value {
    ($ty:ty) => {
        impl $crate::object::field::Value for $ty {
            fn matches_field(&self, template: &Self) -> bool {
                $crate::object::Structured::matches_dyn(self, template)
            }

            fn merge_field(&mut self, other: &Self) {
                // Same concrete type on both sides, cannot fail.
                let _ = $crate::object::Structured::merge_dyn(self, other);
            }

            fn as_node(&self) -> Option<&dyn $crate::object::Structured> {
                Some(self)
            }

            fn as_node_mut(&mut self) -> Option<&mut dyn $crate::object::Structured> {
                Some(self)
            }

            fn render(&self) -> Option<String> {
                None
            }
        }
    };
}

// Field semantics for plain scalar types: equality match, overwrite
// merge, rendered through `Display`.
macro_rules! scalar_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::object::field::Value for $ty {
                fn matches_field(&self, template: &Self) -> bool {
                    self == template
                }

                fn merge_field(&mut self, other: &Self) {
                    *self = other.clone();
                }

                fn render(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

pub(crate) use comma_separated;
pub(crate) use hdr_list;
pub(crate) use lookup_table;
pub(crate) use node_value;
pub(crate) use parse_header_param;
pub(crate) use parse_param;
pub(crate) use scalar_value;
pub(crate) use structured;

pub use filter_map_header;
pub use find_map_header;
pub use find_map_mut_header;
pub use headers;
