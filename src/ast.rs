//! Defines the segment types that make up a parsed path expression.
use std::fmt;

/// One unit of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A plain field lookup in a mapping (e.g. `image`).
    Key(String),
    /// A positional lookup in a sequence (e.g. `[0]`).
    Index(usize),
    /// A field filter over a sequence of mappings
    /// (e.g. `[name=nginx]` or `[containerName:name=nginx]`).
    Predicate {
        /// The name the matched field value is captured under. Defaults to
        /// `field` when the path gave no explicit `name:` prefix.
        capture: String,
        /// The field each element is filtered on.
        field: String,
        /// The value the field must equal. `None` matches any element that
        /// has `field`, regardless of its value.
        value: Option<String>,
    },
}

/// A parsed path expression: an ordered list of segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    pub segments: Vec<Segment>,
}

/// Renders a key so that it parses back to the same segment: keys containing
/// the separator are wrapped in double quotes.
pub(crate) fn render_key(key: &str) -> String {
    if key.contains('.') {
        format!("\"{key}\"")
    } else {
        key.to_string()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", render_key(key)),
            Segment::Index(index) => write!(f, "[{index}]"),
            Segment::Predicate {
                capture,
                field,
                value,
            } => {
                write!(f, "[")?;
                if capture != field {
                    write!(f, "{capture}:")?;
                }
                write!(f, "{field}")?;
                if let Some(value) = value {
                    write!(f, "={value}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
