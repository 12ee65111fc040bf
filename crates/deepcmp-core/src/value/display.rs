//! Depth-limited rendering of values.
//!
//! Graphs may be cyclic, so nested containers and objects are rendered down
//! to a fixed depth and elided below it.
use std::fmt;

use super::Value;

/// Nesting depth below which containers and objects render as `...`.
const MAX_DEPTH: usize = 3;

struct Rendered<'a> {
    value: &'a Value,
    depth: usize,
}

impl<'a> Rendered<'a> {
    fn child(&self, value: &'a Value) -> Self {
        Rendered {
            value,
            depth: self.depth + 1,
        }
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "\"{s}\""),
            Value::Seq(seq) => {
                if self.depth >= MAX_DEPTH {
                    return f.write_str("[...]");
                }
                f.write_str("[")?;
                for (i, item) in seq.items().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", self.child(item))?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                if self.depth >= MAX_DEPTH {
                    return f.write_str("{...}");
                }
                f.write_str("{")?;
                for (i, (k, v)) in map.entries().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", self.child(k), self.child(v))?;
                }
                f.write_str("}")
            }
            Value::Object(object) => {
                let name = object.class().simple_name();
                if self.depth >= MAX_DEPTH {
                    return write!(f, "{name}(...)");
                }
                write!(f, "{name}(")?;
                for (i, (field, v)) in object.field_snapshot().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{field}={}", self.child(v))?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Rendered {
            value: self,
            depth: 0,
        }
        .fmt(f)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
