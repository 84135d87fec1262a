//! Cache Key Module
//!
//! Builds deterministic store keys of the form
//! `{prefix}{owner}_{operation}{args}`, where `args` is empty for a call
//! without arguments and otherwise `_` followed by each argument's canonical
//! JSON joined by `_`.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

// == Operation Identity ==
/// Stable name of a wrapped operation and the component that owns it.
///
/// Both parts are fixed strings chosen by the program, e.g.
/// `OperationId::new("JiraClient", "get_issue")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId {
    pub owner: &'static str,
    pub operation: &'static str,
}

impl OperationId {
    pub const fn new(owner: &'static str, operation: &'static str) -> Self {
        Self { owner, operation }
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.owner, self.operation)
    }
}

// == Call Arguments ==
/// Ordered arguments of one call, as they take part in the cache key.
///
/// Implemented for `()` and for tuples of up to eight `Serialize` values;
/// each tuple element is one argument.
pub trait KeyArgs {
    /// Serializes every argument, preserving call order.
    fn to_key_values(&self) -> Result<Vec<Value>>;
}

impl KeyArgs for () {
    fn to_key_values(&self) -> Result<Vec<Value>> {
        Ok(Vec::new())
    }
}

macro_rules! impl_key_args {
    ($($name:ident),+) => {
        impl<$($name: Serialize),+> KeyArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn to_key_values(&self) -> Result<Vec<Value>> {
                let ($($name,)+) = self;
                Ok(vec![$(serde_json::to_value($name)?),+])
            }
        }
    };
}

impl_key_args!(A1);
impl_key_args!(A1, A2);
impl_key_args!(A1, A2, A3);
impl_key_args!(A1, A2, A3, A4);
impl_key_args!(A1, A2, A3, A4, A5);
impl_key_args!(A1, A2, A3, A4, A5, A6);
impl_key_args!(A1, A2, A3, A4, A5, A6, A7);
impl_key_args!(A1, A2, A3, A4, A5, A6, A7, A8);

// == Cache Key ==
/// Opaque key identifying one operation-plus-arguments invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds the key for a call.
    pub fn build<A: KeyArgs + ?Sized>(prefix: &str, id: OperationId, args: &A) -> Result<Self> {
        let values = args.to_key_values()?;
        Ok(Self::from_values(prefix, id, &values))
    }

    /// Builds the key from already serialized arguments.
    pub fn from_values(prefix: &str, id: OperationId, args: &[Value]) -> Self {
        let mut key = String::with_capacity(prefix.len() + id.owner.len() + id.operation.len() + 1);
        key.push_str(prefix);
        key.push_str(id.owner);
        key.push('_');
        key.push_str(id.operation);

        for arg in args {
            key.push('_');
            write_canonical(arg, &mut key);
        }

        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Canonical JSON ==
/// Renders a value as compact JSON with object keys in sorted order, so
/// structurally equal arguments always produce the same text.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut fields: Vec<(&String, &Value)> = map.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (name, item)) in fields.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Serializing a plain string cannot fail
                out.push_str(&Value::String(name.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
