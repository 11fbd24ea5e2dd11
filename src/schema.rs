//! The schema tree that interpreters walk.

use crate::describe::Describe;
use crate::interpret::interpret;
use serde_json::{Number, Value};
use std::fmt;
use std::rc::Rc;

/// A scalar value that a [`Schema::Literal`] node allows.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Literal {
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => Value::Number(n.clone()),
            Literal::String(s) => Value::String(s.clone()),
        }
    }

    /// Whether `value` is this literal.
    ///
    /// Numbers compare by numeric value, so `1` matches `1.0`.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Literal::Null, Value::Null) => true,
            (Literal::Bool(a), Value::Bool(b)) => a == b,
            (Literal::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
            (Literal::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Number(n.into())
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Number(n.into())
    }
}

impl From<u64> for Literal {
    fn from(n: u64) -> Self {
        Literal::Number(n.into())
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_owned())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// One node of a schema.
///
/// Schemas are immutable once built and cheap to clone. A
/// [`Schema::Recursive`] node holds a factory rather than its target, which is
/// how a schema refers to itself without being infinitely large.
#[derive(Clone)]
pub enum Schema {
    /// One of a set of allowed scalar values.
    Literal(Vec<Literal>),
    String,
    Number,
    Boolean,
    /// Any array.
    UnknownArray,
    /// Any object.
    UnknownRecord,
    /// `null`, or the inner schema.
    Nullable(Box<Schema>),
    /// An object where every listed field is required.
    Object(Vec<(String, Schema)>),
    /// An object where every listed field may be absent.
    Partial(Vec<(String, Schema)>),
    /// A string-keyed map with values of one schema.
    Record(Box<Schema>),
    Tuple(Vec<Schema>),
    Array(Box<Schema>),
    /// A value satisfying both schemas at once.
    Intersection(Box<Schema>, Box<Schema>),
    /// An object whose `discriminator` field selects the member it must match.
    TaggedUnion {
        discriminator: String,
        members: Vec<(String, Schema)>,
    },
    Union(Vec<Schema>),
    /// A deferred reference, usually to an enclosing schema.
    Recursive {
        id: String,
        factory: Rc<dyn Fn() -> Schema>,
    },
}

impl Schema {
    pub fn literal<I, L>(values: I) -> Schema
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        Schema::Literal(values.into_iter().map(Into::into).collect())
    }

    pub fn nullable(inner: Schema) -> Schema {
        Schema::Nullable(Box::new(inner))
    }

    pub fn object<I, K>(fields: I) -> Schema
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Schema::Object(dedup_fields(fields))
    }

    pub fn partial<I, K>(fields: I) -> Schema
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Schema::Partial(dedup_fields(fields))
    }

    pub fn record(codomain: Schema) -> Schema {
        Schema::Record(Box::new(codomain))
    }

    pub fn tuple<I: IntoIterator<Item = Schema>>(components: I) -> Schema {
        Schema::Tuple(components.into_iter().collect())
    }

    pub fn array(item: Schema) -> Schema {
        Schema::Array(Box::new(item))
    }

    pub fn intersection(left: Schema, right: Schema) -> Schema {
        Schema::Intersection(Box::new(left), Box::new(right))
    }

    pub fn tagged_union<I, K>(discriminator: impl Into<String>, members: I) -> Schema
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Schema::TaggedUnion {
            discriminator: discriminator.into(),
            members: dedup_fields(members),
        }
    }

    pub fn union<I: IntoIterator<Item = Schema>>(members: I) -> Schema {
        Schema::Union(members.into_iter().collect())
    }

    /// A node that calls `factory` whenever it is interpreted.
    ///
    /// ```
    /// use fuzz_pair::Schema;
    ///
    /// fn tree() -> Schema {
    ///     Schema::object(vec![
    ///         ("value", Schema::Number),
    ///         ("children", Schema::array(Schema::lazy("Tree", tree))),
    ///     ])
    /// }
    ///
    /// assert_eq!(
    ///     tree().to_string(),
    ///     "{ value: number; children: Array<Tree> }"
    /// );
    /// ```
    pub fn lazy<F>(id: impl Into<String>, factory: F) -> Schema
    where
        F: Fn() -> Schema + 'static,
    {
        Schema::Recursive {
            id: id.into(),
            factory: Rc::new(factory),
        }
    }
}

// Keeps the last declaration of each key, in the position of its first one.
fn dedup_fields<I, K>(fields: I) -> Vec<(String, Schema)>
where
    I: IntoIterator<Item = (K, Schema)>,
    K: Into<String>,
{
    let mut out: Vec<(String, Schema)> = Vec::new();
    for (key, schema) in fields {
        let key = key.into();
        match out.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = schema,
            None => out.push((key, schema)),
        }
    }

    out
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Literal(values) => f.debug_tuple("Literal").field(values).finish(),
            Schema::String => f.write_str("String"),
            Schema::Number => f.write_str("Number"),
            Schema::Boolean => f.write_str("Boolean"),
            Schema::UnknownArray => f.write_str("UnknownArray"),
            Schema::UnknownRecord => f.write_str("UnknownRecord"),
            Schema::Nullable(inner) => f.debug_tuple("Nullable").field(inner).finish(),
            Schema::Object(fields) => f.debug_tuple("Object").field(fields).finish(),
            Schema::Partial(fields) => f.debug_tuple("Partial").field(fields).finish(),
            Schema::Record(codomain) => f.debug_tuple("Record").field(codomain).finish(),
            Schema::Tuple(components) => f.debug_tuple("Tuple").field(components).finish(),
            Schema::Array(item) => f.debug_tuple("Array").field(item).finish(),
            Schema::Intersection(left, right) => f
                .debug_tuple("Intersection")
                .field(left)
                .field(right)
                .finish(),
            Schema::TaggedUnion {
                discriminator,
                members,
            } => f
                .debug_struct("TaggedUnion")
                .field("discriminator", discriminator)
                .field("members", members)
                .finish(),
            Schema::Union(members) => f.debug_tuple("Union").field(members).finish(),
            // The factory is not called here: the target may contain this node.
            Schema::Recursive { id, .. } => f.debug_struct("Recursive").field("id", id).finish(),
        }
    }
}

/// Renders the schema as a TypeScript-like type expression.
impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&interpret(&Describe, self))
    }
}
