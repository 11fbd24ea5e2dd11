//! Structural predicates over JSON values, used by the tests to check samples.

use crate::interpret::Interpreter;
use crate::schema::Literal;
use serde_json::Value;
use std::rc::Rc;

pub(crate) type Check = Rc<dyn Fn(&Value) -> bool>;

fn check<F: Fn(&Value) -> bool + 'static>(f: F) -> Check {
    Rc::new(f)
}

/// Builds a predicate accepting exactly the values a schema describes.
/// Objects may carry members beyond the declared fields.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Guard;

impl Interpreter for Guard {
    const ID: &'static str = "guard";
    type Output = Check;

    fn literal(&self, values: &[Literal]) -> Check {
        let values = values.to_vec();
        check(move |value| values.iter().any(|literal| literal.matches(value)))
    }

    fn string(&self) -> Check {
        check(Value::is_string)
    }

    fn number(&self) -> Check {
        check(Value::is_number)
    }

    fn boolean(&self) -> Check {
        check(Value::is_boolean)
    }

    fn unknown_array(&self) -> Check {
        check(Value::is_array)
    }

    fn unknown_record(&self) -> Check {
        check(Value::is_object)
    }

    fn nullable(&self, inner: Check) -> Check {
        check(move |value| value.is_null() || inner(value))
    }

    fn object(&self, fields: Vec<(String, Check)>) -> Check {
        check(move |value| match value.as_object() {
            Some(object) => fields
                .iter()
                .all(|(key, field)| object.get(key).map_or(false, |v| field(v))),
            None => false,
        })
    }

    fn partial(&self, fields: Vec<(String, Check)>) -> Check {
        check(move |value| match value.as_object() {
            Some(object) => fields
                .iter()
                .all(|(key, field)| object.get(key).map_or(true, |v| field(v))),
            None => false,
        })
    }

    fn record(&self, codomain: Check) -> Check {
        check(move |value| match value.as_object() {
            Some(object) => object.values().all(|v| codomain(v)),
            None => false,
        })
    }

    fn tuple(&self, components: Vec<Check>) -> Check {
        check(move |value| match value.as_array() {
            Some(items) => {
                items.len() == components.len()
                    && items.iter().zip(&components).all(|(v, component)| component(v))
            }
            None => false,
        })
    }

    fn array(&self, item: Check) -> Check {
        check(move |value| match value.as_array() {
            Some(items) => items.iter().all(|v| item(v)),
            None => false,
        })
    }

    fn intersection(&self, left: Check, right: Check) -> Check {
        check(move |value| left(value) && right(value))
    }

    fn tagged_union(&self, discriminator: &str, members: Vec<(String, Check)>) -> Check {
        let discriminator = discriminator.to_owned();
        check(move |value| {
            let tag = match value.get(&discriminator).and_then(Value::as_str) {
                Some(tag) => tag,
                None => return false,
            };

            members
                .iter()
                .find(|(t, _)| t == tag)
                .map_or(false, |(_, member)| member(value))
        })
    }

    fn union(&self, members: Vec<Check>) -> Check {
        check(move |value| members.iter().any(|member| member(value)))
    }

    fn recursive(&self, _id: &str, factory: Rc<dyn Fn() -> Check>) -> Check {
        check(move |value| factory()(value))
    }
}
