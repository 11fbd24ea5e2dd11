//! Paired generators: for every schema node, one generator of values the node
//! accepts and one of values it rejects.
//!
//! # Corruption policies
//!
//! Each node kind corrupts its values in its own way:
//!
//! * Primitives draw from a pool of values of the wrong kind.
//!
//! * Objects and tuples inject a single fault: a valid instance is drawn, then
//!   exactly one field (or position), chosen uniformly among those present, is
//!   replaced with a draw from that child's corrupted generator.
//!
//! * Records and arrays corrupt every entry, and are never empty.
//!
//! * Intersections corrupt both sides at once. When both sides are objects,
//!   the corrupted members of each side take precedence over valid ones on
//!   shared keys. Unions, tagged or not, draw a uniformly chosen member's
//!   corrupted value.
//!
//! Objects without fields and tuples without components have nothing to
//! corrupt; their corrupted generator yields the same empty value as their
//! valid one.

use crate::gen::{self, Gen, Size};
use crate::interpret::Interpreter;
use crate::schema::Literal;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::rc::Rc;

// Strings and numbers that boolean decoders are commonly tempted to accept.
const CONFUSABLE_BOOLEANS: [&str; 4] = ["true", "false", "0", "1"];

/// A generator of valid values coupled with a generator of corrupted values
/// for the same schema node.
#[derive(Debug, Clone)]
pub struct PairedGenerator {
    valid: Gen<Value>,
    corrupted: Gen<Value>,
    corruptions: Gen<Corruption>,
}

impl PairedGenerator {
    /// Pairs two generators. Every corrupted value is treated as faulty as a
    /// whole.
    pub fn new(valid: Gen<Value>, corrupted: Gen<Value>) -> Self {
        PairedGenerator::from_corruptions(valid, corrupted.map(Corruption::whole))
    }

    fn from_corruptions(valid: Gen<Value>, corruptions: Gen<Corruption>) -> Self {
        PairedGenerator {
            valid,
            corrupted: corruptions.clone().map(|corruption| corruption.value),
            corruptions,
        }
    }

    // Both sides always yield `value`.
    fn trivial(value: Value) -> Self {
        PairedGenerator::new(Gen::constant(value.clone()), Gen::constant(value))
    }

    /// Values the schema node accepts.
    pub fn valid(&self) -> &Gen<Value> {
        &self.valid
    }

    /// Values the schema node rejects.
    pub fn corrupted(&self) -> &Gen<Value> {
        &self.corrupted
    }
}

// A corrupted value, with a record of where its faults are.
#[derive(Debug, Clone)]
struct Corruption {
    value: Value,
    faults: Faults,
}

#[derive(Debug, Clone)]
enum Faults {
    Whole,
    // Object members holding a corrupted value. All other members are valid.
    Members(BTreeSet<String>),
}

impl Corruption {
    fn whole(value: Value) -> Self {
        Corruption {
            value,
            faults: Faults::Whole,
        }
    }

    // Keys of `object` whose values are corrupted.
    fn faulty_members(&self, object: &Map<String, Value>) -> BTreeSet<String> {
        match &self.faults {
            Faults::Whole => object.keys().cloned().collect(),
            Faults::Members(keys) => keys.clone(),
        }
    }
}

/// One of `values`, or a scalar that is none of them.
pub fn literal(values: &[Literal]) -> PairedGenerator {
    let allowed: Vec<Value> = values.iter().map(Literal::to_value).collect();
    let excluded = values.to_vec();

    let universe = Gen::one_of(vec![
        gen::string(),
        gen::number(),
        gen::boolean(),
        gen::null(),
    ]);

    PairedGenerator::new(
        Gen::elements(allowed),
        universe.filter("scalar outside the literal's values", move |value| {
            !excluded.iter().any(|literal| literal.matches(value))
        }),
    )
}

pub fn string() -> PairedGenerator {
    PairedGenerator::new(
        gen::string(),
        Gen::one_of(vec![gen::number(), gen::boolean()]),
    )
}

pub fn number() -> PairedGenerator {
    PairedGenerator::new(
        gen::number(),
        Gen::one_of(vec![gen::string(), gen::boolean()]),
    )
}

pub fn boolean() -> PairedGenerator {
    let confusables: Vec<Value> = CONFUSABLE_BOOLEANS.iter().map(|s| Value::from(*s)).collect();

    PairedGenerator::new(
        gen::boolean(),
        Gen::one_of(vec![gen::string(), gen::number(), Gen::elements(confusables)]),
    )
}

pub fn unknown_array() -> PairedGenerator {
    PairedGenerator::new(gen::json_array(), gen::json_object())
}

pub fn unknown_record() -> PairedGenerator {
    PairedGenerator::new(gen::json_object(), gen::json_array())
}

/// `null`, or a value of `inner`.
///
/// The null member is corrupted as `{}`, which is neither `null` nor, for most
/// inner schemas, a valid inner value.
pub fn nullable(inner: PairedGenerator) -> PairedGenerator {
    let null = PairedGenerator::new(gen::null(), Gen::constant(Value::Object(Map::new())));
    union(vec![null, inner])
}

/// An object holding every one of `fields`.
pub fn object(fields: Vec<(String, PairedGenerator)>) -> PairedGenerator {
    if fields.is_empty() {
        tracing::debug!("object has no fields, its corrupted values will be valid");
        return PairedGenerator::trivial(Value::Object(Map::new()));
    }

    let instances = Gen::sequence(
        fields
            .iter()
            .map(|(key, field)| {
                let key = key.clone();
                field.valid.clone().map(move |value| (key.clone(), value))
            })
            .collect(),
    )
    .map(|members| members.into_iter().collect::<Map<_, _>>());

    PairedGenerator::from_corruptions(
        instances.clone().map(Value::Object),
        corrupt_one_field(instances, fields),
    )
}

/// An object holding any subset of `fields`.
///
/// Instances without any field have nothing to corrupt, so the corrupted
/// generator starts from a non-empty instance.
pub fn partial(fields: Vec<(String, PairedGenerator)>) -> PairedGenerator {
    if fields.is_empty() {
        tracing::debug!("partial object has no fields, its corrupted values will be valid");
        return PairedGenerator::trivial(Value::Object(Map::new()));
    }

    let instances = Gen::sequence(
        fields
            .iter()
            .map(|(key, field)| {
                let key = key.clone();
                field
                    .valid
                    .clone()
                    .option_of()
                    .map(move |value| value.map(|value| (key.clone(), value)))
            })
            .collect(),
    )
    .map(|members| members.into_iter().flatten().collect::<Map<_, _>>());

    let non_empty = instances
        .clone()
        .filter("non-empty partial object", |instance| !instance.is_empty());

    PairedGenerator::from_corruptions(
        instances.map(Value::Object),
        corrupt_one_field(non_empty, fields),
    )
}

// Replaces the value of one field present in the instance, chosen uniformly,
// with a draw from that field's corrupted generator.
fn corrupt_one_field(
    instances: Gen<Map<String, Value>>,
    fields: Vec<(String, PairedGenerator)>,
) -> Gen<Corruption> {
    let fields: Rc<Vec<(String, Gen<Value>)>> = Rc::new(
        fields
            .into_iter()
            .map(|(key, field)| (key, field.corrupted))
            .collect(),
    );

    instances.chain(move |instance| {
        let present: Vec<(String, Gen<Value>)> = fields
            .iter()
            .filter(|(key, _)| instance.contains_key(key))
            .cloned()
            .collect();

        Gen::elements(present).chain(move |(key, corrupted)| {
            let instance = instance.clone();
            corrupted.map(move |bad| {
                let mut instance = instance.clone();
                instance.insert(key.clone(), bad);
                Corruption {
                    value: Value::Object(instance),
                    faults: Faults::Members(std::iter::once(key.clone()).collect()),
                }
            })
        })
    })
}

/// A string-keyed map of `codomain` values.
///
/// Corrupted maps are non-empty and every value in them is corrupted.
pub fn record(codomain: PairedGenerator) -> PairedGenerator {
    let corrupted = gen::entries(codomain.corrupted)
        .scale(at_least_one)
        .filter("non-empty corrupted record", |entries| !entries.is_empty())
        .map(Value::Object);

    PairedGenerator::new(gen::entries(codomain.valid).map(Value::Object), corrupted)
}

/// A fixed-length array, one position per component.
pub fn tuple(components: Vec<PairedGenerator>) -> PairedGenerator {
    if components.is_empty() {
        tracing::debug!("tuple has no components, its corrupted values will be valid");
        return PairedGenerator::trivial(Value::Array(Vec::new()));
    }

    let instances = Gen::sequence(components.iter().map(|c| c.valid.clone()).collect());
    let slots: Rc<Vec<Gen<Value>>> =
        Rc::new(components.into_iter().map(|c| c.corrupted).collect());

    let corrupted = instances.clone().chain(move |instance| {
        let slots = Rc::clone(&slots);
        Gen::elements((0..slots.len()).collect()).chain(move |index| {
            let instance = instance.clone();
            slots[index].clone().map(move |bad| {
                let mut instance = instance.clone();
                instance[index] = bad;
                Value::Array(instance)
            })
        })
    });

    PairedGenerator::new(instances.map(Value::Array), corrupted)
}

/// An array of `item` values.
///
/// Corrupted arrays are non-empty and every element in them is corrupted.
pub fn array(item: PairedGenerator) -> PairedGenerator {
    let corrupted = item
        .corrupted
        .vec_of()
        .scale(at_least_one)
        .filter("non-empty corrupted array", |items| !items.is_empty())
        .map(Value::Array);

    PairedGenerator::new(item.valid.vec_of().map(Value::Array), corrupted)
}

// Corrupted collections must be non-empty, which cannot happen at size zero.
fn at_least_one(size: Size) -> Size {
    Size {
        len: size.len.max(1),
        ..size
    }
}

/// Values satisfying both `left` and `right`.
///
/// Corrupted values merge a corrupted `left` with a corrupted `right`. On a
/// key both objects hold, a corrupted member wins over a valid one, so the
/// faults of both sides survive the merge.
pub fn intersection(left: PairedGenerator, right: PairedGenerator) -> PairedGenerator {
    PairedGenerator::from_corruptions(
        left.valid.zip(right.valid).map(merge),
        left.corruptions.zip(right.corruptions).map(merge_corruptions),
    )
}

// Objects merge member-wise, right side winning on shared keys. Anything else
// is replaced by the right side.
fn merge((left, right): (Value, Value)) -> Value {
    match (left, right) {
        (Value::Object(mut left), Value::Object(right)) => {
            left.extend(right);
            Value::Object(left)
        }
        (_, right) => right,
    }
}

// Like `merge`, except that a valid right member never overwrites a corrupted
// left one.
fn merge_corruptions((left, right): (Corruption, Corruption)) -> Corruption {
    let (left_members, right_members) = match (&left.value, &right.value) {
        (Value::Object(left_members), Value::Object(right_members)) => {
            (left_members, right_members)
        }
        _ => return right,
    };

    let mut faults = left.faulty_members(left_members);
    let right_faults = right.faulty_members(right_members);

    let mut merged = left_members.clone();
    for (key, value) in right_members {
        if right_faults.contains(key) || !faults.contains(key) {
            merged.insert(key.clone(), value.clone());
        }
    }

    faults.extend(right_faults);
    Corruption {
        value: Value::Object(merged),
        faults: Faults::Members(faults),
    }
}

/// A member chosen by the `discriminator` field.
///
/// Both valid and corrupted values come from one uniformly chosen member, and
/// carry that member's tag unless the member itself produced the
/// discriminator field.
pub fn tagged_union(
    discriminator: &str,
    members: Vec<(String, PairedGenerator)>,
) -> PairedGenerator {
    let mut valid = Vec::with_capacity(members.len());
    let mut corruptions = Vec::with_capacity(members.len());

    for (tag, member) in members {
        valid.push(member.valid.map(stamp(discriminator, &tag)));

        let tag_value = stamp(discriminator, &tag);
        corruptions.push(member.corruptions.map(move |corruption| Corruption {
            value: tag_value(corruption.value),
            faults: corruption.faults,
        }));
    }

    PairedGenerator::from_corruptions(Gen::one_of(valid), Gen::one_of(corruptions))
}

fn stamp(discriminator: &str, tag: &str) -> impl Fn(Value) -> Value + 'static {
    let discriminator = discriminator.to_owned();
    let tag = tag.to_owned();

    move |mut value| {
        if let Value::Object(object) = &mut value {
            object
                .entry(discriminator.clone())
                .or_insert_with(|| Value::String(tag.clone()));
        }

        value
    }
}

/// A value of one of `members`.
///
/// A corrupted member value may still satisfy some other member.
pub fn union(members: Vec<PairedGenerator>) -> PairedGenerator {
    let (valid, corruptions): (Vec<_>, Vec<_>) = members
        .into_iter()
        .map(|member| (member.valid, member.corruptions))
        .unzip();

    PairedGenerator::from_corruptions(Gen::one_of(valid), Gen::one_of(corruptions))
}

/// Calls `factory` on every draw, from either generator.
///
/// Draws nested deeper than [`gen::MAX_DEPTH`] fail with
/// [`Error::DepthExceeded`](crate::Error::DepthExceeded). A schema whose
/// corruption always recurses, such as an object whose only field is an array
/// of itself, fails this way on every corrupted draw.
pub fn recursive<F>(factory: F) -> PairedGenerator
where
    F: Fn() -> PairedGenerator + 'static,
{
    let factory = Rc::new(factory);
    let valid = {
        let factory = Rc::clone(&factory);
        Gen::lazy(move || factory().valid)
    };

    PairedGenerator::from_corruptions(valid, Gen::lazy(move || factory().corruptions))
}

/// The interpretation that builds a [`PairedGenerator`] for every node.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arbitrary;

impl Interpreter for Arbitrary {
    const ID: &'static str = "arbitrary";
    type Output = PairedGenerator;

    fn literal(&self, values: &[Literal]) -> PairedGenerator {
        literal(values)
    }

    fn string(&self) -> PairedGenerator {
        string()
    }

    fn number(&self) -> PairedGenerator {
        number()
    }

    fn boolean(&self) -> PairedGenerator {
        boolean()
    }

    fn unknown_array(&self) -> PairedGenerator {
        unknown_array()
    }

    fn unknown_record(&self) -> PairedGenerator {
        unknown_record()
    }

    fn nullable(&self, inner: PairedGenerator) -> PairedGenerator {
        nullable(inner)
    }

    fn object(&self, fields: Vec<(String, PairedGenerator)>) -> PairedGenerator {
        object(fields)
    }

    fn partial(&self, fields: Vec<(String, PairedGenerator)>) -> PairedGenerator {
        partial(fields)
    }

    fn record(&self, codomain: PairedGenerator) -> PairedGenerator {
        record(codomain)
    }

    fn tuple(&self, components: Vec<PairedGenerator>) -> PairedGenerator {
        tuple(components)
    }

    fn array(&self, item: PairedGenerator) -> PairedGenerator {
        array(item)
    }

    fn intersection(&self, left: PairedGenerator, right: PairedGenerator) -> PairedGenerator {
        intersection(left, right)
    }

    fn tagged_union(
        &self,
        discriminator: &str,
        members: Vec<(String, PairedGenerator)>,
    ) -> PairedGenerator {
        tagged_union(discriminator, members)
    }

    fn union(&self, members: Vec<PairedGenerator>) -> PairedGenerator {
        union(members)
    }

    fn recursive(&self, id: &str, factory: Rc<dyn Fn() -> PairedGenerator>) -> PairedGenerator {
        let id = id.to_owned();
        recursive(move || {
            tracing::trace!(id = %id, "expanding recursive schema");
            factory()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::gen::rng_from_seed;
    use crate::guard::Guard;
    use crate::interpret::interpret;
    use crate::schema::Schema;
    use serde_json::json;
    use std::collections::BTreeSet;

    #[test]
    fn test_literal() {
        let values = [Literal::from(1), Literal::from("a"), Literal::from(true)];
        let (valid, corrupted) = sample_pair(&Schema::literal(values.iter().cloned()));

        let seen: BTreeSet<String> = valid.iter().map(Value::to_string).collect();
        assert_eq!(seen.iter().map(String::as_str).collect::<Vec<_>>(), ["\"a\"", "1", "true"]);

        for value in corrupted {
            assert!(!values.iter().any(|l| l.matches(&value)), "{}", value);
        }
    }

    #[test]
    fn test_string() {
        let (valid, corrupted) = sample_pair(&Schema::String);

        assert!(valid.iter().all(Value::is_string));
        assert!(corrupted.iter().all(|v| v.is_number() || v.is_boolean()));
    }

    #[test]
    fn test_number() {
        let (valid, corrupted) = sample_pair(&Schema::Number);

        assert!(valid.iter().all(Value::is_number));
        assert!(corrupted.iter().all(|v| v.is_string() || v.is_boolean()));
    }

    #[test]
    fn test_boolean() {
        let (valid, corrupted) = sample_pair(&Schema::Boolean);

        assert!(valid.iter().all(Value::is_boolean));
        assert!(!corrupted.iter().any(Value::is_boolean));

        for token in &CONFUSABLE_BOOLEANS {
            assert!(corrupted.contains(&json!(token)), "{} never drawn", token);
        }
    }

    #[test]
    fn test_unknown_containers_swap_shapes() {
        let (valid, corrupted) = sample_pair(&Schema::UnknownArray);
        assert!(valid.iter().all(Value::is_array));
        assert!(corrupted.iter().all(Value::is_object));

        let (valid, corrupted) = sample_pair(&Schema::UnknownRecord);
        assert!(valid.iter().all(Value::is_object));
        assert!(corrupted.iter().all(Value::is_array));
    }

    #[test]
    fn test_nullable() {
        let (valid, corrupted) = sample_pair(&Schema::nullable(Schema::String));

        assert!(valid.iter().any(Value::is_null));
        assert!(valid.iter().all(|v| v.is_null() || v.is_string()));
        assert!(corrupted.contains(&json!({})));
        assert!(!corrupted.iter().any(|v| v.is_null() || v.is_string()));
    }

    #[test]
    fn test_object_single_fault() {
        let fields = [("a", Schema::String), ("b", Schema::Number)];
        let schema = Schema::object(fields.iter().cloned());
        let (valid, corrupted) = sample_pair(&schema);

        for value in &valid {
            let object = value.as_object().unwrap();
            assert_eq!(object.keys().map(String::as_str).collect::<Vec<_>>(), ["a", "b"]);
            assert!(fields.iter().all(|(k, s)| is_valid(s, &object[*k])), "{}", value);
        }

        let mut faulty_fields = BTreeSet::new();
        for value in &corrupted {
            let object = value.as_object().unwrap();
            assert_eq!(object.keys().map(String::as_str).collect::<Vec<_>>(), ["a", "b"]);

            let faults: Vec<_> = fields
                .iter()
                .filter(|(k, s)| !is_valid(s, &object[*k]))
                .map(|(k, _)| *k)
                .collect();
            assert_eq!(faults.len(), 1, "{}", value);
            faulty_fields.insert(faults[0]);
        }

        assert_eq!(faulty_fields.into_iter().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn test_partial_single_fault() {
        let fields = [("a", Schema::String), ("b", Schema::Number)];
        let (valid, corrupted) = sample_pair(&Schema::partial(fields.iter().cloned()));

        assert!(valid.contains(&json!({})));
        for value in &valid {
            let object = value.as_object().unwrap();
            assert!(object.keys().all(|k| k == "a" || k == "b"));
            assert!(fields
                .iter()
                .all(|(k, s)| object.get(*k).map_or(true, |v| is_valid(s, v))));
        }

        for value in &corrupted {
            let object = value.as_object().unwrap();
            assert!(!object.is_empty());

            let faults = fields
                .iter()
                .filter(|(k, s)| object.get(*k).map_or(false, |v| !is_valid(s, v)))
                .count();
            assert_eq!(faults, 1, "{}", value);
        }
    }

    #[test]
    fn test_empty_object_and_tuple_are_trivial() {
        let (valid, corrupted) = sample_pair(&Schema::object(Vec::<(String, Schema)>::new()));
        assert!(valid.iter().chain(&corrupted).all(|v| *v == json!({})));

        let (valid, corrupted) = sample_pair(&Schema::partial(Vec::<(String, Schema)>::new()));
        assert!(valid.iter().chain(&corrupted).all(|v| *v == json!({})));

        let (valid, corrupted) = sample_pair(&Schema::tuple(vec![]));
        assert!(valid.iter().chain(&corrupted).all(|v| *v == json!([])));
    }

    #[test]
    fn test_tuple_single_fault() {
        let components = [Schema::String, Schema::Number];
        let (valid, corrupted) = sample_pair(&Schema::tuple(components.iter().cloned()));

        for value in &valid {
            let items = value.as_array().unwrap();
            assert_eq!(items.len(), 2);
            assert!(items.iter().zip(&components).all(|(v, s)| is_valid(s, v)));
        }

        let mut faulty_positions = BTreeSet::new();
        for value in &corrupted {
            let items = value.as_array().unwrap();
            assert_eq!(items.len(), 2);

            let faults: Vec<_> = items
                .iter()
                .zip(&components)
                .enumerate()
                .filter(|(_, (v, s))| !is_valid(s, v))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(faults.len(), 1, "{}", value);
            faulty_positions.insert(faults[0]);
        }

        assert_eq!(faulty_positions.into_iter().collect::<Vec<_>>(), [0, 1]);
    }

    #[test]
    fn test_array_corrupts_every_element() {
        let (valid, corrupted) = sample_pair(&Schema::array(Schema::String));

        assert!(valid.iter().any(|v| *v == json!([])));
        for value in &valid {
            assert!(value.as_array().unwrap().iter().all(Value::is_string));
        }

        for value in &corrupted {
            let items = value.as_array().unwrap();
            assert!(!items.is_empty());
            assert!(!items.iter().any(Value::is_string), "{}", value);
        }
    }

    #[test]
    fn test_record_corrupts_every_value() {
        let (valid, corrupted) = sample_pair(&Schema::record(Schema::Number));

        for value in &valid {
            assert!(value.as_object().unwrap().values().all(Value::is_number));
        }

        for value in &corrupted {
            let entries = value.as_object().unwrap();
            assert!(!entries.is_empty());
            assert!(!entries.values().any(Value::is_number), "{}", value);
        }
    }

    #[test]
    fn test_intersection_corrupts_both_sides() {
        let left = Schema::object(vec![("a", Schema::String)]);
        let right = Schema::object(vec![("b", Schema::Number)]);
        let (valid, corrupted) = sample_pair(&Schema::intersection(left.clone(), right.clone()));

        for value in &valid {
            assert!(is_valid(&left, value) && is_valid(&right, value), "{}", value);
        }

        for value in &corrupted {
            assert!(!is_valid(&left, value) && !is_valid(&right, value), "{}", value);
        }
    }

    #[test]
    fn test_intersection_with_shared_keys() {
        let left = Schema::object(vec![("a", Schema::String), ("b", Schema::Number)]);
        let right = Schema::object(vec![("a", Schema::String), ("c", Schema::Number)]);
        let schema = Schema::intersection(left.clone(), right.clone());
        let (valid, corrupted) = sample_pair(&schema);

        for value in &valid {
            assert!(is_valid(&left, value) && is_valid(&right, value), "{}", value);
        }

        let mut shared_faults = 0;
        for value in &corrupted {
            assert!(!is_valid(&left, value) && !is_valid(&right, value), "{}", value);
            if !value["a"].is_string() {
                shared_faults += 1;
            }
        }
        assert!(shared_faults > 0);

        let nested = Schema::intersection(schema, Schema::partial(vec![("b", Schema::Number)]));
        assert_pair(&nested);
    }

    #[test]
    fn test_tagged_union() {
        let v1 = Schema::object(vec![("foo", Schema::String)]);
        let v2 = Schema::object(vec![("foo", Schema::Number), ("bar", Schema::Boolean)]);
        let schema = Schema::tagged_union("version", vec![("v1", v1.clone()), ("v2", v2.clone())]);
        let (valid, corrupted) = sample_pair(&schema);

        let mut tags = BTreeSet::new();
        for value in valid.iter().chain(&corrupted) {
            let tag = value["version"].as_str().unwrap();
            tags.insert(tag.to_owned());
        }
        assert_eq!(tags.len(), 2);

        for value in &corrupted {
            let member = if value["version"] == "v1" { &v1 } else { &v2 };
            assert!(!is_valid(member, value), "{}", value);
        }

        assert_pair(&schema);
    }

    #[test]
    fn test_tagged_union_with_declared_tag() {
        let schema = Schema::tagged_union(
            "kind",
            vec![
                (
                    "circle",
                    Schema::object(vec![
                        ("kind", Schema::literal(vec!["circle"])),
                        ("radius", Schema::Number),
                    ]),
                ),
                (
                    "square",
                    Schema::object(vec![
                        ("kind", Schema::literal(vec!["square"])),
                        ("side", Schema::Number),
                    ]),
                ),
            ],
        );

        assert_pair(&schema);
    }

    #[test]
    fn test_union() {
        let a = Schema::object(vec![("a", Schema::String)]);
        let b = Schema::object(vec![("b", Schema::Number)]);
        let (valid, corrupted) = sample_pair(&Schema::union(vec![a.clone(), b.clone()]));

        for value in &valid {
            assert!(is_valid(&a, value) || is_valid(&b, value), "{}", value);
        }

        let mut members = BTreeSet::new();
        for value in &corrupted {
            let object = value.as_object().unwrap();
            assert_eq!(object.len(), 1);
            let key = object.keys().next().unwrap().clone();
            let member = if key == "a" { &a } else { &b };
            assert!(!is_valid(member, value), "{}", value);
            members.insert(key);
        }
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn test_empty_union_has_no_alternatives() {
        let pair = interpret(&Arbitrary, &Schema::union(vec![]));
        let mut rng = rng_from_seed(8927);

        assert_eq!(pair.valid.sample(&mut rng), Err(Error::NoAlternatives));
        assert_eq!(pair.corrupted.sample(&mut rng), Err(Error::NoAlternatives));
    }

    #[test]
    fn test_recursive() {
        fn tree() -> Schema {
            Schema::object(vec![
                ("value", Schema::Number),
                ("children", Schema::array(Schema::lazy("Tree", tree))),
            ])
        }

        fn list() -> Schema {
            Schema::nullable(Schema::object(vec![
                ("head", Schema::String),
                ("tail", Schema::lazy("List", list)),
            ]))
        }

        assert_pair(&tree());
        assert_pair(&list());
    }

    #[test]
    fn test_recursion_without_base_case_fails() {
        fn nested() -> Schema {
            Schema::object(vec![("children", Schema::array(Schema::lazy("Nested", nested)))])
        }

        let pair = interpret(&Arbitrary, &nested());
        let mut rng = rng_from_seed(8927);

        for value in pair.valid.samples(&mut rng).take(100) {
            assert!(is_valid(&nested(), &value.unwrap()));
        }

        assert_eq!(
            pair.corrupted.sample(&mut rng),
            Err(Error::DepthExceeded {
                limit: gen::MAX_DEPTH
            })
        );
        assert_eq!(
            crate::corrupt(&nested(), &mut rng),
            Err(Error::DepthExceeded {
                limit: gen::MAX_DEPTH
            })
        );
    }

    #[test]
    fn test_nested() {
        assert_pair(&Schema::object(vec![
            ("id", Schema::Number),
            ("name", Schema::nullable(Schema::String)),
            ("point", Schema::tuple(vec![Schema::Number, Schema::Number])),
            ("tags", Schema::array(Schema::literal(vec!["x", "y"]))),
            ("flags", Schema::record(Schema::Boolean)),
            ("extra", Schema::partial(vec![("note", Schema::String)])),
            ("items", Schema::UnknownArray),
            ("meta", Schema::UnknownRecord),
        ]));
    }

    #[test]
    fn test_same_seed_same_samples() {
        let schema = || {
            Schema::object(vec![
                ("a", Schema::array(Schema::String)),
                ("b", Schema::union(vec![Schema::Number, Schema::Boolean])),
            ])
        };

        assert_eq!(sample_pair(&schema()), sample_pair(&schema()));
    }

    fn is_valid(schema: &Schema, value: &Value) -> bool {
        interpret(&Guard, schema)(value)
    }

    fn sample_pair(schema: &Schema) -> (Vec<Value>, Vec<Value>) {
        let pair = interpret(&Arbitrary, schema);
        let mut rng = rng_from_seed(8927);

        // Poor man's fuzzing.
        let valid = pair
            .valid
            .samples(&mut rng)
            .take(1000)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        let corrupted = pair
            .corrupted
            .samples(&mut rng)
            .take(1000)
            .collect::<Result<Vec<_>>>()
            .unwrap();

        (valid, corrupted)
    }

    fn assert_pair(schema: &Schema) {
        let check = interpret(&Guard, schema);
        let (valid, corrupted) = sample_pair(schema);

        for value in valid {
            assert!(check(&value), "valid sample rejected by {}: {}", schema, value);
        }

        for value in corrupted {
            assert!(!check(&value), "corrupted sample accepted by {}: {}", schema, value);
        }
    }
}
