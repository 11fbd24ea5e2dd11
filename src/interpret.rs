//! Interpreting a [`Schema`] tree.
//!
//! An [`Interpreter`] has one builder per node kind. [`interpret`] walks a
//! schema bottom-up, handing each builder the already-built outputs of the
//! node's children. The same schema can therefore be turned into a pair of
//! generators ([`Arbitrary`]), a type expression ([`Describe`]), or anything
//! else that implements the trait.
//!
//! Interpreters are also selectable by identifier at runtime through a
//! [`Registry`].

use crate::arbitrary::{Arbitrary, PairedGenerator};
use crate::describe::Describe;
use crate::error::{Error, Result};
use crate::schema::{Literal, Schema};
use std::collections::BTreeMap;
use std::rc::Rc;

/// One builder per schema node kind.
pub trait Interpreter {
    /// The identifier this interpretation is registered under.
    const ID: &'static str;

    type Output;

    fn literal(&self, values: &[Literal]) -> Self::Output;
    fn string(&self) -> Self::Output;
    fn number(&self) -> Self::Output;
    fn boolean(&self) -> Self::Output;
    fn unknown_array(&self) -> Self::Output;
    fn unknown_record(&self) -> Self::Output;
    fn nullable(&self, inner: Self::Output) -> Self::Output;
    fn object(&self, fields: Vec<(String, Self::Output)>) -> Self::Output;
    fn partial(&self, fields: Vec<(String, Self::Output)>) -> Self::Output;
    fn record(&self, codomain: Self::Output) -> Self::Output;
    fn tuple(&self, components: Vec<Self::Output>) -> Self::Output;
    fn array(&self, item: Self::Output) -> Self::Output;
    fn intersection(&self, left: Self::Output, right: Self::Output) -> Self::Output;
    fn tagged_union(
        &self,
        discriminator: &str,
        members: Vec<(String, Self::Output)>,
    ) -> Self::Output;
    fn union(&self, members: Vec<Self::Output>) -> Self::Output;

    /// Builds the output for a recursive node.
    ///
    /// `factory` interprets the node's target. Implementations must not call
    /// it while building their output, since the target usually contains this
    /// very node.
    fn recursive(&self, id: &str, factory: Rc<dyn Fn() -> Self::Output>) -> Self::Output;
}

/// Interprets `schema` with `interpreter`.
pub fn interpret<I>(interpreter: &I, schema: &Schema) -> I::Output
where
    I: Interpreter + Clone + 'static,
{
    match schema {
        Schema::Literal(values) => interpreter.literal(values),
        Schema::String => interpreter.string(),
        Schema::Number => interpreter.number(),
        Schema::Boolean => interpreter.boolean(),
        Schema::UnknownArray => interpreter.unknown_array(),
        Schema::UnknownRecord => interpreter.unknown_record(),
        Schema::Nullable(inner) => interpreter.nullable(interpret(interpreter, inner)),
        Schema::Object(fields) => interpreter.object(interpret_fields(interpreter, fields)),
        Schema::Partial(fields) => interpreter.partial(interpret_fields(interpreter, fields)),
        Schema::Record(codomain) => interpreter.record(interpret(interpreter, codomain)),
        Schema::Tuple(components) => interpreter.tuple(
            components
                .iter()
                .map(|component| interpret(interpreter, component))
                .collect(),
        ),
        Schema::Array(item) => interpreter.array(interpret(interpreter, item)),
        Schema::Intersection(left, right) => interpreter.intersection(
            interpret(interpreter, left),
            interpret(interpreter, right),
        ),
        Schema::TaggedUnion {
            discriminator,
            members,
        } => interpreter.tagged_union(discriminator, interpret_fields(interpreter, members)),
        Schema::Union(members) => interpreter.union(
            members
                .iter()
                .map(|member| interpret(interpreter, member))
                .collect(),
        ),
        Schema::Recursive { id, factory } => {
            let factory = Rc::clone(factory);
            let inner = interpreter.clone();
            interpreter.recursive(id, Rc::new(move || interpret(&inner, &factory())))
        }
    }
}

fn interpret_fields<I>(interpreter: &I, fields: &[(String, Schema)]) -> Vec<(String, I::Output)>
where
    I: Interpreter + Clone + 'static,
{
    fields
        .iter()
        .map(|(key, schema)| (key.clone(), interpret(interpreter, schema)))
        .collect()
}

/// The output of an interpretation selected by identifier.
#[derive(Debug)]
pub enum Compiled {
    Arbitrary(PairedGenerator),
    Description(String),
}

impl Compiled {
    pub fn into_arbitrary(self) -> Option<PairedGenerator> {
        match self {
            Compiled::Arbitrary(pair) => Some(pair),
            _ => None,
        }
    }

    pub fn into_description(self) -> Option<String> {
        match self {
            Compiled::Description(description) => Some(description),
            _ => None,
        }
    }
}

impl From<PairedGenerator> for Compiled {
    fn from(pair: PairedGenerator) -> Self {
        Compiled::Arbitrary(pair)
    }
}

impl From<String> for Compiled {
    fn from(description: String) -> Self {
        Compiled::Description(description)
    }
}

type CompileFn = Box<dyn Fn(&Schema) -> Compiled>;

/// Interpretations keyed by [`Interpreter::ID`].
pub struct Registry {
    entries: BTreeMap<&'static str, CompileFn>,
}

impl Registry {
    /// A registry holding the built-in interpretations, [`Arbitrary`] and
    /// [`Describe`].
    pub fn new() -> Self {
        let mut registry = Registry::empty();
        registry.register(Arbitrary);
        registry.register(Describe);
        registry
    }

    pub fn empty() -> Self {
        Registry {
            entries: BTreeMap::new(),
        }
    }

    /// Adds `interpreter` under its identifier, replacing any interpretation
    /// already registered there.
    pub fn register<I>(&mut self, interpreter: I)
    where
        I: Interpreter + Clone + 'static,
        I::Output: Into<Compiled>,
    {
        tracing::debug!(id = I::ID, "registering interpretation");
        self.entries.insert(
            I::ID,
            Box::new(move |schema: &Schema| interpret(&interpreter, schema).into()),
        );
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn compile(&self, id: &str, schema: &Schema) -> Result<Compiled> {
        let compile = self
            .entries
            .get(id)
            .ok_or_else(|| Error::UnknownInterpretation(id.to_owned()))?;

        Ok(compile(schema))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}
