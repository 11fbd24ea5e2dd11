//! A small generator abstraction on top of [`rand`].
//!
//! A [`Gen`] is a sampling function: given an RNG and a [`Size`], it draws one
//! value. Generators are immutable and cheap to clone, so they can be shared
//! between the combinators that build on them. Nothing is cached between
//! draws; feeding the same seeded RNG to the same generator reproduces the same
//! values.

use crate::error::{Error, Result};
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;

// Max length when generating "sequences" of things, such as strings, arrays,
// and objects.
pub const MAX_SEQ_LENGTH: usize = 8;

/// How many candidates [`Gen::filter`] draws before it gives up with
/// [`Error::Exhausted`].
pub const MAX_FILTER_ATTEMPTS: usize = 100;

/// How many nested [`Gen::lazy`] expansions a single draw may go through
/// before it fails with [`Error::DepthExceeded`].
pub const MAX_DEPTH: usize = 32;

/// The size parameter threaded through every draw.
///
/// Collections never hold more than `min(len, MAX_SEQ_LENGTH)` items, and
/// [`Gen::lazy`] halves the length for the generator it defers to. Recursive
/// structures therefore bottom out in empty collections. `depth` counts the
/// lazy expansions above the current draw, and is never reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub len: usize,
    pub depth: usize,
}

impl Size {
    pub fn new(len: usize) -> Size {
        Size { len, depth: 0 }
    }

    /// The size one level of recursion down.
    pub fn shrink(self) -> Size {
        Size {
            len: self.len / 2,
            depth: self.depth + 1,
        }
    }

    /// The largest collection length allowed at this size.
    pub fn max_len(self) -> usize {
        self.len.min(MAX_SEQ_LENGTH)
    }
}

impl Default for Size {
    fn default() -> Self {
        Size::new(MAX_SEQ_LENGTH)
    }
}

type SampleFn<T> = dyn Fn(&mut dyn RngCore, Size) -> Result<T>;

/// A generator of values of type `T`.
pub struct Gen<T> {
    sample: Rc<SampleFn<T>>,
}

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Gen {
            sample: Rc::clone(&self.sample),
        }
    }
}

impl<T> fmt::Debug for Gen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gen").finish_non_exhaustive()
    }
}

impl<T: 'static> Gen<T> {
    pub fn new<F>(sample: F) -> Self
    where
        F: Fn(&mut dyn RngCore, Size) -> Result<T> + 'static,
    {
        Gen {
            sample: Rc::new(sample),
        }
    }

    /// Draws one value at the given size.
    pub fn draw(&self, rng: &mut dyn RngCore, size: Size) -> Result<T> {
        (self.sample)(rng, size)
    }

    /// Draws one value at the default size.
    pub fn sample<R: RngCore>(&self, rng: &mut R) -> Result<T> {
        self.draw(rng, Size::default())
    }

    /// An endless stream of independent draws at the default size.
    pub fn samples<'a, R: RngCore>(
        &'a self,
        rng: &'a mut R,
    ) -> impl Iterator<Item = Result<T>> + 'a {
        std::iter::repeat_with(move || self.sample(&mut *rng))
    }

    pub fn constant(value: T) -> Self
    where
        T: Clone,
    {
        Gen::new(move |_, _| Ok(value.clone()))
    }

    pub fn map<U, F>(self, f: F) -> Gen<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        Gen::new(move |rng, size| self.draw(rng, size).map(&f))
    }

    /// Draws a value, then draws from the generator that `f` picks for it.
    pub fn chain<U, F>(self, f: F) -> Gen<U>
    where
        U: 'static,
        F: Fn(T) -> Gen<U> + 'static,
    {
        Gen::new(move |rng, size| {
            let value = self.draw(rng, size)?;
            f(value).draw(rng, size)
        })
    }

    /// Redraws until `predicate` accepts a value.
    ///
    /// At most [`MAX_FILTER_ATTEMPTS`] candidates are drawn; after that the
    /// draw fails with [`Error::Exhausted`] carrying `label`.
    pub fn filter<F>(self, label: &'static str, predicate: F) -> Gen<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        Gen::new(move |rng, size| {
            for _ in 0..MAX_FILTER_ATTEMPTS {
                let candidate = self.draw(rng, size)?;
                if predicate(&candidate) {
                    return Ok(candidate);
                }
            }

            tracing::warn!(label, attempts = MAX_FILTER_ATTEMPTS, "filter exhausted its retries");
            Err(Error::Exhausted {
                label,
                attempts: MAX_FILTER_ATTEMPTS,
            })
        })
    }

    /// Picks one of `gens` uniformly at random for every draw.
    pub fn one_of(gens: Vec<Gen<T>>) -> Gen<T> {
        Gen::new(move |rng, size| {
            if gens.is_empty() {
                return Err(Error::NoAlternatives);
            }

            let index = rng.gen_range(0..gens.len());
            gens[index].draw(rng, size)
        })
    }

    /// Picks one of `values` uniformly at random for every draw.
    pub fn elements(values: Vec<T>) -> Gen<T>
    where
        T: Clone,
    {
        Gen::new(move |rng, _| {
            if values.is_empty() {
                return Err(Error::NoAlternatives);
            }

            Ok(values[rng.gen_range(0..values.len())].clone())
        })
    }

    pub fn zip<U: 'static>(self, other: Gen<U>) -> Gen<(T, U)> {
        Gen::new(move |rng, size| {
            let left = self.draw(rng, size)?;
            let right = other.draw(rng, size)?;
            Ok((left, right))
        })
    }

    /// Draws from each of `gens` in order.
    pub fn sequence(gens: Vec<Gen<T>>) -> Gen<Vec<T>> {
        Gen::new(move |rng, size| {
            let mut values = Vec::with_capacity(gens.len());
            for gen in &gens {
                values.push(gen.draw(rng, size)?);
            }

            Ok(values)
        })
    }

    /// Draws a vector of up to `size.max_len()` values.
    pub fn vec_of(self) -> Gen<Vec<T>> {
        Gen::new(move |rng, size| {
            (0..rng.gen_range(0..=size.max_len()))
                .map(|_| self.draw(rng, size))
                .collect()
        })
    }

    /// Draws `None` half of the time, and a value otherwise.
    pub fn option_of(self) -> Gen<Option<T>> {
        Gen::new(move |rng, size| {
            if rng.gen() {
                return Ok(None);
            }

            self.draw(rng, size).map(Some)
        })
    }

    /// Draws with the size adjusted by `f`.
    pub fn scale<F>(self, f: F) -> Gen<T>
    where
        F: Fn(Size) -> Size + 'static,
    {
        Gen::new(move |rng, size| self.draw(rng, f(size)))
    }

    /// Defers building a generator until it is drawn from.
    ///
    /// `factory` runs on every draw, and the generator it returns draws at the
    /// shrunk size. A draw nested more than [`MAX_DEPTH`] lazy generators deep
    /// fails with [`Error::DepthExceeded`] instead of calling `factory`.
    pub fn lazy<F>(factory: F) -> Gen<T>
    where
        F: Fn() -> Gen<T> + 'static,
    {
        Gen::new(move |rng, size| {
            let size = size.shrink();
            if size.depth > MAX_DEPTH {
                tracing::warn!(limit = MAX_DEPTH, "recursion went past its depth limit");
                return Err(Error::DepthExceeded { limit: MAX_DEPTH });
            }

            factory().draw(rng, size)
        })
    }
}

/// The RNG used for reproducible runs.
pub fn rng_from_seed(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

pub fn null() -> Gen<Value> {
    Gen::constant(Value::Null)
}

pub fn boolean() -> Gen<Value> {
    Gen::new(|rng, _| Ok(Value::Bool(rng.gen())))
}

/// Integers of a few magnitudes and finite floats.
pub fn number() -> Gen<Value> {
    Gen::new(|rng, _| {
        Ok(match rng.gen_range(0..3) {
            0 => Value::from(rng.gen::<u8>()),
            1 => Value::from(rng.gen::<i32>()),
            _ => Value::from(rng.gen_range(-1e6..1e6_f64)),
        })
    })
}

/// Printable ASCII strings of up to `size.max_len()` characters.
pub fn text() -> Gen<String> {
    Gen::new(|rng, size| {
        Ok((0..rng.gen_range(0..=size.max_len()))
            .map(|_| rng.gen_range(32u8..=126u8) as char)
            .collect())
    })
}

pub fn string() -> Gen<Value> {
    text().map(Value::String)
}

/// Any JSON value. Arrays and objects are expanded lazily, so nesting depth
/// is bounded by the size.
pub fn json() -> Gen<Value> {
    Gen::one_of(vec![
        null(),
        boolean(),
        number(),
        string(),
        Gen::lazy(json_array),
        Gen::lazy(json_object),
    ])
}

pub fn json_array() -> Gen<Value> {
    json().vec_of().map(Value::Array)
}

pub fn json_object() -> Gen<Value> {
    entries(json()).map(Value::Object)
}

/// String-keyed maps whose values are drawn from `values`.
pub fn entries(values: Gen<Value>) -> Gen<Map<String, Value>> {
    text()
        .zip(values)
        .vec_of()
        .map(|pairs| pairs.into_iter().collect())
}
