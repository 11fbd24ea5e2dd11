//! Generate valid and deliberately corrupted data from a schema.
//!
//! Every node of a [`Schema`] is turned into a [`PairedGenerator`]: one
//! generator of values the schema accepts, and one of values it rejects. A
//! decoder for the schema should accept every sample from the first and reject
//! every sample from the second, which makes the pair a ready-made fuzzing
//! fixture.
//!
//! # Quick start
//!
//! ```
//! use fuzz_pair::{gen, interpret, Arbitrary, Schema};
//!
//! // An example schema we can test against.
//! let schema = Schema::object(vec![
//!     ("name", Schema::String),
//!     ("favoriteNumbers", Schema::array(Schema::Number)),
//! ]);
//!
//! let pair = interpret(&Arbitrary, &schema);
//!
//! // A hard-coded RNG, so that the output is predictable.
//! let mut rng = gen::rng_from_seed(8927);
//!
//! let valid = pair.valid().sample(&mut rng).unwrap();
//! assert!(valid["name"].is_string());
//! assert!(valid["favoriteNumbers"].as_array().unwrap().iter().all(|n| n.is_number()));
//!
//! // Exactly one of the two fields is broken.
//! let corrupted = pair.corrupted().sample(&mut rng).unwrap();
//! let bad_name = !corrupted["name"].is_string();
//! let bad_numbers = !corrupted["favoriteNumbers"]
//!     .as_array()
//!     .map_or(false, |numbers| numbers.iter().all(|n| n.is_number()));
//! assert!(bad_name != bad_numbers);
//! ```
//!
//! See the [`arbitrary`] module for how each kind of node is corrupted.
//!
//! # Recursive schemas
//!
//! A schema refers to itself through [`Schema::lazy`]. The factory is only
//! called when a value is drawn, and every level of recursion draws at half the
//! size of the one above it, which keeps generated structures finite. A draw
//! that nests more than [`gen::MAX_DEPTH`] levels deep fails with
//! [`Error::DepthExceeded`].
//!
//! ```
//! use fuzz_pair::{gen, Schema};
//!
//! fn list() -> Schema {
//!     Schema::nullable(Schema::object(vec![
//!         ("head", Schema::Number),
//!         ("tail", Schema::lazy("List", list)),
//!     ]))
//! }
//!
//! let mut rng = gen::rng_from_seed(8927);
//! for _ in 0..100 {
//!     fuzz_pair::fuzz(&list(), &mut rng).unwrap();
//!     fuzz_pair::corrupt(&list(), &mut rng).unwrap();
//! }
//! ```

pub mod arbitrary;
mod describe;
mod error;
pub mod gen;
#[cfg(test)]
mod guard;
mod interpret;
mod schema;

pub use arbitrary::{Arbitrary, PairedGenerator};
pub use describe::Describe;
pub use error::{Error, Result};
pub use interpret::{interpret, Compiled, Interpreter, Registry};
pub use schema::{Literal, Schema};

use rand::RngCore;
use serde_json::Value;

/// Generates a single random JSON value satisfying a given schema.
///
/// The generated output is purely a function of the given schema and RNG.
pub fn fuzz<R: RngCore>(schema: &Schema, rng: &mut R) -> Result<Value> {
    interpret(&Arbitrary, schema).valid().sample(rng)
}

/// Generates a single random JSON value that the given schema rejects.
pub fn corrupt<R: RngCore>(schema: &Schema, rng: &mut R) -> Result<Value> {
    interpret(&Arbitrary, schema).corrupted().sample(rng)
}
