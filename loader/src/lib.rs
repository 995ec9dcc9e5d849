//! The root of this crate doesn't do anything.
//! It just re-exports its contents.

pub mod colors;
pub mod deserialize;
pub mod error;
pub mod prefabs; // prefabs::bodies::whatever
pub use deserialize::*;
pub use error::LoadError;

#[macro_use]
extern crate lazy_static;
