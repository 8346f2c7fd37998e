#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod assign;
mod component;
pub use component::Components;
mod delete;
mod error;
pub use error::{Cause, DataError, Error, SyntaxError, UsageError};
pub mod index;
pub use index::{Index, OutOfBoundsError, ParseIndexError};
mod pointer;
pub use pointer::{Dash, Element, Pointer};
mod resolve;
pub mod schema;
mod token;
pub use token::{InvalidEncodingError, Token};

#[cfg(test)]
mod arbitrary;
