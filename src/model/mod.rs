//! Model — element bounds, storage rows, and the route value that crosses
//! the query boundary.

mod record;
mod route;

pub(crate) use record::{DEFAULT_WEIGHT, EdgeRecord, VertexRecord};
pub use route::Route;

use std::fmt;
use std::hash::Hash;

/// Bound alias for vertex and edge identities: hashable, comparable,
/// cheaply cloneable, printable in diagnostics. Blanket-implemented, never
/// implemented by hand.
pub trait GraphKey: Eq + Hash + Clone + fmt::Debug {}

impl<T: Eq + Hash + Clone + fmt::Debug> GraphKey for T {}
