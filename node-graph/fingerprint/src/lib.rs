//! Flattened function graphs ("fingerprints") and the substitution engine used to compose them.
//!
//! A fingerprint describes the shape of a multivariate function as a list of function nodes and parameter nodes.
//! Function nodes refer to their inputs by positive offsets, so `f(a, g(b, c))` is laid out as:
//!
//! ```text
//! raw index   0           1      2           3      4
//!             f(+1, +2)   a      g(+1, +2)   b      c
//! ```

pub mod error;
pub mod fingerprint;
pub mod node;
pub mod substitution;
mod types;

pub use error::{GraphError, MalformedReason};
pub use fingerprint::{Fingerprint, Introspection};
pub use node::{FingerprintNode, FunctionNode, ParameterNode};
pub use substitution::substitute;
pub use types::Type;
