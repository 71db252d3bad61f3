//! Composite functions: basis functions bound into each other's inputs, tracked by a [`Fingerprint`].
//!
//! ```
//! use composite::{Function, Summation, TaggedValue};
//!
//! let sum = Function::leaf(Summation::<f64>::new(2));
//! // sum(a, sum(x, y))
//! let nested = sum.bind(1, &sum).unwrap();
//! assert_eq!(nested.entry_param_count(), 3);
//! assert_eq!(nested.apply(&[1., 2., 3.].map(TaggedValue::F64)), Ok(TaggedValue::F64(6.)));
//! ```

pub mod basis;
pub mod composite;
pub mod function;
pub mod registry;
pub mod value;

pub use basis::{BasisFunction, Binomial, Gaussian, Passthrough, Summation, check_arguments};
pub use composite::{CompositeFunction, make_composite};
pub use fingerprint::{Fingerprint, GraphError, Introspection, Type, concrete};
pub use function::Function;
pub use registry::{BasisRegistry, RegistryError};
pub use value::{CheckedSum, Scalar, TaggedValue};
