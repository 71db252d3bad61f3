use crate::basis::{BasisFunction, check_arguments};
use crate::composite::{CompositeFunction, make_composite};
use crate::value::TaggedValue;
use fingerprint::{GraphError, Type};

/// Anything that can take part in a binding: a single basis function or a composite built from them.
#[derive(Debug)]
pub enum Function {
	Leaf(Box<dyn BasisFunction>),
	Composite(CompositeFunction),
}

impl Clone for Function {
	fn clone(&self) -> Self {
		match self {
			Function::Leaf(leaf) => Function::Leaf(leaf.duplicate()),
			Function::Composite(composite) => Function::Composite(composite.clone()),
		}
	}
}

impl From<CompositeFunction> for Function {
	fn from(composite: CompositeFunction) -> Self {
		Function::Composite(composite)
	}
}

impl From<Box<dyn BasisFunction>> for Function {
	fn from(leaf: Box<dyn BasisFunction>) -> Self {
		Function::Leaf(leaf)
	}
}

impl Function {
	pub fn leaf(leaf: impl BasisFunction + 'static) -> Self {
		Function::Leaf(Box::new(leaf))
	}

	/// Feeds the result of `other` into entry parameter `index` of this function.
	pub fn bind(&self, index: usize, other: &Function) -> Result<CompositeFunction, GraphError> {
		self.bind_many(&[index], other)
	}

	/// Feeds one shared result of `other` into every entry parameter in `indices`.
	pub fn bind_many(&self, indices: &[usize], other: &Function) -> Result<CompositeFunction, GraphError> {
		match (self, other) {
			(Function::Composite(composite), Function::Composite(other)) => composite.bind_many(indices, other),
			(Function::Composite(composite), Function::Leaf(other)) => composite.bind_many(indices, &make_composite(other.as_ref())),
			(Function::Leaf(leaf), Function::Composite(other)) => make_composite(leaf.as_ref()).bind_many(indices, other),
			(Function::Leaf(leaf), Function::Leaf(other)) => make_composite(leaf.as_ref()).bind_many(indices, &make_composite(other.as_ref())),
		}
	}

	/// Arguments are checked against the declared parameter types before anything is evaluated.
	pub fn apply(&self, args: &[TaggedValue]) -> Result<TaggedValue, GraphError> {
		match self {
			Function::Leaf(leaf) => {
				let parameter_types = leaf.parameter_types();
				check_arguments(args, parameter_types.len(), &parameter_types)?;
				leaf.eval(args)
			}
			Function::Composite(composite) => composite.apply(args),
		}
	}

	pub fn into_composite(self) -> CompositeFunction {
		match self {
			Function::Leaf(leaf) => make_composite(leaf.as_ref()),
			Function::Composite(composite) => composite,
		}
	}

	pub fn entry_param_count(&self) -> usize {
		match self {
			Function::Leaf(leaf) => leaf.parameter_types().len(),
			Function::Composite(composite) => composite.entry_param_count(),
		}
	}

	pub fn function_call_count(&self) -> usize {
		match self {
			Function::Leaf(_) => 1,
			Function::Composite(composite) => composite.function_call_count(),
		}
	}

	pub fn depth(&self) -> usize {
		match self {
			Function::Leaf(_) => 1,
			Function::Composite(composite) => composite.depth(),
		}
	}

	pub fn result_type(&self) -> Type {
		match self {
			Function::Leaf(leaf) => leaf.return_type(),
			Function::Composite(composite) => composite.result_type().clone(),
		}
	}
}
