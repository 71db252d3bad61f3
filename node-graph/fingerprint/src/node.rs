use crate::Type;

/// A call to a function whose inputs are found further down the fingerprint.
///
/// Each input is a relative offset: the input of the node at raw index `i` with offset `r` is the node at raw index `i + r`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionNode {
	pub result_type: Type,
	pub inputs: Vec<usize>,
}

/// An entry parameter, supplied by the caller when the function is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterNode {
	pub result_type: Type,
}

/// The atoms a [`crate::Fingerprint`] is made of.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FingerprintNode {
	Function(FunctionNode),
	Parameter(ParameterNode),
}

impl FingerprintNode {
	pub fn function(result_type: Type, inputs: impl Into<Vec<usize>>) -> Self {
		Self::Function(FunctionNode { result_type, inputs: inputs.into() })
	}

	pub fn parameter(result_type: Type) -> Self {
		Self::Parameter(ParameterNode { result_type })
	}

	pub fn result_type(&self) -> &Type {
		match self {
			Self::Function(function) => &function.result_type,
			Self::Parameter(parameter) => &parameter.result_type,
		}
	}

	pub fn is_parameter(&self) -> bool {
		matches!(self, Self::Parameter(_))
	}

	pub fn is_function(&self) -> bool {
		matches!(self, Self::Function(_))
	}

	/// The relative input offsets, empty for parameter nodes.
	pub fn inputs(&self) -> &[usize] {
		match self {
			Self::Function(function) => &function.inputs,
			Self::Parameter(_) => &[],
		}
	}

	/// Converts every input of this node, located at `raw_index`, by running `f` on the absolute raw index it points at.
	/// The returned raw index must still lie after `raw_index`.
	pub fn retarget(&mut self, raw_index: usize, f: impl Fn(usize) -> usize) {
		if let Self::Function(function) = self {
			for offset in function.inputs.iter_mut() {
				let target = f(raw_index + *offset);
				debug_assert!(target > raw_index, "Retargeting node {raw_index} would point it backwards at {target}");
				*offset = target - raw_index;
			}
		}
	}
}
