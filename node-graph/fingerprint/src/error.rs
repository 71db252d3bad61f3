use crate::Type;
use thiserror::Error;

/// Why a node sequence was rejected as a fingerprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MalformedReason {
	Empty,
	/// The final function at raw index 0 must be a function node.
	RootIsParameter,
	/// An input offset of zero would make the node its own input.
	NonPositiveOffset,
	OffsetOutOfRange { offset: usize, len: usize },
	/// No function node uses this node as an input.
	Unreachable,
}

impl core::fmt::Display for MalformedReason {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			MalformedReason::Empty => write!(f, "the node sequence is empty"),
			MalformedReason::RootIsParameter => write!(f, "the first node is a parameter node"),
			MalformedReason::NonPositiveOffset => write!(f, "an input offset is not positive"),
			MalformedReason::OffsetOutOfRange { offset, len } => write!(f, "input offset {offset} points past the end of {len} nodes"),
			MalformedReason::Unreachable => write!(f, "the node is not an input of any function node"),
		}
	}
}

/// The error type of every fingerprint and composite function operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
	#[error("Malformed fingerprint at raw index {raw_index}: {reason}")]
	MalformedGraph { raw_index: usize, reason: MalformedReason },

	#[error("Index {index} is out of range, there are only {len} entries")]
	IndexOutOfRange { index: usize, len: usize },

	#[error("Parameter index {0} was supplied more than once")]
	DuplicateIndex(usize),

	#[error("No parameter index was supplied for the substitution")]
	EmptyTargets,

	#[error("Input {index} expects a value of type {expected} but received {found}")]
	TypeMismatch { index: usize, expected: Type, found: Type },

	#[error("Expected {expected} arguments but received {found}")]
	Arity { expected: usize, found: usize },

	#[error("The result of `{function}` does not fit its type")]
	Overflow { function: String },
}

impl GraphError {
	pub(crate) fn malformed(raw_index: usize, reason: MalformedReason) -> Self {
		Self::MalformedGraph { raw_index, reason }
	}
}
