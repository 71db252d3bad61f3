use crate::error::{GraphError, MalformedReason};
use crate::node::FingerprintNode;
use crate::Type;

/// The quantities derived from the shape of a [`Fingerprint`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Introspection {
	/// Number of parameter nodes, i.e. values the caller supplies.
	pub entry_param_count: usize,
	/// Number of function nodes, each evaluated once per application.
	pub function_call_count: usize,
	pub result_type: Type,
	/// The longest chain of function nodes starting at the final function.
	pub depth: usize,
}

impl core::fmt::Display for Introspection {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(
			f,
			"entry parameters: {}, function calls: {}, depth: {}, result type: {}",
			self.entry_param_count, self.function_call_count, self.depth, self.result_type
		)
	}
}

/// An ordered, immutable sequence of nodes encoding the shape of one composite function.
///
/// The node at raw index 0 is the final function whose result is the result of the whole fingerprint.
/// Inputs only ever point forward, so the graph is acyclic and its depth-first expansion from raw index 0 is unique.
/// Entry parameters are numbered by the order in which their parameter nodes appear in the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
	nodes: Vec<FingerprintNode>,
	introspection: Introspection,
}

impl Fingerprint {
	/// Checks the structural invariants of `nodes` and wraps them into a fingerprint.
	pub fn validate(nodes: Vec<FingerprintNode>) -> Result<Self, GraphError> {
		check_invariants(&nodes)?;
		Ok(Self::from_valid(nodes))
	}

	/// The fingerprint of a single function taking one entry parameter per element of `parameter_types`.
	pub fn leaf(result_type: Type, parameter_types: impl IntoIterator<Item = Type>) -> Self {
		let parameters: Vec<_> = parameter_types.into_iter().map(FingerprintNode::parameter).collect();
		let inputs: Vec<_> = (1..=parameters.len()).collect();

		let mut nodes = Vec::with_capacity(parameters.len() + 1);
		nodes.push(FingerprintNode::function(result_type, inputs));
		nodes.extend(parameters);
		Self::from_valid(nodes)
	}

	/// Wraps a node sequence already known to hold every invariant.
	pub(crate) fn from_valid(nodes: Vec<FingerprintNode>) -> Self {
		debug_assert!(check_invariants(&nodes).is_ok(), "Constructed an invalid fingerprint: {nodes:#?}");
		let introspection = introspect_nodes(&nodes);
		Self { nodes, introspection }
	}

	pub fn nodes(&self) -> &[FingerprintNode] {
		&self.nodes
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Always false, fingerprints hold at least their final function.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn introspect(&self) -> &Introspection {
		&self.introspection
	}

	pub fn entry_param_count(&self) -> usize {
		self.introspection.entry_param_count
	}

	pub fn function_call_count(&self) -> usize {
		self.introspection.function_call_count
	}

	pub fn depth(&self) -> usize {
		self.introspection.depth
	}

	pub fn result_type(&self) -> &Type {
		&self.introspection.result_type
	}

	/// Finds the raw index of the parameter node with the given parameter index.
	pub fn param_index_to_raw_index(&self, param_index: usize) -> Result<usize, GraphError> {
		param_raw_index(&self.nodes, param_index).ok_or(GraphError::IndexOutOfRange {
			index: param_index,
			len: self.entry_param_count(),
		})
	}

	pub fn parameter_type(&self, param_index: usize) -> Result<&Type, GraphError> {
		let raw_index = self.param_index_to_raw_index(param_index)?;
		Ok(self.nodes[raw_index].result_type())
	}

	pub fn parameter_types(&self) -> impl Iterator<Item = &Type> {
		self.nodes.iter().filter(|node| node.is_parameter()).map(FingerprintNode::result_type)
	}

	/// Number of function nodes located before `raw_index`, which is the position of the node's call among all calls.
	pub fn function_calls_before(&self, raw_index: usize) -> usize {
		self.nodes[..raw_index.min(self.nodes.len())].iter().filter(|node| node.is_function()).count()
	}

	/// For each raw index, the rank of the node among the nodes of its own kind.
	/// This is the parameter index for parameter nodes and the call index for function nodes.
	pub fn slots(&self) -> Vec<usize> {
		let (mut parameters, mut functions) = (0, 0);
		self.nodes
			.iter()
			.map(|node| {
				let counter = if node.is_parameter() { &mut parameters } else { &mut functions };
				*counter += 1;
				*counter - 1
			})
			.collect()
	}
}

/// The structural invariants every fingerprint holds.
fn check_invariants(nodes: &[FingerprintNode]) -> Result<(), GraphError> {
	let Some(root) = nodes.first() else {
		return Err(GraphError::malformed(0, MalformedReason::Empty));
	};
	if root.is_parameter() {
		return Err(GraphError::malformed(0, MalformedReason::RootIsParameter));
	}

	let len = nodes.len();
	let mut referenced = vec![false; len];
	referenced[0] = true;
	for (raw_index, node) in nodes.iter().enumerate() {
		for &offset in node.inputs() {
			if offset == 0 {
				return Err(GraphError::malformed(raw_index, MalformedReason::NonPositiveOffset));
			}
			match raw_index.checked_add(offset) {
				Some(target) if target < len => referenced[target] = true,
				_ => return Err(GraphError::malformed(raw_index, MalformedReason::OffsetOutOfRange { offset, len })),
			}
		}
	}
	// Inputs point forward, so a node referenced by anything is reachable from the root
	if let Some(raw_index) = referenced.iter().position(|referenced| !referenced) {
		return Err(GraphError::malformed(raw_index, MalformedReason::Unreachable));
	}

	Ok(())
}

/// Linear scan for the `param_index`-th parameter node of `nodes`.
pub(crate) fn param_raw_index(nodes: &[FingerprintNode], param_index: usize) -> Option<usize> {
	nodes.iter().enumerate().filter(|(_, node)| node.is_parameter()).nth(param_index).map(|(raw_index, _)| raw_index)
}

/// Derives the introspection in one reverse pass.
///
/// Inputs only point forward, so walking the raw indices backwards reaches every input before the nodes that use it.
fn introspect_nodes(nodes: &[FingerprintNode]) -> Introspection {
	let mut reachable = vec![false; nodes.len()];
	reachable[0] = true;
	for (raw_index, node) in nodes.iter().enumerate() {
		if reachable[raw_index] {
			for offset in node.inputs() {
				reachable[raw_index + offset] = true;
			}
		}
	}

	let mut depths = vec![0; nodes.len()];
	let (mut entry_param_count, mut function_call_count) = (0, 0);
	for raw_index in (0..nodes.len()).rev() {
		if !reachable[raw_index] {
			continue;
		}
		let node = &nodes[raw_index];
		if node.is_parameter() {
			entry_param_count += 1;
		} else {
			function_call_count += 1;
			let deepest_input = node.inputs().iter().map(|offset| depths[raw_index + offset]).max().unwrap_or(0);
			depths[raw_index] = deepest_input + 1;
		}
	}

	Introspection {
		entry_param_count,
		function_call_count,
		result_type: nodes[0].result_type().clone(),
		depth: depths[0],
	}
}

impl core::fmt::Display for Fingerprint {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		writeln!(f, "Fingerprint with {} nodes:", self.nodes.len())?;

		let slots = self.slots();
		let mut stack = vec![(0, 0)];
		while let Some((raw_index, indent)) = stack.pop() {
			for _ in 0..indent {
				f.write_str("\t")?;
			}
			match &self.nodes[raw_index] {
				FingerprintNode::Parameter(parameter) => writeln!(f, "[{raw_index}] Parameter #{} ({})", slots[raw_index], parameter.result_type)?,
				FingerprintNode::Function(function) => {
					writeln!(f, "[{raw_index}] Call #{} -> {}", slots[raw_index], function.result_type)?;
					// Reversed so the first input is printed first
					stack.extend(function.inputs.iter().rev().map(|offset| (raw_index + offset, indent + 1)));
				}
			}
		}
		Ok(())
	}
}
