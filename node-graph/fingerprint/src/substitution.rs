use crate::error::GraphError;
use crate::fingerprint::{Fingerprint, param_raw_index};
use crate::node::FingerprintNode;
use core::cmp::Ordering;
use log::{debug, trace};
use rustc_hash::FxHashSet;

/// Replaces the entry parameters `targets` of `original` with the whole `replacement` graph.
///
/// The replacement is inserted once, in place of the highest target. Every other target parameter is removed and its consumers are rerouted
/// to the inserted subgraph, so all targets share its single result. The entry parameters of the result are the original parameters
/// before the insertion point, then the parameters of `replacement`, then the original parameters after the insertion point.
pub fn substitute(original: &Fingerprint, replacement: &Fingerprint, targets: &[usize]) -> Result<Fingerprint, GraphError> {
	let mut seen = FxHashSet::default();
	for &target in targets {
		if !seen.insert(target) {
			return Err(GraphError::DuplicateIndex(target));
		}
		if target >= original.entry_param_count() {
			return Err(GraphError::IndexOutOfRange {
				index: target,
				len: original.entry_param_count(),
			});
		}
	}

	// Removing a parameter shifts every parameter after it, so the highest index goes first and later indices stay valid
	let mut targets = targets.to_vec();
	targets.sort_unstable_by(|a, b| b.cmp(a));
	let Some((&largest, remaining)) = targets.split_first() else {
		return Err(GraphError::EmptyTargets);
	};
	debug!("Substituting a fingerprint of {} nodes into parameters {targets:?} of a fingerprint of {} nodes", replacement.len(), original.len());

	let mut anchor = original.param_index_to_raw_index(largest)?;
	let mut nodes = replace(original.nodes(), anchor, replacement.nodes());
	trace!("Inserted the replacement at raw index {anchor} in place of parameter {largest}");

	for &target in remaining {
		// Parameters before the anchor keep their parameter index through the rewrite
		let removed = param_raw_index(&nodes, target).ok_or(GraphError::IndexOutOfRange {
			index: target,
			len: original.entry_param_count(),
		})?;
		reroute(&mut nodes, removed, anchor);
		anchor -= 1;
		trace!("Rerouted parameter {target} at raw index {removed} to the replacement, now at raw index {anchor}");
	}

	let result = Fingerprint::from_valid(nodes);
	debug_assert_eq!(result.entry_param_count(), original.entry_param_count() - targets.len() + replacement.entry_param_count());
	Ok(result)
}

/// Builds a new sequence with the node at `at` replaced by all of `replacement`.
fn replace(nodes: &[FingerprintNode], at: usize, replacement: &[FingerprintNode]) -> Vec<FingerprintNode> {
	let growth = replacement.len() - 1;
	let mut result = Vec::with_capacity(nodes.len() + growth);

	// Only nodes before the insertion point can span it
	for (raw_index, node) in nodes[..at].iter().enumerate() {
		let mut node = node.clone();
		node.retarget(raw_index, |target| if target > at { target + growth } else { target });
		result.push(node);
	}
	result.extend_from_slice(replacement);
	result.extend_from_slice(&nodes[at + 1..]);
	result
}

/// Removes the parameter node at `removed` and points everything that used it at the node at `anchor`.
fn reroute(nodes: &mut Vec<FingerprintNode>, removed: usize, anchor: usize) {
	debug_assert!(nodes[removed].is_parameter());
	debug_assert!(removed < anchor);
	nodes.remove(removed);

	// Nodes after `removed` moved together with everything they point at
	for (raw_index, node) in nodes[..removed].iter_mut().enumerate() {
		node.retarget(raw_index, |target| match target.cmp(&removed) {
			Ordering::Less => target,
			Ordering::Equal => anchor - 1,
			Ordering::Greater => target - 1,
		});
	}
}
