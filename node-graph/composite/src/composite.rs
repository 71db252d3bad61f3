use crate::basis::{BasisFunction, check_arguments};
use crate::value::TaggedValue;
use fingerprint::{Fingerprint, FingerprintNode, GraphError, Introspection, Type, substitute};
use log::debug;

/// A [`Fingerprint`] paired with the functions its function nodes call.
///
/// The functions are owned exclusively: cloning a composite duplicates every one of them, so two composites never share state.
#[derive(Debug)]
pub struct CompositeFunction {
	fingerprint: Fingerprint,
	/// One function per function node, in raw index order.
	functions: Vec<Box<dyn BasisFunction>>,
}

/// Lifts a single basis function into a composite with one entry parameter per parameter of `leaf`.
pub fn make_composite(leaf: &dyn BasisFunction) -> CompositeFunction {
	CompositeFunction {
		fingerprint: Fingerprint::leaf(leaf.return_type(), leaf.parameter_types()),
		functions: vec![leaf.duplicate()],
	}
}

impl Clone for CompositeFunction {
	fn clone(&self) -> Self {
		Self {
			fingerprint: self.fingerprint.clone(),
			functions: self.duplicate_functions(),
		}
	}
}

impl CompositeFunction {
	pub fn fingerprint(&self) -> &Fingerprint {
		&self.fingerprint
	}

	/// The owned functions in call order.
	pub fn functions(&self) -> impl Iterator<Item = &dyn BasisFunction> {
		self.functions.iter().map(Box::as_ref)
	}

	pub fn introspect(&self) -> &Introspection {
		self.fingerprint.introspect()
	}

	pub fn entry_param_count(&self) -> usize {
		self.fingerprint.entry_param_count()
	}

	pub fn function_call_count(&self) -> usize {
		self.fingerprint.function_call_count()
	}

	pub fn depth(&self) -> usize {
		self.fingerprint.depth()
	}

	pub fn result_type(&self) -> &Type {
		self.fingerprint.result_type()
	}

	pub fn parameter_types(&self) -> impl Iterator<Item = &Type> {
		self.fingerprint.parameter_types()
	}

	fn duplicate_functions(&self) -> Vec<Box<dyn BasisFunction>> {
		self.functions.iter().map(|function| function.duplicate()).collect()
	}

	/// Feeds the result of `other` into entry parameter `index`, returning the new composite.
	/// Neither `self` nor `other` is modified.
	pub fn bind(&self, index: usize, other: &CompositeFunction) -> Result<Self, GraphError> {
		self.bind_many(&[index], other)
	}

	/// Feeds the result of a single copy of `other` into every entry parameter in `indices`.
	///
	/// `other` is evaluated once per application and its result is shared by all of these parameters.
	pub fn bind_many(&self, indices: &[usize], other: &CompositeFunction) -> Result<Self, GraphError> {
		for &index in indices {
			let expected = self.fingerprint.parameter_type(index)?;
			if expected != other.result_type() {
				return Err(GraphError::TypeMismatch {
					index,
					expected: expected.clone(),
					found: other.result_type().clone(),
				});
			}
		}

		let fingerprint = substitute(&self.fingerprint, &other.fingerprint, indices)?;

		// The nodes of `other` are inserted where the highest parameter was, so its calls follow every call laid out before that parameter
		let Some(&largest) = indices.iter().max() else {
			return Err(GraphError::EmptyTargets);
		};
		let position = self.fingerprint.function_calls_before(self.fingerprint.param_index_to_raw_index(largest)?);
		let mut functions = self.duplicate_functions();
		functions.splice(position..position, other.duplicate_functions());

		debug!(
			"Bound a composite with {} calls to parameters {indices:?}, its calls start at position {position} of {}",
			other.function_call_count(),
			functions.len()
		);
		debug_assert_eq!(functions.len(), fingerprint.function_call_count());
		Ok(Self { fingerprint, functions })
	}

	/// Evaluates the composite with one value per entry parameter, in parameter order.
	///
	/// Nodes are evaluated from the last raw index to the first, so every input is ready before the call that reads it
	/// and a shared subgraph is computed once.
	pub fn apply(&self, args: &[TaggedValue]) -> Result<TaggedValue, GraphError> {
		check_arguments(args, self.entry_param_count(), self.parameter_types())?;

		let nodes = self.fingerprint.nodes();
		let slots = self.fingerprint.slots();
		let len = nodes.len();
		// Filled back to front: the value of raw index `i` lives at `len - 1 - i`
		let mut results: Vec<TaggedValue> = Vec::with_capacity(len);
		for (raw_index, node) in nodes.iter().enumerate().rev() {
			let value = match node {
				FingerprintNode::Parameter(_) => args[slots[raw_index]],
				FingerprintNode::Function(function) => {
					let inputs: Vec<_> = function.inputs.iter().map(|offset| results[len - 1 - (raw_index + offset)]).collect();
					self.functions[slots[raw_index]].eval(&inputs)?
				}
			};
			results.push(value);
		}

		Ok(results[len - 1])
	}
}

impl core::fmt::Display for CompositeFunction {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "{}", self.fingerprint)?;
		for (call, function) in self.functions.iter().enumerate() {
			writeln!(f, "Call #{call}: {}", function.identifier())?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::basis::{Passthrough, Summation};
	use fingerprint::concrete;
	use pretty_assertions::assert_eq;

	/// `100a + 10b + c`, which tells its arguments apart
	#[derive(Debug, Clone, Copy)]
	struct Digits;

	impl BasisFunction for Digits {
		fn identifier(&self) -> String {
			"digits".into()
		}

		fn parameter_types(&self) -> Vec<Type> {
			vec![concrete!(f64); 3]
		}

		fn return_type(&self) -> Type {
			concrete!(f64)
		}

		fn eval(&self, args: &[TaggedValue]) -> Result<TaggedValue, GraphError> {
			let values = crate::basis::unpack_arguments::<f64>(args, 3)?;
			Ok(TaggedValue::F64(100. * values[0] + 10. * values[1] + values[2]))
		}

		fn duplicate(&self) -> Box<dyn BasisFunction> {
			Box::new(*self)
		}
	}

	fn sum(arity: usize) -> CompositeFunction {
		make_composite(&Summation::<f64>::new(arity))
	}

	fn apply(composite: &CompositeFunction, args: &[f64]) -> Result<TaggedValue, GraphError> {
		let args: Vec<_> = args.iter().copied().map(TaggedValue::F64).collect();
		composite.apply(&args)
	}

	#[test]
	fn leaf_composite_applies_its_function() {
		let composite = sum(2);
		assert_eq!(composite.entry_param_count(), 2);
		assert_eq!(composite.function_call_count(), 1);
		assert_eq!(apply(&composite, &[3., 4.]), Ok(TaggedValue::F64(7.)));
	}

	#[test]
	fn bind_splices_calls_in_order() {
		let digits = make_composite(&Digits);
		// digits(a, sum(x, y), c)
		let composite = digits.bind(1, &sum(2)).expect("bind succeeds");
		let identifiers: Vec<_> = composite.functions().map(|function| function.identifier()).collect();
		assert_eq!(identifiers, vec!["digits", "sum:2"]);
		assert_eq!(apply(&composite, &[1., 2., 3., 4.]), Ok(TaggedValue::F64(100. + 50. + 4.)));

		// digits(sum(p, q), sum(x, y), c)
		let composite = composite.bind(0, &sum(2)).expect("bind succeeds");
		assert_eq!(apply(&composite, &[1., 2., 3., 4., 5.]), Ok(TaggedValue::F64(300. + 70. + 5.)));
		assert_eq!(composite.function_call_count(), 3);
		assert_eq!(composite.depth(), 2);
	}

	#[test]
	fn bind_into_nested_composite() {
		// sum(a, sum(b, digits(x, y, z)))
		let inner = sum(2).bind(1, &make_composite(&Digits)).expect("bind succeeds");
		let composite = sum(2).bind(1, &inner).expect("bind succeeds");
		assert_eq!(composite.entry_param_count(), 5);
		assert_eq!(composite.depth(), 3);
		assert_eq!(apply(&composite, &[1000., 2000., 1., 2., 3.]), Ok(TaggedValue::F64(3123.)));
	}

	#[test]
	fn bind_many_shares_one_result() {
		let composite = make_composite(&Digits).bind_many(&[0, 2], &sum(2)).expect("bind succeeds");
		// digits(s, b, s) with s = x + y, parameters are (b, x, y)
		assert_eq!(composite.entry_param_count(), 3);
		assert_eq!(composite.function_call_count(), 2);
		assert_eq!(apply(&composite, &[5., 1., 2.]), Ok(TaggedValue::F64(300. + 50. + 3.)));
	}

	#[test]
	fn identity_bind_keeps_results() {
		let original = make_composite(&Digits).bind(2, &sum(2)).expect("bind succeeds");
		let passthrough = make_composite(&Passthrough::<f64>::new());
		for index in 0..original.entry_param_count() {
			let bound = original.bind(index, &passthrough).expect("bind succeeds");
			assert_eq!(bound.entry_param_count(), original.entry_param_count());
			for args in [[1., 2., 3., 4.], [-7., 0.5, 9., 11.]] {
				assert_eq!(apply(&bound, &args), apply(&original, &args));
			}
		}
	}

	#[test]
	fn bind_leaves_operands_untouched() {
		let digits = make_composite(&Digits);
		let other = sum(2);
		let _ = digits.bind(0, &other).expect("bind succeeds");
		assert_eq!(digits.fingerprint(), make_composite(&Digits).fingerprint());
		assert_eq!(other.fingerprint(), sum(2).fingerprint());
		assert_eq!(apply(&digits, &[1., 2., 3.]), Ok(TaggedValue::F64(123.)));
	}

	#[test]
	fn bind_rejects_mismatched_types() {
		let integer_sum = make_composite(&Summation::<i32>::new(2));
		assert_eq!(
			sum(2).bind(0, &integer_sum).map(|_| ()),
			Err(GraphError::TypeMismatch {
				index: 0,
				expected: concrete!(f64),
				found: concrete!(i32),
			})
		);
	}

	#[test]
	fn bind_rejects_invalid_indices() {
		assert_eq!(sum(2).bind(2, &sum(2)).map(|_| ()), Err(GraphError::IndexOutOfRange { index: 2, len: 2 }));
		assert_eq!(sum(2).bind_many(&[0, 0], &sum(2)).map(|_| ()), Err(GraphError::DuplicateIndex(0)));
		assert_eq!(sum(2).bind_many(&[], &sum(2)).map(|_| ()), Err(GraphError::EmptyTargets));
	}

	#[test]
	fn apply_checks_arguments() {
		let composite = sum(2);
		assert_eq!(apply(&composite, &[1.]), Err(GraphError::Arity { expected: 2, found: 1 }));
		assert_eq!(
			composite.apply(&[TaggedValue::F64(1.), TaggedValue::U32(1)]),
			Err(GraphError::TypeMismatch {
				index: 1,
				expected: concrete!(f64),
				found: concrete!(u32),
			})
		);
	}

	#[test]
	fn clones_are_deep() {
		let original = sum(2).bind(0, &sum(3)).expect("bind succeeds");
		let clone = original.clone();
		drop(original);
		assert_eq!(clone.function_call_count(), 2);
		assert_eq!(apply(&clone, &[1., 2., 3., 4.]), Ok(TaggedValue::F64(10.)));
	}

	#[test]
	fn deep_chains_apply_on_a_small_stack() {
		const DEPTH: usize = 150_000;
		let outcome = std::thread::Builder::new()
			.stack_size(128 * 1024)
			.spawn(|| {
				// passthrough(passthrough(...passthrough(x)))
				let mut nodes = vec![FingerprintNode::function(concrete!(f64), [1]); DEPTH];
				nodes.push(FingerprintNode::parameter(concrete!(f64)));
				let composite = CompositeFunction {
					fingerprint: Fingerprint::validate(nodes).expect("valid fingerprint"),
					functions: (0..DEPTH).map(|_| Passthrough::<f64>::new().duplicate()).collect(),
				};
				let result = apply(&composite, &[2.5]);
				(composite.depth(), result)
			})
			.expect("spawn thread")
			.join()
			.expect("thread finishes");
		assert_eq!(outcome, (DEPTH, Ok(TaggedValue::F64(2.5))));
	}

	#[test]
	fn integer_overflow_is_an_error() {
		let composite = make_composite(&Summation::<i32>::new(2)).bind(1, &make_composite(&Summation::<i32>::new(2))).expect("bind succeeds");
		assert_eq!(
			composite.apply(&[TaggedValue::I32(1), TaggedValue::I32(i32::MAX), TaggedValue::I32(1)]),
			Err(GraphError::Overflow { function: "sum:2".into() })
		);
		assert_eq!(composite.apply(&[TaggedValue::I32(1), TaggedValue::I32(2), TaggedValue::I32(3)]), Ok(TaggedValue::I32(6)));
	}

	#[test]
	fn zero_parameter_leaf() {
		let composite = sum(0);
		assert_eq!(composite.entry_param_count(), 0);
		assert_eq!(apply(&composite, &[]), Ok(TaggedValue::F64(0.)));

		// Binding a constant removes the parameter
		let bound = sum(2).bind(1, &composite).expect("bind succeeds");
		assert_eq!(bound.entry_param_count(), 1);
		assert_eq!(apply(&bound, &[6.]), Ok(TaggedValue::F64(6.)));
	}

	#[test]
	fn display_lists_calls() {
		let composite = sum(2).bind(1, &make_composite(&Passthrough::<f64>::new())).expect("bind succeeds");
		let rendered = composite.to_string();
		assert!(rendered.ends_with("Call #0: sum:2\nCall #1: passthrough\n"), "{rendered}");
	}
}
