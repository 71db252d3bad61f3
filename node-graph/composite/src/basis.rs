use crate::value::{CheckedSum, Scalar, TaggedValue};
use fingerprint::{GraphError, Type};
use num_traits::{Float, Num};
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// A leaf function which composite functions are built from.
///
/// Implementations are plain total functions. The fingerprint of the composite that owns them guarantees
/// they are called with as many arguments as [`BasisFunction::parameter_types`] declares.
pub trait BasisFunction: Send + Sync + core::fmt::Debug {
	fn identifier(&self) -> String;

	fn parameter_types(&self) -> Vec<Type>;

	fn return_type(&self) -> Type;

	fn eval(&self, args: &[TaggedValue]) -> Result<TaggedValue, GraphError>;

	/// A deep copy of this function, owned by the caller.
	fn duplicate(&self) -> Box<dyn BasisFunction>;
}

/// Checks that `args` holds exactly `expected` values, each tagged with the matching type of `parameter_types`.
pub fn check_arguments<'a>(args: &[TaggedValue], expected: usize, parameter_types: impl IntoIterator<Item = &'a Type>) -> Result<(), GraphError> {
	if args.len() != expected {
		return Err(GraphError::Arity { expected, found: args.len() });
	}
	for (index, (arg, ty)) in args.iter().zip(parameter_types).enumerate() {
		if arg.ty() != *ty {
			return Err(GraphError::TypeMismatch {
				index,
				expected: ty.clone(),
				found: arg.ty(),
			});
		}
	}
	Ok(())
}

/// Checks the number and types of `args` and converts them to `T`.
pub fn unpack_arguments<T: Scalar>(args: &[TaggedValue], expected: usize) -> Result<Vec<T>, GraphError> {
	if args.len() != expected {
		return Err(GraphError::Arity { expected, found: args.len() });
	}
	args.iter()
		.enumerate()
		.map(|(index, value)| {
			T::from_tagged(*value).ok_or_else(|| GraphError::TypeMismatch {
				index,
				expected: T::ty(),
				found: value.ty(),
			})
		})
		.collect()
}

/// Returns its single argument.
#[derive(Debug, Clone, Copy)]
pub struct Passthrough<T>(PhantomData<T>);

impl<T> Passthrough<T> {
	pub const fn new() -> Self {
		Self(PhantomData)
	}
}

impl<T: Scalar> BasisFunction for Passthrough<T> {
	fn identifier(&self) -> String {
		"passthrough".into()
	}

	fn parameter_types(&self) -> Vec<Type> {
		vec![T::ty()]
	}

	fn return_type(&self) -> Type {
		T::ty()
	}

	fn eval(&self, args: &[TaggedValue]) -> Result<TaggedValue, GraphError> {
		let x = unpack_arguments::<T>(args, 1)?[0];
		Ok(x.into_tagged())
	}

	fn duplicate(&self) -> Box<dyn BasisFunction> {
		Box::new(*self)
	}
}

/// The sum of a fixed number of arguments.
///
/// Integer sums which leave the range of their type fail with [`GraphError::Overflow`]. Float sums follow IEEE 754 and may reach infinity.
#[derive(Debug, Clone, Copy)]
pub struct Summation<T> {
	arity: usize,
	phantom: PhantomData<T>,
}

impl<T> Summation<T> {
	pub const fn new(arity: usize) -> Self {
		Self { arity, phantom: PhantomData }
	}

	pub fn arity(&self) -> usize {
		self.arity
	}
}

impl<T: Scalar + Num + CheckedSum> BasisFunction for Summation<T> {
	fn identifier(&self) -> String {
		format!("sum:{}", self.arity)
	}

	fn parameter_types(&self) -> Vec<Type> {
		vec![T::ty(); self.arity]
	}

	fn return_type(&self) -> Type {
		T::ty()
	}

	fn eval(&self, args: &[TaggedValue]) -> Result<TaggedValue, GraphError> {
		let values = unpack_arguments::<T>(args, self.arity)?;
		let sum = values.into_iter().try_fold(T::zero(), T::checked_sum).ok_or_else(|| GraphError::Overflow { function: self.identifier() })?;
		Ok(sum.into_tagged())
	}

	fn duplicate(&self) -> Box<dyn BasisFunction> {
		Box::new(*self)
	}
}

/// A sparse series `Σ coefficient · x^exponent` over integer exponents, which may be negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Binomial<T> {
	terms: BTreeMap<i32, T>,
}

impl<T: Float> Binomial<T> {
	/// Coefficients given for the same exponent more than once are added up.
	pub fn new(terms: impl IntoIterator<Item = (i32, T)>) -> Self {
		let mut map = BTreeMap::new();
		for (exponent, coefficient) in terms {
			let entry = map.entry(exponent).or_insert_with(T::zero);
			*entry = *entry + coefficient;
		}
		Self { terms: map }
	}

	pub fn terms(&self) -> &BTreeMap<i32, T> {
		&self.terms
	}

	pub fn evaluate(&self, x: T) -> T {
		// `powi` takes the reciprocal for negative exponents, `1 / x^|exponent|`
		self.terms.iter().fold(T::zero(), |sum, (&exponent, &coefficient)| sum + coefficient * x.powi(exponent))
	}
}

impl<T: Scalar + Float> BasisFunction for Binomial<T> {
	fn identifier(&self) -> String {
		let terms: Vec<_> = self.terms.iter().map(|(exponent, coefficient)| format!("{exponent}={coefficient:?}")).collect();
		format!("binomial:{}", terms.join(","))
	}

	fn parameter_types(&self) -> Vec<Type> {
		vec![T::ty()]
	}

	fn return_type(&self) -> Type {
		T::ty()
	}

	fn eval(&self, args: &[TaggedValue]) -> Result<TaggedValue, GraphError> {
		let x = unpack_arguments::<T>(args, 1)?[0];
		Ok(self.evaluate(x).into_tagged())
	}

	fn duplicate(&self) -> Box<dyn BasisFunction> {
		Box::new(self.clone())
	}
}

/// The bell curve `a · exp(-(x - b)² / (2c²))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian<T> {
	/// Height of the peak.
	pub a: T,
	/// Position of the peak.
	pub b: T,
	/// Standard deviation.
	pub c: T,
}

impl<T: Float> Gaussian<T> {
	pub fn new(a: T, b: T, c: T) -> Self {
		Self { a, b, c }
	}

	pub fn evaluate(&self, x: T) -> T {
		let distance = x - self.b;
		let variance = self.c * self.c;
		self.a * (-(distance * distance) / (variance + variance)).exp()
	}
}

impl<T: Scalar + Float> BasisFunction for Gaussian<T> {
	fn identifier(&self) -> String {
		format!("gaussian:{:?},{:?},{:?}", self.a, self.b, self.c)
	}

	fn parameter_types(&self) -> Vec<Type> {
		vec![T::ty()]
	}

	fn return_type(&self) -> Type {
		T::ty()
	}

	fn eval(&self, args: &[TaggedValue]) -> Result<TaggedValue, GraphError> {
		let x = unpack_arguments::<T>(args, 1)?[0];
		Ok(self.evaluate(x).into_tagged())
	}

	fn duplicate(&self) -> Box<dyn BasisFunction> {
		Box::new(*self)
	}
}
