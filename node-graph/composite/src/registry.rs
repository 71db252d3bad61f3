//! Resolves textual basis function descriptions, as written on the command line or in a config file, into leaves.
//!
//! Recognized forms, all over `f64`:
//!
//! | Description            | Leaf                                   |
//! |------------------------|----------------------------------------|
//! | `passthrough`          | [`Passthrough`], alias `identity`      |
//! | `sum:N`                | [`Summation`] of `N` arguments         |
//! | `binomial:e=c,e=c,...` | [`Binomial`] with `c · x^e` terms      |
//! | `gaussian:a,b,c`       | [`Gaussian`] with height, center, width |
//!
//! Any other name is looked up among the registered presets, which map a name to one of the forms above.

use crate::basis::{BasisFunction, Binomial, Gaussian, Passthrough, Summation};
use log::trace;
use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
	#[error("Unknown basis function `{0}`")]
	UnknownBasis(String),
	#[error("Invalid basis function `{spec}`: {reason}")]
	InvalidArgument { spec: String, reason: String },
}

#[derive(Clone, Debug, Default)]
pub struct BasisRegistry {
	presets: FxHashMap<String, String>,
}

impl BasisRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_presets<K: Into<String>, V: Into<String>>(presets: impl IntoIterator<Item = (K, V)>) -> Self {
		Self {
			presets: presets.into_iter().map(|(name, spec)| (name.into(), spec.into())).collect(),
		}
	}

	/// Registers `name` as shorthand for `spec`, returning the description it replaced.
	pub fn insert_preset(&mut self, name: impl Into<String>, spec: impl Into<String>) -> Option<String> {
		self.presets.insert(name.into(), spec.into())
	}

	pub fn presets(&self) -> impl Iterator<Item = (&str, &str)> {
		self.presets.iter().map(|(name, spec)| (name.as_str(), spec.as_str()))
	}

	pub fn resolve(&self, spec: &str) -> Result<Box<dyn BasisFunction>, RegistryError> {
		let spec = spec.trim();
		match parse_builtin(spec) {
			Err(RegistryError::UnknownBasis(_)) => {}
			result => return result,
		}

		// Presets expand a single level so they can never refer to each other in a cycle
		let Some(expansion) = self.presets.get(spec) else {
			return Err(RegistryError::UnknownBasis(spec.to_string()));
		};
		trace!("Expanding preset `{spec}` to `{expansion}`");
		parse_builtin(expansion.trim())
	}
}

fn parse_builtin(spec: &str) -> Result<Box<dyn BasisFunction>, RegistryError> {
	let (name, arguments) = match spec.split_once(':') {
		Some((name, arguments)) => (name.trim(), Some(arguments)),
		None => (spec, None),
	};
	let invalid = |reason: String| RegistryError::InvalidArgument { spec: spec.to_string(), reason };

	match (name, arguments) {
		("passthrough" | "identity", None) => Ok(Box::new(Passthrough::<f64>::new())),
		("passthrough" | "identity", Some(_)) => Err(invalid("takes no arguments".into())),
		("sum", Some(arity)) => {
			let arity = arity.trim().parse::<usize>().map_err(|error| invalid(format!("arity `{}`: {error}", arity.trim())))?;
			Ok(Box::new(Summation::<f64>::new(arity)))
		}
		("binomial", Some(terms)) => {
			let terms = terms
				.split(',')
				.map(|term| {
					let (exponent, coefficient) = term.split_once('=').ok_or_else(|| invalid(format!("term `{}` is not `exponent=coefficient`", term.trim())))?;
					let exponent = exponent.trim().parse::<i32>().map_err(|error| invalid(format!("exponent `{}`: {error}", exponent.trim())))?;
					let coefficient = coefficient.trim().parse::<f64>().map_err(|error| invalid(format!("coefficient `{}`: {error}", coefficient.trim())))?;
					Ok::<_, RegistryError>((exponent, coefficient))
				})
				.collect::<Result<Vec<_>, _>>()?;
			Ok(Box::new(Binomial::new(terms)))
		}
		("gaussian", Some(parameters)) => {
			let parameters = parameters
				.split(',')
				.map(|parameter| parameter.trim().parse::<f64>().map_err(|error| invalid(format!("parameter `{}`: {error}", parameter.trim()))))
				.collect::<Result<Vec<_>, _>>()?;
			let [a, b, c] = parameters[..] else {
				return Err(invalid(format!("expected 3 parameters, found {}", parameters.len())));
			};
			Ok(Box::new(Gaussian::new(a, b, c)))
		}
		("sum" | "binomial" | "gaussian", None) => Err(invalid("missing arguments after `:`".into())),
		_ => Err(RegistryError::UnknownBasis(spec.to_string())),
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::value::TaggedValue;
	use pretty_assertions::assert_eq;

	fn eval(function: &dyn BasisFunction, args: &[f64]) -> TaggedValue {
		let args: Vec<_> = args.iter().copied().map(TaggedValue::F64).collect();
		function.eval(&args).expect("evaluation succeeds")
	}

	#[test]
	fn resolves_builtins() {
		let registry = BasisRegistry::new();
		assert_eq!(registry.resolve("passthrough").unwrap().identifier(), "passthrough");
		assert_eq!(registry.resolve("identity").unwrap().identifier(), "passthrough");
		assert_eq!(registry.resolve("sum:3").unwrap().identifier(), "sum:3");
		assert_eq!(eval(registry.resolve(" sum: 2 ").unwrap().as_ref(), &[1., 2.]), TaggedValue::F64(3.));
		assert_eq!(eval(registry.resolve("binomial:2=1,0=-1").unwrap().as_ref(), &[3.]), TaggedValue::F64(8.));
		assert_eq!(eval(registry.resolve("gaussian:2,0,1").unwrap().as_ref(), &[0.]), TaggedValue::F64(2.));
	}

	#[test]
	fn resolves_presets_one_level_deep() {
		let registry = BasisRegistry::with_presets([("square", "binomial:2=1"), ("alias", "square")]);
		assert_eq!(eval(registry.resolve("square").unwrap().as_ref(), &[4.]), TaggedValue::F64(16.));
		assert_eq!(registry.resolve("alias").unwrap_err(), RegistryError::UnknownBasis("square".into()));
	}

	#[test]
	fn builtins_take_precedence_over_presets() {
		let mut registry = BasisRegistry::new();
		assert_eq!(registry.insert_preset("sum:2", "passthrough"), None);
		assert_eq!(registry.resolve("sum:2").unwrap().identifier(), "sum:2");
		assert_eq!(registry.presets().count(), 1);
	}

	#[test]
	fn rejects_bad_descriptions() {
		let registry = BasisRegistry::new();
		assert_eq!(registry.resolve("cosine").unwrap_err(), RegistryError::UnknownBasis("cosine".into()));
		assert!(matches!(registry.resolve("sum:-1"), Err(RegistryError::InvalidArgument { .. })));
		assert!(matches!(registry.resolve("sum"), Err(RegistryError::InvalidArgument { .. })));
		assert!(matches!(registry.resolve("passthrough:1"), Err(RegistryError::InvalidArgument { .. })));
		assert!(matches!(registry.resolve("binomial:2"), Err(RegistryError::InvalidArgument { .. })));
		assert!(matches!(registry.resolve("binomial:x=1"), Err(RegistryError::InvalidArgument { .. })));
		assert!(matches!(registry.resolve("gaussian:1,2"), Err(RegistryError::InvalidArgument { .. })));
	}
}
