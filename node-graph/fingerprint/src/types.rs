use core::any::TypeId;
use std::borrow::Cow;

/// Builds the [`Type`] tag of a Rust type.
#[macro_export]
macro_rules! concrete {
	($type:ty) => {
		$crate::Type {
			id: Some(core::any::TypeId::of::<$type>()),
			name: std::borrow::Cow::Borrowed(core::any::type_name::<$type>()),
		}
	};
}

/// The type tag carried by every node of a fingerprint.
///
/// Two tags compare by their [`TypeId`] when both know it, and by name otherwise.
#[derive(Clone, Debug, Eq)]
pub struct Type {
	pub id: Option<TypeId>,
	pub name: Cow<'static, str>,
}

impl Type {
	/// A tag known only by name, such as one read back from user input.
	pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
		Self { id: None, name: name.into() }
	}

	/// The type name without its module path.
	pub fn short_name(&self) -> &str {
		self.name.rsplit("::").next().unwrap_or(&self.name)
	}
}

impl PartialEq for Type {
	fn eq(&self, other: &Self) -> bool {
		match (self.id, other.id) {
			(Some(id), Some(other_id)) => id == other_id,
			_ => {
				log::warn!("Type::eq: comparing `{}` and `{}` by name", self.name, other.name);
				self.name == other.name
			}
		}
	}
}

impl core::hash::Hash for Type {
	fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
		self.name.hash(state);
	}
}

impl core::fmt::Display for Type {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(self.short_name())
	}
}
