use fingerprint::{Type, concrete};

/// A value flowing along the edges of a composite function, tagged with its type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaggedValue {
	F64(f64),
	F32(f32),
	I64(i64),
	I32(i32),
	U32(u32),
}

/// A Rust scalar which can travel as a [`TaggedValue`].
pub trait Scalar: Copy + Send + Sync + core::fmt::Debug + 'static {
	fn ty() -> Type;
	fn from_tagged(value: TaggedValue) -> Option<Self>;
	fn into_tagged(self) -> TaggedValue;
}

/// Addition which reports overflow as `None` instead of panicking or wrapping.
pub trait CheckedSum: Sized {
	fn checked_sum(self, other: Self) -> Option<Self>;
}

macro_rules! checked_sums {
	(float: $($float:ty),*; integer: $($integer:ty),* $(,)?) => {
		$(
			impl CheckedSum for $float {
				fn checked_sum(self, other: Self) -> Option<Self> {
					Some(self + other)
				}
			}
		)*
		$(
			impl CheckedSum for $integer {
				fn checked_sum(self, other: Self) -> Option<Self> {
					num_traits::CheckedAdd::checked_add(&self, &other)
				}
			}
		)*
	};
}

checked_sums! { float: f64, f32; integer: i64, i32, u32 }

macro_rules! tagged_scalars {
	($($ty:ty => $variant:ident),* $(,)?) => {
		impl TaggedValue {
			pub fn ty(&self) -> Type {
				match self {
					$(TaggedValue::$variant(_) => concrete!($ty),)*
				}
			}
		}

		impl core::fmt::Display for TaggedValue {
			fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
				match self {
					$(TaggedValue::$variant(value) => core::fmt::Display::fmt(value, f),)*
				}
			}
		}

		$(
			impl Scalar for $ty {
				fn ty() -> Type {
					concrete!($ty)
				}

				fn from_tagged(value: TaggedValue) -> Option<Self> {
					match value {
						TaggedValue::$variant(value) => Some(value),
						_ => None,
					}
				}

				fn into_tagged(self) -> TaggedValue {
					TaggedValue::$variant(self)
				}
			}

			impl From<$ty> for TaggedValue {
				fn from(value: $ty) -> Self {
					TaggedValue::$variant(value)
				}
			}
		)*
	};
}

tagged_scalars! {
	f64 => F64,
	f32 => F32,
	i64 => I64,
	i32 => I32,
	u32 => U32,
}
