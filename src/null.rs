use serde_json::Value;

/// Value that may be explicitly set to `null`.
///
/// Used for context keyword entries such as `@vocab` and `@base`, where
/// `null` is meaningful: it resets whatever an earlier context defined.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Nullable<T> {
	Null,
	Some(T),
}

impl<T> Nullable<T> {
	#[inline]
	pub fn is_null(&self) -> bool {
		matches!(self, Nullable::Null)
	}

	#[inline]
	pub fn is_some(&self) -> bool {
		matches!(self, Nullable::Some(_))
	}

	#[inline]
	pub fn as_ref(&self) -> Nullable<&T> {
		match self {
			Nullable::Null => Nullable::Null,
			Nullable::Some(t) => Nullable::Some(t),
		}
	}

	#[inline]
	pub fn option(self) -> Option<T> {
		match self {
			Nullable::Null => None,
			Nullable::Some(t) => Some(t),
		}
	}

	#[inline]
	pub fn map<F, U>(self, f: F) -> Nullable<U>
	where
		F: FnOnce(T) -> U,
	{
		match self {
			Nullable::Null => Nullable::Null,
			Nullable::Some(t) => Nullable::Some(f(t)),
		}
	}
}

impl<T: AsRef<str>> Nullable<T> {
	/// Converts this value back into JSON.
	pub fn to_json(&self) -> Value {
		match self {
			Nullable::Null => Value::Null,
			Nullable::Some(t) => Value::String(t.as_ref().to_owned()),
		}
	}
}

impl<T: PartialEq> PartialEq<T> for Nullable<T> {
	fn eq(&self, other: &T) -> bool {
		match self {
			Nullable::Null => false,
			Nullable::Some(t) => t == other,
		}
	}
}
