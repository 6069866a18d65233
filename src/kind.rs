use serde_json::Value;
use std::fmt;

/// JSON value kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
	Null,
	Boolean,
	Number,
	String,
	Array,
	Object,
}

impl Kind {
	pub fn of(value: &Value) -> Self {
		match value {
			Value::Null => Kind::Null,
			Value::Bool(_) => Kind::Boolean,
			Value::Number(_) => Kind::Number,
			Value::String(_) => Kind::String,
			Value::Array(_) => Kind::Array,
			Value::Object(_) => Kind::Object,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Kind::Null => "null",
			Kind::Boolean => "boolean",
			Kind::Number => "number",
			Kind::String => "string",
			Kind::Array => "array",
			Kind::Object => "object",
		}
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}
