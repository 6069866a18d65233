use std::fmt;

/// Type mapping of a term definition (`@type` entry).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeMapping {
	/// `@id`: values are document-relative identifiers.
	Id,

	/// `@vocab`: values are vocabulary-relative identifiers.
	Vocab,

	/// Literal datatype such as `xsd:string`, unexpanded.
	Literal(String),
}

impl TypeMapping {
	pub fn new(s: &str) -> Self {
		match s {
			"@id" => TypeMapping::Id,
			"@vocab" => TypeMapping::Vocab,
			other => TypeMapping::Literal(other.to_owned()),
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			TypeMapping::Id => "@id",
			TypeMapping::Vocab => "@vocab",
			TypeMapping::Literal(t) => t.as_str(),
		}
	}

	/// Checks if values of this type are references to other resources.
	pub fn is_link(&self) -> bool {
		matches!(self, TypeMapping::Id | TypeMapping::Vocab)
	}

	pub fn literal(&self) -> Option<&str> {
		match self {
			TypeMapping::Literal(t) => Some(t),
			_ => None,
		}
	}
}

impl fmt::Display for TypeMapping {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}
