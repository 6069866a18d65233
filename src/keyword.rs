use std::convert::TryFrom;
use std::fmt;

/// JSON-LD keywords understood by the resolver and the expand/compact engine.
///
/// Any other `@`-prefixed key is carried through untouched.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Keyword {
	/// `@base`.
	/// Base IRI against which relative IRI references are resolved.
	Base,

	/// `@container`.
	/// Default container type of a term.
	Container,

	/// `@context`.
	/// Short-hand names used throughout a JSON-LD document.
	Context,

	/// `@graph`.
	/// Used to express a graph.
	Graph,

	/// `@id`.
	/// Identifier of a node object, or marker of an identifier-typed term.
	Id,

	/// `@language`.
	Language,

	/// `@list`.
	/// Used to express an ordered set of data.
	List,

	/// `@prefix`.
	/// With the value true, allows this term to be used to construct a compact IRI when
	/// compacting.
	Prefix,

	/// `@set`.
	/// Used to express an unordered set of data and to ensure that values are always represented
	/// as arrays.
	Set,

	/// `@type`.
	/// Type of a node or datatype of a typed value.
	Type,

	/// `@value`.
	/// Data associated with a particular property in the graph.
	Value,

	/// `@vocab`.
	/// Used to expand properties and values in @type with a common prefix IRI.
	Vocab,
}

impl Keyword {
	pub fn as_str(&self) -> &'static str {
		match self {
			Keyword::Base => "@base",
			Keyword::Container => "@container",
			Keyword::Context => "@context",
			Keyword::Graph => "@graph",
			Keyword::Id => "@id",
			Keyword::Language => "@language",
			Keyword::List => "@list",
			Keyword::Prefix => "@prefix",
			Keyword::Set => "@set",
			Keyword::Type => "@type",
			Keyword::Value => "@value",
			Keyword::Vocab => "@vocab",
		}
	}
}

impl<'a> TryFrom<&'a str> for Keyword {
	type Error = &'a str;

	fn try_from(s: &'a str) -> Result<Keyword, &'a str> {
		use Keyword::*;
		match s {
			"@base" => Ok(Base),
			"@container" => Ok(Container),
			"@context" => Ok(Context),
			"@graph" => Ok(Graph),
			"@id" => Ok(Id),
			"@language" => Ok(Language),
			"@list" => Ok(List),
			"@prefix" => Ok(Prefix),
			"@set" => Ok(Set),
			"@type" => Ok(Type),
			"@value" => Ok(Value),
			"@vocab" => Ok(Vocab),
			_ => Err(s),
		}
	}
}

impl fmt::Display for Keyword {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}

/// Checks if the given string has the form of a keyword (`@` followed by
/// ASCII letters).
pub fn is_keyword_like(s: &str) -> bool {
	match s.strip_prefix('@') {
		Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphabetic()),
		None => false,
	}
}
