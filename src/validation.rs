//! Context-aware validation of compacted documents.
//!
//! Term definitions may carry two non-standard entries read here:
//! `@required` (a boolean) and `@priority` (an integer, higher first).
use iref::IriRef;
use serde_json::{Map, Number, Value};
use std::cmp::Reverse;
use std::fmt;

use crate::{
	context::{ResolvedContext, TermDefinition},
	Container, Keyword, Kind, TypeMapping,
};

/// XML Schema datatypes namespace.
const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Non-standard term definition entry marking the term as mandatory.
pub const REQUIRED: &str = "@required";

/// Non-standard term definition entry giving the position of the term.
pub const PRIORITY: &str = "@priority";

/// Datatypes checked by [`ResolvedContext::validate`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Datatype {
	String,
	Integer,
	Boolean,
	DateTime,
}

impl Datatype {
	fn from_iri(iri: &str) -> Option<Self> {
		let local = iri
			.strip_prefix(XSD)
			.or_else(|| iri.strip_prefix("xsd:"))?;

		match local {
			"string" => Some(Self::String),
			"integer" => Some(Self::Integer),
			"boolean" => Some(Self::Boolean),
			"dateTime" => Some(Self::DateTime),
			_ => None,
		}
	}
}

/// Expected value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Expected {
	/// A string IRI (`@type: @id`).
	Iri,

	/// A vocabulary term (`@type: @vocab`).
	Term,

	/// A literal of the given datatype.
	Literal(Datatype),
}

impl fmt::Display for Expected {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Iri => f.write_str("a string IRI"),
			Self::Term => f.write_str("a vocabulary term (string)"),
			Self::Literal(Datatype::String) => f.write_str("a string"),
			Self::Literal(Datatype::Integer) => f.write_str("an integer"),
			Self::Literal(Datatype::Boolean) => f.write_str("a boolean"),
			Self::Literal(Datatype::DateTime) => f.write_str("a dateTime string"),
		}
	}
}

/// Validation issue.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum Issue {
	#[error("required property `{0}` missing")]
	MissingRequired(String),

	#[error("property `{term}` should be {expected}, found {found}")]
	TypeMismatch {
		term: String,
		expected: Expected,
		found: Kind,
	},

	#[error("property `{0}` should be a valid IRI: `{1}`")]
	InvalidIri(String, String),

	#[error("property `{term}` should be an array ({container} container), found {found}")]
	NotAnArray {
		term: String,
		container: Container,
		found: Kind,
	},
}

impl Issue {
	/// Term the issue is about.
	pub fn term(&self) -> &str {
		match self {
			Self::MissingRequired(term) => term,
			Self::TypeMismatch { term, .. } => term,
			Self::InvalidIri(term, _) => term,
			Self::NotAnArray { term, .. } => term,
		}
	}
}

impl TermDefinition {
	/// Checks if the term is marked as `@required`.
	pub fn is_required(&self) -> bool {
		self.entry(REQUIRED).and_then(Value::as_bool).unwrap_or(false)
	}

	/// Position of the term, `0` by default.
	pub fn priority(&self) -> i64 {
		self.entry(PRIORITY).and_then(Value::as_i64).unwrap_or(0)
	}
}

impl ResolvedContext {
	/// Terms marked as `@required`, in definition order.
	pub fn required_terms(&self) -> Vec<&str> {
		self.terms()
			.filter(|(_, definition)| definition.is_required())
			.map(|(term, _)| term.as_str())
			.collect()
	}

	/// Every term, by descending `@priority` then by name.
	pub fn terms_by_priority(&self) -> Vec<&str> {
		let mut terms: Vec<_> = self
			.terms()
			.map(|(term, definition)| (Reverse(definition.priority()), term.as_str()))
			.collect();
		terms.sort();
		terms.into_iter().map(|(_, term)| term).collect()
	}

	fn expected(&self, definition: &TermDefinition) -> Option<Expected> {
		match definition.type_mapping()? {
			TypeMapping::Id => Some(Expected::Iri),
			TypeMapping::Vocab => Some(Expected::Term),
			TypeMapping::Literal(ty) => {
				let iri = self.expand_iri(ty, false, true).unwrap_or_else(|| ty.clone());
				Datatype::from_iri(&iri)
					.or_else(|| Datatype::from_iri(ty))
					.map(Expected::Literal)
			}
		}
	}

	/// Validates the top-level properties of a compacted document.
	///
	/// Reports missing required terms, values not matching the term type
	/// mapping, and non-array values of terms with a container mapping.
	pub fn validate(&self, document: &Map<String, Value>) -> Vec<Issue> {
		let mut issues: Vec<_> = self
			.required_terms()
			.into_iter()
			.filter(|term| !document.contains_key(*term))
			.map(|term| Issue::MissingRequired(term.to_owned()))
			.collect();

		for (key, value) in document {
			let Some(definition) = self.term(key) else {
				continue;
			};

			if let Some(container) = definition.container() {
				if !value.is_array() {
					issues.push(Issue::NotAnArray {
						term: key.clone(),
						container,
						found: Kind::of(value),
					})
				}
			}

			if let Some(expected) = self.expected(definition) {
				let items = match value {
					Value::Array(items) => items.iter().collect(),
					other => vec![other],
				};

				for item in items {
					if let Some(issue) = check(key, item, expected) {
						issues.push(issue)
					}
				}
			}
		}

		issues
	}

	/// Fixes what can be fixed in a compacted document.
	///
	/// Missing required terms are added with a default value matching their
	/// definition, and scalar values are coerced to the expected datatype
	/// when the conversion is lossless enough. Returns `true` if the document
	/// changed.
	pub fn apply_fixes(&self, document: &mut Map<String, Value>) -> bool {
		let mut modified = false;

		for term in self.required_terms() {
			if !document.contains_key(term) {
				let value = self.default_value(term);
				log::debug!("adding missing required property `{term}`");
				document.insert(term.to_owned(), value);
				modified = true
			}
		}

		for (key, value) in document.iter_mut() {
			let Some(expected) = self.term(key).and_then(|def| self.expected(def)) else {
				continue;
			};

			if let Some(fixed) = fix(value, expected) {
				log::debug!("fixed type of property `{key}`: {} -> {}", Kind::of(value), Kind::of(&fixed));
				*value = fixed;
				modified = true
			}
		}

		modified
	}

	/// Default value of a missing required term.
	fn default_value(&self, term: &str) -> Value {
		let Some(definition) = self.term(term) else {
			return Value::String(String::new());
		};

		match self.expected(definition) {
			Some(Expected::Iri) => Value::String(format!("urn:missing:{term}")),
			Some(Expected::Literal(Datatype::Integer)) => Value::Number(0.into()),
			Some(Expected::Literal(Datatype::Boolean)) => Value::Bool(false),
			Some(Expected::Literal(Datatype::String)) => Value::String(String::new()),
			_ if definition.container().is_some() => Value::Array(Vec::new()),
			_ => Value::String(String::new()),
		}
	}

	/// Orders the keys of a compacted document.
	///
	/// Terms of this context come first, by priority. Then come `@context`,
	/// `@type` and `@id`, then every other key in lexical order.
	pub fn sort_keys(&self, document: &Map<String, Value>) -> Map<String, Value> {
		let mut sorted = Map::new();

		let leading = self.terms_by_priority().into_iter().chain([
			Keyword::Context.as_str(),
			Keyword::Type.as_str(),
			Keyword::Id.as_str(),
		]);

		for key in leading {
			if let Some(value) = document.get(key) {
				if !sorted.contains_key(key) {
					sorted.insert(key.to_owned(), value.clone());
				}
			}
		}

		let mut rest: Vec<_> = document
			.iter()
			.filter(|(key, _)| !sorted.contains_key(key.as_str()))
			.collect();
		rest.sort_by(|(a, _), (b, _)| a.cmp(b));

		let rest: Vec<_> = rest
			.into_iter()
			.map(|(key, value)| (key.clone(), value.clone()))
			.collect();
		sorted.extend(rest);
		sorted
	}
}

fn is_valid_iri(value: &str) -> bool {
	!value.is_empty() && !value.starts_with(':') && !value.ends_with(':') && IriRef::new(value).is_ok()
}

fn check(term: &str, value: &Value, expected: Expected) -> Option<Issue> {
	let mismatch = || Issue::TypeMismatch {
		term: term.to_owned(),
		expected,
		found: Kind::of(value),
	};

	match (expected, value) {
		(Expected::Iri, Value::String(iri)) if !is_valid_iri(iri) => {
			Some(Issue::InvalidIri(term.to_owned(), iri.clone()))
		}
		(Expected::Iri | Expected::Term, Value::String(_)) => None,
		// Embedded node.
		(Expected::Iri | Expected::Term, Value::Object(_)) => None,
		(Expected::Literal(Datatype::String | Datatype::DateTime), Value::String(_)) => None,
		(Expected::Literal(Datatype::Integer), Value::Number(n)) if n.is_i64() || n.is_u64() => None,
		(Expected::Literal(Datatype::Boolean), Value::Bool(_)) => None,
		_ => Some(mismatch()),
	}
}

fn fix(value: &Value, expected: Expected) -> Option<Value> {
	match (expected, value) {
		(Expected::Iri | Expected::Literal(Datatype::String), Value::Number(n)) => {
			Some(Value::String(n.to_string()))
		}
		(Expected::Iri | Expected::Literal(Datatype::String), Value::Bool(b)) => {
			Some(Value::String(b.to_string()))
		}
		(Expected::Literal(Datatype::Integer), Value::String(s))
			if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) =>
		{
			s.parse::<u64>().ok().map(|n| Value::Number(n.into()))
		}
		(Expected::Literal(Datatype::Integer), Value::Number(n)) if n.is_f64() => n
			.as_f64()
			.filter(|f| f.is_finite())
			.map(|f| Value::Number(Number::from(f.trunc() as i64))),
		(Expected::Literal(Datatype::Boolean), Value::String(s)) => Some(Value::Bool(matches!(
			s.to_lowercase().as_str(),
			"true" | "1" | "yes" | "on"
		))),
		(Expected::Literal(Datatype::Boolean), Value::Number(n)) => {
			Some(Value::Bool(n.as_f64().map(|f| f != 0.0).unwrap_or(false)))
		}
		_ => None,
	}
}
