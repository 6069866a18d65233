use serde_json::{Map, Value};

use crate::{Container, Keyword, Kind, TypeMapping};

/// A term definition, as found in a context.
#[derive(Clone, PartialEq, Debug)]
pub enum TermDefinition {
	/// `"term": null`: the term is explicitly left undefined.
	Null,

	/// `"term": "iri"`: simple IRI alias for the term name itself.
	///
	/// Simple definitions never make the term a linked field.
	Simple(String),

	/// `"term": { "@id": ..., "@type": ..., "@container": ... }`.
	Expanded(ExpandedDefinition),
}

/// Expanded term definition.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ExpandedDefinition {
	// IRI mapping (`@id`), unexpanded.
	pub id: Option<String>,

	// Type mapping (`@type`).
	pub type_: Option<TypeMapping>,

	// Container mapping (`@container`).
	pub container: Option<Container>,

	// Prefix flag (`@prefix`).
	pub prefix: Option<bool>,

	// Every other entry (`@required`, `@priority`, `@language`, a term-scoped
	// `@context`, ...). A term-scoped `@context` is kept but never resolved.
	pub extra: Map<String, Value>,
}

impl TermDefinition {
	/// Reads a term definition from its JSON value.
	///
	/// Returns the kind of the value if it cannot be a term definition.
	pub fn from_json(value: &Value) -> Result<Self, Kind> {
		match value {
			Value::Null => Ok(Self::Null),
			Value::String(iri) => Ok(Self::Simple(iri.clone())),
			Value::Object(entries) => Ok(Self::Expanded(ExpandedDefinition::from_json(entries))),
			other => Err(Kind::of(other)),
		}
	}

	/// Returns the unexpanded IRI mapping of this definition, if any.
	pub fn id(&self) -> Option<&str> {
		match self {
			Self::Null => None,
			Self::Simple(iri) => Some(iri),
			Self::Expanded(def) => def.id.as_deref(),
		}
	}

	/// Returns the type mapping of this definition.
	///
	/// Always `None` for simple definitions.
	pub fn type_mapping(&self) -> Option<&TypeMapping> {
		match self {
			Self::Expanded(def) => def.type_.as_ref(),
			_ => None,
		}
	}

	pub fn container(&self) -> Option<Container> {
		match self {
			Self::Expanded(def) => def.container,
			_ => None,
		}
	}

	/// Returns the given non-standard entry (such as `@required`) of an
	/// expanded definition.
	pub fn entry(&self, key: &str) -> Option<&Value> {
		match self {
			Self::Expanded(def) => def.extra.get(key),
			_ => None,
		}
	}

	/// Checks if values of this term are references to other resources.
	///
	/// Only expanded definitions with a `@type` of `@id` or `@vocab` are
	/// linked.
	pub fn is_linked(&self) -> bool {
		self.type_mapping().map(TypeMapping::is_link).unwrap_or(false)
	}

	/// Converts this definition back into JSON.
	pub fn to_json(&self) -> Value {
		match self {
			Self::Null => Value::Null,
			Self::Simple(iri) => Value::String(iri.clone()),
			Self::Expanded(def) => Value::Object(def.to_json()),
		}
	}
}

impl ExpandedDefinition {
	fn from_json(entries: &Map<String, Value>) -> Self {
		let mut result = Self::default();

		for (key, value) in entries {
			match (Keyword::try_from(key.as_str()), value) {
				(Ok(Keyword::Id), Value::String(id)) => result.id = Some(id.clone()),
				(Ok(Keyword::Type), Value::String(ty)) => result.type_ = Some(TypeMapping::new(ty)),
				(Ok(Keyword::Container), Value::String(c)) => match Container::try_from(c.as_str()) {
					Ok(c) => result.container = Some(c),
					Err(_) => {
						result.extra.insert(key.clone(), value.clone());
					}
				},
				(Ok(Keyword::Container), Value::Array(items)) => {
					result.container = items
						.iter()
						.filter_map(Value::as_str)
						.find_map(|c| Container::try_from(c).ok());
					if result.container.is_none() {
						result.extra.insert(key.clone(), value.clone());
					}
				}
				(Ok(Keyword::Prefix), Value::Bool(b)) => result.prefix = Some(*b),
				_ => {
					result.extra.insert(key.clone(), value.clone());
				}
			}
		}

		result
	}

	fn to_json(&self) -> Map<String, Value> {
		let mut map = Map::new();

		if let Some(id) = &self.id {
			map.insert(Keyword::Id.to_string(), Value::String(id.clone()));
		}

		if let Some(ty) = &self.type_ {
			map.insert(Keyword::Type.to_string(), Value::String(ty.to_string()));
		}

		if let Some(c) = self.container {
			map.insert(Keyword::Container.to_string(), Value::String(c.to_string()));
		}

		if let Some(p) = self.prefix {
			map.insert(Keyword::Prefix.to_string(), Value::Bool(p));
		}

		for (key, value) in &self.extra {
			map.insert(key.clone(), value.clone());
		}

		map
	}
}
