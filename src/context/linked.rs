use indexmap::IndexMap;
use serde::Serialize;

use super::{ResolvedContext, TermDefinition};
use crate::{Container, TypeMapping};

/// Information about a linked field.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct LinkInfo {
	/// Type mapping, either `@id` or `@vocab`.
	#[serde(rename = "type", serialize_with = "serialize_display")]
	pub type_: TypeMapping,

	/// Container mapping.
	#[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_container")]
	pub container: Option<Container>,

	/// Unexpanded IRI mapping.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
}

/// Set of the terms whose values reference other documents.
///
/// A term is linked when its definition is an object with a `@type` of `@id`
/// or `@vocab`. Terms defined as a bare IRI string are never linked.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct LinkedFields {
	fields: IndexMap<String, LinkInfo>,
}

impl LinkedFields {
	pub fn contains(&self, term: &str) -> bool {
		self.fields.contains_key(term)
	}

	pub fn get(&self, term: &str) -> Option<&LinkInfo> {
		self.fields.get(term)
	}

	/// Iterates over the linked terms, in definition order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.fields.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Per-term information, in definition order.
	pub fn info(&self) -> &IndexMap<String, LinkInfo> {
		&self.fields
	}
}

/// Returns the linked fields of the given context.
pub fn linked_fields(context: &ResolvedContext) -> LinkedFields {
	let fields = context
		.terms()
		.filter_map(|(term, definition)| match definition {
			TermDefinition::Expanded(def) => match &def.type_ {
				Some(ty) if ty.is_link() => Some((
					term.clone(),
					LinkInfo {
						type_: ty.clone(),
						container: def.container,
						id: def.id.clone(),
					},
				)),
				_ => None,
			},
			_ => None,
		})
		.collect();

	LinkedFields { fields }
}

impl ResolvedContext {
	/// Returns the linked fields of this context.
	pub fn linked_fields(&self) -> LinkedFields {
		linked_fields(self)
	}
}

fn serialize_display<S: serde::Serializer>(value: &TypeMapping, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.collect_str(value)
}

fn serialize_container<S: serde::Serializer>(
	value: &Option<Container>,
	serializer: S,
) -> Result<S::Ok, S::Error> {
	match value {
		Some(container) => serializer.collect_str(container),
		None => serializer.serialize_none(),
	}
}
