//! Compaction algorithm.
//!
//! Inverse of the expansion: absolute IRIs are turned back into terms,
//! compact IRIs or relative references, and value objects and references
//! are unwrapped wherever the selected term allows it.
use serde_json::{Map, Value};

use crate::{
	context::{InverseContext, ResolvedContext, Selection, TermDefinition},
	Container, ExpandedDocument, Keyword, TypeMapping,
};

mod options;

pub use options::*;

impl ResolvedContext {
	/// Compacts the given expanded document using this context.
	///
	/// A single node compacts to an object. Several nodes are wrapped in a
	/// `@graph` entry.
	pub fn compact(&self, expanded: &ExpandedDocument, options: &CompactionOptions) -> Value {
		let compactor = Compactor {
			context: self,
			inverse: InverseContext::new(self),
			options,
		};

		let mut nodes: Vec<_> = expanded
			.iter()
			.map(|node| compactor.compact_node(node))
			.collect();

		let mut result = Map::new();
		if options.emit_context {
			if let Some(source) = self.source() {
				result.insert(Keyword::Context.to_string(), source.clone());
			}
		}

		if nodes.len() == 1 {
			if let Some(node) = nodes.pop() {
				result.extend(node)
			}
		} else if !nodes.is_empty() {
			result.insert(
				compactor.inverse.alias(Keyword::Graph).to_owned(),
				Value::Array(nodes.into_iter().map(Value::Object).collect()),
			);
		}

		Value::Object(result)
	}
}

impl ExpandedDocument {
	/// Compacts this document using the given context.
	pub fn compact(&self, context: &ResolvedContext, options: &CompactionOptions) -> Value {
		context.compact(self, options)
	}
}

struct Compactor<'a> {
	context: &'a ResolvedContext,
	inverse: InverseContext,
	options: &'a CompactionOptions,
}

impl<'a> Compactor<'a> {
	fn compact_iri(&self, iri: &str, vocab: bool, document_relative: bool) -> String {
		self.inverse.compact_iri(
			self.context,
			iri,
			vocab,
			document_relative && self.options.compact_to_relative,
		)
	}

	fn alias(&self, keyword: Keyword) -> String {
		self.inverse.alias(keyword).to_owned()
	}

	fn compact_node(&self, node: &Map<String, Value>) -> Map<String, Value> {
		let mut entries: Vec<_> = node.iter().collect();
		if self.options.ordered {
			entries.sort_by(|(a, _), (b, _)| a.cmp(b))
		}

		let mut result = Map::new();
		for (key, value) in entries {
			match Keyword::try_from(key.as_str()) {
				Ok(Keyword::Id) => {
					let value = match value {
						Value::String(id) => Value::String(self.compact_iri(id, false, true)),
						other => other.clone(),
					};
					result.insert(self.alias(Keyword::Id), value);
				}
				Ok(Keyword::Type) => {
					let mut types: Vec<_> = match value {
						Value::Array(items) => items.iter().collect(),
						other => vec![other],
					}
					.into_iter()
					.map(|ty| match ty {
						Value::String(ty) => Value::String(self.compact_iri(ty, true, true)),
						other => other.clone(),
					})
					.collect();

					let value = if self.options.compact_arrays && types.len() == 1 {
						types.remove(0)
					} else {
						Value::Array(types)
					};
					result.insert(self.alias(Keyword::Type), value);
				}
				Ok(keyword @ (Keyword::Graph | Keyword::Set | Keyword::List)) => {
					let items = match value {
						Value::Array(items) => items.iter().map(|item| self.compact_item(item, None)).collect(),
						other => vec![self.compact_item(other, None)],
					};
					result.insert(self.alias(keyword), Value::Array(items));
				}
				Ok(keyword) => {
					result.insert(self.alias(keyword), value.clone());
				}
				Err(_) => {
					let (key, value) = self.compact_property(key, value);
					result.insert(key, value);
				}
			}
		}

		result
	}

	fn compact_property(&self, iri: &str, value: &Value) -> (String, Value) {
		let items: Vec<&Value> = match value {
			Value::Array(items) => items.iter().collect(),
			other => vec![other],
		};

		let single = if items.len() == 1 {
			items.first().copied()
		} else {
			None
		};
		let list = single
			.and_then(|item| item.get(Keyword::List.as_str()))
			.and_then(Value::as_array);

		let (selection, container) = match list {
			Some(list) => (selection_of(list.iter()), Some(Container::List)),
			None => (selection_of(items.iter().copied()), None),
		};

		let term = self.inverse.select(iri, &selection, container);
		let definition = term.and_then(|term| self.context.term(term));
		let key = match term {
			Some(term) => term.to_owned(),
			None => self.compact_iri(iri, true, false),
		};

		let container = definition.and_then(TermDefinition::container);
		let value = match (list, container) {
			(Some(list), Some(Container::List)) => Value::Array(
				list.iter()
					.map(|item| self.compact_item(item, definition))
					.collect(),
			),
			_ => {
				let mut compacted: Vec<_> = items
					.into_iter()
					.map(|item| self.compact_item(item, definition))
					.collect();

				if container.is_none() && self.options.compact_arrays && compacted.len() == 1 {
					compacted.remove(0)
				} else {
					Value::Array(compacted)
				}
			}
		};

		(key, value)
	}

	fn compact_item(&self, item: &Value, definition: Option<&TermDefinition>) -> Value {
		let type_mapping = definition.and_then(TermDefinition::type_mapping);

		let Value::Object(entries) = item else {
			return item.clone();
		};

		if let Some(value) = entries.get(Keyword::Value.as_str()) {
			let ty = entries.get(Keyword::Type.as_str()).and_then(Value::as_str);
			let simple = entries
				.keys()
				.all(|k| k == Keyword::Value.as_str() || k == Keyword::Type.as_str());

			if simple {
				match (type_mapping, ty) {
					(Some(TypeMapping::Literal(expected)), Some(ty))
						if self.context.expand_iri(expected, false, true).as_deref() == Some(ty) =>
					{
						return value.clone()
					}
					(None, None) => return value.clone(),
					_ => (),
				}
			}

			let mut object = Map::new();
			for (key, entry) in entries {
				match Keyword::try_from(key.as_str()) {
					Ok(Keyword::Type) => {
						let entry = match entry {
							Value::String(ty) => Value::String(self.compact_iri(ty, true, false)),
							other => other.clone(),
						};
						object.insert(self.alias(Keyword::Type), entry);
					}
					Ok(keyword) => {
						object.insert(self.alias(keyword), entry.clone());
					}
					Err(_) => {
						object.insert(self.compact_iri(key, true, false), entry.clone());
					}
				}
			}

			return Value::Object(object);
		}

		if let Some(Value::String(id)) = reference_id(item) {
			return match type_mapping {
				Some(TypeMapping::Id) => Value::String(self.compact_iri(id, false, true)),
				Some(TypeMapping::Vocab) => Value::String(self.compact_iri(id, true, true)),
				_ => {
					let mut object = Map::new();
					object.insert(
						self.alias(Keyword::Id),
						Value::String(self.compact_iri(id, false, true)),
					);
					Value::Object(object)
				}
			};
		}

		if let Some(list) = entries.get(Keyword::List.as_str()) {
			let items = match list {
				Value::Array(items) => items.iter().map(|item| self.compact_item(item, definition)).collect(),
				other => vec![self.compact_item(other, definition)],
			};

			let mut object = Map::new();
			object.insert(self.alias(Keyword::List), Value::Array(items));
			return Value::Object(object);
		}

		Value::Object(self.compact_node(entries))
	}
}

/// Returns the `@id` of a reference, an object with no other entry.
fn reference_id(item: &Value) -> Option<&Value> {
	match item {
		Value::Object(entries) if entries.len() == 1 => entries.get(Keyword::Id.as_str()),
		_ => None,
	}
}

/// Kind of values held by a property.
fn selection_of<'v>(mut items: impl Iterator<Item = &'v Value>) -> Selection {
	let Some(first) = items.next() else {
		return Selection::Plain;
	};

	let literal_type = |item: &Value| match item {
		Value::Object(entries) if entries.contains_key(Keyword::Value.as_str()) => Some(
			entries
				.get(Keyword::Type.as_str())
				.and_then(Value::as_str)
				.map(ToOwned::to_owned),
		),
		_ => None,
	};

	if reference_id(first).is_some() {
		if items.all(|item| reference_id(item).is_some()) {
			Selection::Reference
		} else {
			Selection::Plain
		}
	} else {
		match literal_type(first) {
			Some(Some(ty)) if items.all(|item| literal_type(item) == Some(Some(ty.clone()))) => {
				Selection::Literal(ty)
			}
			_ => Selection::Plain,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ExpansionOptions;
	use serde_json::json;
	use static_iref::iri;

	fn context(definition: Value) -> ResolvedContext {
		let mut ctx = ResolvedContext::from_definition(
			definition.as_object().unwrap(),
			Some(iri!("https://example.org/experiment/historical.json")),
			false,
			|_| (),
		);
		ctx.set_source(definition);
		ctx
	}

	fn round_trip(ctx: &ResolvedContext, document: Value) -> Value {
		let expanded = ctx.expand(document.as_object().unwrap(), &ExpansionOptions::default());
		ctx.compact(&expanded, &CompactionOptions::default().without_context())
	}

	#[test]
	fn round_trip_terms() {
		let ctx = context(json!({
			"id": "@id",
			"type": "@type",
			"schema": "https://schema.org/",
			"xsd": "http://www.w3.org/2001/XMLSchema#",
			"name": "schema:name",
			"parent": { "@id": "schema:parent", "@type": "@id" },
			"activity": { "@id": "schema:activity", "@type": "@id" },
			"children": { "@id": "schema:children", "@type": "@id", "@container": "@set" },
			"steps": { "@id": "schema:steps", "@container": "@list" },
			"start": { "@id": "schema:startDate", "@type": "xsd:integer" },
			"kind": { "@id": "schema:kind", "@type": "@vocab" }
		}));

		let document = json!({
			"id": "historical",
			"type": "experiment",
			"name": "Historical",
			"parent": "schema:Thing",
			"activity": "../activity/cmip",
			"children": ["a", "../sub-experiment/none"],
			"steps": ["spin-up", "run"],
			"start": 1850,
			"kind": "schema:Model",
			"extra": { "name": "nested", "parent": "b" }
		});

		assert_eq!(round_trip(&ctx, document.clone()), document)
	}

	#[test]
	fn mismatching_values_stay_expanded() {
		let ctx = context(json!({
			"parent": { "@id": "https://schema.org/parent", "@type": "@id" }
		}));

		let expanded = ExpandedDocument::from_json(json!([{
			"https://schema.org/parent": [{ "@value": "not a reference" }]
		}]))
		.unwrap();

		assert_eq!(
			ctx.compact(&expanded, &CompactionOptions::default().without_context()),
			json!({ "parent": { "@value": "not a reference" } })
		)
	}

	#[test]
	fn graph_and_context() {
		let ctx = context(json!({ "id": "@id" }));
		let expanded = ExpandedDocument::from_json(json!([
			{ "@id": "https://example.org/experiment/a" },
			{ "@id": "https://example.org/experiment/b" }
		]))
		.unwrap();

		assert_eq!(
			ctx.compact(&expanded, &CompactionOptions::default()),
			json!({
				"@context": { "id": "@id" },
				"@graph": [{ "id": "a" }, { "id": "b" }]
			})
		)
	}

	#[test]
	fn arrays_are_kept_on_request() {
		let ctx = context(json!({ "name": "https://schema.org/name" }));
		let expanded = ExpandedDocument::from_json(json!([
			{ "https://schema.org/name": [{ "@value": "x" }] }
		]))
		.unwrap();

		let options = CompactionOptions {
			compact_arrays: false,
			..CompactionOptions::default().without_context()
		};
		assert_eq!(ctx.compact(&expanded, &options), json!({ "name": ["x"] }))
	}
}
