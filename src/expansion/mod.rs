//! Expansion algorithm.
//!
//! Rewrites a compacted document into a list of node objects whose keys are
//! absolute IRIs (or keywords) and whose values are value objects
//! (`{"@value": ...}`), references (`{"@id": ...}`), lists or nested nodes.
use serde_json::{Map, Value};

use crate::{
	context::{is_absolute, resolve_context, ResolvedContext, TermDefinition},
	Container, Document, Error, Keyword, ProcessingEnvironment, TypeMapping,
};

mod expanded;
mod options;

pub use expanded::*;
pub use options::*;

impl Document {
	/// Resolves the `@context` of this document against its URL.
	///
	/// A document without `@context` gets an empty context. A document that
	/// is not a JSON object is an error.
	pub async fn resolve_context(
		&self,
		env: &impl ProcessingEnvironment,
	) -> Result<ResolvedContext, Error> {
		self.as_object()?;
		match self.context() {
			Some(context) => resolve_context(context, self.url(), env).await,
			None => Ok(ResolvedContext::new(self.url().map(ToOwned::to_owned))),
		}
	}

	/// Expand this document with the default expansion options.
	///
	/// The environment loader is used to load the remote contexts referenced
	/// by the document.
	pub async fn expand(&self, env: &impl ProcessingEnvironment) -> Result<ExpandedDocument, Error> {
		self.expand_with(env, &ExpansionOptions::default()).await
	}

	/// Expand this document with the given options.
	pub async fn expand_with(
		&self,
		env: &impl ProcessingEnvironment,
		options: &ExpansionOptions,
	) -> Result<ExpandedDocument, Error> {
		let document = self.as_object()?;
		let context = self.resolve_context(env).await?;
		Ok(context.expand(document, options))
	}
}

impl ResolvedContext {
	/// Expands the given document using this context.
	///
	/// The document `@context` entry is ignored: this context is used
	/// instead. A document made only of `@context` and `@graph` entries
	/// expands to one node per object of the graph.
	pub fn expand(&self, document: &Map<String, Value>, options: &ExpansionOptions) -> ExpandedDocument {
		let expander = Expander {
			context: self,
			options,
		};

		let mut graph = None;
		let mut graph_only = true;
		for (key, value) in document {
			match expander.keyword(key) {
				Some(Keyword::Graph) => graph = Some(value),
				Some(Keyword::Context) => (),
				_ => graph_only = false,
			}
		}

		match graph {
			Some(graph) if graph_only => {
				let nodes = match graph {
					Value::Array(items) => items.iter().collect(),
					other => vec![other],
				};

				ExpandedDocument::new(
					nodes
						.into_iter()
						.filter_map(Value::as_object)
						.map(|node| expander.expand_node(node))
						.collect(),
				)
			}
			_ => ExpandedDocument::new(vec![expander.expand_node(document)]),
		}
	}
}

struct Expander<'a> {
	context: &'a ResolvedContext,
	options: &'a ExpansionOptions,
}

impl<'a> Expander<'a> {
	fn keyword(&self, key: &str) -> Option<Keyword> {
		let iri = self.context.expand_iri(key, false, true)?;
		Keyword::try_from(iri.as_str()).ok()
	}

	/// Expands a key, following the expansion policy for undefined keys.
	fn expand_key(&self, key: &str) -> Option<String> {
		let iri = self.context.expand_iri(key, false, true)?;

		if iri != key || is_absolute(key) || self.context.contains_term(key) {
			return Some(iri);
		}

		if let Some(namespace) = &self.options.default_namespace {
			return Some(format!("{namespace}{key}"));
		}

		if self.options.base_relative_keys {
			if let Some(iri) = self.context.expand_iri(key, true, true).filter(|iri| is_absolute(iri)) {
				return Some(iri);
			}
		}

		match self.options.policy {
			ExpansionPolicy::Relaxed => Some(iri),
			ExpansionPolicy::Standard if key.contains(':') => Some(iri),
			ExpansionPolicy::Standard => {
				log::debug!("dropping undefined key `{key}`");
				None
			}
		}
	}

	fn expand_node(&self, node: &Map<String, Value>) -> Map<String, Value> {
		let mut entries: Vec<_> = node.iter().collect();
		if self.options.ordered {
			entries.sort_by(|(a, _), (b, _)| a.cmp(b))
		}

		let mut result = Map::new();
		for (key, value) in entries {
			let Some(iri) = self.expand_key(key) else {
				continue;
			};

			match Keyword::try_from(iri.as_str()) {
				Ok(Keyword::Context) => (),
				Ok(Keyword::Id) => match value {
					Value::String(id) => {
						let id = self
							.context
							.expand_iri(id, true, false)
							.unwrap_or_else(|| id.clone());
						result.insert(iri, Value::String(id));
					}
					other => log::debug!("ignoring `{key}` entry of kind {}", crate::Kind::of(other)),
				},
				Ok(Keyword::Type) => {
					let types = match value {
						Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
						Value::String(ty) => vec![ty.as_str()],
						_ => Vec::new(),
					};

					let types = types.into_iter().map(|ty| {
						Value::String(
							self.context
								.expand_iri(ty, true, true)
								.unwrap_or_else(|| ty.to_owned()),
						)
					});

					append(&mut result, iri, types.collect())
				}
				Ok(Keyword::Graph | Keyword::Set) => {
					let items = self.expand_items(value, None);
					append(&mut result, iri, items)
				}
				Ok(Keyword::List) => {
					let items = self.expand_items(value, None);
					result.insert(iri, Value::Array(items));
				}
				Ok(_) => {
					result.insert(iri, value.clone());
				}
				Err(_) => {
					if value.is_null() {
						continue;
					}

					let definition = self.context.term(key);
					let mut items = self.expand_items(value, definition);
					if definition.and_then(TermDefinition::container) == Some(Container::List) {
						items = vec![list(items)]
					}

					append(&mut result, iri, items)
				}
			}
		}

		result
	}

	/// Expands a property value into a flat list of items.
	fn expand_items(&self, value: &Value, definition: Option<&TermDefinition>) -> Vec<Value> {
		match value {
			Value::Null => Vec::new(),
			Value::Array(items) => items
				.iter()
				.flat_map(|item| self.expand_items(item, definition))
				.collect(),
			other => vec![self.expand_item(other, definition)],
		}
	}

	fn expand_item(&self, value: &Value, definition: Option<&TermDefinition>) -> Value {
		let type_mapping = definition.and_then(TermDefinition::type_mapping);

		match value {
			Value::Object(entries) => {
				let keywords: Vec<_> = entries.keys().map(|k| (k, self.keyword(k))).collect();

				if keywords.iter().any(|(_, k)| *k == Some(Keyword::Value)) {
					self.expand_value_object(entries)
				} else if let Some((key, _)) = keywords.iter().find(|(_, k)| *k == Some(Keyword::List)) {
					list(self.expand_items(&entries[key.as_str()], None))
				} else {
					Value::Object(self.expand_node(entries))
				}
			}
			Value::String(s) => match type_mapping {
				Some(TypeMapping::Id) => reference(self.context.expand_iri(s, true, false), s),
				Some(TypeMapping::Vocab) => reference(self.context.expand_iri(s, true, true), s),
				Some(TypeMapping::Literal(ty)) => self.typed_value(value, ty),
				None => value_object(value.clone()),
			},
			other => match type_mapping {
				Some(TypeMapping::Literal(ty)) => self.typed_value(other, ty),
				_ => value_object(other.clone()),
			},
		}
	}

	fn typed_value(&self, value: &Value, ty: &str) -> Value {
		let ty = self
			.context
			.expand_iri(ty, false, true)
			.unwrap_or_else(|| ty.to_owned());

		let mut object = Map::new();
		object.insert(Keyword::Value.to_string(), value.clone());
		object.insert(Keyword::Type.to_string(), Value::String(ty));
		Value::Object(object)
	}

	/// Expands the keys of a value object, and its `@type`.
	fn expand_value_object(&self, entries: &Map<String, Value>) -> Value {
		let mut object = Map::new();
		for (key, value) in entries {
			match self.keyword(key) {
				Some(Keyword::Type) => {
					let value = match value {
						Value::String(ty) => Value::String(
							self.context
								.expand_iri(ty, false, true)
								.unwrap_or_else(|| ty.clone()),
						),
						other => other.clone(),
					};
					object.insert(Keyword::Type.to_string(), value);
				}
				Some(keyword) => {
					object.insert(keyword.to_string(), value.clone());
				}
				None => {
					if let Some(iri) = self.expand_key(key) {
						object.insert(iri, value.clone());
					}
				}
			}
		}

		Value::Object(object)
	}
}

fn append(node: &mut Map<String, Value>, key: String, items: Vec<Value>) {
	match node.get_mut(&key) {
		Some(Value::Array(existing)) => existing.extend(items),
		_ => {
			node.insert(key, Value::Array(items));
		}
	}
}

fn list(items: Vec<Value>) -> Value {
	let mut object = Map::new();
	object.insert(Keyword::List.to_string(), Value::Array(items));
	Value::Object(object)
}

fn value_object(value: Value) -> Value {
	let mut object = Map::new();
	object.insert(Keyword::Value.to_string(), value);
	Value::Object(object)
}

fn reference(iri: Option<String>, original: &str) -> Value {
	let mut object = Map::new();
	object.insert(
		Keyword::Id.to_string(),
		Value::String(iri.unwrap_or_else(|| original.to_owned())),
	);
	Value::Object(object)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use static_iref::iri;

	fn context(definition: Value) -> ResolvedContext {
		ResolvedContext::from_definition(
			definition.as_object().unwrap(),
			Some(iri!("https://example.org/experiment/historical.json")),
			false,
			|_| (),
		)
	}

	fn expand(context: &ResolvedContext, document: Value) -> Value {
		context
			.expand(document.as_object().unwrap(), &ExpansionOptions::default())
			.into_json()
	}

	#[test]
	fn linked_and_literal_values() {
		let ctx = context(json!({
			"id": "@id",
			"type": "@type",
			"schema": "https://schema.org/",
			"xsd": "http://www.w3.org/2001/XMLSchema#",
			"name": "schema:name",
			"parent": { "@id": "schema:parent", "@type": "@id" },
			"start": { "@id": "schema:startDate", "@type": "xsd:integer" }
		}));

		let expanded = expand(
			&ctx,
			json!({
				"@context": "ignored",
				"id": "historical",
				"type": "experiment",
				"name": "Historical",
				"parent": ["../activity/cmip", "schema:Thing"],
				"start": 1850,
				"comment": null
			}),
		);

		assert_eq!(
			expanded,
			json!([{
				"@id": "https://example.org/experiment/historical",
				"@type": ["https://example.org/experiment/experiment"],
				"https://schema.org/name": [{ "@value": "Historical" }],
				"https://schema.org/parent": [
					{ "@id": "https://example.org/activity/cmip" },
					{ "@id": "https://schema.org/Thing" }
				],
				"https://schema.org/startDate": [{
					"@value": 1850,
					"@type": "http://www.w3.org/2001/XMLSchema#integer"
				}]
			}])
		)
	}

	#[test]
	fn vocab_and_lists() {
		let ctx = context(json!({
			"@vocab": "https://example.org/vocab/",
			"kind": { "@type": "@vocab" },
			"members": { "@container": "@list" }
		}));

		let expanded = expand(&ctx, json!({ "kind": "Model", "members": ["a", "b"], "label": "x" }));

		assert_eq!(
			expanded,
			json!([{
				"https://example.org/vocab/kind": [{ "@id": "https://example.org/vocab/Model" }],
				"https://example.org/vocab/members": [{ "@list": [{ "@value": "a" }, { "@value": "b" }] }],
				"https://example.org/vocab/label": [{ "@value": "x" }]
			}])
		)
	}

	#[test]
	fn undefined_keys() {
		let ctx = context(json!({}));
		let document = json!({ "label": "x", "ex:other": 1 });

		assert_eq!(
			expand(&ctx, document.clone()),
			json!([{ "label": [{ "@value": "x" }], "ex:other": [{ "@value": 1 }] }])
		);

		let standard = ctx
			.expand(
				document.as_object().unwrap(),
				&ExpansionOptions::default().with_policy(ExpansionPolicy::Standard),
			)
			.into_json();
		assert_eq!(standard, json!([{ "ex:other": [{ "@value": 1 }] }]));

		let namespaced = ctx
			.expand(
				document.as_object().unwrap(),
				&ExpansionOptions::default().with_default_namespace("https://example.org/ns/"),
			)
			.into_json();
		assert_eq!(
			namespaced,
			json!([{
				"https://example.org/ns/label": [{ "@value": "x" }],
				"ex:other": [{ "@value": 1 }]
			}])
		);

		let based = ctx
			.expand(
				document.as_object().unwrap(),
				&ExpansionOptions::default().with_base_relative_keys(),
			)
			.into_json();
		assert_eq!(
			based,
			json!([{
				"https://example.org/experiment/label": [{ "@value": "x" }],
				"ex:other": [{ "@value": 1 }]
			}])
		)
	}

	#[test]
	fn graph_documents() {
		let ctx = context(json!({ "id": "@id", "graph": "@graph" }));
		let expanded = expand(
			&ctx,
			json!({ "@context": {}, "graph": [{ "id": "a" }, { "id": "b" }, 12] }),
		);

		assert_eq!(
			expanded,
			json!([
				{ "@id": "https://example.org/experiment/a" },
				{ "@id": "https://example.org/experiment/b" }
			])
		)
	}
}
