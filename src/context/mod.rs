//! Context types and resolution.
use indexmap::IndexMap;
use iref::{Iri, IriBuf, IriRef};
use serde_json::{Map, Value};

mod definition;
mod inverse;
mod iri;
mod linked;
mod resolve;
mod stack;

pub use definition::*;
pub use inverse::*;
pub use iri::*;
pub use linked::*;
pub use resolve::*;
pub use stack::ProcessingStack;

use crate::{is_keyword_like, Keyword, Kind, Nullable, Warning};

/// Unresolved `@context` value.
#[derive(Clone, PartialEq, Debug)]
pub enum ContextRef {
	/// `null`: contributes nothing.
	Null,

	/// URL of a remote context, possibly relative.
	Url(String),

	/// Inline context definition.
	Inline(Map<String, Value>),

	/// Array of contexts, merged left to right.
	Sequence(Vec<ContextRef>),
}

impl TryFrom<&Value> for ContextRef {
	type Error = Kind;

	fn try_from(value: &Value) -> Result<Self, Kind> {
		match value {
			Value::Null => Ok(Self::Null),
			Value::String(url) => Ok(Self::Url(url.clone())),
			Value::Object(definition) => Ok(Self::Inline(definition.clone())),
			Value::Array(items) => items
				.iter()
				.map(Self::try_from)
				.collect::<Result<_, _>>()
				.map(Self::Sequence),
			other => Err(Kind::of(other)),
		}
	}
}

/// Flattened context.
///
/// Maps each term to exactly one definition, in the order in which terms were
/// first defined. Produced by [`resolve_context`] and read by the expansion,
/// compaction, classification and validation algorithms.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ResolvedContext {
	terms: IndexMap<String, TermDefinition>,

	// Explicit `@base` entry.
	base: Option<Nullable<IriBuf>>,

	// Expanded `@vocab` entry.
	vocab: Option<Nullable<String>>,

	// URL the context was resolved against.
	document_url: Option<IriBuf>,

	// `@context` value this context was resolved from.
	source: Option<Value>,
}

impl ResolvedContext {
	/// Creates an empty context resolved against the given URL.
	pub fn new(document_url: Option<IriBuf>) -> Self {
		Self {
			document_url,
			..Self::default()
		}
	}

	/// Reads an inline context definition.
	///
	/// The `@base` entry is only honored when `remote` is `false`. Invalid
	/// entries are reported through `warn` and skipped.
	pub fn from_definition(
		definition: &Map<String, Value>,
		base_url: Option<&Iri>,
		remote: bool,
		mut warn: impl FnMut(Warning),
	) -> Self {
		let mut result = Self::new(base_url.map(ToOwned::to_owned));
		let mut vocab = None;

		for (key, value) in definition {
			match Keyword::try_from(key.as_str()) {
				Ok(Keyword::Base) => {
					if !remote {
						result.base = match value {
							Value::Null => Some(Nullable::Null),
							Value::String(iri) => match resolve_iri_str(iri, base_url) {
								Some(iri) => Some(Nullable::Some(iri)),
								None => {
									warn(Warning::MalformedIri(iri.clone()));
									None
								}
							},
							other => {
								warn(Warning::InvalidKeywordValue("@base", Kind::of(other)));
								None
							}
						}
					}
				}
				Ok(Keyword::Vocab) => match value {
					Value::Null => vocab = Some(Nullable::Null),
					Value::String(iri) => vocab = Some(Nullable::Some(iri.as_str())),
					other => warn(Warning::InvalidKeywordValue("@vocab", Kind::of(other))),
				},
				Ok(_) => (),
				Err(_) if is_keyword_like(key) => {
					// `@version`, `@protected`, `@propagate`, `@import`...
					log::debug!("ignoring context entry `{key}`")
				}
				Err(_) => match TermDefinition::from_json(value) {
					Ok(definition) => {
						result.terms.insert(key.clone(), definition);
					}
					Err(kind) => warn(Warning::InvalidTermDefinition(key.clone(), kind)),
				},
			}
		}

		// Terms are all known at this point, so `@vocab` may use a prefix.
		let vocab = vocab.map(|vocab| {
			vocab.map(|iri| {
				result
					.expand_iri(iri, true, false)
					.unwrap_or_else(|| iri.to_owned())
			})
		});
		result.vocab = vocab;

		result.source = Some(Value::Object(definition.clone()));
		result
	}

	/// Merges `other` into this context.
	///
	/// Definitions of `other` win over the current ones. A re-defined term
	/// keeps its position.
	pub fn merge(&mut self, other: ResolvedContext) {
		for (term, definition) in other.terms {
			self.terms.insert(term, definition);
		}

		if other.base.is_some() {
			self.base = other.base
		}

		if other.vocab.is_some() {
			self.vocab = other.vocab
		}
	}

	/// Checks if the context defines no term.
	pub fn is_empty(&self) -> bool {
		self.terms.is_empty()
	}

	pub fn len(&self) -> usize {
		self.terms.len()
	}

	/// Returns the definition of the given term.
	pub fn term(&self, term: &str) -> Option<&TermDefinition> {
		self.terms.get(term)
	}

	/// Checks if the given term is defined (even to `null`).
	pub fn contains_term(&self, term: &str) -> bool {
		self.terms.contains_key(term)
	}

	/// Iterates over the term definitions, in definition order.
	pub fn terms(&self) -> indexmap::map::Iter<'_, String, TermDefinition> {
		self.terms.iter()
	}

	/// Defines the given term, replacing any previous definition.
	pub fn set_term(&mut self, term: String, definition: TermDefinition) -> Option<TermDefinition> {
		self.terms.insert(term, definition)
	}

	/// Base IRI used to resolve document-relative references.
	///
	/// This is the explicit `@base` entry if any, or the URL the context was
	/// resolved against.
	pub fn base_iri(&self) -> Option<&Iri> {
		match &self.base {
			Some(Nullable::Some(base)) => Some(base.as_iri()),
			Some(Nullable::Null) => None,
			None => self.document_url.as_deref(),
		}
	}

	pub fn document_url(&self) -> Option<&Iri> {
		self.document_url.as_deref()
	}

	pub fn set_document_url(&mut self, url: Option<IriBuf>) {
		self.document_url = url
	}

	/// Explicit `@base` entry.
	pub fn base(&self) -> Option<Nullable<&Iri>> {
		self.base.as_ref().map(|base| base.as_ref().map(|b| b.as_iri()))
	}

	/// Vocabulary mapping (expanded `@vocab` entry).
	pub fn vocab(&self) -> Option<&str> {
		match &self.vocab {
			Some(Nullable::Some(vocab)) => Some(vocab),
			_ => None,
		}
	}

	/// Returns the `@context` value this context was resolved from.
	pub fn source(&self) -> Option<&Value> {
		self.source.as_ref()
	}

	pub(crate) fn set_source(&mut self, source: Value) {
		self.source = Some(source)
	}

	/// Converts the flattened context into an inline context definition.
	pub fn to_json(&self) -> Map<String, Value> {
		let mut map = Map::new();

		if let Some(base) = &self.base {
			map.insert(
				Keyword::Base.to_string(),
				base.as_ref().map(|b| b.as_str()).to_json(),
			);
		}

		if let Some(vocab) = &self.vocab {
			map.insert(Keyword::Vocab.to_string(), vocab.as_ref().to_json());
		}

		for (term, definition) in &self.terms {
			map.insert(term.clone(), definition.to_json());
		}

		map
	}
}

/// Resolves a possibly relative IRI string against `base`.
fn resolve_iri_str(value: &str, base: Option<&Iri>) -> Option<IriBuf> {
	let iri_ref = IriRef::new(value).ok()?;
	resolve_iri(iri_ref, base)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use static_iref::iri;

	fn inline(value: Value) -> ResolvedContext {
		ResolvedContext::from_definition(
			value.as_object().unwrap(),
			Some(iri!("https://example.org/data/doc.json")),
			false,
			|w| panic!("unexpected warning: {w}"),
		)
	}

	#[test]
	fn redefined_term_keeps_position() {
		let mut ctx = inline(json!({ "a": "https://example.org/a", "b": "https://example.org/b" }));
		ctx.merge(inline(json!({ "a": "https://example.org/other" })));

		let terms: Vec<_> = ctx.terms().map(|(t, _)| t.as_str()).collect();
		assert_eq!(terms, ["a", "b"]);
		assert_eq!(ctx.term("a").unwrap().id(), Some("https://example.org/other"))
	}

	#[test]
	fn base_is_resolved() {
		let ctx = inline(json!({ "@base": "../root/" }));
		assert_eq!(
			ctx.base_iri().map(Iri::as_str),
			Some("https://example.org/root/")
		)
	}

	#[test]
	fn remote_base_is_ignored() {
		let ctx = ResolvedContext::from_definition(
			json!({ "@base": "https://other.org/" }).as_object().unwrap(),
			Some(iri!("https://example.org/context.json")),
			true,
			|_| (),
		);
		assert_eq!(ctx.base(), None);
		assert_eq!(
			ctx.base_iri().map(Iri::as_str),
			Some("https://example.org/context.json")
		)
	}

	#[test]
	fn vocab_may_use_prefix() {
		let ctx = inline(json!({ "schema": "https://schema.org/", "@vocab": "schema:" }));
		assert_eq!(ctx.vocab(), Some("https://schema.org/"))
	}

	#[test]
	fn invalid_term_definition_is_skipped() {
		let mut warnings = Vec::new();
		let ctx = ResolvedContext::from_definition(
			json!({ "a": 12, "b": "https://example.org/b", "@version": 1.1 })
				.as_object()
				.unwrap(),
			None,
			false,
			|w| warnings.push(w),
		);

		assert_eq!(ctx.len(), 1);
		assert_eq!(
			warnings,
			[Warning::InvalidTermDefinition("a".to_string(), Kind::Number)]
		)
	}

	#[test]
	fn context_ref_kinds() {
		assert_eq!(
			ContextRef::try_from(&json!(["a.json", null, {}])),
			Ok(ContextRef::Sequence(vec![
				ContextRef::Url("a.json".to_string()),
				ContextRef::Null,
				ContextRef::Inline(Map::new())
			]))
		);
		assert_eq!(ContextRef::try_from(&json!(true)), Err(Kind::Boolean))
	}
}
