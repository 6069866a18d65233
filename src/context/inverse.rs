use hashbrown::HashMap;

use super::{relative_to_base, ResolvedContext, TermDefinition};
use crate::{Container, Keyword, TypeMapping};

/// Kind of values a term is meant to hold.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Selection {
	/// References (`{"@id": ...}`).
	Reference,

	/// Literals of the given (expanded) datatype.
	Literal(String),

	/// Anything else.
	Plain,
}

impl Selection {
	fn of(context: &ResolvedContext, definition: &TermDefinition) -> Self {
		match definition.type_mapping() {
			Some(TypeMapping::Id | TypeMapping::Vocab) => Self::Reference,
			Some(TypeMapping::Literal(ty)) => Self::Literal(
				context
					.expand_iri(ty, false, true)
					.unwrap_or_else(|| ty.clone()),
			),
			None => Self::Plain,
		}
	}
}

struct Candidate {
	term: String,
	selection: Selection,
	container: Option<Container>,
}

/// Inverse context.
///
/// Maps expanded IRIs back to the terms defining them, and keywords back to
/// their aliases. Used to compact documents.
pub struct InverseContext {
	by_iri: HashMap<String, Vec<Candidate>>,
	aliases: HashMap<String, String>,
	prefixes: Vec<(String, String)>,
}

impl InverseContext {
	pub fn new(context: &ResolvedContext) -> Self {
		let mut result = Self {
			by_iri: HashMap::new(),
			aliases: HashMap::new(),
			prefixes: Vec::new(),
		};

		for (term, definition) in context.terms() {
			if matches!(definition, TermDefinition::Null) {
				continue;
			}

			let Some(iri) = context.expand_iri(term, false, true) else {
				continue;
			};

			if Keyword::try_from(iri.as_str()).is_ok() {
				result.aliases.entry(iri).or_insert_with(|| term.clone());
				continue;
			}

			if definition.is_prefix() {
				result.prefixes.push((term.clone(), iri.clone()))
			}

			result.by_iri.entry(iri).or_default().push(Candidate {
				term: term.clone(),
				selection: Selection::of(context, definition),
				container: definition.container(),
			})
		}

		result
	}

	/// Returns the alias of the given keyword, or the keyword itself.
	pub fn alias(&self, keyword: Keyword) -> &str {
		self.aliases
			.get(keyword.as_str())
			.map(String::as_str)
			.unwrap_or(keyword.as_str())
	}

	/// Selects the best term to compact a property.
	///
	/// Only `@list` containers are selected for lists, and only for lists.
	/// Among those, terms matching both the value selection and container
	/// come first, then terms matching the selection, then terms without type
	/// mapping. Falls back to the first remaining term defined for `iri`.
	pub fn select(&self, iri: &str, selection: &Selection, container: Option<Container>) -> Option<&str> {
		let is_list = container == Some(Container::List);
		let candidates: Vec<&Candidate> = self
			.by_iri
			.get(iri)?
			.iter()
			.filter(|c| (c.container == Some(Container::List)) == is_list)
			.collect();

		let find = |f: &dyn Fn(&Candidate) -> bool| candidates.iter().copied().find(|c| f(c));

		find(&|c| c.selection == *selection && c.container == container)
			.or_else(|| find(&|c| c.selection == *selection))
			.or_else(|| find(&|c| c.selection == Selection::Plain && c.container == container))
			.or_else(|| find(&|c| c.selection == Selection::Plain))
			.or_else(|| candidates.first().copied())
			.map(|c| c.term.as_str())
	}

	/// Returns a term expanding exactly to `iri`, preferring terms without
	/// type mapping.
	pub fn term(&self, iri: &str) -> Option<&str> {
		let candidates = self.by_iri.get(iri)?;
		candidates
			.iter()
			.find(|c| c.selection == Selection::Plain)
			.or_else(|| candidates.first())
			.map(|c| c.term.as_str())
	}

	/// Compacts the given IRI.
	///
	/// With `vocab`, the IRI may compact to a term or be made relative to
	/// the vocabulary mapping. Then, with `document_relative`, a reference
	/// relative to the base IRI is tried, so a prefix covering the
	/// document's own location does not rewrite its relative links. Compact
	/// IRIs (`prefix:suffix`) come last.
	pub fn compact_iri(
		&self,
		context: &ResolvedContext,
		iri: &str,
		vocab: bool,
		document_relative: bool,
	) -> String {
		if vocab {
			if let Some(term) = self.term(iri) {
				return term.to_owned();
			}

			if let Some(suffix) = context.vocab().and_then(|v| iri.strip_prefix(v)) {
				if !suffix.is_empty() && !suffix.contains(':') && !context.contains_term(suffix) {
					return suffix.to_owned();
				}
			}
		}

		if document_relative {
			if let Some(relative) = context.base_iri().and_then(|base| relative_to_base(iri, base)) {
				return relative;
			}
		}

		let compact = self
			.prefixes
			.iter()
			.filter_map(|(term, prefix)| {
				let suffix = iri.strip_prefix(prefix.as_str())?;
				if suffix.is_empty() || suffix.starts_with("//") {
					None
				} else {
					Some(format!("{term}:{suffix}"))
				}
			})
			.filter(|candidate| !(vocab && context.contains_term(candidate)))
			.min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

		if let Some(compact) = compact {
			return compact;
		}

		iri.to_owned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use static_iref::iri;

	fn context() -> ResolvedContext {
		ResolvedContext::from_definition(
			json!({
				"type": "@type",
				"schema": "https://schema.org/",
				"parent": { "@id": "schema:parent", "@type": "@id" },
				"parent_name": "schema:parent",
				"list": { "@id": "schema:list", "@container": "@list" },
				"list_set": { "@id": "schema:list", "@container": "@set" }
			})
			.as_object()
			.unwrap(),
			Some(iri!("https://example.org/activity/cmip.json")),
			false,
			|_| (),
		)
	}

	#[test]
	fn selection_prefers_matching_term() {
		let ctx = context();
		let inverse = InverseContext::new(&ctx);

		assert_eq!(
			inverse.select("https://schema.org/parent", &Selection::Reference, None),
			Some("parent")
		);
		assert_eq!(
			inverse.select("https://schema.org/parent", &Selection::Plain, None),
			Some("parent_name")
		);
		assert_eq!(
			inverse.select("https://schema.org/list", &Selection::Plain, Some(Container::Set)),
			Some("list_set")
		)
	}

	#[test]
	fn keyword_aliases() {
		let inverse = InverseContext::new(&context());
		assert_eq!(inverse.alias(Keyword::Type), "type");
		assert_eq!(inverse.alias(Keyword::Id), "@id")
	}

	#[test]
	fn compact_iris() {
		let ctx = context();
		let inverse = InverseContext::new(&ctx);

		assert_eq!(
			inverse.compact_iri(&ctx, "https://schema.org/Thing", true, false),
			"schema:Thing"
		);
		assert_eq!(
			inverse.compact_iri(&ctx, "https://example.org/activity/cmip", false, true),
			"cmip"
		);
		assert_eq!(
			inverse.compact_iri(&ctx, "https://example.org/other/cmip", false, true),
			"../other/cmip"
		);
		assert_eq!(
			inverse.compact_iri(&ctx, "https://other.org/activity/cmip", false, true),
			"https://other.org/activity/cmip"
		)
	}

	#[test]
	fn relative_form_wins_over_prefixes() {
		let ctx = ResolvedContext::from_definition(
			json!({ "ex": "https://example.org/" }).as_object().unwrap(),
			Some(iri!("https://example.org/activity/cmip.json")),
			false,
			|_| (),
		);
		let inverse = InverseContext::new(&ctx);

		assert_eq!(
			inverse.compact_iri(&ctx, "https://example.org/activity/cmip", false, true),
			"cmip"
		);
		assert_eq!(
			inverse.compact_iri(&ctx, "https://example.org/activity/cmip", true, false),
			"ex:activity/cmip"
		)
	}
}
