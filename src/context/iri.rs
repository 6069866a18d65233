use iref::{Iri, IriBuf, IriRef};

use super::{ResolvedContext, TermDefinition};
use crate::{is_keyword_like, Keyword};

/// Maximum number of term indirections followed while expanding an IRI.
const MAX_INDIRECTIONS: usize = 16;

/// Resolve `iri_ref` against the given base IRI.
pub fn resolve_iri(iri_ref: &IriRef, base_iri: Option<&Iri>) -> Option<IriBuf> {
	match base_iri {
		Some(base_iri) => Some(iri_ref.resolved(base_iri)),
		None => iri_ref.as_iri().map(ToOwned::to_owned),
	}
}

/// Checks if the given string is an absolute IRI or a blank node identifier.
pub fn is_absolute(value: &str) -> bool {
	value.starts_with("_:") || Iri::new(value).is_ok()
}

/// Returns `iri` as a reference relative to `base`.
///
/// A first segment containing a `:` is prefixed with `./` so it is not read
/// as a scheme. Returns `None` when `iri` is not an absolute IRI or shares
/// no scheme and authority with `base`. The result resolves back to `iri`
/// against `base`.
pub fn relative_to_base(iri: &str, base: &Iri) -> Option<String> {
	let iri = Iri::new(iri).ok()?;
	let relative = iri.relative_to(base);
	let relative = relative.as_str();
	if relative == iri.as_str() {
		return None;
	}

	let first_segment = relative.split(['/', '?', '#']).next().unwrap_or(relative);
	let relative = if first_segment.contains(':') {
		format!("./{relative}")
	} else {
		relative.to_owned()
	};

	let resolved = IriRef::new(relative.as_str()).ok()?.resolved(base);
	(resolved.as_str() == iri.as_str()).then_some(relative)
}

impl ResolvedContext {
	/// Expands the given IRI, compact IRI, term or keyword.
	///
	/// When `vocab` is `true`, terms and the `@vocab` mapping are used. When
	/// `document_relative` is `true`, relative references are resolved
	/// against the base IRI. Anything else is returned as is.
	///
	/// Returns `None` for unknown keyword-like values and terms explicitly
	/// defined to `null`.
	pub fn expand_iri(&self, value: &str, document_relative: bool, vocab: bool) -> Option<String> {
		self.expand_iri_at(value, document_relative, vocab, 0)
	}

	fn expand_iri_at(
		&self,
		value: &str,
		document_relative: bool,
		vocab: bool,
		depth: usize,
	) -> Option<String> {
		if Keyword::try_from(value).is_ok() {
			return Some(value.to_owned());
		}

		if is_keyword_like(value) {
			return None;
		}

		if vocab && depth < MAX_INDIRECTIONS {
			match self.term(value) {
				Some(TermDefinition::Null) => return None,
				Some(definition) => {
					if let Some(id) = definition.id().filter(|id| *id != value) {
						return self.expand_iri_at(id, false, true, depth + 1);
					}
				}
				None => (),
			}
		}

		if let Some((prefix, suffix)) = value.split_once(':') {
			if prefix == "_" || suffix.starts_with("//") {
				return Some(value.to_owned());
			}

			if depth < MAX_INDIRECTIONS {
				if let Some(definition) = self.term(prefix) {
					if definition.is_prefix() {
						let prefix_iri = definition.id().unwrap_or(prefix);
						if prefix_iri != prefix {
							let prefix_iri = self.expand_iri_at(prefix_iri, false, true, depth + 1)?;
							return Some(format!("{prefix_iri}{suffix}"));
						}
					}
				}
			}

			if Iri::new(value).is_ok() {
				return Some(value.to_owned());
			}
		}

		if vocab {
			if let Some(vocab) = self.vocab() {
				return Some(format!("{vocab}{value}"));
			}
		}

		if document_relative {
			if let Some(base) = self.base_iri() {
				if let Ok(iri_ref) = IriRef::new(value) {
					return Some(iri_ref.resolved(base).to_string());
				}
			}
		}

		Some(value.to_owned())
	}
}

impl TermDefinition {
	/// Checks if this definition can be used as the prefix of a compact IRI.
	///
	/// Simple definitions qualify when their IRI ends with a general
	/// delimiter. Expanded definitions qualify when `@prefix` is `true`, or
	/// when it is absent and the definition has no type mapping.
	pub fn is_prefix(&self) -> bool {
		let ends_with_delimiter =
			|iri: &str| !is_keyword_like(iri) && iri.ends_with([':', '/', '?', '#', '[', ']', '@']);

		match self {
			Self::Null => false,
			Self::Simple(iri) => ends_with_delimiter(iri),
			Self::Expanded(def) => def.prefix.unwrap_or_else(|| {
				def.type_.is_none() && def.id.as_deref().map(ends_with_delimiter).unwrap_or(false)
			}),
		}
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
				"id": "@id",
				"schema": "https://schema.org/",
				"name": "schema:name",
				"alias": "name",
				"nothing": null,
				"parent": { "@id": "schema:parent", "@type": "@id" }
			})
			.as_object()
			.unwrap(),
			Some(iri!("https://example.org/activity/cmip.json")),
			false,
			|_| (),
		)
	}

	#[test]
	fn expand_terms() {
		let ctx = context();
		assert_eq!(ctx.expand_iri("id", false, true).as_deref(), Some("@id"));
		assert_eq!(
			ctx.expand_iri("alias", false, true).as_deref(),
			Some("https://schema.org/name")
		);
		assert_eq!(
			ctx.expand_iri("parent", false, true).as_deref(),
			Some("https://schema.org/parent")
		);
		assert_eq!(ctx.expand_iri("nothing", false, true), None);
		assert_eq!(ctx.expand_iri("@unknown", false, true), None)
	}

	#[test]
	fn expand_compact_and_relative_iris() {
		let ctx = context();
		assert_eq!(
			ctx.expand_iri("schema:Thing", true, false).as_deref(),
			Some("https://schema.org/Thing")
		);
		assert_eq!(
			ctx.expand_iri("urn:uuid:1234", true, false).as_deref(),
			Some("urn:uuid:1234")
		);
		assert_eq!(
			ctx.expand_iri("cmip", true, false).as_deref(),
			Some("https://example.org/activity/cmip")
		);
		assert_eq!(ctx.expand_iri("cmip", false, true).as_deref(), Some("cmip"))
	}

	#[test]
	fn relative_forms() {
		let base = iri!("https://example.org/activity/cmip.json");
		assert_eq!(
			relative_to_base("https://example.org/activity/cmip", base).as_deref(),
			Some("cmip")
		);
		assert_eq!(
			relative_to_base("https://example.org/activity/a/b", base).as_deref(),
			Some("a/b")
		);
		assert_eq!(
			relative_to_base("https://example.org/other/cmip", base).as_deref(),
			Some("../other/cmip")
		);
		assert_eq!(
			relative_to_base("https://example.org/a/b/c", iri!("https://example.org/a/x/y/doc.json"))
				.as_deref(),
			Some("../../b/c")
		);
		assert_eq!(relative_to_base("https://other.org/activity/cmip", base), None);
		assert_eq!(relative_to_base("not an iri", base), None);
		assert_eq!(
			relative_to_base("https://example.org/activity/x:y", base).as_deref(),
			Some("./x:y")
		)
	}
}
