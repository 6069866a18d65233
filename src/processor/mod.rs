//! Linked document processor.
//!
//! The [`Processor`] fetches a document, resolves its context, expands it,
//! substitutes the linked documents it references and compacts the result
//! back with the context of the requested document.
use iref::{Iri, IriBuf};
use serde_json::Value;

use crate::{
	context::{LinkedFields, ResolvedContext},
	normalize::normalize_document,
	DocumentCache, Error, ExpandedDocument, Loader, ProcessingEnvironment, Session, Warning,
};

mod options;
mod substitute;

pub use options::*;
pub use substitute::reference_url;

/// Output of the [`Processor`].
#[derive(Debug, Clone)]
pub struct Processed {
	/// Compacted object, or expanded array if compaction is disabled.
	pub document: Value,

	/// Resolved context of the requested document.
	pub context: ResolvedContext,

	/// Warnings raised while processing.
	pub warnings: Vec<Warning>,
}

impl Processed {
	/// Linked fields of the requested document context.
	pub fn linked_fields(&self) -> LinkedFields {
		self.context.linked_fields()
	}
}

/// Linked document processor.
///
/// Each top-level call runs in its own [`Session`], with a fresh document
/// cache unless one is shared with [`Processor::with_cache`].
pub struct Processor<L> {
	loader: L,
	options: Options,
	cache: Option<DocumentCache>,
}

impl<L> Processor<L> {
	pub fn new(loader: L) -> Self {
		Self::new_using(loader, Options::default())
	}

	pub fn new_using(loader: L, options: Options) -> Self {
		Self {
			loader,
			options,
			cache: None,
		}
	}

	/// Shares the given cache between all the calls of this processor.
	pub fn with_cache(self, cache: DocumentCache) -> Self {
		Self {
			cache: Some(cache),
			..self
		}
	}

	pub fn options(&self) -> &Options {
		&self.options
	}

	pub fn loader(&self) -> &L {
		&self.loader
	}

	/// Starts a new session.
	pub fn session(&self) -> Session<&L> {
		Session::with_options(
			&self.loader,
			self.cache.clone().unwrap_or_default(),
			self.options.cache_options(),
		)
	}
}

impl<L: Loader> Processor<L> {
	/// Fetches and processes the document behind `url`.
	///
	/// Fails only if the document itself cannot be loaded, is not an object
	/// or has an invalid top-level `@context`. Every other problem is
	/// reported as a warning.
	pub async fn get(&self, url: &Iri) -> Result<Processed, Error> {
		let session = self.session();
		let (context, expanded) = self.expand_in(url, &session).await?;

		let document = if self.options.compact {
			let mut compacted = context.compact(&expanded, &self.options.compaction);
			if self.options.normalize {
				if let Value::Object(object) = &mut compacted {
					normalize_document(object, &context.linked_fields());
				}
			}
			compacted
		} else {
			expanded.into_json()
		};

		Ok(Processed {
			document,
			context,
			warnings: session.into_warnings(),
		})
	}

	/// Same as [`get`](Self::get), first expanding the prefix of `query`
	/// using [`Options::prefixes`].
	pub async fn get_prefixed(&self, query: &str) -> Result<Processed, Error> {
		let url = self.options.prefixes.resolve_prefix(query);
		let url = IriBuf::new(url).map_err(|e| Error::InvalidIri(e.0))?;
		self.get(&url).await
	}

	/// Fetches, expands and substitutes the document behind `url`, without
	/// compacting it.
	pub async fn expand(&self, url: &Iri) -> Result<ExpandedDocument, Error> {
		let session = self.session();
		let (_, expanded) = self.expand_in(url, &session).await?;
		Ok(expanded)
	}

	/// Resolves the context of the document behind `url`.
	pub async fn resolve(&self, url: &Iri) -> Result<ResolvedContext, Error> {
		let session = self.session();
		let document = session.loader().load(url).await?;
		document.resolve_context(&session).await
	}

	async fn expand_in(
		&self,
		url: &Iri,
		session: &Session<&L>,
	) -> Result<(ResolvedContext, ExpandedDocument), Error> {
		log::debug!("processing `{url}`");
		let document = session.loader().load(url).await?;
		let object = document.as_object()?;
		let context = document.resolve_context(session).await?;
		let mut expanded = context.expand(object, &self.options.expansion);

		for node in expanded.nodes_mut() {
			self.substitute(node, self.options.max_depth, session).await
		}

		Ok((context, expanded))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use static_iref::iri;
	use std::collections::HashMap;

	fn loader() -> HashMap<IriBuf, Value> {
		let mut loader = HashMap::new();
		loader.insert(
			iri!("https://example.org/context").to_owned(),
			json!({
				"@context": {
					"@vocab": "https://example.org/vocab/",
					"id": "@id",
					"type": "@type",
					"next": { "@type": "@id" }
				}
			}),
		);
		for (name, next) in [("a", Some("b")), ("b", None)] {
			let mut document = json!({
				"@context": "context",
				"id": name,
				"type": "step",
				"name": name.to_uppercase()
			});
			if let Some(next) = next {
				document["next"] = json!(next);
			}
			loader.insert(IriBuf::new(format!("https://example.org/{name}")).unwrap(), document);
		}
		loader
	}

	#[tokio::test]
	async fn substitutes_linked_documents() {
		let processor = Processor::new(loader());
		let processed = processor.get(iri!("https://example.org/a")).await.unwrap();

		assert!(processed.warnings.is_empty());
		assert_eq!(
			processed.document,
			json!({
				"@context": "context",
				"id": "a",
				"type": "step",
				"name": "A",
				"next": { "id": "b", "type": "step", "name": "B" }
			})
		)
	}

	#[tokio::test]
	async fn depth_zero_keeps_references() {
		let processor = Processor::new_using(loader(), Options::default().with_max_depth(0));
		let processed = processor.get(iri!("https://example.org/a")).await.unwrap();
		assert_eq!(processed.document["next"], json!("b"))
	}

	#[tokio::test]
	async fn missing_documents_are_warnings() {
		let mut loader = loader();
		loader.remove(iri!("https://example.org/b"));

		let processor = Processor::new(loader);
		let processed = processor.get(iri!("https://example.org/a")).await.unwrap();

		assert_eq!(processed.document["next"], json!("b"));
		assert!(matches!(
			processed.warnings.as_slice(),
			[Warning::SubstitutionFailed(url, _)] if url == "https://example.org/b"
		))
	}

	#[tokio::test]
	async fn missing_document_is_an_error() {
		let processor = Processor::new(loader());
		assert!(matches!(
			processor.get(iri!("https://example.org/nope")).await,
			Err(Error::Loading(_))
		))
	}

	#[tokio::test]
	async fn non_object_documents_are_errors() {
		let mut loader = loader();
		loader.insert(iri!("https://example.org/arr").to_owned(), json!([1, 2]));
		loader.insert(iri!("https://example.org/num").to_owned(), json!(3));

		let processor = Processor::new(loader);
		for url in [iri!("https://example.org/arr"), iri!("https://example.org/num")] {
			assert!(matches!(processor.resolve(url).await, Err(Error::NotAnObject(_))));
			assert!(matches!(processor.get(url).await, Err(Error::NotAnObject(_))))
		}
	}
}
