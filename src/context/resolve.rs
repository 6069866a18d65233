use iref::{Iri, IriBuf, IriRef};
use serde_json::Value;

use super::{resolve_iri, ContextRef, ProcessingStack, ResolvedContext};
use crate::{Error, Keyword, Kind, Loader, ProcessingEnvironment, Warning};

/// Resolves the given `@context` value into a flattened context.
///
/// Relative URLs are resolved against `base_url`, which also becomes the
/// base IRI of the resulting context. Remote contexts are loaded through the
/// environment loader and recursively resolved against their own URL.
///
/// Only a top-level value of the wrong kind ([`Error::InvalidContext`]) or a
/// top-level URL that cannot be made absolute ([`Error::InvalidIri`]) fail
/// the resolution. A URL inside a top-level array is nested and only warns. Any problem with a remote context is reported as a
/// [`Warning`] and the context contributes no term definition.
pub async fn resolve_context(
	value: &Value,
	base_url: Option<&Iri>,
	env: &impl ProcessingEnvironment,
) -> Result<ResolvedContext, Error> {
	let context = ContextRef::try_from(value).map_err(Error::InvalidContext)?;

	let resolver = ContextResolver { env };
	let mut result = resolver
		.resolve(&context, base_url, ProcessingStack::new(), Scope::TopLevel)
		.await?;

	result.set_document_url(base_url.map(ToOwned::to_owned));
	result.set_source(value.clone());
	Ok(result)
}

impl ContextRef {
	/// Resolves this context.
	///
	/// See [`resolve_context`].
	pub async fn resolve(
		&self,
		base_url: Option<&Iri>,
		env: &impl ProcessingEnvironment,
	) -> Result<ResolvedContext, Error> {
		let resolver = ContextResolver { env };
		let mut result = resolver
			.resolve(self, base_url, ProcessingStack::new(), Scope::TopLevel)
			.await?;
		result.set_document_url(base_url.map(ToOwned::to_owned));
		Ok(result)
	}
}

/// Where the context being resolved comes from.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Scope {
	/// The value given to [`resolve_context`].
	TopLevel,

	/// An element of a top-level array.
	Nested,

	/// A loaded remote context document.
	Remote,
}

struct ContextResolver<'a, E> {
	env: &'a E,
}

impl<'a, E: ProcessingEnvironment> ContextResolver<'a, E> {
	async fn resolve(
		&self,
		context: &ContextRef,
		base_url: Option<&Iri>,
		stack: ProcessingStack,
		scope: Scope,
	) -> Result<ResolvedContext, Error> {
		match context {
			ContextRef::Null => Ok(ResolvedContext::new(None)),
			ContextRef::Inline(definition) => Ok(ResolvedContext::from_definition(
				definition,
				base_url,
				scope == Scope::Remote,
				|w| self.env.warn(w),
			)),
			ContextRef::Sequence(items) => {
				let item_scope = match scope {
					Scope::TopLevel => Scope::Nested,
					scope => scope,
				};

				let mut result = ResolvedContext::new(None);
				for item in items {
					let resolved =
						Box::pin(self.resolve(item, base_url, stack.clone(), item_scope)).await?;
					result.merge(resolved)
				}
				Ok(result)
			}
			ContextRef::Url(url) => {
				let iri = match IriRef::new(url.as_str())
					.ok()
					.and_then(|iri_ref| resolve_iri(iri_ref, base_url))
				{
					Some(iri) => iri,
					None if scope == Scope::TopLevel => return Err(Error::InvalidIri(url.clone())),
					None => {
						self.env.warn(Warning::MalformedIri(url.clone()));
						return Ok(ResolvedContext::new(None));
					}
				};

				self.resolve_remote(iri, stack).await
			}
		}
	}

	async fn resolve_remote(&self, url: IriBuf, stack: ProcessingStack) -> Result<ResolvedContext, Error> {
		let Some(stack) = stack.enter(&url) else {
			self.env.warn(Warning::CycleDetected(url));
			return Ok(ResolvedContext::new(None));
		};

		log::debug!("resolving remote context `{url}`");
		let document = match self.env.loader().load(&url).await {
			Ok(document) => document,
			Err(e) => {
				self.env.warn(Warning::LoadFailed(url, e.cause.to_string()));
				return Ok(ResolvedContext::new(None));
			}
		};

		// Redirecting loaders may report another URL.
		let document_url = document.url().map(ToOwned::to_owned).unwrap_or_else(|| url.clone());

		match document.document() {
			Value::Object(entries) => match entries.get(Keyword::Context.as_str()) {
				Some(value) => match ContextRef::try_from(value) {
					Ok(context) => {
						Box::pin(self.resolve(&context, Some(&document_url), stack, Scope::Remote)).await
					}
					Err(kind) => {
						self.env.warn(Warning::InvalidRemoteContext(url, kind));
						Ok(ResolvedContext::new(None))
					}
				},
				// A bare context definition.
				None => Ok(ResolvedContext::from_definition(
					entries,
					Some(&document_url),
					true,
					|w| self.env.warn(w),
				)),
			},
			other => {
				self.env.warn(Warning::InvalidRemoteContext(url, Kind::of(other)));
				Ok(ResolvedContext::new(None))
			}
		}
	}
}
