//! Document loaders.
//!
//! A loader fetches the JSON document identified by a URL. Every remote
//! context referenced from a `@context` entry, and every linked document
//! substituted by the [`Processor`](crate::Processor), goes through one.
use iref::{Iri, IriBuf};
use std::time::Duration;

pub mod cache;
pub mod chain;
pub mod fs;
pub mod map;
pub mod none;
pub mod redirect;

pub use cache::{CacheOptions, CachedLoader, DocumentCache};
pub use chain::ChainLoader;
pub use fs::FsLoader;
pub use none::NoLoader;
pub use redirect::RedirectLoader;

#[cfg(feature = "reqwest")]
pub mod reqwest;

#[cfg(feature = "reqwest")]
pub use self::reqwest::ReqwestLoader;

use crate::Document;

/// Loading error.
#[derive(Debug, thiserror::Error)]
#[error("loading document `{target}` failed: {cause}")]
pub struct LoadError {
	pub target: IriBuf,
	pub cause: anyhow::Error,
}

impl LoadError {
	pub fn new(target: IriBuf, cause: impl Into<anyhow::Error>) -> Self {
		Self {
			target,
			cause: cause.into(),
		}
	}

	/// Checks if the load was abandoned because it exceeded its time limit.
	pub fn is_timeout(&self) -> bool {
		self.cause.is::<Timeout>()
	}
}

/// Cause of a [`LoadError`] raised when a fetch exceeds its time limit.
#[derive(Debug, thiserror::Error)]
#[error("timed out after {0:?}")]
pub struct Timeout(pub Duration);

/// Document loader.
///
/// This library provides a few loader implementations:
///   - [`NoLoader`] dummy loader that always fail. Perfect if you are certain
///     that the processing will not require any loading.
///   - Standard [`HashMap`](std::collections::HashMap) and
///     [`BTreeMap`](std::collections::BTreeMap) mapping IRIs to pre-loaded
///     JSON documents.
///   - [`FsLoader`] redirecting registered IRI prefixes to a local
///     directory on the file system, which is how a published vocabulary is
///     served offline.
///   - [`RedirectLoader`] rewriting IRI prefixes before delegating to another
///     loader.
///   - [`ChainLoader`] trying a second loader when the first one fails.
///   - [`CachedLoader`] adding a shared read-through cache, a time limit and
///     a bound on concurrent fetches to any other loader.
///   - `ReqwestLoader` actually downloading the remote documents using the
///     [`reqwest`](https://crates.io/crates/reqwest) library.
///     This requires the `reqwest` feature to be enabled.
pub trait Loader {
	/// Loads the document behind the given IRI.
	#[allow(async_fn_in_trait)]
	async fn load(&self, url: &Iri) -> Result<Document, LoadError>;
}

impl<'l, L: Loader> Loader for &'l L {
	async fn load(&self, url: &Iri) -> Result<Document, LoadError> {
		L::load(self, url).await
	}
}
