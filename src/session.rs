use std::sync::{Mutex, PoisonError};

use crate::loader::{CacheOptions, CachedLoader, DocumentCache};
use crate::{Loader, Warning};

/// Environment of the resolution and processing algorithms.
///
/// Gives access to the document loader and collects the warnings.
pub trait ProcessingEnvironment {
	type Loader: Loader;

	fn loader(&self) -> &Self::Loader;

	fn warn(&self, warning: Warning);
}

/// Resolution session.
///
/// Holds the document cache used by every load of the session, and the
/// warnings raised so far. A session is meant for one top-level call; share
/// a [`DocumentCache`] between sessions to avoid loading the same documents
/// again.
pub struct Session<L> {
	loader: CachedLoader<L>,
	warnings: Mutex<Vec<Warning>>,
}

impl<L> Session<L> {
	/// Creates a session with a fresh cache.
	pub fn new(loader: L) -> Self {
		Self::with_options(loader, DocumentCache::new(), CacheOptions::default())
	}

	/// Creates a session using the given cache.
	pub fn with_cache(loader: L, cache: DocumentCache) -> Self {
		Self::with_options(loader, cache, CacheOptions::default())
	}

	pub fn with_options(loader: L, cache: DocumentCache, options: CacheOptions) -> Self {
		Self {
			loader: CachedLoader::new_using(loader, cache, options),
			warnings: Mutex::new(Vec::new()),
		}
	}

	/// Document cache of this session.
	pub fn cache(&self) -> &DocumentCache {
		self.loader.cache()
	}

	/// Returns the warnings raised so far.
	pub fn warnings(&self) -> Vec<Warning> {
		self.warnings
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// Consumes the session and returns its warnings.
	pub fn into_warnings(self) -> Vec<Warning> {
		self.warnings
			.into_inner()
			.unwrap_or_else(PoisonError::into_inner)
	}
}

impl<L: Loader> ProcessingEnvironment for Session<L> {
	type Loader = CachedLoader<L>;

	fn loader(&self) -> &CachedLoader<L> {
		&self.loader
	}

	fn warn(&self, warning: Warning) {
		log::warn!("{warning}");
		self.warnings
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.push(warning)
	}
}
