use hashbrown::HashMap;
use iref::{Iri, IriBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{OnceCell, Semaphore};

use crate::{Document, LoadError};

use super::{Loader, Timeout};

/// Default number of fetches allowed to run at the same time.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

type Slot = Arc<OnceCell<Document>>;

/// Shared document cache, keyed by exact URL.
///
/// Cloning the cache is cheap and yields a handle to the same storage, which
/// is how a cache is shared between several resolution sessions.
///
/// Each URL owns a slot that is filled at most once: concurrent loads of the
/// same URL wait for the first one instead of issuing a second fetch. Failed
/// loads leave the slot empty, so a later load tries again.
#[derive(Clone, Default)]
pub struct DocumentCache {
	slots: Arc<Mutex<HashMap<IriBuf, Slot>>>,
}

impl DocumentCache {
	/// Creates a new empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the slot of the given URL, creating it if absent.
	fn slot(&self, url: &Iri) -> Slot {
		let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
		match slots.get(url) {
			Some(slot) => slot.clone(),
			None => {
				let slot = Slot::default();
				slots.insert(url.to_owned(), slot.clone());
				slot
			}
		}
	}

	/// Returns the cached document for the given URL, if already loaded.
	pub fn get(&self, url: &Iri) -> Option<Document> {
		let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
		slots.get(url).and_then(|slot| slot.get()).cloned()
	}

	/// Inserts a pre-loaded document.
	///
	/// Returns `false` if a document was already cached for this URL, in
	/// which case the cache is left unchanged.
	pub fn insert(&self, url: &Iri, document: Document) -> bool {
		self.slot(url).set(document).is_ok()
	}

	/// Number of loaded documents.
	pub fn len(&self) -> usize {
		let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
		slots.values().filter(|slot| slot.initialized()).count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Cache options.
#[derive(Debug, Clone, Copy)]
pub struct CacheOptions {
	/// Time limit of a single fetch.
	///
	/// A fetch exceeding it fails with a [`Timeout`] cause, without retry.
	/// Defaults to no limit.
	pub timeout: Option<Duration>,

	/// Maximum number of fetches running at the same time.
	///
	/// Defaults to [`DEFAULT_MAX_CONCURRENT_FETCHES`].
	pub max_concurrent_fetches: usize,
}

impl CacheOptions {
	/// Returns these options with the given fetch time limit.
	pub fn with_timeout(self, timeout: Duration) -> Self {
		Self {
			timeout: Some(timeout),
			..self
		}
	}

	/// Returns these options with the given concurrency bound.
	pub fn with_max_concurrent_fetches(self, max_concurrent_fetches: usize) -> Self {
		Self {
			max_concurrent_fetches,
			..self
		}
	}
}

impl Default for CacheOptions {
	fn default() -> Self {
		Self {
			timeout: None,
			max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
		}
	}
}

/// Read-through caching loader.
///
/// Wraps another loader with a [`DocumentCache`], an optional fetch time
/// limit and a bound on the number of concurrent fetches.
pub struct CachedLoader<L> {
	inner: L,
	cache: DocumentCache,
	options: CacheOptions,
	permits: Semaphore,
}

impl<L> CachedLoader<L> {
	/// Wraps `inner` with a fresh cache and default options.
	pub fn new(inner: L) -> Self {
		Self::new_using(inner, DocumentCache::new(), CacheOptions::default())
	}

	/// Wraps `inner` with the given cache and options.
	pub fn new_using(inner: L, cache: DocumentCache, options: CacheOptions) -> Self {
		Self {
			inner,
			cache,
			permits: Semaphore::new(options.max_concurrent_fetches.max(1)),
			options,
		}
	}

	pub fn cache(&self) -> &DocumentCache {
		&self.cache
	}

	pub fn options(&self) -> &CacheOptions {
		&self.options
	}

	pub fn inner(&self) -> &L {
		&self.inner
	}
}

impl<L: Loader> CachedLoader<L> {
	async fn fetch(&self, url: &Iri) -> Result<Document, LoadError> {
		let _permit = self
			.permits
			.acquire()
			.await
			.map_err(|e| LoadError::new(url.to_owned(), e))?;

		log::debug!("fetching `{url}`");
		match self.options.timeout {
			Some(limit) => tokio::time::timeout(limit, self.inner.load(url))
				.await
				.map_err(|_| LoadError::new(url.to_owned(), Timeout(limit)))?,
			None => self.inner.load(url).await,
		}
	}
}

impl<L: Loader> Loader for CachedLoader<L> {
	async fn load(&self, url: &Iri) -> Result<Document, LoadError> {
		let slot = self.cache.slot(url);
		slot.get_or_try_init(|| self.fetch(url)).await.cloned()
	}
}
