use std::time::Duration;

use crate::{
	loader::{cache::DEFAULT_MAX_CONCURRENT_FETCHES, CacheOptions},
	CompactionOptions, ExpansionOptions, PrefixMap,
};

/// Default depth of linked document substitution.
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Processor options.
#[derive(Clone, Debug)]
pub struct Options {
	/// How many levels of linked documents are substituted for their
	/// references.
	///
	/// With `0`, references are left as is. With `1`, the references of the
	/// requested document are replaced by the referenced documents, whose own
	/// references are left as is. And so on.
	///
	/// Defaults to [`DEFAULT_MAX_DEPTH`].
	pub max_depth: usize,

	/// If set to `true`, the result is compacted using the context of the
	/// requested document. Otherwise the expanded form is returned.
	///
	/// Defaults to `true`.
	pub compact: bool,

	/// If set to `true`, the linked values of the compacted result are
	/// normalized (lower-case, `-` separators).
	///
	/// Defaults to `false`.
	pub normalize: bool,

	/// Maximum number of documents fetched at the same time.
	///
	/// Defaults to [`DEFAULT_MAX_CONCURRENT_FETCHES`].
	pub max_concurrent_fetches: usize,

	/// Time limit of a single fetch. Defaults to no limit.
	pub timeout: Option<Duration>,

	/// Prefixes accepted by [`Processor::get_prefixed`](super::Processor::get_prefixed).
	pub prefixes: PrefixMap,

	/// Options passed to the expansion algorithm.
	pub expansion: ExpansionOptions,

	/// Options passed to the compaction algorithm.
	pub compaction: CompactionOptions,
}

impl Options {
	pub fn with_max_depth(self, max_depth: usize) -> Self {
		Self { max_depth, ..self }
	}

	/// Returns these options with the `compact` flag set to `false`.
	pub fn expanded(self) -> Self {
		Self {
			compact: false,
			..self
		}
	}

	pub fn normalized(self) -> Self {
		Self {
			normalize: true,
			..self
		}
	}

	pub fn with_timeout(self, timeout: Duration) -> Self {
		Self {
			timeout: Some(timeout),
			..self
		}
	}

	pub fn with_max_concurrent_fetches(self, max_concurrent_fetches: usize) -> Self {
		Self {
			max_concurrent_fetches,
			..self
		}
	}

	pub fn with_prefixes(self, prefixes: PrefixMap) -> Self {
		Self { prefixes, ..self }
	}

	/// Builds the document cache options from these options.
	pub fn cache_options(&self) -> CacheOptions {
		CacheOptions {
			timeout: self.timeout,
			max_concurrent_fetches: self.max_concurrent_fetches,
		}
	}
}

impl Default for Options {
	fn default() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
			compact: true,
			normalize: false,
			max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
			timeout: None,
			prefixes: PrefixMap::default(),
			expansion: ExpansionOptions::default(),
			compaction: CompactionOptions::default(),
		}
	}
}
