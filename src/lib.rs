//! This crate implements the subset of the
//! [JSON-LD](https://www.w3.org/TR/json-ld/) data interchange format used by
//! the linked vocabularies of the
//! [Coupled Model Intercomparison Project (CMIP)](https://wcrp-cmip.org/).
//!
//! Every vocabulary entry is a small JSON-LD document whose `@context` maps
//! short field names to IRIs. Fields whose definition carries an `@type` are
//! *linked*: their values are the identifiers of other entries. This crate
//! can:
//!
//!   - resolve and merge `@context` values, local or remote, into a
//!     [`ResolvedContext`], detecting reference cycles;
//!   - classify the [`LinkedFields`] of a context;
//!   - expand documents and compact them back;
//!   - normalize linked values;
//!   - substitute the documents referenced by linked fields, up to a given
//!     depth, with bounded concurrent fetches and a shared cache (see
//!     [`Processor`]).
//!
//! Remote documents are fetched through a [`Loader`]. Published vocabularies
//! can be served from a local checkout with the [`FsLoader`], or from another
//! location with the [`RedirectLoader`].
//!
//! ```ignore
//! use cmip_ld::{FsLoader, Processor};
//! use static_iref::iri;
//!
//! let mut loader = FsLoader::new();
//! loader.mount(iri!("https://wcrp-cmip.github.io/WCRP-universe/").to_owned(), "WCRP-universe");
//!
//! let processor = Processor::new(loader);
//! let processed = processor.get_prefixed("universal:activity/cmip").await?;
//! println!("{}", processed.document);
//! ```
pub mod compaction;
mod container;
pub mod context;
mod document;
mod error;
pub mod expansion;
mod keyword;
mod kind;
pub mod loader;
pub mod normalize;
mod null;
pub mod prefix;
pub mod processor;
mod session;
mod typ;
pub mod validation;
mod warning;

pub use compaction::CompactionOptions;
pub use container::*;
pub use context::{
	linked_fields, resolve_context, ContextRef, LinkInfo, LinkedFields, ResolvedContext,
	TermDefinition,
};
pub use document::*;
pub use error::*;
pub use expansion::{ExpandedDocument, ExpansionOptions, ExpansionPolicy};
pub use keyword::*;
pub use kind::*;
pub use loader::{
	CacheOptions, CachedLoader, ChainLoader, DocumentCache, FsLoader, LoadError, Loader,
	NoLoader, RedirectLoader,
};
pub use normalize::{normalize_document, normalize_linked_value};
pub use null::*;
pub use prefix::PrefixMap;
pub use processor::{Processed, Processor};
pub use session::*;
pub use typ::*;
pub use warning::*;

#[cfg(feature = "reqwest")]
pub use loader::ReqwestLoader;
