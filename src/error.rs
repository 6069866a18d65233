use crate::{Kind, LoadError};

/// Hard processing error.
///
/// These are only raised at the boundary of a top-level call: they indicate
/// a caller or data bug, not a transient condition. Failures on nested
/// contexts degrade into [`Warning`](crate::Warning)s instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Top-level `@context` value is neither a string, an object nor an array.
	#[error("invalid `@context`: expected string, object or array, found {0}")]
	InvalidContext(Kind),

	/// Top-level context URL cannot be turned into an absolute IRI.
	#[error("invalid context IRI `{0}`")]
	InvalidIri(String),

	/// The document is not a JSON object.
	#[error("expected a JSON object, found {0}")]
	NotAnObject(Kind),

	/// The requested document itself could not be loaded.
	#[error(transparent)]
	Loading(#[from] LoadError),
}
