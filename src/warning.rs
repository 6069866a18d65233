use iref::IriBuf;

use crate::Kind;

/// Non-fatal problem found while resolving or processing a document.
///
/// Warnings are recorded on the [`Session`](crate::Session) and logged; the
/// operation that raised them carries on with a best-effort result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
	/// The context is already being resolved higher up the stack. It
	/// contributes no term definition.
	#[error("cyclic reference to context `{0}`")]
	CycleDetected(IriBuf),

	/// A remote context could not be loaded. It contributes no term
	/// definition.
	#[error("unable to load context `{0}`: {1}")]
	LoadFailed(IriBuf, String),

	/// A remote context document does not hold a usable `@context` entry.
	#[error("invalid remote context `{0}`: unexpected {1}")]
	InvalidRemoteContext(IriBuf, Kind),

	#[error("malformed IRI `{0}`")]
	MalformedIri(String),

	#[error("invalid definition for term `{0}`: unexpected {1}")]
	InvalidTermDefinition(String, Kind),

	#[error("invalid value for `{0}`: unexpected {1}")]
	InvalidKeywordValue(&'static str, Kind),

	/// A linked document could not be substituted; the reference is kept.
	#[error("unable to substitute `{0}`: {1}")]
	SubstitutionFailed(String, String),
}
