/// Expansion options.
#[derive(Clone, Default, Debug)]
pub struct ExpansionOptions {
	/// Term expansion policy.
	///
	/// Default is `ExpansionPolicy::Relaxed`.
	pub policy: ExpansionPolicy,

	/// Namespace prepended to keys that the context cannot expand, when
	/// there is no vocabulary mapping.
	pub default_namespace: Option<String>,

	/// Resolve keys that the context cannot expand against the base IRI,
	/// after the default namespace.
	///
	/// Off by default: undefined keys are then kept verbatim (or dropped by
	/// [`ExpansionPolicy::Standard`]), so the expanded document may hold keys
	/// that are not IRIs. Compaction leaves base-resolved keys absolute.
	pub base_relative_keys: bool,

	/// If set to true, input document entries are processed lexicographically.
	/// If false, order is not considered in processing.
	pub ordered: bool,
}

impl ExpansionOptions {
	pub fn ordered(self) -> Self {
		Self {
			ordered: true,
			..self
		}
	}

	pub fn with_policy(self, policy: ExpansionPolicy) -> Self {
		Self { policy, ..self }
	}

	pub fn with_base_relative_keys(self) -> Self {
		Self {
			base_relative_keys: true,
			..self
		}
	}

	pub fn with_default_namespace(self, namespace: impl Into<String>) -> Self {
		Self {
			default_namespace: Some(namespace.into()),
			..self
		}
	}
}

/// Key expansion policy.
///
/// Decides what happens to keys that cannot be expanded into an IRI: keys
/// that are neither terms, compact IRIs nor absolute IRIs, when the context
/// has no vocabulary mapping, no default namespace is given and
/// [`ExpansionOptions::base_relative_keys`] is off.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ExpansionPolicy {
	/// Relaxed policy.
	///
	/// Undefined keys are kept verbatim in the expanded document, so that
	/// compaction restores them.
	#[default]
	Relaxed,

	/// Standard policy.
	///
	/// Every key that cannot be expanded is dropped unless it contains a `:`
	/// character.
	Standard,
}
