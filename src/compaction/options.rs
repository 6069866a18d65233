/// Compaction options.
#[derive(Clone, Copy, Debug)]
pub struct CompactionOptions {
	/// Determines if IRIs are compacted relative to the base IRI or document
	/// location when compacting.
	pub compact_to_relative: bool,

	/// If set to `true`, arrays with just one element are replaced with that
	/// element during compaction, unless the term has a container mapping.
	/// If set to `false`, all arrays will remain arrays even if they have just
	/// one element.
	pub compact_arrays: bool,

	/// If set to `true`, the `@context` value the context was resolved from
	/// is included in the compacted document.
	pub emit_context: bool,

	/// If set to `true`, properties are processed by lexical order.
	/// If `false`, order is not considered in processing.
	pub ordered: bool,
}

impl CompactionOptions {
	pub fn ordered(self) -> Self {
		Self {
			ordered: true,
			..self
		}
	}

	pub fn without_context(self) -> Self {
		Self {
			emit_context: false,
			..self
		}
	}
}

impl Default for CompactionOptions {
	fn default() -> Self {
		Self {
			compact_to_relative: true,
			compact_arrays: true,
			emit_context: true,
			ordered: false,
		}
	}
}
