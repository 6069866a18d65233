//! Registry of named vocabulary locations.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::RedirectLoader;

/// Name of the document holding the whole graph of a vocabulary.
pub const GRAPH_DOCUMENT: &str = "graph.jsonld";

/// Mapping from prefixes to vocabulary base URLs.
///
/// The default mapping registers the published WCRP vocabularies. It
/// (de)serializes as a plain JSON object.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixMap(IndexMap<String, String>);

impl PrefixMap {
	/// Creates an empty mapping.
	pub fn new() -> Self {
		Self(IndexMap::new())
	}

	/// Registers a prefix, returning the URL it previously mapped to.
	pub fn insert(&mut self, prefix: impl Into<String>, base: impl Into<String>) -> Option<String> {
		self.0.insert(prefix.into(), base.into())
	}

	pub fn get(&self, prefix: &str) -> Option<&str> {
		self.0.get(prefix).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(p, b)| (p.as_str(), b.as_str()))
	}

	/// Expands a prefixed query into a URL.
	///
	/// `cmip7:experiment/historical` becomes the `experiment/historical`
	/// path under the `cmip7` base URL, and a bare registered prefix
	/// (`cmip7` or `cmip7:`) its graph document. Anything else, including
	/// `http(s)` URLs, is returned unchanged.
	pub fn resolve_prefix(&self, query: &str) -> String {
		if query.starts_with("http") {
			return query.to_owned();
		}

		let (prefix, rest) = query.split_once(':').unwrap_or((query, ""));
		match self.get(prefix) {
			Some(base) if rest.is_empty() => format!("{base}{GRAPH_DOCUMENT}"),
			Some(base) => {
				log::debug!("substituting prefix `{prefix}` in `{query}`");
				format!("{base}{rest}")
			}
			None => query.to_owned(),
		}
	}

	/// Compacts a URL into its `prefix:rest` form.
	///
	/// The longest matching base URL wins. `http:` URLs are matched as their
	/// `https:` counterpart. Unmatched URLs are returned unchanged.
	pub fn compact_url(&self, url: &str) -> String {
		let secure = match url.strip_prefix("http:") {
			Some(rest) => format!("https:{rest}"),
			None => url.to_owned(),
		};

		self.0
			.iter()
			.filter(|(_, base)| secure.starts_with(base.as_str()))
			.max_by_key(|(_, base)| base.len())
			.map(|(prefix, base)| format!("{prefix}:{}", &secure[base.len()..]))
			.unwrap_or_else(|| url.to_owned())
	}

	/// Builds a loader serving the given prefixes from alternate locations.
	///
	/// Each `(prefix, target)` pair redirects the base URL of `prefix` to
	/// `target`. Unknown prefixes are ignored.
	pub fn redirect<L, I, T>(&self, inner: L, targets: I) -> RedirectLoader<L>
	where
		I: IntoIterator<Item = (T, String)>,
		T: AsRef<str>,
	{
		let mut loader = RedirectLoader::new(inner);
		for (prefix, target) in targets {
			match self.get(prefix.as_ref()) {
				Some(base) => loader.redirect(base, target),
				None => log::debug!("no location registered for prefix `{}`", prefix.as_ref()),
			}
		}
		loader
	}
}

impl Default for PrefixMap {
	fn default() -> Self {
		let mut map = Self::new();
		map.insert("vr", "https://wcrp-cmip.github.io/Variable-Registry/");
		map.insert("cf", "https://wcrp-cmip.github.io/CF/");
		map.insert("cmip7", "https://wcrp-cmip.github.io/CMIP7-CVs/");
		map.insert("obs4mips", "https://wolfiex.github.io/obs4MIPs-cmor-tables-ld/");
		map.insert("universal", "https://wcrp-cmip.github.io/WCRP-universe/");
		map.insert("cmip6plus", "https://wcrp-cmip.github.io/CMIP6Plus_CVs/");
		map
	}
}

impl<P: Into<String>, B: Into<String>> FromIterator<(P, B)> for PrefixMap {
	fn from_iter<I: IntoIterator<Item = (P, B)>>(iter: I) -> Self {
		let mut map = Self::new();
		for (prefix, base) in iter {
			map.insert(prefix, base);
		}
		map
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::NoLoader;
	use static_iref::iri;

	#[test]
	fn resolve() {
		let prefixes = PrefixMap::default();
		assert_eq!(
			prefixes.resolve_prefix("cmip7:experiment/historical"),
			"https://wcrp-cmip.github.io/CMIP7-CVs/experiment/historical"
		);
		assert_eq!(
			prefixes.resolve_prefix("universal"),
			"https://wcrp-cmip.github.io/WCRP-universe/graph.jsonld"
		);
		assert_eq!(prefixes.resolve_prefix("unknown:thing"), "unknown:thing");
		assert_eq!(
			prefixes.resolve_prefix("https://example.org/a"),
			"https://example.org/a"
		)
	}

	#[test]
	fn compact() {
		let prefixes = PrefixMap::default();
		assert_eq!(
			prefixes.compact_url("http://wcrp-cmip.github.io/CF/standard-name/air-temperature"),
			"cf:standard-name/air-temperature"
		);
		assert_eq!(
			prefixes.compact_url("https://example.org/a"),
			"https://example.org/a"
		)
	}

	#[test]
	fn deserialize() {
		let prefixes: PrefixMap =
			serde_json::from_str(r#"{ "ex": "https://example.org/" }"#).unwrap();
		assert_eq!(prefixes.resolve_prefix("ex:a"), "https://example.org/a")
	}

	#[test]
	fn redirect_registered_prefixes() {
		let loader = PrefixMap::default().redirect(
			NoLoader,
			[
				("cmip7", "http://localhost:8000/".to_string()),
				("nope", "http://localhost:8001/".to_string()),
			],
		);

		assert_eq!(
			loader
				.rewrite(iri!("https://wcrp-cmip.github.io/CMIP7-CVs/experiment/historical.json"))
				.as_deref(),
			Some("http://localhost:8000/experiment/historical.json")
		)
	}
}
