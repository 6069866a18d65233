//! Linked document substitution.
//!
//! A reference is an object with an `http(s)` `@id` and no `@type`. Each
//! reference found in the properties of an expanded node is replaced by the
//! expanded document it points to, its other entries merged over the fetched
//! node. Fetched documents are substituted in turn, up to the depth limit.
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{self, StreamExt};
use hashbrown::HashMap;
use iref::IriBuf;
use serde_json::{Map, Value};

use super::Processor;
use crate::{Error, Keyword, Loader, ProcessingEnvironment, Session, Warning};

/// Returns the URL of the given object if it is a substitutable reference.
pub fn reference_url(entries: &Map<String, Value>) -> Option<&str> {
	if entries.contains_key(Keyword::Type.as_str()) || entries.contains_key(Keyword::Value.as_str()) {
		return None;
	}

	entries
		.get(Keyword::Id.as_str())?
		.as_str()
		.filter(|id| id.starts_with("http://") || id.starts_with("https://"))
}

/// Checks if the entries under `key` are searched for references.
fn is_searched(key: &str) -> bool {
	!key.starts_with('@') || key == Keyword::Graph.as_str()
}

fn collect_references<'v>(node: &'v Map<String, Value>, urls: &mut Vec<&'v str>) {
	for (key, value) in node {
		if is_searched(key) {
			collect_in_value(value, urls)
		}
	}
}

fn collect_in_value<'v>(value: &'v Value, urls: &mut Vec<&'v str>) {
	match value {
		Value::Array(items) => {
			for item in items {
				collect_in_value(item, urls)
			}
		}
		Value::Object(entries) => {
			if let Some(url) = reference_url(entries) {
				if !urls.contains(&url) {
					urls.push(url)
				}
			} else if let Some(list) = entries.get(Keyword::List.as_str()) {
				collect_in_value(list, urls)
			} else if !entries.contains_key(Keyword::Value.as_str()) {
				collect_references(entries, urls)
			}
		}
		_ => (),
	}
}

fn replace_references(node: &mut Map<String, Value>, fetched: &HashMap<String, Map<String, Value>>) {
	for (key, value) in node.iter_mut() {
		if is_searched(key) {
			replace_in_value(value, fetched)
		}
	}
}

fn replace_in_value(value: &mut Value, fetched: &HashMap<String, Map<String, Value>>) {
	match value {
		Value::Array(items) => {
			for item in items {
				replace_in_value(item, fetched)
			}
		}
		Value::Object(entries) => {
			if let Some(node) = reference_url(entries).and_then(|url| fetched.get(url)) {
				let mut merged = node.clone();
				for (key, entry) in entries.iter() {
					if key != Keyword::Id.as_str() {
						merged.insert(key.clone(), entry.clone());
					}
				}
				*entries = merged
			} else if let Some(list) = entries.get_mut(Keyword::List.as_str()) {
				replace_in_value(list, fetched)
			} else if !entries.contains_key(Keyword::Value.as_str()) {
				replace_references(entries, fetched)
			}
		}
		_ => (),
	}
}

impl<L: Loader> Processor<L> {
	/// Substitutes the references found in the given node.
	///
	/// Nothing happens with a `depth` of `0`. Referenced documents are
	/// fetched concurrently; those that cannot be loaded or expanded raise a
	/// [`Warning::SubstitutionFailed`] and their references are kept.
	pub(crate) async fn substitute(
		&self,
		node: &mut Map<String, Value>,
		depth: usize,
		session: &Session<&L>,
	) {
		if depth == 0 {
			return;
		}

		let mut urls = Vec::new();
		collect_references(node, &mut urls);
		if urls.is_empty() {
			return;
		}

		let urls: Vec<String> = urls.into_iter().map(ToOwned::to_owned).collect();
		log::debug!("substituting {} linked documents (depth {depth})", urls.len());

		let results: Vec<_> = stream::iter(urls)
			.map(|url| async move {
				let result = self.load_expanded(&url, depth - 1, session).await;
				(url, result)
			})
			.buffered(self.options.max_concurrent_fetches.max(1))
			.collect()
			.await;

		let mut fetched = HashMap::new();
		for (url, result) in results {
			match result {
				Ok(node) => {
					fetched.insert(url, node);
				}
				Err(e) => session.warn(Warning::SubstitutionFailed(url, e.to_string())),
			}
		}

		replace_references(node, &fetched)
	}

	/// Loads and expands the document behind `url`, then substitutes its own
	/// references up to `depth`.
	///
	/// A document expanding to several nodes is returned as a named graph.
	fn load_expanded<'a>(
		&'a self,
		url: &'a str,
		depth: usize,
		session: &'a Session<&'a L>,
	) -> LocalBoxFuture<'a, Result<Map<String, Value>, Error>> {
		async move {
			let iri = IriBuf::new(url.to_owned()).map_err(|e| Error::InvalidIri(e.0))?;
			let document = session.loader().load(&iri).await?;
			let context = document.resolve_context(session).await?;
			let expanded = context.expand(document.as_object()?, &self.options.expansion);

			let mut node = if expanded.len() == 1 {
				expanded.into_nodes().into_iter().next().unwrap_or_default()
			} else {
				let mut graph = Map::new();
				graph.insert(Keyword::Id.to_string(), Value::String(url.to_owned()));
				graph.insert(Keyword::Graph.to_string(), expanded.into_json());
				graph
			};

			self.substitute(&mut node, depth, session).await;
			Ok(node)
		}
		.boxed_local()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn references() {
		let reference = json!({ "@id": "https://example.org/a" });
		assert_eq!(
			reference_url(reference.as_object().unwrap()),
			Some("https://example.org/a")
		);

		for value in [
			json!({ "@id": "https://example.org/a", "@type": ["https://example.org/T"] }),
			json!({ "@id": "urn:example:a" }),
			json!({ "@value": "https://example.org/a" }),
		] {
			assert_eq!(reference_url(value.as_object().unwrap()), None)
		}
	}

	#[test]
	fn collect_and_replace() {
		let mut node = json!({
			"@id": "https://example.org/top",
			"https://example.org/p": [
				{ "@id": "https://example.org/a" },
				{ "@id": "https://example.org/b", "https://example.org/note": [{ "@value": "kept" }] },
				{ "@list": [{ "@id": "https://example.org/a" }] }
			]
		});
		let node = node.as_object_mut().unwrap();

		let mut urls = Vec::new();
		collect_references(node, &mut urls);
		assert_eq!(urls, ["https://example.org/a", "https://example.org/b"]);

		let mut fetched = HashMap::new();
		fetched.insert(
			"https://example.org/b".to_string(),
			json!({
				"@id": "https://example.org/b",
				"@type": ["https://example.org/T"],
				"https://example.org/note": [{ "@value": "fetched" }]
			})
			.as_object()
			.unwrap()
			.clone(),
		);
		replace_references(node, &fetched);

		assert_eq!(
			Value::Object(node.clone()),
			json!({
				"@id": "https://example.org/top",
				"https://example.org/p": [
					{ "@id": "https://example.org/a" },
					{
						"@id": "https://example.org/b",
						"@type": ["https://example.org/T"],
						"https://example.org/note": [{ "@value": "kept" }]
					},
					{ "@list": [{ "@id": "https://example.org/a" }] }
				]
			})
		)
	}
}
