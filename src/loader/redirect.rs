use iref::{Iri, IriBuf};

use crate::{Document, LoadError};

use super::Loader;

/// The rewritten URL is not a valid IRI.
#[derive(Debug, thiserror::Error)]
#[error("invalid redirection target `{0}`")]
pub struct InvalidTarget(String);

/// Loader rewriting URL prefixes before delegating to another loader.
///
/// This is used to serve a published vocabulary from an alternate location
/// (a local test server, a mirror) without touching the documents: the loaded
/// document keeps the URL that was requested, so relative references inside
/// it still resolve against the published location.
///
/// When several rules match, the longest prefix wins.
pub struct RedirectLoader<L> {
	rules: Vec<(String, String)>,
	inner: L,
}

impl<L> RedirectLoader<L> {
	/// Creates a redirecting loader without any rule.
	pub fn new(inner: L) -> Self {
		Self {
			rules: Vec::new(),
			inner,
		}
	}

	/// Creates a redirecting loader with the given `(from, to)` prefix rules.
	pub fn with_rules<I, F, T>(inner: L, rules: I) -> Self
	where
		I: IntoIterator<Item = (F, T)>,
		F: Into<String>,
		T: Into<String>,
	{
		let mut loader = Self::new(inner);
		for (from, to) in rules {
			loader.redirect(from, to);
		}
		loader
	}

	/// Redirects every URL starting with `from` to the same path under `to`.
	pub fn redirect(&mut self, from: impl Into<String>, to: impl Into<String>) {
		self.rules.push((from.into(), to.into()))
	}

	/// Returns the rewritten URL, or `None` if no rule matches.
	pub fn rewrite(&self, url: &Iri) -> Option<String> {
		let url = url.as_str();
		self.rules
			.iter()
			.filter(|(from, _)| url.starts_with(from.as_str()))
			.max_by_key(|(from, _)| from.len())
			.map(|(from, to)| format!("{to}{}", &url[from.len()..]))
	}

	pub fn inner(&self) -> &L {
		&self.inner
	}
}

impl<L: Loader> Loader for RedirectLoader<L> {
	async fn load(&self, url: &Iri) -> Result<Document, LoadError> {
		match self.rewrite(url) {
			Some(target) => {
				let target = IriBuf::new(target)
					.map_err(|e| LoadError::new(url.to_owned(), InvalidTarget(e.0)))?;
				log::debug!("redirecting `{url}` to `{target}`");
				let mut document = self.inner.load(&target).await?;
				document.set_url(Some(url.to_owned()));
				Ok(document)
			}
			None => self.inner.load(url).await,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::NoLoader;
	use static_iref::iri;

	#[test]
	fn longest_prefix_wins() {
		let loader = RedirectLoader::with_rules(
			NoLoader,
			[
				("https://wcrp-cmip.github.io/", "http://localhost:8000/"),
				(
					"https://wcrp-cmip.github.io/WCRP-universe/",
					"http://localhost:8001/",
				),
			],
		);

		assert_eq!(
			loader
				.rewrite(iri!("https://wcrp-cmip.github.io/WCRP-universe/activity/cmip.json"))
				.as_deref(),
			Some("http://localhost:8001/activity/cmip.json")
		);
		assert_eq!(
			loader
				.rewrite(iri!("https://wcrp-cmip.github.io/CMIP7-CVs/experiment/"))
				.as_deref(),
			Some("http://localhost:8000/CMIP7-CVs/experiment/")
		);
		assert_eq!(loader.rewrite(iri!("https://example.org/")), None)
	}
}
