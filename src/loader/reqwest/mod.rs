//! Simple document loader based on [`reqwest`](https://crates.io/crates/reqwest)
use iref::{Iri, IriBuf};
use reqwest::{
	header::{ACCEPT, CONTENT_TYPE, LINK},
	StatusCode,
};
use reqwest_middleware::ClientWithMiddleware;

use crate::{Document, LoadError};

use super::Loader;

mod content_type;
mod link;

use content_type::*;
use link::*;

/// Value of the `Accept` header sent with every request.
const ACCEPT_JSON: &str = "application/ld+json, application/json";

/// Loader options.
pub struct Options {
	/// Only accept responses whose `Content-Type` is a JSON media type.
	///
	/// When `false` (the default), any response body that parses as JSON is
	/// accepted. Static hosts often serve `.json` files as `text/plain`.
	pub strict_content_type: bool,

	/// Maximum number of `Link: rel="alternate"` indirections followed before
	/// the loader fails.
	///
	/// Defaults to 8. Regular HTTP redirections are handled by the
	/// [`client`](Self::client).
	pub max_redirections: usize,

	/// HTTP client.
	///
	/// HTTP redirections are followed according to the client policy.
	pub client: ClientWithMiddleware,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			strict_content_type: false,
			max_redirections: 8,
			client: reqwest_middleware::ClientBuilder::new(reqwest::Client::default()).build(),
		}
	}
}

/// Loading error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("internal error: {1}")]
	Reqwest(IriBuf, reqwest_middleware::Error),

	#[error("query failed: status code {1}")]
	QueryFailed(IriBuf, StatusCode),

	#[error("invalid content type")]
	InvalidContentType(IriBuf),

	#[error("too many redirections")]
	TooManyRedirections(IriBuf),

	#[error("JSON parse error: {1}")]
	Parse(IriBuf, serde_json::Error),
}

/// `reqwest`-based loader.
///
/// Only works with the [`tokio`](https://tokio.rs/) runtime.
///
/// Responses without a JSON media type may point to their JSON-LD
/// representation with a `Link: <...>; rel="alternate"; type="application/ld+json"`
/// header, which the loader follows.
///
/// Loaded documents are not cached: a new network query is made each time
/// an URL is loaded even if it has already been queried before. Wrap the
/// loader in a [`CachedLoader`](super::CachedLoader) to avoid that.
#[derive(Default)]
pub struct ReqwestLoader {
	options: Options,
}

impl ReqwestLoader {
	/// Creates a new loader with the default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a new loader with the given options.
	pub fn new_using(options: Options) -> Self {
		Self { options }
	}

	async fn get(&self, url: &Iri) -> Result<Document, Error> {
		let mut url = url.to_owned();
		let mut redirection_number = 0;

		'next_url: loop {
			if redirection_number > self.options.max_redirections {
				return Err(Error::TooManyRedirections(url));
			}

			log::debug!("downloading: {url}");
			let response = self
				.options
				.client
				.get(url.as_str())
				.header(ACCEPT, ACCEPT_JSON)
				.send()
				.await
				.map_err(|e| Error::Reqwest(url.clone(), e))?;

			match response.status() {
				StatusCode::OK => {
					let content_type = response
						.headers()
						.get_all(CONTENT_TYPE)
						.into_iter()
						.filter_map(ContentType::new)
						.find(ContentType::is_json);

					if content_type.is_none() {
						log::debug!("no JSON media type found");
						let alternate = response
							.headers()
							.get_all(LINK)
							.into_iter()
							.filter_map(Link::new)
							.find(Link::is_json_ld_alternate);

						if let Some(link) = alternate {
							url = link.href().resolved(url.as_iri());
							redirection_number += 1;
							continue 'next_url;
						}

						if self.options.strict_content_type {
							break Err(Error::InvalidContentType(url));
						}
					}

					let bytes = response
						.bytes()
						.await
						.map_err(|e| Error::Reqwest(url.clone(), e.into()))?;

					let document =
						serde_json::from_slice(&bytes).map_err(|e| Error::Parse(url.clone(), e))?;

					break Ok(Document::new(
						Some(url),
						content_type.map(ContentType::into_media_type),
						document,
					));
				}
				code => break Err(Error::QueryFailed(url, code)),
			}
		}
	}
}

impl Loader for ReqwestLoader {
	async fn load(&self, url: &Iri) -> Result<Document, LoadError> {
		self.get(url)
			.await
			.map_err(|e| LoadError::new(url.to_owned(), e))
	}
}
