use iref::Iri;
use std::fmt;

use crate::{Document, LoadError};

use super::Loader;

/// Loads document from the first loader, otherwise falls back to the second one.
///
/// This can be useful for combining, for example,
/// an [`FsLoader`](super::FsLoader) serving a local checkout of a vocabulary,
/// and a [`ReqwestLoader`](super::ReqwestLoader) for loading any other document from the web.
///
/// Note that it is also possible to nest several [`ChainLoader`]s,
/// to combine more than two loaders.
pub struct ChainLoader<L1, L2>(L1, L2);

impl<L1, L2> ChainLoader<L1, L2> {
	/// Build a new chain loader
	pub fn new(l1: L1, l2: L2) -> Self {
		ChainLoader(l1, l2)
	}
}

impl<L1: Loader, L2: Loader> Loader for ChainLoader<L1, L2> {
	async fn load(&self, url: &Iri) -> Result<Document, LoadError> {
		match self.0.load(url).await {
			Ok(doc) => Ok(doc),
			Err(err1) => {
				log::debug!("first loader failed on `{url}`, trying the second one");
				match self.1.load(url).await {
					Ok(doc) => Ok(doc),
					Err(err2) => Err(LoadError::new(url.to_owned(), Error(err1, err2))),
				}
			}
		}
	}
}

/// Either-or error.
#[derive(Debug)]
pub struct Error(LoadError, LoadError);

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let Error(e1, e2) = self;
		write!(f, "first: {} / second: {}", e1.cause, e2.cause)
	}
}

impl std::error::Error for Error {}
