use iref::{Iri, IriBuf};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::{Document, LoadError};

use super::Loader;

/// File extensions tried, in order, when a URL maps to a missing file.
const EXTENSIONS: [&str; 2] = ["json", "jsonld"];

/// Loading error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// No mount point found for the given IRI.
	#[error("no mount point for `{0}`")]
	NoMountPoint(IriBuf),

	/// The IRI goes up the directory tree of its mount point.
	#[error("`{0}` escapes its mount point")]
	OutsideMountPoint(IriBuf),

	/// IO error.
	#[error("IO error while loading `{0}`: {1}")]
	IO(IriBuf, std::io::Error),

	/// Parse error.
	#[error("parse error on `{0}`: {1}")]
	Parse(IriBuf, serde_json::Error),
}

/// File-system loader.
///
/// This is a special document loader that can load document from the file
/// system by attaching a directory to specific URLs. It is how a local
/// checkout of a published vocabulary is served as if it were online.
///
/// A URL ending with `/` maps to the `index.json` file of the directory. A
/// URL mapping to a missing file is retried with the `.json` then the
/// `.jsonld` extensions, so that extension-less identifiers such as
/// `https://example.org/activity/cmip` find `activity/cmip.json`.
///
/// Loaded documents are not cached: a new file system read is made each time
/// an URL is loaded even if it has already been queried before. Wrap the
/// loader in a [`CachedLoader`](super::CachedLoader) to avoid that.
#[derive(Debug, Default)]
pub struct FsLoader {
	mount_points: Vec<(PathBuf, IriBuf)>,
}

impl FsLoader {
	/// Creates a new file system loader without any mount point.
	pub fn new() -> Self {
		Self::default()
	}

	/// Bind the given IRI prefix to the given path.
	///
	/// Any document with an IRI matching the given prefix will be loaded from
	/// the referenced local directory.
	#[inline(always)]
	pub fn mount<P: AsRef<Path>>(&mut self, url: IriBuf, path: P) {
		self.mount_points.push((path.as_ref().into(), url));
	}

	/// Returns the local file path associated to the given `url` if any.
	///
	/// The longest matching prefix wins. Query and fragment are ignored.
	pub fn filepath(&self, url: &Iri) -> Result<PathBuf, Error> {
		let url_str = url.as_str();
		let url_str = url_str.split(['?', '#']).next().unwrap_or(url_str);

		let mount_point = self
			.mount_points
			.iter()
			.filter(|(_, prefix)| url_str.starts_with(prefix.as_str()))
			.max_by_key(|(_, prefix)| prefix.as_str().len());

		match mount_point {
			Some((path, prefix)) => {
				let suffix = &url_str[prefix.as_str().len()..];
				let mut filepath = path.clone();
				for segment in suffix.split('/').filter(|s| !s.is_empty() && *s != ".") {
					if segment == ".." {
						return Err(Error::OutsideMountPoint(url.to_owned()));
					}

					filepath.push(segment)
				}

				if suffix.is_empty() || suffix.ends_with('/') {
					filepath.push("index.json")
				}

				Ok(filepath)
			}
			None => Err(Error::NoMountPoint(url.to_owned())),
		}
	}

	/// Finds the file to read for `filepath`, trying known extensions when
	/// the file itself does not exist.
	fn existing_file(filepath: PathBuf) -> PathBuf {
		if filepath.is_file() || filepath.extension().is_some() {
			return filepath;
		}

		EXTENSIONS
			.iter()
			.map(|ext| filepath.with_extension(ext))
			.find(|candidate| candidate.is_file())
			.unwrap_or(filepath)
	}

	fn read(&self, url: &Iri) -> Result<Document, Error> {
		let filepath = Self::existing_file(self.filepath(url)?);
		log::debug!("reading `{url}` from {}", filepath.display());

		let file = File::open(&filepath).map_err(|e| Error::IO(url.to_owned(), e))?;
		let mut buf_reader = BufReader::new(file);
		let mut contents = String::new();
		buf_reader
			.read_to_string(&mut contents)
			.map_err(|e| Error::IO(url.to_owned(), e))?;
		let document =
			serde_json::from_str(&contents).map_err(|e| Error::Parse(url.to_owned(), e))?;

		Ok(Document::new(
			Some(url.to_owned()),
			Some(mime::APPLICATION_JSON),
			document,
		))
	}
}

impl Loader for FsLoader {
	async fn load(&self, url: &Iri) -> Result<Document, LoadError> {
		self.read(url).map_err(|e| LoadError::new(url.to_owned(), e))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use static_iref::iri;

	fn loader() -> FsLoader {
		let mut loader = FsLoader::new();
		loader.mount(iri!("https://example.org/").to_owned(), "/data/example");
		loader.mount(
			iri!("https://example.org/activity/").to_owned(),
			"/data/activity",
		);
		loader
	}

	#[test]
	fn longest_mount_point_wins() {
		let path = loader()
			.filepath(iri!("https://example.org/activity/cmip.json"))
			.unwrap();
		assert_eq!(path, PathBuf::from("/data/activity/cmip.json"))
	}

	#[test]
	fn directory_maps_to_index() {
		let path = loader()
			.filepath(iri!("https://example.org/experiment/"))
			.unwrap();
		assert_eq!(path, PathBuf::from("/data/example/experiment/index.json"))
	}

	#[test]
	fn query_and_fragment_are_ignored() {
		let path = loader()
			.filepath(iri!("https://example.org/a/b.json?x=1#frag"))
			.unwrap();
		assert_eq!(path, PathBuf::from("/data/example/a/b.json"))
	}

	#[test]
	fn parent_segments_are_rejected() {
		assert!(matches!(
			loader().filepath(iri!("https://example.org/a/../../etc/passwd")),
			Err(Error::OutsideMountPoint(_))
		))
	}

	#[test]
	fn unmounted_url() {
		assert!(matches!(
			loader().filepath(iri!("https://other.org/a.json")),
			Err(Error::NoMountPoint(_))
		))
	}
}
