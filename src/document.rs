use iref::{Iri, IriBuf};
use mime::Mime;
use serde_json::{Map, Value};

use crate::{Error, Keyword, Kind};

/// Loaded document.
///
/// Stores the content of a loaded document along with its original URL.
/// Documents are never modified once loaded.
#[derive(Debug, Clone)]
pub struct Document {
	/// The URL of the loaded document.
	///
	/// Relative references found in the document (including `@context`
	/// URLs) are resolved against it.
	pub url: Option<IriBuf>,

	/// The HTTP `Content-Type` header value of the loaded document, exclusive
	/// of any optional parameters.
	pub content_type: Option<Mime>,

	/// The retrieved document.
	pub document: Value,
}

impl Document {
	/// Creates a new document.
	pub fn new(url: Option<IriBuf>, content_type: Option<Mime>, document: Value) -> Self {
		Self {
			url,
			content_type,
			document,
		}
	}

	/// Maps the content of the document.
	pub fn map(self, f: impl FnOnce(Value) -> Value) -> Self {
		Self {
			url: self.url,
			content_type: self.content_type,
			document: f(self.document),
		}
	}

	/// Returns a reference to the URL of the loaded document.
	pub fn url(&self) -> Option<&Iri> {
		self.url.as_deref()
	}

	/// Returns the HTTP `Content-Type` header value of the loaded document,
	/// exclusive of any optional parameters.
	pub fn content_type(&self) -> Option<&Mime> {
		self.content_type.as_ref()
	}

	/// Returns a reference to the content of the document.
	pub fn document(&self) -> &Value {
		&self.document
	}

	/// Drops the URL and returns the content of the document.
	pub fn into_document(self) -> Value {
		self.document
	}

	/// Sets the URL of the document.
	pub fn set_url(&mut self, url: Option<IriBuf>) {
		self.url = url
	}

	/// Returns the content of the document as a JSON object.
	pub fn as_object(&self) -> Result<&Map<String, Value>, Error> {
		self.document
			.as_object()
			.ok_or_else(|| Error::NotAnObject(Kind::of(&self.document)))
	}

	/// Returns the `@context` entry of the document, if any.
	pub fn context(&self) -> Option<&Value> {
		self.document.get(Keyword::Context.as_str())
	}

	/// Returns the identifier of the document (`@id`, or the `id` alias).
	pub fn id(&self) -> Option<&str> {
		self.document
			.get(Keyword::Id.as_str())
			.or_else(|| self.document.get("id"))
			.and_then(Value::as_str)
	}

	/// Returns the types of the document (`@type`, or the `type` alias).
	pub fn types(&self) -> Vec<&str> {
		match self
			.document
			.get(Keyword::Type.as_str())
			.or_else(|| self.document.get("type"))
		{
			Some(Value::String(t)) => vec![t.as_str()],
			Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
			_ => Vec::new(),
		}
	}
}
