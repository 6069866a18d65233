use hashbrown::HashMap;
use mime::Mime;
use reqwest::header::HeaderValue;
use std::str::FromStr;

/// Parsed `Content-Type` header value.
pub struct ContentType {
	media_type: Mime,
	params: HashMap<String, String>,
}

impl ContentType {
	/// Parses a `Content-Type` header value.
	///
	/// Parameter values may be quoted. Returns `None` if the header is not
	/// valid UTF-8 or its media type cannot be parsed.
	pub fn new(value: &HeaderValue) -> Option<Self> {
		let value = value.to_str().ok()?;
		let mut parts = value.split(';');
		let media_type = Mime::from_str(parts.next()?.trim()).ok()?;

		let mut params = HashMap::new();
		for param in parts {
			let param = param.trim();
			if param.is_empty() {
				continue;
			}

			let (key, value) = param.split_once('=')?;
			let value = value.trim();
			let value = value
				.strip_prefix('"')
				.and_then(|v| v.strip_suffix('"'))
				.unwrap_or(value);
			params.insert(key.trim().to_ascii_lowercase(), value.to_owned());
		}

		Some(Self { media_type, params })
	}

	/// Checks if the media type denotes a JSON document
	/// (`application/json`, `application/ld+json` or any `+json` suffix).
	pub fn is_json(&self) -> bool {
		(self.media_type.type_() == mime::APPLICATION && self.media_type.subtype() == mime::JSON)
			|| self.media_type.suffix() == Some(mime::JSON)
	}

	pub fn media_type(&self) -> &Mime {
		&self.media_type
	}

	pub fn into_media_type(self) -> Mime {
		self.media_type
	}

	pub fn profile(&self) -> Option<&str> {
		self.params.get("profile").map(String::as_str)
	}
}
