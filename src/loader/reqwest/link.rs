use hashbrown::HashMap;
use iref::{IriRef, IriRefBuf};
use reqwest::header::HeaderValue;

/// Parsed `Link` header value.
pub struct Link {
	href: IriRefBuf,
	params: HashMap<String, String>,
}

impl Link {
	/// Parses a `Link` header value of the form
	/// `<href>; key="value"; ...`.
	///
	/// Parameter values may be quoted. Returns `None` if the header is not
	/// valid UTF-8 or malformed.
	pub fn new(value: &HeaderValue) -> Option<Self> {
		let value = value.to_str().ok()?.trim();
		let rest = value.strip_prefix('<')?;
		let (href, rest) = rest.split_once('>')?;
		let href = IriRefBuf::new(href.to_owned()).ok()?;

		let mut params = HashMap::new();
		for param in rest.split(';') {
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

		Some(Self { href, params })
	}

	pub fn href(&self) -> &IriRef {
		self.href.as_iri_ref()
	}

	pub fn rel(&self) -> Option<&str> {
		self.params.get("rel").map(String::as_str)
	}

	pub fn type_(&self) -> Option<&str> {
		self.params.get("type").map(String::as_str)
	}

	/// Checks if this link points to an alternate JSON-LD representation.
	pub fn is_json_ld_alternate(&self) -> bool {
		self.rel() == Some("alternate") && self.type_() == Some("application/ld+json")
	}
}
