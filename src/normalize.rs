//! Normalization of linked values.
//!
//! Identifiers referenced by linked fields are stored lower-case with `-`
//! separators. Absolute URIs and names prefixed by an upper-case vocabulary
//! code (`CMIP6:...`) are left alone.
use serde_json::{Map, Value};
use std::borrow::Cow;

use crate::context::LinkedFields;

/// Schemes identifying absolute URIs.
const ABSOLUTE_SCHEMES: [&str; 4] = ["http://", "https://", "urn:", "mailto:"];

/// Checks if the given prefix is an upper-case vocabulary code.
///
/// It must contain at least one cased letter and no lower-case letter.
fn is_upper_case_prefix(prefix: &str) -> bool {
	prefix.chars().any(char::is_uppercase) && !prefix.chars().any(char::is_lowercase)
}

/// Checks if the given linked value is exempt from normalization.
pub fn is_preserved(value: &str) -> bool {
	if ABSOLUTE_SCHEMES
		.iter()
		.any(|scheme| {
			value
				.get(..scheme.len())
				.map_or(false, |start| start.eq_ignore_ascii_case(scheme))
		})
	{
		return true;
	}

	match value.split_once(':') {
		Some((prefix, _)) => is_upper_case_prefix(prefix),
		None => false,
	}
}

/// Normalizes a linked value: lower-case, `_` replaced by `-`.
///
/// Idempotent.
pub fn normalize_linked_value(value: &str) -> Cow<'_, str> {
	if is_preserved(value) {
		return Cow::Borrowed(value);
	}

	if value.chars().any(|c| c == '_' || c.is_uppercase()) {
		Cow::Owned(value.to_lowercase().replace('_', "-"))
	} else {
		Cow::Borrowed(value)
	}
}

/// Normalizes the values of the linked fields of a compacted document,
/// recursively through nested objects.
///
/// Only string values (and strings in arrays) of linked fields are
/// normalized. Returns `true` if the document changed.
pub fn normalize_document(document: &mut Map<String, Value>, linked: &LinkedFields) -> bool {
	let mut changed = false;

	for (key, value) in document.iter_mut() {
		if linked.contains(key) {
			changed |= normalize_linked(value, linked)
		} else {
			changed |= normalize_nested(value, linked)
		}
	}

	changed
}

fn normalize_linked(value: &mut Value, linked: &LinkedFields) -> bool {
	match value {
		Value::String(s) => {
			let normalized = match normalize_linked_value(s) {
				Cow::Owned(normalized) => Some(normalized),
				Cow::Borrowed(_) => None,
			};

			match normalized {
				Some(normalized) => {
					*s = normalized;
					true
				}
				None => false,
			}
		}
		Value::Array(items) => items
			.iter_mut()
			.fold(false, |changed, item| normalize_linked(item, linked) | changed),
		Value::Object(entries) => normalize_document(entries, linked),
		_ => false,
	}
}

fn normalize_nested(value: &mut Value, linked: &LinkedFields) -> bool {
	match value {
		Value::Array(items) => items
			.iter_mut()
			.fold(false, |changed, item| normalize_nested(item, linked) | changed),
		Value::Object(entries) => normalize_document(entries, linked),
		_ => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::context::ResolvedContext;
	use serde_json::json;

	#[test]
	fn normalize_values() {
		assert_eq!(normalize_linked_value("CMIP6_Historical_Run"), "cmip6-historical-run");
		assert_eq!(normalize_linked_value("cmip6-historical-run"), "cmip6-historical-run");
		assert_eq!(
			normalize_linked_value("https://Example.com/Path"),
			"https://Example.com/Path"
		);
		assert_eq!(normalize_linked_value("CMIP6:SomeTerm"), "CMIP6:SomeTerm");
		assert_eq!(normalize_linked_value("urn:X_Y"), "urn:X_Y");
		assert_eq!(normalize_linked_value("Cmip6:Some_Term"), "cmip6:some-term");
		assert_eq!(normalize_linked_value("6:Some_Term"), "6:some-term")
	}

	#[test]
	fn idempotence() {
		for value in ["Sea_Ice", "ocean-BGC", "CMIP6:Term_A", "mailto:A_B@x.org", "x"] {
			let once = normalize_linked_value(value).into_owned();
			assert_eq!(normalize_linked_value(&once), once)
		}
	}

	#[test]
	fn only_linked_strings_change() {
		let ctx = ResolvedContext::from_definition(
			json!({
				"activity": { "@id": "https://example.org/activity", "@type": "@id" },
				"name": "https://schema.org/name"
			})
			.as_object()
			.unwrap(),
			None,
			false,
			|_| (),
		);
		let linked = ctx.linked_fields();

		let mut document = json!({
			"name": "Sea_Ice",
			"activity": ["CMIP_Main", 12, "https://x.org/A_B"],
			"nested": { "activity": "Scenario_MIP", "name": "Keep_Me" }
		});

		assert!(normalize_document(document.as_object_mut().unwrap(), &linked));
		assert_eq!(
			document,
			json!({
				"name": "Sea_Ice",
				"activity": ["cmip-main", 12, "https://x.org/A_B"],
				"nested": { "activity": "scenario-mip", "name": "Keep_Me" }
			})
		);
		assert!(!normalize_document(document.as_object_mut().unwrap(), &linked))
	}
}
