use serde_json::{Map, Value};

use crate::{Error, Kind};

/// Result of the document expansion algorithm.
///
/// It is just an alias for a list of node objects.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ExpandedDocument {
	nodes: Vec<Map<String, Value>>,
}

impl ExpandedDocument {
	pub fn new(nodes: Vec<Map<String, Value>>) -> Self {
		Self { nodes }
	}

	/// Reads an expanded document from its JSON form.
	///
	/// Accepts an array of node objects, or a single node object.
	pub fn from_json(value: Value) -> Result<Self, Error> {
		match value {
			Value::Array(items) => items
				.into_iter()
				.map(|item| match item {
					Value::Object(node) => Ok(node),
					other => Err(Error::NotAnObject(Kind::of(&other))),
				})
				.collect::<Result<_, _>>()
				.map(Self::new),
			Value::Object(node) => Ok(Self::new(vec![node])),
			other => Err(Error::NotAnObject(Kind::of(&other))),
		}
	}

	#[inline(always)]
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	#[inline(always)]
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn nodes(&self) -> &[Map<String, Value>] {
		&self.nodes
	}

	pub fn nodes_mut(&mut self) -> &mut Vec<Map<String, Value>> {
		&mut self.nodes
	}

	pub fn into_nodes(self) -> Vec<Map<String, Value>> {
		self.nodes
	}

	#[inline(always)]
	pub fn iter(&self) -> std::slice::Iter<'_, Map<String, Value>> {
		self.nodes.iter()
	}

	/// Converts the document into a JSON array of node objects.
	pub fn into_json(self) -> Value {
		Value::Array(self.nodes.into_iter().map(Value::Object).collect())
	}
}

impl From<ExpandedDocument> for Value {
	fn from(document: ExpandedDocument) -> Self {
		document.into_json()
	}
}

impl IntoIterator for ExpandedDocument {
	type IntoIter = std::vec::IntoIter<Map<String, Value>>;
	type Item = Map<String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.nodes.into_iter()
	}
}

impl<'a> IntoIterator for &'a ExpandedDocument {
	type IntoIter = std::slice::Iter<'a, Map<String, Value>>;
	type Item = &'a Map<String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
