use std::sync::Arc;

use iref::{Iri, IriBuf};

/// Context resolution stack.
///
/// Contains the list of the remote contexts currently being resolved, to
/// detect loops. The stack is persistent: entering a context returns a new
/// stack sharing its tail with the current one, and leaving it is just
/// dropping that new stack, whatever the exit path.
#[derive(Clone, Default)]
pub struct ProcessingStack {
	head: Option<Arc<StackNode>>,
}

impl ProcessingStack {
	/// Creates a new empty processing stack.
	pub fn new() -> Self {
		Self::default()
	}

	/// Checks if the stack is empty.
	pub fn is_empty(&self) -> bool {
		self.head.is_none()
	}

	/// Number of contexts being resolved.
	pub fn depth(&self) -> usize {
		let mut depth = 0;
		let mut node = self.head.as_deref();
		while let Some(n) = node {
			depth += 1;
			node = n.previous.as_deref();
		}
		depth
	}

	/// Checks if the given URL is already in the stack.
	///
	/// This is used for loop detection.
	pub fn cycle(&self, url: &Iri) -> bool {
		let mut node = self.head.as_deref();
		while let Some(n) = node {
			if n.url == *url {
				return true;
			}
			node = n.previous.as_deref();
		}
		false
	}

	/// Enters the given URL, unless it is already in the stack.
	///
	/// Returns the stack to use while resolving `url`, or `None` if a loop
	/// has been detected. `self` is left unchanged.
	pub fn enter(&self, url: &Iri) -> Option<Self> {
		if self.cycle(url) {
			None
		} else {
			Some(Self {
				head: Some(Arc::new(StackNode {
					previous: self.head.clone(),
					url: url.to_owned(),
				})),
			})
		}
	}
}

/// Single frame of the context processing stack.
struct StackNode {
	/// Previous frame.
	previous: Option<Arc<StackNode>>,

	/// URL of the context being resolved.
	url: IriBuf,
}

#[cfg(test)]
mod tests {
	use super::*;
	use static_iref::iri;

	#[test]
	fn enter_detects_cycles() {
		let root = ProcessingStack::new();
		let a = root.enter(iri!("https://example.org/a.json")).unwrap();
		let b = a.enter(iri!("https://example.org/b.json")).unwrap();

		assert_eq!(b.depth(), 2);
		assert!(b.enter(iri!("https://example.org/a.json")).is_none());
		assert!(root.is_empty());
		assert!(!root.cycle(iri!("https://example.org/a.json")))
	}

	#[test]
	fn siblings_do_not_conflict() {
		let root = ProcessingStack::new();
		let a = root.enter(iri!("https://example.org/a.json")).unwrap();
		drop(a);
		assert!(root.enter(iri!("https://example.org/a.json")).is_some())
	}
}
