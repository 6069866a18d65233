use std::convert::TryFrom;
use std::fmt;

/// Container mapping of a term definition.
///
/// Only ordered (`@list`) and unordered (`@set`) containers change how a
/// property value is expanded and compacted.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Container {
	List,
	Set,
}

impl Container {
	pub fn as_str(&self) -> &'static str {
		match self {
			Container::List => "@list",
			Container::Set => "@set",
		}
	}
}

impl<'a> TryFrom<&'a str> for Container {
	type Error = &'a str;

	fn try_from(s: &'a str) -> Result<Container, &'a str> {
		match s {
			"@list" => Ok(Container::List),
			"@set" => Ok(Container::Set),
			_ => Err(s),
		}
	}
}

impl fmt::Display for Container {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}
