use std::fmt;

/// Cache key: an ordered tuple of string parts, e.g. `["reports"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
  pub fn new<I, S>(parts: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self(parts.into_iter().map(Into::into).collect())
  }

  pub fn parts(&self) -> &[String] {
    &self.0
  }
}

impl From<&str> for QueryKey {
  fn from(part: &str) -> Self {
    Self(vec![part.to_string()])
  }
}

impl fmt::Display for QueryKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}]", self.0.join(", "))
  }
}
