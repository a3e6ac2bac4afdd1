// Tags - the classification labels carried by an account
//
// Semantically a set, physically an ordered sequence. Every operation that
// changes tags returns a new value; a record handed out by the repository is
// never mutated behind the caller's back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn new() -> Self {
        Tags(Vec::new())
    }

    pub fn index_of(&self, tag: &str) -> Option<usize> {
        self.0.iter().position(|t| t == tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.index_of(tag).is_some()
    }

    pub fn contains_all<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().all(|t| self.contains(t.as_ref()))
    }

    /// Copy with `tag` appended, unless already present
    pub fn with(&self, tag: &str) -> Tags {
        let mut next = self.clone();
        if !next.contains(tag) {
            next.0.push(tag.to_string());
        }
        next
    }

    /// Copy with every occurrence of `tag` removed
    pub fn without(&self, tag: &str) -> Tags {
        Tags(self.0.iter().filter(|t| *t != tag).cloned().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for Tags {
    fn from(tags: Vec<String>) -> Self {
        Tags(tags)
    }
}

impl From<&[&str]> for Tags {
    fn from(tags: &[&str]) -> Self {
        Tags(tags.iter().map(|t| t.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Tags {
    fn from(tags: [&str; N]) -> Self {
        Tags(tags.iter().map(|t| t.to_string()).collect())
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_does_not_duplicate() {
        let tags = Tags::from(["balanceSheet", "detail"]);
        let next = tags.with("detail");

        assert_eq!(next.len(), 2);
        assert_eq!(tags.with("summary").as_slice().last().unwrap(), "summary");
    }

    #[test]
    fn test_without_keeps_source_untouched() {
        let tags = Tags::from(["balanceSheet", "detail", "increaseOnDebit"]);
        let next = tags.without("detail");

        assert!(!next.contains("detail"));
        assert!(tags.contains("detail"));
        assert_eq!(next.as_slice(), ["balanceSheet", "increaseOnDebit"]);
    }

    #[test]
    fn test_contains_all() {
        let tags = Tags::from(["balanceSheet", "detail"]);
        let none: [&str; 0] = [];

        assert!(tags.contains_all(&["detail", "balanceSheet"]));
        assert!(!tags.contains_all(&["detail", "summary"]));
        assert!(tags.contains_all(&none));
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let tags = Tags::from(["balanceSheet", "detail"]);
        let json = serde_json::to_string(&tags).unwrap();

        assert_eq!(json, r#"["balanceSheet","detail"]"#);
    }
}
