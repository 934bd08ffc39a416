use std::collections::HashSet;

/// A set of function words that are never simplified and never used as
/// replacements.
///
/// Entries are stored lowercased and lookups lowercase their input.
#[derive(Clone, Debug, Default)]
pub struct Stopwords {
	words: HashSet<String>,
}

impl Stopwords {
	/// Builds a stopword set from any list of words.
	pub fn new<I, S>(words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self { words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect() }
	}

	/// Returns true if the lowercase form of `word` is a stopword.
	pub fn contains(&self, word: &str) -> bool {
		self.words.contains(&word.to_lowercase())
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}
}
