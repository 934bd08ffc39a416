/// Characters detached from either end of a token before lookup.
pub const PUNCTUATION: &[char] = &[
	'.', ',', '!', ':', '?', ';', '-', ')', '(', '[', ']', '{', '}', '/', '\\', '"', '\'',
];

/// A whitespace-delimited token split into its lookup word and at most one
/// punctuation character on each side.
///
/// Only a single character is stripped per side: `"((word))"` yields the
/// word `"(word)"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
	pub leading: Option<char>,
	pub word: &'a str,
	pub trailing: Option<char>,
}

impl<'a> Token<'a> {
	/// Detaches one leading and one trailing punctuation character.
	pub fn parse(raw: &'a str) -> Self {
		let mut token = Token { leading: None, word: raw, trailing: None };

		if let Some(first) = token.word.chars().next().filter(|c| PUNCTUATION.contains(c)) {
			token.leading = Some(first);
			token.word = &token.word[first.len_utf8()..];
		}
		if let Some(last) = token.word.chars().next_back().filter(|c| PUNCTUATION.contains(c)) {
			token.trailing = Some(last);
			token.word = &token.word[..token.word.len() - last.len_utf8()];
		}
		token
	}

	/// Renders `replacement` with the punctuation stripped from this token.
	pub fn rebuild(&self, replacement: &str) -> String {
		let mut out = String::with_capacity(replacement.len() + 2);
		out.extend(self.leading);
		out.push_str(replacement);
		out.extend(self.trailing);
		out
	}
}

/// True if `word` has cased letters and none of them is lowercase.
pub fn is_all_uppercase(word: &str) -> bool {
	let mut cased = false;
	for c in word.chars() {
		if c.is_lowercase() {
			return false;
		}
		cased |= c.is_uppercase();
	}
	cased
}

/// True if every cased run in `word` starts with an uppercase letter
/// followed only by lowercase ones (`"Paris"`, `"Jean-Luc"`).
pub fn is_title_case(word: &str) -> bool {
	let mut cased = false;
	let mut previous_is_cased = false;
	for c in word.chars() {
		if c.is_uppercase() {
			if previous_is_cased {
				return false;
			}
			previous_is_cased = true;
			cased = true;
		} else if c.is_lowercase() {
			if !previous_is_cased {
				return false;
			}
			previous_is_cased = true;
			cased = true;
		} else {
			previous_is_cased = false;
		}
	}
	cased
}

/// True if `word` is non-empty and made only of numeric characters.
pub fn is_numeric(word: &str) -> bool {
	!word.is_empty() && word.chars().all(char::is_numeric)
}

/// Words that look like proper nouns, acronyms or numbers are left alone.
pub fn is_protected(word: &str) -> bool {
	is_all_uppercase(word) || is_title_case(word) || is_numeric(word)
}
