use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimplifyError};
use super::candidates::Lexicon;
use super::complexity::ComplexityTable;
use super::config::SimplifierConfig;
use super::embeddings::{EmbeddingStore, Embeddings};
use super::ranking::rank;
use super::stopwords::Stopwords;
use super::token::Token;

/// One replaced token of a document.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Substitution {
	/// Position of the token in the whitespace-split text.
	pub index: usize,
	/// The token without its surrounding punctuation.
	pub original: String,
	/// The simpler word that replaced it.
	pub replacement: String,
}

/// Result of simplifying one document.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Simplification {
	/// Tokens joined with single spaces, replacements applied.
	pub text: String,
	/// Replacements in token order.
	pub substitutions: Vec<Substitution>,
}

/// High-level lexical simplifier.
///
/// # Responsibilities
/// - Own the immutable resources (embeddings, complexity table, stopwords)
/// - Decide, token by token, whether a simpler word should be used
/// - Rewrite text while keeping one punctuation character on each side
///
/// Nothing is mutated after construction, so one instance can serve any
/// number of threads.
#[derive(Debug)]
pub struct Simplifier<E = Embeddings> {
	embeddings: E,
	complexities: ComplexityTable,
	stopwords: Option<Stopwords>,
	config: SimplifierConfig,
	language: String,
}

impl<E: EmbeddingStore> Simplifier<E> {
	/// Creates a simplifier from loaded resources.
	///
	/// # Errors
	/// - `Config` if an option is out of range
	/// - `EmptyFrequencyTable` if `word_frequencies` is empty
	/// - `UnknownLanguage` if the store has no space for `language`
	pub fn new(
		embeddings: E,
		word_frequencies: &HashMap<String, u64>,
		config: SimplifierConfig,
		stopwords: Option<Stopwords>,
		language: &str,
	) -> Result<Self> {
		let complexities = ComplexityTable::build(word_frequencies)?;
		Self::with_complexities(embeddings, complexities, config, stopwords, language)
	}

	/// Creates a simplifier from an already built complexity table.
	///
	/// # Errors
	/// - `Config` if an option is out of range
	/// - `UnknownLanguage` if the store has no space for `language`
	pub fn with_complexities(
		embeddings: E,
		complexities: ComplexityTable,
		config: SimplifierConfig,
		stopwords: Option<Stopwords>,
		language: &str,
	) -> Result<Self> {
		config.validate()?;
		if !embeddings.has_language(language) {
			return Err(SimplifyError::UnknownLanguage(language.to_owned()));
		}
		info!("Simplifier ready: {:?}", config);

		Ok(Self { embeddings, complexities, stopwords, config, language: language.to_owned() })
	}

	pub fn config(&self) -> &SimplifierConfig {
		&self.config
	}

	pub fn complexities(&self) -> &ComplexityTable {
		&self.complexities
	}

	pub fn language(&self) -> &str {
		&self.language
	}

	fn lexicon(&self) -> Lexicon<'_, E> {
		Lexicon {
			embeddings: &self.embeddings,
			complexities: &self.complexities,
			stopwords: self.stopwords.as_ref(),
			language: &self.language,
		}
	}

	/// Simplifies a whole text.
	///
	/// The text is split on whitespace; the output joins the tokens with
	/// single spaces, so original line breaks and spacing are not kept.
	pub fn simplify(&self, text: &str) -> Simplification {
		let tokens: Vec<&str> = text.split_whitespace().collect();
		let mut rewritten: Vec<String> = Vec::with_capacity(tokens.len());
		let mut substitutions = Vec::new();

		for index in 0..tokens.len() {
			let token = Token::parse(tokens[index]);
			match self.simplify_token(&tokens, index) {
				Some(replacement) => {
					rewritten.push(token.rebuild(replacement));
					substitutions.push(Substitution {
						index,
						original: token.word.to_owned(),
						replacement: replacement.to_owned(),
					});
				}
				None => rewritten.push(tokens[index].to_owned()),
			}
		}

		Simplification { text: rewritten.join(" "), substitutions }
	}

	/// Decides the replacement of `tokens[index]`, if any.
	///
	/// Returns the bare replacement word, without punctuation.
	pub fn simplify_token(&self, tokens: &[&str], index: usize) -> Option<&str> {
		let lexicon = self.lexicon();
		let target = Token::parse(tokens.get(index)?).word;

		let candidates = lexicon.find_candidates(target, &self.config);
		if candidates.is_empty() {
			return None;
		}

		let context = self.context_vectors(tokens, index);
		let choice = rank(&candidates, &context, self.config.similarity_threshold);
		match choice {
			Some(word) => debug!("Token {index}: {target:?} -> {word:?} ({} candidates)", candidates.len()),
			None => debug!("Token {index}: {target:?} kept, best candidate below similarity threshold"),
		}
		choice
	}

	/// Vectors of the resolvable tokens within the context window.
	///
	/// The window spans `context_window_size` tokens on each side of
	/// `index`, clipped to the text; unresolvable tokens are dropped.
	fn context_vectors(&self, tokens: &[&str], index: usize) -> Vec<&[f32]> {
		let lexicon = self.lexicon();
		let window = self.config.context_window_size;
		let start = index.saturating_sub(window);
		let end = index.saturating_add(window).min(tokens.len().saturating_sub(1));

		(start..=end)
			.filter(|&i| i != index)
			.filter_map(|i| lexicon.resolve(Token::parse(tokens[i]).word))
			.collect()
	}
}

impl<E: EmbeddingStore + Sync> Simplifier<E> {
	/// Simplifies independent documents in parallel.
	///
	/// - Splits the documents into one chunk per CPU.
	/// - Spawns scoped threads that simplify each chunk.
	/// - Collects results through an MPSC channel.
	///
	/// Results are returned in input order and are identical to calling
	/// `simplify` on each document in turn.
	pub fn simplify_documents<S: AsRef<str> + Sync>(&self, documents: &[S]) -> Vec<Simplification> {
		if documents.is_empty() {
			return Vec::new();
		}
		let chunks = num_cpus::get().max(1);
		let chunk_size = documents.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for (chunk_index, chunk) in documents.chunks(chunk_size).enumerate() {
				let tx = tx.clone();
				scope.spawn(move || {
					for (offset, document) in chunk.iter().enumerate() {
						let position = chunk_index * chunk_size + offset;
						let result = self.simplify(document.as_ref());
						info!(
							"Simplified document {}/{} ({} substitutions)",
							position + 1,
							documents.len(),
							result.substitutions.len()
						);
						// The receiver outlives the scope
						let _ = tx.send((position, result));
					}
				});
			}
		});
		drop(tx);

		let mut results: Vec<Option<Simplification>> = vec![None; documents.len()];
		for (position, result) in rx.iter() {
			results[position] = Some(result);
		}
		results.into_iter().map(Option::unwrap_or_default).collect()
	}
}
