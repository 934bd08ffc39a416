use super::complexity::ComplexityTable;
use super::config::SimplifierConfig;
use super::embeddings::EmbeddingStore;
use super::stopwords::Stopwords;
use super::token::is_protected;

/// Length below which spelling-variant detection is not applied.
const VARIANT_MIN_LEN: usize = 6;

/// Allowed difference between the shorter word and the shared run.
const VARIANT_SLACK: usize = 3;

/// A neighbour that survived every filter.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<'e> {
	pub word: &'e str,
	pub vector: &'e [f32],
	/// `complexity(target) - complexity(word)`, always > 0.
	pub complexity_drop: f32,
}

/// Simpler replacements for one target, in neighbour-retrieval order.
///
/// An empty set means the token cannot be simplified.
#[derive(Clone, Debug, Default)]
pub struct CandidateSet<'e> {
	pub target_vector: &'e [f32],
	pub candidates: Vec<Candidate<'e>>,
}

impl CandidateSet<'_> {
	pub fn is_empty(&self) -> bool {
		self.candidates.is_empty()
	}

	pub fn len(&self) -> usize {
		self.candidates.len()
	}
}

/// Read-only view over the resources needed to look words up.
///
/// Bundles the embedding space of one language with the complexity table
/// and the optional stopword list.
pub struct Lexicon<'e, E: EmbeddingStore + ?Sized> {
	pub embeddings: &'e E,
	pub complexities: &'e ComplexityTable,
	pub stopwords: Option<&'e Stopwords>,
	pub language: &'e str,
}

impl<'e, E: EmbeddingStore + ?Sized> Lexicon<'e, E> {
	/// Resolves a vector by exact form, then lowercase form.
	pub fn resolve(&self, word: &str) -> Option<&'e [f32]> {
		if word.is_empty() {
			return None;
		}
		self.embeddings
			.get_vector(self.language, word)
			.or_else(|| self.embeddings.get_vector(self.language, &word.to_lowercase()))
	}

	fn is_stopword(&self, word: &str) -> bool {
		self.stopwords.is_some_and(|s| s.contains(word))
	}

	/// Produces the simpler candidates for `target`.
	///
	/// Returns an empty set when the target is protected (proper noun,
	/// acronym, number), already simple, a stopword or out of vocabulary.
	/// Every neighbour must then pass all of these filters:
	/// - neither word contains the other
	/// - no near-identical spelling for words of 6+ characters
	/// - not a stopword
	/// - complexity lower than the target's by at least the drop threshold
	pub fn find_candidates(&self, target: &str, config: &SimplifierConfig) -> CandidateSet<'e> {
		if target.is_empty() || is_protected(target) {
			return CandidateSet::default();
		}

		let target_complexity = self.complexities.complexity(target);
		if target_complexity <= config.complexity_threshold || self.is_stopword(target) {
			return CandidateSet::default();
		}

		let Some(target_vector) = self.resolve(target) else {
			return CandidateSet::default();
		};

		let mut candidates = Vec::new();
		for word in self
			.embeddings
			.nearest_neighbors(target_vector, self.language, config.num_candidates, true)
		{
			if word.contains(target) || target.contains(word) {
				continue;
			}
			if is_spelling_variant(word, target) || self.is_stopword(word) {
				continue;
			}

			let drop = target_complexity - self.complexities.complexity(word);
			if drop <= 0.0 || drop < config.complexity_drop_threshold {
				continue;
			}

			// Neighbours come from the same store, but an implementation may
			// still fail to resolve one
			let Some(vector) = self.embeddings.get_vector(self.language, word) else {
				continue;
			};
			candidates.push(Candidate { word, vector, complexity_drop: drop });
		}

		CandidateSet { target_vector, candidates }
	}
}

/// Two long words sharing almost all of their letters in one run.
fn is_spelling_variant(a: &str, b: &str) -> bool {
	let (len_a, len_b) = (a.chars().count(), b.chars().count());
	if len_a < VARIANT_MIN_LEN || len_b < VARIANT_MIN_LEN {
		return false;
	}
	longest_common_run(a, b) >= len_a.min(len_b) - VARIANT_SLACK
}

/// Length in characters of the longest run shared by `a` and `b`.
pub fn longest_common_run(a: &str, b: &str) -> usize {
	let a: Vec<char> = a.chars().collect();
	let b: Vec<char> = b.chars().collect();

	// Rolling row of the classic dynamic-programming table
	let mut previous = vec![0usize; b.len() + 1];
	let mut current = vec![0usize; b.len() + 1];
	let mut longest = 0;

	for ca in &a {
		for (j, cb) in b.iter().enumerate() {
			current[j + 1] = if ca == cb { previous[j] + 1 } else { 0 };
			longest = longest.max(current[j + 1]);
		}
		std::mem::swap(&mut previous, &mut current);
	}
	longest
}
