use std::collections::HashMap;

use log::{info, warn};

use crate::error::{Result, SimplifyError};

/// Complexity assumed for words the frequency corpus never saw.
pub const UNKNOWN_COMPLEXITY: f32 = 1.0;

/// Complexity given to every word when all frequencies are equal.
pub const UNIFORM_COMPLEXITY: f32 = 0.5;

/// Maps words to a normalized complexity score in `[0, 1]`.
///
/// The raw score of a word with frequency `f` is `1 / log2(f + 2)`, which
/// decreases as the word gets more frequent. Raw scores are then min-max
/// normalized so the most frequent word scores `0.0` and the least
/// frequent one scores `1.0`.
///
/// # Invariants
/// - Every stored value is finite and within `[0, 1]`
/// - A more frequent word never has a higher complexity than a rarer one
/// - The table is immutable once built
#[derive(Clone, Debug)]
pub struct ComplexityTable {
	complexities: HashMap<String, f32>,
}

impl ComplexityTable {
	/// Builds the table from raw frequency counts.
	///
	/// # Errors
	/// Returns `EmptyFrequencyTable` if `word_frequencies` is empty.
	///
	/// # Notes
	/// If every word has the same frequency the normalization denominator
	/// would be zero; all words then get `UNIFORM_COMPLEXITY`.
	pub fn build(word_frequencies: &HashMap<String, u64>) -> Result<Self> {
		let (Some(&min_freq), Some(&max_freq)) =
			(word_frequencies.values().min(), word_frequencies.values().max())
		else {
			return Err(SimplifyError::EmptyFrequencyTable);
		};

		if min_freq == max_freq {
			warn!(
				"All {} words share frequency {}; using uniform complexity {}",
				word_frequencies.len(),
				min_freq,
				UNIFORM_COMPLEXITY
			);
			let complexities = word_frequencies
				.keys()
				.map(|w| (w.clone(), UNIFORM_COMPLEXITY))
				.collect();
			return Ok(Self { complexities });
		}

		let min_raw = raw_complexity(max_freq);
		let max_raw = raw_complexity(min_freq);
		let range = max_raw - min_raw;

		let complexities = word_frequencies
			.iter()
			.map(|(word, &freq)| {
				let norm = (raw_complexity(freq) - min_raw) / range;
				(word.clone(), norm.clamp(0.0, 1.0) as f32)
			})
			.collect();

		info!("Built complexity table for {} words", word_frequencies.len());
		Ok(Self { complexities })
	}

	/// Builds a table from precomputed scores, clamped to `[0, 1]`.
	///
	/// Non-finite scores are treated as unknown words.
	pub fn from_scores<I, S>(scores: I) -> Self
	where
		I: IntoIterator<Item = (S, f32)>,
		S: Into<String>,
	{
		let complexities = scores
			.into_iter()
			.filter(|(_, c)| c.is_finite())
			.map(|(w, c)| (w.into(), c.clamp(0.0, 1.0)))
			.collect();
		Self { complexities }
	}

	/// Returns the complexity of `word`.
	///
	/// Looks up the exact form first, then the lowercase form, and falls
	/// back to `UNKNOWN_COMPLEXITY` for unseen words.
	pub fn complexity(&self, word: &str) -> f32 {
		if let Some(c) = self.complexities.get(word) {
			return *c;
		}
		self.complexities
			.get(&word.to_lowercase())
			.copied()
			.unwrap_or(UNKNOWN_COMPLEXITY)
	}

	/// Number of words with a known complexity.
	pub fn len(&self) -> usize {
		self.complexities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.complexities.is_empty()
	}
}

/// `1 / log2(f + 2)`; the offset keeps the logarithm above zero for f ∈ {0, 1}.
fn raw_complexity(frequency: u64) -> f64 {
	1.0 / (frequency as f64 + 2.0).log2()
}
