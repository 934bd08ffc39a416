use std::cmp::Ordering;

use super::candidates::CandidateSet;
use super::embeddings::dot;

/// Features of one candidate used for ranking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Features {
	/// Dot product with the target vector.
	pub sim: f32,
	/// Complexity reduction over the target.
	pub complexity_drop: f32,
	/// Summed dot products with the context vectors, if any resolved.
	pub context: Option<f32>,
}

impl Features {
	/// Active feature values, in a fixed order.
	fn values(&self) -> impl Iterator<Item = f32> + '_ {
		[Some(self.sim), Some(self.complexity_drop), self.context].into_iter().flatten()
	}
}

/// Computes the ranking features of every candidate, in candidate order.
pub fn compute_features(candidates: &CandidateSet, context_vectors: &[&[f32]]) -> Vec<Features> {
	candidates
		.candidates
		.iter()
		.map(|c| Features {
			sim: dot(c.vector, candidates.target_vector),
			complexity_drop: c.complexity_drop,
			context: (!context_vectors.is_empty())
				.then(|| context_vectors.iter().map(|v| dot(c.vector, v)).sum()),
		})
		.collect()
}

/// Orders candidates by Borda count over their features, best first.
///
/// Each feature is sorted ascending on its own and every candidate gets its
/// position there as a score (0 for the lowest value). Scores are summed
/// across features and the highest total wins.
///
/// Ties are broken by candidate index, the lower one first, at both levels:
/// equal feature values rank the earlier candidate lower, and equal totals
/// put the earlier candidate first.
///
/// `features[i]` must hold the same number of values for every `i`.
pub fn borda_order(features: &[Vec<f32>]) -> Vec<usize> {
	let n = features.len();
	let feature_count = features.first().map_or(0, Vec::len);
	let mut totals = vec![0usize; n];

	for f in 0..feature_count {
		let mut order: Vec<usize> = (0..n).collect();
		order.sort_by(|&a, &b| features[a][f].total_cmp(&features[b][f]).then(a.cmp(&b)));
		for (rank, candidate) in order.into_iter().enumerate() {
			totals[candidate] += rank;
		}
	}

	let mut ranking: Vec<usize> = (0..n).collect();
	ranking.sort_by(|&a, &b| match totals[b].cmp(&totals[a]) {
		Ordering::Equal => a.cmp(&b),
		other => other,
	});
	ranking
}

/// Picks the best candidate, or `None` if there is no acceptable one.
///
/// The Borda winner is returned only if its similarity to the target is at
/// least `similarity_threshold`; a weaker winner means no replacement, even
/// when another candidate would pass the threshold.
pub fn rank<'e>(
	candidates: &CandidateSet<'e>,
	context_vectors: &[&[f32]],
	similarity_threshold: f32,
) -> Option<&'e str> {
	if candidates.is_empty() {
		return None;
	}

	let features = compute_features(candidates, context_vectors);
	let table: Vec<Vec<f32>> = features.iter().map(|f| f.values().collect()).collect();
	let best = *borda_order(&table).first()?;

	if features[best].sim >= similarity_threshold {
		Some(candidates.candidates[best].word)
	} else {
		None
	}
}
