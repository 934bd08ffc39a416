use serde::{Deserialize, Serialize};

use crate::error::{Result, SimplifyError};

/// Parameters of the simplification algorithm.
///
/// # Responsibilities
/// - Hold the thresholds used by candidate filtering and ranking
/// - Reject values outside their documented ranges
///
/// # Invariants (after `validate`)
/// - `complexity_threshold`, `similarity_threshold` and
///   `complexity_drop_threshold` are finite and within `[0, 1]`
/// - `num_candidates > 0`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimplifierConfig {
	/// Words at or below this complexity are never replaced.
	pub complexity_threshold: f32,

	/// Number of embedding neighbours considered per target word.
	pub num_candidates: usize,

	/// Minimal similarity between the target and the winning candidate.
	pub similarity_threshold: f32,

	/// Minimal complexity reduction a candidate must offer.
	pub complexity_drop_threshold: f32,

	/// Number of tokens on each side used as context.
	pub context_window_size: usize,
}

impl Default for SimplifierConfig {
	fn default() -> Self {
		Self {
			complexity_threshold: 0.2,
			num_candidates: 10,
			similarity_threshold: 0.55,
			complexity_drop_threshold: 0.025,
			context_window_size: 5,
		}
	}
}

impl SimplifierConfig {
	/// Checks every option against its documented range.
	///
	/// # Errors
	/// Returns `SimplifyError::Config` naming the first offending option.
	pub fn validate(&self) -> Result<()> {
		unit_interval("complexity_threshold", self.complexity_threshold)?;
		unit_interval("similarity_threshold", self.similarity_threshold)?;
		unit_interval("complexity_drop_threshold", self.complexity_drop_threshold)?;
		if self.num_candidates == 0 {
			return Err(SimplifyError::config("num_candidates must be greater than 0"));
		}
		Ok(())
	}

	/// Sets the complexity threshold (0.0..=1.0).
	pub fn set_complexity_threshold(&mut self, value: f32) -> Result<()> {
		unit_interval("complexity_threshold", value)?;
		self.complexity_threshold = value;
		Ok(())
	}

	/// Sets the similarity threshold (0.0..=1.0).
	pub fn set_similarity_threshold(&mut self, value: f32) -> Result<()> {
		unit_interval("similarity_threshold", value)?;
		self.similarity_threshold = value;
		Ok(())
	}

	/// Sets the minimal complexity drop (0.0..=1.0).
	pub fn set_complexity_drop_threshold(&mut self, value: f32) -> Result<()> {
		unit_interval("complexity_drop_threshold", value)?;
		self.complexity_drop_threshold = value;
		Ok(())
	}

	/// Sets the number of neighbours to retrieve (> 0).
	pub fn set_num_candidates(&mut self, value: usize) -> Result<()> {
		if value == 0 {
			return Err(SimplifyError::config("num_candidates must be greater than 0"));
		}
		self.num_candidates = value;
		Ok(())
	}
}

fn unit_interval(name: &str, value: f32) -> Result<()> {
	if !(0.0..=1.0).contains(&value) {
		return Err(SimplifyError::config(format!("{name} must be between 0.0 and 1.0, got {value}")));
	}
	Ok(())
}
