use thiserror::Error;

/// Errors raised while setting up or running the simplifier.
///
/// Only setup problems are errors. Out-of-vocabulary words and words that
/// fail a threshold are ordinary "no replacement" outcomes.
#[derive(Debug, Error)]
pub enum SimplifyError {
	/// Filesystem or OS-level I/O failure.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// An option is outside its documented range.
	#[error("Invalid configuration: {message}")]
	Config { message: String },

	/// The frequency source contained no usable entries.
	#[error("Word frequency table is empty")]
	EmptyFrequencyTable,

	/// No embedding line could be parsed.
	#[error("No embeddings could be loaded from {path}")]
	EmptyEmbeddings { path: String },

	/// The binary embedding cache could not be encoded or decoded.
	#[error("Embedding cache error: {0}")]
	Cache(#[from] postcard::Error),

	/// A language tag without any loaded embedding space.
	#[error("Unknown embedding language: {0}")]
	UnknownLanguage(String),
}

impl SimplifyError {
	pub(crate) fn config(message: impl Into<String>) -> Self {
		SimplifyError::Config { message: message.into() }
	}
}

pub type Result<T> = std::result::Result<T, SimplifyError>;
