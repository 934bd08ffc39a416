use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimplifyError};
use crate::io::{build_output_path, read_text};

/// Language tag used when a single embedding space is loaded.
pub const DEFAULT_LANGUAGE: &str = "default";

/// Lines with fewer values than this never define the dimension
/// (this skips `count dim` headers of word2vec text files).
const MIN_DIMENSION: usize = 2;

/// Read access to word vectors, as needed by the simplifier.
///
/// Implementations are queried concurrently and must not mutate on read.
pub trait EmbeddingStore {
	/// Returns true if vectors are loaded for `language`.
	fn has_language(&self, language: &str) -> bool;

	/// Returns the vector of `word`, or `None` if it is out of vocabulary.
	fn get_vector(&self, language: &str, word: &str) -> Option<&[f32]>;

	/// Returns up to `k` words ordered by descending dot product with `vector`.
	///
	/// With `exclude_self`, the single best match is dropped first; it is
	/// expected to be the word the query vector belongs to.
	fn nearest_neighbors(&self, vector: &[f32], language: &str, k: usize, exclude_self: bool) -> Vec<&str>;
}

/// Options controlling how a text embedding file is read.
#[derive(Clone, Debug)]
pub struct EmbeddingOptions {
	/// Language tag the loaded vectors are stored under.
	pub language: String,
	/// Maximum number of lines read from the file (header included).
	pub limit: Option<usize>,
	/// Skip the first line (word2vec `count dim` header).
	pub skip_first_line: bool,
	/// L2-normalize every vector so dot products are cosine similarities.
	pub normalize: bool,
}

impl Default for EmbeddingOptions {
	fn default() -> Self {
		Self {
			language: DEFAULT_LANGUAGE.to_owned(),
			limit: Some(200_000),
			skip_first_line: true,
			normalize: true,
		}
	}
}

/// Vectors of a single language, stored row-major in one flat buffer.
///
/// # Invariants
/// - `vectors.len() == words.len() * dimension`
/// - `vocabulary[words[i]] == i`
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
struct LanguageSpace {
	dimension: usize,
	vocabulary: HashMap<String, usize>,
	words: Vec<String>,
	vectors: Vec<f32>,
}

impl LanguageSpace {
	fn row(&self, index: usize) -> &[f32] {
		&self.vectors[index * self.dimension..(index + 1) * self.dimension]
	}

	/// Appends a vector; returns false for duplicates or a dimension mismatch.
	fn insert(&mut self, word: &str, vector: &[f32]) -> bool {
		if self.words.is_empty() && self.dimension == 0 {
			self.dimension = vector.len();
		}
		if vector.len() != self.dimension || self.vocabulary.contains_key(word) {
			return false;
		}
		self.vocabulary.insert(word.to_owned(), self.words.len());
		self.words.push(word.to_owned());
		self.vectors.extend_from_slice(vector);
		true
	}
}

/// In-memory embedding store holding one vector space per language.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Embeddings {
	spaces: HashMap<String, LanguageSpace>,
}

impl Embeddings {
	/// Builds a store from literal vectors.
	///
	/// Vectors whose length differs from the first one are ignored.
	pub fn from_vectors<I, S>(language: &str, vectors: I, normalize: bool) -> Self
	where
		I: IntoIterator<Item = (S, Vec<f32>)>,
		S: AsRef<str>,
	{
		let mut embeddings = Self::default();
		for (word, mut vector) in vectors {
			if normalize {
				normalize_in_place(&mut vector);
			}
			embeddings.insert(language, word.as_ref(), &vector);
		}
		embeddings
	}

	/// Adds a vector to the space of `language`.
	///
	/// Returns false if the word is already present or the vector length
	/// does not match the dimension of that space.
	pub fn insert(&mut self, language: &str, word: &str, vector: &[f32]) -> bool {
		self.spaces.entry(language.to_owned()).or_default().insert(word, vector)
	}

	/// Loads embeddings from a text file, using a binary cache when present.
	///
	/// - `filepath` is the text file (`word v1 v2 ... vd` per line).
	/// - A `.bin` file next to it is deserialized with `postcard` if it was
	///   built with the same options from the same source file (length and
	///   modification time). A cache whose source file is gone is trusted
	///   as long as the options match.
	/// - Otherwise the text is parsed and the cache is (re)written; a failed
	///   cache write is logged but does not abort loading.
	pub fn load<P: AsRef<Path>>(filepath: P, options: &EmbeddingOptions) -> Result<Self> {
		let binary_data_path = build_output_path(&filepath, "bin")?;
		let key = CacheKey::new(filepath.as_ref(), options);

		if binary_data_path.exists() {
			match read_cache(&binary_data_path) {
				Ok(cache) if cache.key.matches(&key) && cache.embeddings.has_language(&options.language) => {
					info!(
						"Loaded {} cached embeddings from {}",
						cache.embeddings.len(&options.language),
						binary_data_path.display()
					);
					return Ok(cache.embeddings);
				}
				Ok(_) => warn!(
					"Cache {} was built from another source or with other options, rebuilding",
					binary_data_path.display()
				),
				Err(e) => warn!("Unreadable embedding cache {}: {}, rebuilding", binary_data_path.display(), e),
			}
		}

		let cache = EmbeddingCache { key, embeddings: Self::load_text(&filepath, options)? };
		match postcard::to_stdvec(&cache) {
			Ok(bytes) => {
				if let Err(e) = fs::write(&binary_data_path, bytes) {
					warn!("Failed to write embedding cache {}: {}", binary_data_path.display(), e);
				}
			}
			Err(e) => warn!("Failed to encode embedding cache: {}", e),
		}
		Ok(cache.embeddings)
	}

	/// Parses a text embedding file without touching any cache.
	///
	/// # Errors
	/// Returns `EmptyEmbeddings` if no line could be parsed.
	pub fn load_text<P: AsRef<Path>>(filepath: P, options: &EmbeddingOptions) -> Result<Self> {
		let text = read_text(&filepath)?;
		let embeddings = Self::parse(&text, options);
		let count = embeddings.len(&options.language);
		if count == 0 {
			return Err(SimplifyError::EmptyEmbeddings { path: filepath.as_ref().display().to_string() });
		}
		info!(
			"Loaded {} embeddings of dimension {} from {}",
			count,
			embeddings.dimension(&options.language).unwrap_or(0),
			filepath.as_ref().display()
		);
		Ok(embeddings)
	}

	/// Parses embedding lines, skipping malformed ones.
	///
	/// The first line with at least two values fixes the dimension; later
	/// lines of another length are skipped with a warning.
	pub fn parse(text: &str, options: &EmbeddingOptions) -> Self {
		let mut embeddings = Self::default();
		let mut space = LanguageSpace::default();
		let limit = options.limit.unwrap_or(usize::MAX);

		for (number, line) in text.lines().enumerate().take(limit) {
			if number == 0 && options.skip_first_line {
				continue;
			}
			let mut fields = line.split_whitespace();
			let Some(word) = fields.next() else {
				continue;
			};
			let vector: std::result::Result<Vec<f32>, _> = fields.map(str::parse::<f32>).collect();
			let mut vector = match vector {
				Ok(v) if v.len() >= MIN_DIMENSION => v,
				_ => {
					warn!("Incorrect format on embedding line {}", number + 1);
					continue;
				}
			};
			if options.normalize {
				normalize_in_place(&mut vector);
			}
			if !space.insert(word, &vector) && !space.vocabulary.contains_key(word) {
				warn!(
					"Embedding line {} has dimension {}, expected {}",
					number + 1,
					vector.len(),
					space.dimension
				);
			}
		}

		if !space.words.is_empty() {
			embeddings.spaces.insert(options.language.clone(), space);
		}
		embeddings
	}

	/// Number of vectors stored for `language`.
	pub fn len(&self, language: &str) -> usize {
		self.spaces.get(language).map_or(0, |s| s.words.len())
	}

	/// Vector dimension of `language`, if loaded.
	pub fn dimension(&self, language: &str) -> Option<usize> {
		self.spaces.get(language).map(|s| s.dimension)
	}
}

/// Size and modification time of the text file a cache was built from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
struct SourceStamp {
	len: u64,
	modified_nanos: Option<u128>,
}

/// Everything that decides the content of a cache file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
struct CacheKey {
	language: String,
	limit: Option<usize>,
	skip_first_line: bool,
	normalize: bool,
	source: Option<SourceStamp>,
}

impl CacheKey {
	fn new(filepath: &Path, options: &EmbeddingOptions) -> Self {
		let source = fs::metadata(filepath).ok().map(|meta| SourceStamp {
			len: meta.len(),
			modified_nanos: meta
				.modified()
				.ok()
				.and_then(|t| t.duration_since(UNIX_EPOCH).ok())
				.map(|d| d.as_nanos()),
		});
		Self {
			language: options.language.clone(),
			limit: options.limit,
			skip_first_line: options.skip_first_line,
			normalize: options.normalize,
			source,
		}
	}

	/// True if a cache stored under `self` can serve a load described by `wanted`.
	fn matches(&self, wanted: &CacheKey) -> bool {
		let same_options = self.language == wanted.language
			&& self.limit == wanted.limit
			&& self.skip_first_line == wanted.skip_first_line
			&& self.normalize == wanted.normalize;
		let same_source = match (&self.source, &wanted.source) {
			(Some(cached), Some(current)) => cached == current,
			(_, None) => true,
			(None, Some(_)) => false,
		};
		same_options && same_source
	}
}

/// On-disk layout of the `.bin` cache.
#[derive(Serialize, Deserialize)]
struct EmbeddingCache {
	key: CacheKey,
	embeddings: Embeddings,
}

fn read_cache(path: &Path) -> Result<EmbeddingCache> {
	let bytes = fs::read(path)?;
	Ok(postcard::from_bytes(&bytes)?)
}

impl EmbeddingStore for Embeddings {
	fn has_language(&self, language: &str) -> bool {
		self.spaces.contains_key(language)
	}

	fn get_vector(&self, language: &str, word: &str) -> Option<&[f32]> {
		let space = self.spaces.get(language)?;
		let index = *space.vocabulary.get(word)?;
		Some(space.row(index))
	}

	fn nearest_neighbors(&self, vector: &[f32], language: &str, k: usize, exclude_self: bool) -> Vec<&str> {
		let Some(space) = self.spaces.get(language) else {
			return Vec::new();
		};
		if vector.len() != space.dimension || k == 0 {
			return Vec::new();
		}

		let mut scored: Vec<(usize, f32)> = (0..space.words.len())
			.map(|i| (i, dot(space.row(i), vector)))
			.collect();

		// Descending score, ties by row order
		let by_score = |a: &(usize, f32), b: &(usize, f32)| -> Ordering {
			b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
		};

		let wanted = k.saturating_add(exclude_self as usize);
		if wanted < scored.len() {
			scored.select_nth_unstable_by(wanted, by_score);
			scored.truncate(wanted);
		}
		scored.sort_by(by_score);

		scored
			.into_iter()
			.skip(exclude_self as usize)
			.take(k)
			.map(|(i, _)| space.words[i].as_str())
			.collect()
	}
}

/// Dot product of two equally sized vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
	a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Divides a vector by its L2 norm; zero vectors are left unchanged.
pub fn normalize_in_place(vector: &mut [f32]) {
	let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
	if norm > 0.0 {
		vector.iter_mut().for_each(|x| *x /= norm);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn options() -> EmbeddingOptions {
		EmbeddingOptions { skip_first_line: false, normalize: false, ..EmbeddingOptions::default() }
	}

	#[test]
	fn parse_skips_malformed_lines() {
		let text = "cat 1 0\n\ndog 0.9 0.1\nbroken 1 x\nshort 1\nwide 1 2 3\ncat 5 5\n";
		let e = Embeddings::parse(text, &options());
		assert_eq!(e.len(DEFAULT_LANGUAGE), 2);
		assert_eq!(e.dimension(DEFAULT_LANGUAGE), Some(2));
		assert_eq!(e.get_vector(DEFAULT_LANGUAGE, "cat"), Some(&[1.0, 0.0][..]));
		assert!(e.get_vector(DEFAULT_LANGUAGE, "wide").is_none());
	}

	#[test]
	fn header_and_limit_are_honoured() {
		let text = "3 2\na 1 0\nb 0 1\nc 1 1\n";
		let opts = EmbeddingOptions { limit: Some(3), normalize: false, ..EmbeddingOptions::default() };
		let e = Embeddings::parse(text, &opts);
		assert_eq!(e.len(DEFAULT_LANGUAGE), 2);
		assert!(e.get_vector(DEFAULT_LANGUAGE, "c").is_none());
	}

	#[test]
	fn vectors_are_normalized() {
		let opts = EmbeddingOptions { skip_first_line: false, ..EmbeddingOptions::default() };
		let e = Embeddings::parse("a 3 4\nz 0 0\n", &opts);
		let a = e.get_vector(DEFAULT_LANGUAGE, "a").unwrap();
		assert!((a[0] - 0.6).abs() < 1e-6 && (a[1] - 0.8).abs() < 1e-6);
		assert_eq!(e.get_vector(DEFAULT_LANGUAGE, "z"), Some(&[0.0, 0.0][..]));
	}

	#[test]
	fn neighbours_are_ordered_and_exclude_self() {
		let e = Embeddings::from_vectors(
			"en",
			vec![
				("king", vec![1.0, 0.0]),
				("queen", vec![0.9, 0.1]),
				("prince", vec![0.7, 0.3]),
				("apple", vec![0.0, 1.0]),
			],
			true,
		);
		let king = e.get_vector("en", "king").unwrap().to_vec();

		assert_eq!(e.nearest_neighbors(&king, "en", 2, true), vec!["queen", "prince"]);
		assert_eq!(e.nearest_neighbors(&king, "en", 2, false), vec!["king", "queen"]);
		assert_eq!(e.nearest_neighbors(&king, "en", 10, true).len(), 3);
		assert!(e.nearest_neighbors(&king, "fr", 2, true).is_empty());
	}

	#[test]
	fn ties_keep_row_order() {
		let e = Embeddings::from_vectors(
			"en",
			vec![("q", vec![1.0, 0.0]), ("b", vec![0.0, 1.0]), ("a", vec![0.0, 1.0])],
			false,
		);
		assert_eq!(e.nearest_neighbors(&[0.0, 1.0], "en", 2, false), vec!["b", "a"]);
	}

	#[test]
	fn load_writes_and_reuses_cache() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vectors.txt");
		std::fs::write(&path, "2 2\nsmall 1 0\nlittle 0.8 0.6\n").unwrap();

		let first = Embeddings::load(&path, &EmbeddingOptions::default()).unwrap();
		assert!(dir.path().join("vectors.bin").exists());

		std::fs::remove_file(&path).unwrap();
		let second = Embeddings::load(&path, &EmbeddingOptions::default()).unwrap();
		assert_eq!(second.len(DEFAULT_LANGUAGE), first.len(DEFAULT_LANGUAGE));
		assert_eq!(
			second.get_vector(DEFAULT_LANGUAGE, "little"),
			first.get_vector(DEFAULT_LANGUAGE, "little")
		);
	}

	#[test]
	fn cache_is_rebuilt_when_options_or_source_change() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vectors.txt");
		std::fs::write(&path, "3 2\na 1 0\nb 0 1\nc 1 1\n").unwrap();

		let limited = EmbeddingOptions { limit: Some(2), ..EmbeddingOptions::default() };
		assert_eq!(Embeddings::load(&path, &limited).unwrap().len(DEFAULT_LANGUAGE), 1);
		assert_eq!(Embeddings::load(&path, &EmbeddingOptions::default()).unwrap().len(DEFAULT_LANGUAGE), 3);

		let raw = EmbeddingOptions { normalize: false, ..EmbeddingOptions::default() };
		let e = Embeddings::load(&path, &raw).unwrap();
		assert_eq!(e.get_vector(DEFAULT_LANGUAGE, "c"), Some(&[1.0, 1.0][..]));

		std::fs::write(&path, "4 2\nd 1 0\ne 0 1\nf 1 1\ng 0.5 0.5\n").unwrap();
		let e = Embeddings::load(&path, &raw).unwrap();
		assert_eq!(e.len(DEFAULT_LANGUAGE), 4);
		assert!(e.get_vector(DEFAULT_LANGUAGE, "a").is_none());
	}

	#[test]
	fn unreadable_cache_is_replaced() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vectors.txt");
		std::fs::write(&path, "2 2\nsmall 1 0\nlittle 0.8 0.6\n").unwrap();
		std::fs::write(dir.path().join("vectors.bin"), b"not a cache").unwrap();

		let e = Embeddings::load(&path, &EmbeddingOptions::default()).unwrap();
		assert_eq!(e.len(DEFAULT_LANGUAGE), 2);
		assert!(read_cache(&dir.path().join("vectors.bin")).is_ok());
	}

	#[test]
	fn empty_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("empty.txt");
		std::fs::write(&path, "0 300\n").unwrap();
		assert!(matches!(
			Embeddings::load_text(&path, &EmbeddingOptions::default()),
			Err(SimplifyError::EmptyEmbeddings { .. })
		));
	}
}
