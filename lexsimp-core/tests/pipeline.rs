use std::fs;

use lexsimp_core::io::{load_documents, load_stopwords, load_word_frequencies, write_outputs};
use lexsimp_core::model::complexity::ComplexityTable;
use lexsimp_core::model::config::SimplifierConfig;
use lexsimp_core::model::embeddings::{EmbeddingOptions, EmbeddingStore, Embeddings, DEFAULT_LANGUAGE};
use lexsimp_core::model::simplifier::{Simplifier, Substitution};
use lexsimp_core::model::stopwords::Stopwords;

fn scenario_config() -> SimplifierConfig {
	SimplifierConfig {
		complexity_threshold: 0.2,
		num_candidates: 10,
		similarity_threshold: 0.5,
		complexity_drop_threshold: 0.2,
		context_window_size: 5,
	}
}

/// "complex" (0.9) with neighbours "simple" (0.3, sim 0.8) and "easy" (0.1, sim 0.6).
///
/// "simple" shares the run "mple" with "complex" and is dropped as a spelling
/// variant, so "easy" is the only candidate left.
fn scenario() -> Simplifier {
	let embeddings = Embeddings::from_vectors(
		DEFAULT_LANGUAGE,
		vec![
			("complex", vec![1.0, 0.0]),
			("simple", vec![0.8, 0.6]),
			("easy", vec![0.6, 0.8]),
		],
		false,
	);
	let complexities = ComplexityTable::from_scores([("complex", 0.9), ("simple", 0.3), ("easy", 0.1)]);
	Simplifier::with_complexities(embeddings, complexities, scenario_config(), None, DEFAULT_LANGUAGE).unwrap()
}

#[test]
fn spelling_variant_neighbour_is_skipped() {
	let s = scenario();
	let out = s.simplify("a complex task");
	assert_eq!(out.text, "a easy task");
	assert_eq!(
		out.substitutions,
		vec![Substitution { index: 1, original: "complex".to_owned(), replacement: "easy".to_owned() }]
	);
}

/// Two surviving candidates: "plain" is closer, "easy" is simpler.
/// "road" is a stopword, so it only ever serves as context.
fn two_candidates() -> Simplifier {
	let embeddings = Embeddings::from_vectors(
		DEFAULT_LANGUAGE,
		vec![
			("complex", vec![1.0, 0.0]),
			("plain", vec![0.8, 0.6]),
			("easy", vec![0.6, 0.8]),
			("road", vec![0.0, 1.0]),
		],
		false,
	);
	let complexities =
		ComplexityTable::from_scores([("complex", 0.9), ("plain", 0.3), ("easy", 0.1), ("road", 0.05)]);
	let stopwords = Stopwords::new(["road"]);
	Simplifier::with_complexities(embeddings, complexities, scenario_config(), Some(stopwords), DEFAULT_LANGUAGE)
		.unwrap()
}

#[test]
fn borda_tie_goes_to_the_closer_neighbour() {
	let s = two_candidates();
	// sim favours "plain", drop favours "easy": 1 point each
	assert_eq!(s.simplify("complex").text, "plain");
}

#[test]
fn context_settles_between_surviving_candidates() {
	let s = two_candidates();
	// "road" points at "easy", which now wins 2 to 1
	let out = s.simplify("complex road");
	assert_eq!(out.text, "easy road");
	assert_eq!(out.substitutions.len(), 1);
}

#[test]
fn punctuation_round_trip() {
	let s = scenario();
	assert_eq!(s.simplify("(complex)").text, "(easy)");
	assert_eq!(s.simplify("complex,").text, "easy,");
	assert_eq!(s.simplify("complex,").substitutions[0].original, "complex");
}

#[test]
fn similarity_floor_applies_to_the_winner() {
	let embeddings = Embeddings::from_vectors(
		DEFAULT_LANGUAGE,
		vec![("complex", vec![1.0, 0.0]), ("easy", vec![0.6, 0.8])],
		false,
	);
	let complexities = ComplexityTable::from_scores([("complex", 0.9), ("easy", 0.1)]);
	let config = SimplifierConfig { similarity_threshold: 0.7, ..scenario_config() };
	let s = Simplifier::with_complexities(embeddings, complexities, config, None, DEFAULT_LANGUAGE).unwrap();
	assert!(s.simplify("complex").substitutions.is_empty());
}

#[test]
fn substring_candidates_are_never_selected() {
	let embeddings = Embeddings::from_vectors(
		DEFAULT_LANGUAGE,
		vec![
			("swimming", vec![1.0, 0.0]),
			("swim", vec![0.95, 0.31]),
			("paddle", vec![0.7, 0.71]),
		],
		true,
	);
	let complexities = ComplexityTable::from_scores([("swimming", 0.9), ("swim", 0.05), ("paddle", 0.3)]);
	let s = Simplifier::with_complexities(embeddings, complexities, scenario_config(), None, DEFAULT_LANGUAGE).unwrap();

	let out = s.simplify("swimming");
	assert_eq!(out.text, "paddle");
}

#[test]
fn proper_nouns_are_never_replaced() {
	let s = scenario();
	let out = s.simplify("Complex COMPLEX");
	assert_eq!(out.text, "Complex COMPLEX");
	assert!(out.substitutions.is_empty());
}

/// A store that knows no word at all.
struct EmptyStore;

impl EmbeddingStore for EmptyStore {
	fn has_language(&self, _language: &str) -> bool {
		true
	}

	fn get_vector(&self, _language: &str, _word: &str) -> Option<&[f32]> {
		None
	}

	fn nearest_neighbors(&self, _vector: &[f32], _language: &str, _k: usize, _exclude_self: bool) -> Vec<&str> {
		vec!["easy"]
	}
}

#[test]
fn out_of_vocabulary_targets_are_kept() {
	let complexities = ComplexityTable::from_scores([("complex", 0.9), ("easy", 0.1)]);
	let s = Simplifier::with_complexities(EmptyStore, complexities, scenario_config(), None, DEFAULT_LANGUAGE)
		.unwrap();
	let out = s.simplify("complex Complex complex.");
	assert_eq!(out.text, "complex Complex complex.");
	assert!(out.substitutions.is_empty());
}

#[test]
fn simple_text_is_a_fixed_point() {
	let s = scenario();
	let text = "easy, (easy) easy.";
	let out = s.simplify(text);
	assert_eq!(out.text, text);
	assert!(out.substitutions.is_empty());
}

#[test]
fn directory_round_trip() {
	let root = tempfile::tempdir().unwrap();
	let data = root.path().join("data");
	let out = root.path().join("out");
	fs::create_dir(&data).unwrap();
	fs::create_dir(&out).unwrap();

	fs::write(data.join("a.txt"), "The task was complicated.\n").unwrap();
	fs::write(data.join("b.txt"), "Nothing to change here").unwrap();
	let vectors = root.path().join("vectors.txt");
	fs::write(
		&vectors,
		"5 3\ncomplicated 1 0 0\nhard 0.9 0.3 0.1\nthe 0 0 1\ntask 0.1 0.9 0.2\nwas 0.1 0 0.9\n",
	)
	.unwrap();
	let freqs = root.path().join("freqs.txt");
	fs::write(&freqs, "complicated 3\nhard 50000\nthe 10000000\ntask 30000\nwas 5000000\n").unwrap();
	let stop = root.path().join("stop.txt");
	fs::write(&stop, "the\nwas\n").unwrap();

	let documents = load_documents(&data).unwrap();
	let embeddings = Embeddings::load(&vectors, &EmbeddingOptions::default()).unwrap();
	let frequencies = load_word_frequencies(&freqs).unwrap();
	let stopwords = load_stopwords(&stop).unwrap();
	let simplifier = Simplifier::new(
		embeddings,
		&frequencies,
		SimplifierConfig::default(),
		Some(stopwords),
		DEFAULT_LANGUAGE,
	)
	.unwrap();

	let texts: Vec<&str> = documents.iter().map(|(_, text)| text.as_str()).collect();
	let results = simplifier.simplify_documents(&texts);
	for ((name, _), result) in documents.iter().zip(&results) {
		write_outputs(&out, name, &result.text, &result.substitutions).unwrap();
	}

	assert_eq!(fs::read_to_string(out.join("a.txt")).unwrap(), "The task was hard.\n");
	assert_eq!(fs::read_to_string(out.join("a.subs")).unwrap(), "3\tcomplicated\thard\n");
	assert_eq!(fs::read_to_string(out.join("b.txt")).unwrap(), "Nothing to change here\n");
	assert_eq!(fs::read_to_string(out.join("b.subs")).unwrap(), "");
	assert!(root.path().join("vectors.bin").exists());
}
