use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use log::{info, warn};

use crate::error::Result;
use crate::model::simplifier::Substitution;
use crate::model::stopwords::Stopwords;

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Invalid UTF-8 sequences are replaced, not rejected
/// - Splits on `\n` / `\r\n` and trims every line
pub fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	Ok(read_text(filename)?.lines().map(|l| l.trim().to_owned()).collect())
}

/// Reads a whole text file, replacing invalid UTF-8 sequences.
pub fn read_text<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let bytes = fs::read(filename)?;
	Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/vectors.txt` + `"bin"` → `data/vectors.bin`
pub fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/news.txt"` → `"news"`
/// - `"news.txt"` → `"news"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all regular files directly inside a directory, sorted by name.
///
/// Returns file names only (no paths). Subdirectories are ignored.
pub fn list_files<P: AsRef<Path>>(dir: P) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

/// Loads every document of a directory as `(file name, text)` pairs.
pub fn load_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<(String, String)>> {
	let dir = dir.as_ref();
	let mut documents = Vec::new();
	for name in list_files(dir)? {
		let text = read_text(dir.join(&name))?;
		documents.push((name, text));
	}
	info!("Loaded {} documents from {}", documents.len(), dir.display());
	Ok(documents)
}

/// Parses `word count` lines into a frequency map.
///
/// Blank lines are ignored. Lines without two fields or with a count that
/// is not a non-negative integer are skipped with a warning.
pub fn parse_word_frequencies<'a, I>(lines: I) -> HashMap<String, u64>
where
	I: IntoIterator<Item = &'a str>,
{
	let mut frequencies = HashMap::new();
	for (number, line) in lines.into_iter().enumerate() {
		let mut fields = line.split_whitespace();
		let (Some(word), Some(count)) = (fields.next(), fields.next()) else {
			if !line.trim().is_empty() {
				warn!("Skipping malformed frequency line {}: {:?}", number + 1, line);
			}
			continue;
		};
		match count.parse::<u64>() {
			Ok(count) => {
				frequencies.insert(word.to_owned(), count);
			}
			Err(_) => warn!("Skipping frequency line {} with invalid count: {:?}", number + 1, line),
		}
	}
	frequencies
}

/// Loads a word frequency file (one `word count` pair per line).
pub fn load_word_frequencies<P: AsRef<Path>>(path: P) -> Result<HashMap<String, u64>> {
	let lines = read_lines(&path)?;
	let frequencies = parse_word_frequencies(lines.iter().map(String::as_str));
	info!("Loaded {} word frequencies from {}", frequencies.len(), path.as_ref().display());
	Ok(frequencies)
}

/// Loads a stopword list (one word per line).
pub fn load_stopwords<P: AsRef<Path>>(path: P) -> Result<Stopwords> {
	let lines = read_lines(&path)?;
	let stopwords = Stopwords::new(lines.iter().filter(|l| !l.is_empty()));
	info!("Loaded {} stopwords from {}", stopwords.len(), path.as_ref().display());
	Ok(stopwords)
}

/// Renders substitutions as tab-separated `index original replacement` lines.
pub fn format_substitutions(substitutions: &[Substitution]) -> String {
	let mut out = String::new();
	for s in substitutions {
		// Writing into a String cannot fail
		let _ = writeln!(out, "{}\t{}\t{}", s.index, s.original, s.replacement);
	}
	out
}

/// Writes a simplified document and its substitution list.
///
/// - `outdir/<file_name>` receives the simplified text
/// - `outdir/<file stem>.subs` receives the audit trail
///
/// Returns the two written paths.
pub fn write_outputs<P: AsRef<Path>>(
	outdir: P,
	file_name: &str,
	simplified: &str,
	substitutions: &[Substitution],
) -> Result<(PathBuf, PathBuf)> {
	let text_path = outdir.as_ref().join(file_name);
	let subs_path = outdir.as_ref().join(format!("{}.subs", get_filename(file_name)?));

	fs::write(&text_path, format!("{simplified}\n"))?;
	fs::write(&subs_path, format_substitutions(substitutions))?;

	Ok((text_path, subs_path))
}
