use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use lexsimp_core::io::{load_documents, load_stopwords, load_word_frequencies, normalize_folder, write_outputs};
use lexsimp_core::model::config::SimplifierConfig;
use lexsimp_core::model::embeddings::{EmbeddingOptions, Embeddings, DEFAULT_LANGUAGE};
use lexsimp_core::model::simplifier::Simplifier;

/// A light-weight language-agnostic tool for lexical text simplification.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory containing the files with texts to be simplified
    datadir: String,

    /// Directory in which the simplified texts and their substitution lists are stored
    outdir: String,

    /// File with precomputed corpus word frequencies (one `word frequency` pair per line)
    wordfreqs: PathBuf,

    /// File containing pre-trained word embeddings
    embs: PathBuf,

    /// File containing the list of stopwords for the source language
    #[arg(short, long)]
    stopwords: Option<PathBuf>,

    /// Minimal complexity (0.0 to 1.0) a word needs before it is considered for replacement
    #[arg(long = "tholdcmplx", visible_alias = "tc", default_value_t = 0.2)]
    complexity_threshold: f32,

    /// Number of candidate replacement words considered per complex word
    #[arg(long = "numcands", visible_alias = "nc", default_value_t = 10)]
    num_candidates: usize,

    /// Minimal similarity (0.0 to 1.0) between a word and its replacement
    #[arg(long = "tholdsim", visible_alias = "st", default_value_t = 0.55)]
    similarity_threshold: f32,

    /// Minimal drop in complexity a replacement must achieve (recommended 0.0 to 0.1)
    #[arg(long = "dropcmplx", visible_alias = "cd", default_value_t = 0.025)]
    complexity_drop_threshold: f32,

    /// Number of tokens on each side of a word used as context
    #[arg(short, long, default_value_t = 5)]
    window: usize,

    /// Maximum number of embedding lines to read
    #[arg(long, default_value_t = 200_000)]
    limit: usize,

    /// Read the embedding text file even if a binary cache exists
    #[arg(long)]
    no_cache: bool,
}

impl Args {
    /// Builds a validated configuration from the command-line options.
    fn config(&self) -> lexsimp_core::Result<SimplifierConfig> {
        let mut config = SimplifierConfig { context_window_size: self.window, ..SimplifierConfig::default() };
        config.set_complexity_threshold(self.complexity_threshold)?;
        config.set_num_candidates(self.num_candidates)?;
        config.set_similarity_threshold(self.similarity_threshold)?;
        config.set_complexity_drop_threshold(self.complexity_drop_threshold)?;
        Ok(config)
    }

    /// Checks that every input exists before anything is loaded.
    fn check_paths(&self) -> Result<(), String> {
        if !normalize_folder(&self.datadir).is_dir() {
            return Err("Directory containing the input files not found.".to_owned());
        }
        if !normalize_folder(&self.outdir).is_dir() {
            return Err("Output directory not found.".to_owned());
        }
        if !self.embs.is_file() {
            return Err("File containing pre-trained word embeddings not found.".to_owned());
        }
        if !self.wordfreqs.is_file() {
            return Err("File containing word frequencies not found.".to_owned());
        }
        if let Some(stopwords) = &self.stopwords {
            if !stopwords.is_file() {
                return Err("Stopword file not found.".to_owned());
            }
        }
        Ok(())
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.config()?;
    args.check_paths()?;

    info!("Starting lexical simplification.");
    let datadir = normalize_folder(&args.datadir);
    let outdir = normalize_folder(&args.outdir);
    let documents = load_documents(&datadir)?;

    let options = EmbeddingOptions { limit: Some(args.limit), ..EmbeddingOptions::default() };
    let embeddings = if args.no_cache {
        Embeddings::load_text(&args.embs, &options)?
    } else {
        Embeddings::load(&args.embs, &options)?
    };

    let frequencies = load_word_frequencies(&args.wordfreqs)?;
    let stopwords = args.stopwords.as_ref().map(load_stopwords).transpose()?;

    info!("Parameters: {:?}", config);
    let simplifier = Simplifier::new(embeddings, &frequencies, config, stopwords, DEFAULT_LANGUAGE)?;

    let texts: Vec<&str> = documents.iter().map(|(_, text)| text.as_str()).collect();
    let results = simplifier.simplify_documents(&texts);

    for ((name, _), result) in documents.iter().zip(&results) {
        let (text_path, subs_path) = write_outputs(&outdir, name, &result.text, &result.substitutions)?;
        info!(
            "{}: {} substitutions -> {}, {}",
            name,
            result.substitutions.len(),
            text_path.display(),
            subs_path.display()
        );
    }

    info!("Lexical simplification completed ({} files).", documents.len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_aliases_map_to_options() {
        let args = Args::try_parse_from([
            "lexsimp", "in", "out", "freqs.txt", "vecs.txt", "--tc", "0.3", "--nc", "5", "--st", "0.6", "--cd", "0.05",
            "-w", "2",
        ])
        .unwrap();
        let config = args.config().unwrap();
        assert_eq!(config.complexity_threshold, 0.3);
        assert_eq!(config.num_candidates, 5);
        assert_eq!(config.similarity_threshold, 0.6);
        assert_eq!(config.complexity_drop_threshold, 0.05);
        assert_eq!(config.context_window_size, 2);
    }

    #[test]
    fn out_of_range_similarity_is_rejected() {
        let args = Args::try_parse_from(["lexsimp", "in", "out", "f", "e", "--tholdsim", "10"]).unwrap();
        assert!(args.config().is_err());
    }

    #[test]
    fn missing_inputs_are_reported() {
        let args = Args::try_parse_from(["lexsimp", "/nonexistent/in", ".", "f", "e"]).unwrap();
        assert!(args.check_paths().is_err());
    }
}
