use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::{error, info};
use serde::{Deserialize, Serialize};

use lexsimp_core::io::{load_stopwords, load_word_frequencies, read_text};
use lexsimp_core::model::config::SimplifierConfig;
use lexsimp_core::model::embeddings::{EmbeddingOptions, Embeddings, DEFAULT_LANGUAGE};
use lexsimp_core::model::simplifier::Simplifier;

/// HTTP service simplifying text with a preloaded model.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// File with precomputed corpus word frequencies
	wordfreqs: PathBuf,

	/// File containing pre-trained word embeddings
	embs: PathBuf,

	/// File containing the list of stopwords
	#[arg(short, long)]
	stopwords: Option<PathBuf>,

	/// JSON file overriding simplification options
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Port to listen on (127.0.0.1)
	#[arg(short, long, default_value_t = 5000)]
	port: u16,
}

/// Body of the `/v1/simplify` endpoint
#[derive(Deserialize)]
struct SimplifyRequest {
	text: String,
}

#[derive(Deserialize)]
struct ComplexityQuery {
	word: Option<String>,
}

#[derive(Serialize)]
struct ComplexityResponse {
	word: String,
	complexity: f32,
}

struct SharedData {
	simplifier: Simplifier,
}

/// HTTP POST endpoint `/v1/simplify`
///
/// Simplifies the posted text and returns it with its substitution list.
#[post("/v1/simplify")]
async fn post_simplify(data: web::Data<SharedData>, body: web::Json<SimplifyRequest>) -> impl Responder {
	let text = body.into_inner().text;
	// Neighbour search is CPU-bound, keep it off the async workers
	match web::block(move || data.simplifier.simplify(&text)).await {
		Ok(result) => HttpResponse::Ok().json(result),
		Err(e) => {
			error!("Simplification task failed: {e}");
			HttpResponse::InternalServerError().finish()
		}
	}
}

#[get("/v1/config")]
async fn get_config(data: web::Data<SharedData>) -> impl Responder {
	HttpResponse::Ok().json(data.simplifier.config())
}

#[get("/v1/complexity")]
async fn get_complexity(data: web::Data<SharedData>, query: web::Query<ComplexityQuery>) -> impl Responder {
	let word = match &query.word {
		Some(w) if !w.trim().is_empty() => w.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty word"),
	};
	HttpResponse::Ok().json(ComplexityResponse {
		word: word.to_owned(),
		complexity: data.simplifier.complexities().complexity(word),
	})
}

/// Reads the optional JSON configuration; missing fields keep their defaults.
fn load_config(path: Option<&PathBuf>) -> Result<SimplifierConfig, Box<dyn std::error::Error>> {
	let config = match path {
		Some(path) => serde_json::from_str(&read_text(path)?)?,
		None => SimplifierConfig::default(),
	};
	config.validate()?;
	Ok(config)
}

fn load_simplifier(args: &Args) -> Result<Simplifier, Box<dyn std::error::Error>> {
	let config = load_config(args.config.as_ref())?;
	let embeddings = Embeddings::load(&args.embs, &EmbeddingOptions::default())?;
	let frequencies = load_word_frequencies(&args.wordfreqs)?;
	let stopwords = args.stopwords.as_ref().map(load_stopwords).transpose()?;
	Ok(Simplifier::new(embeddings, &frequencies, config, stopwords, DEFAULT_LANGUAGE)?)
}

/// Main entry point for the server.
///
/// Loads every resource once, shares the read-only simplifier between
/// workers and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let simplifier = match load_simplifier(&args) {
		Ok(s) => s,
		Err(e) => {
			error!("Failed to load resources: {e}");
			return Err(std::io::Error::other(e.to_string()));
		}
	};
	let shared_data = web::Data::new(SharedData { simplifier });

	info!("Listening on 127.0.0.1:{}", args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(post_simplify)
			.service(get_config)
			.service(get_complexity)
	})
		.bind(("127.0.0.1", args.port))?
		.run()
		.await
}
