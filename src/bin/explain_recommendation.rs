use anyhow::{bail, Context, Result};
use clap::Parser;

use icd_recommender::entity::EntityExtractor;
use icd_recommender::environment::recommender_from_env;
use icd_recommender::{Weights, DEFAULT_TOP_K};

/// Show how each signal contributed to the ranking of a diagnosis text
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Free-text clinical description
    text: String,

    #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Feed rule-based entities into the entity signal
    #[arg(short, long)]
    entities: bool,

    /// Keyword, lexical and entity weights, e.g. 0.5,0.3,0.2
    #[arg(short, long, value_delimiter = ',')]
    weights: Option<Vec<f64>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    icd_recommender::logging::configure_logging();

    let args = Args::parse();
    let recommender = recommender_from_env().context("Failed to initialize recommender")?;

    let weights = match args.weights.as_deref() {
        Some([keyword, lexical, entity]) => {
            Some(Weights::new(*keyword, *lexical, *entity).context("Invalid --weights")?)
        }
        Some(other) => bail!("--weights takes three values, got {}", other.len()),
        None => None,
    };
    let applied = weights.unwrap_or(recommender.policy().weights);

    let entities = if args.entities {
        EntityExtractor::rules()?.extract_diagnostic(&args.text).await
    } else {
        Vec::new()
    };

    println!("Text:       {}", args.text);
    println!("Normalized: {}", recommender.normalize(&args.text));
    println!(
        "Weights:    keyword {:.2}, lexical {:.2}, entity {:.2}",
        applied.keyword_weight, applied.lexical_weight, applied.entity_weight
    );
    if !entities.is_empty() {
        let described: Vec<String> = entities
            .iter()
            .map(|e| format!("{} ({}, {:.2})", e.text, e.label, e.confidence))
            .collect();
        println!("Entities:   {}", described.join(", "));
    }
    println!();

    let candidates = recommender
        .explain(&args.text, Some(entities.as_slice()), args.top_k, weights)
        .context("Failed to score text")?;

    if candidates.is_empty() {
        println!("No code scored above zero");
        return Ok(());
    }

    println!(
        "{:<4} {:<10} {:>8} {:>8} {:>8} {:>9}  matched",
        "#", "code", "keyword", "lexical", "entity", "aggregate"
    );
    for (rank, candidate) in candidates.iter().enumerate() {
        println!(
            "{:<4} {:<10} {:>8.3} {:>8.3} {:>8.3} {:>9.3}  {}",
            rank + 1,
            candidate.code,
            candidate.keyword_score,
            candidate.lexical_score,
            candidate.entity_score,
            candidate.aggregate_score,
            candidate.matched_terms.join(", ")
        );
    }

    Ok(())
}
