use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use icd_recommender::entity::{
    EntityExtractor, EntitySummary, ExtractedEntity, DEFAULT_CONFIDENCE_THRESHOLD,
};
use icd_recommender::environment::recommender_from_env;
use icd_recommender::llm::LlmParams;
use icd_recommender::{IcdRecommender, Recommendation, DEFAULT_TOP_K};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExtractorKind {
    /// Regex patterns, no external service
    Rules,
    /// Ollama model with pattern fallback
    Model,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend codes for a diagnosis text
    Recommend {
        /// Free-text clinical description
        text: String,

        /// Number of recommendations to return
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        /// Extract entities first and use them as an extra signal
        #[arg(short, long)]
        entities: bool,

        /// Entity extractor used with --entities
        #[arg(long, value_enum, default_value = "rules")]
        extractor: ExtractorKind,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Recommend codes for every line of a file, printed as JSON
    Batch {
        /// File with one diagnosis text per line
        file: PathBuf,

        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },

    /// Find catalog entries by keyword
    Search {
        keyword: String,

        #[arg(short, long, default_value = "10")]
        max_results: usize,
    },

    /// Show one catalog entry
    Details { code: String },

    /// Average confidence per specialty for a text
    Distribution { text: String },

    /// Extract clinical entities from a text
    Extract {
        text: String,

        #[arg(long, value_enum, default_value = "rules")]
        extractor: ExtractorKind,

        /// Minimum entity confidence (0.0-1.0)
        #[arg(short, long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
        threshold: f64,

        /// Group unique entity texts by label
        #[arg(long)]
        by_category: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    icd_recommender::logging::configure_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Recommend {
            text,
            top_k,
            entities,
            extractor,
            json,
        } => {
            let recommender = build_recommender()?;
            let extracted: Vec<ExtractedEntity> = if entities {
                build_extractor(extractor)?.extract_diagnostic(&text).await
            } else {
                Vec::new()
            };
            if !extracted.is_empty() {
                info!("Using {} extracted entities", extracted.len());
            }

            let recs = recommender
                .recommend_codes(&text, entities.then_some(extracted.as_slice()), top_k, None)
                .context("Failed to recommend codes")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&recs)?);
            } else {
                print_recommendations(&recs);
            }
        }

        Commands::Batch { file, top_k } => {
            let recommender = build_recommender()?;
            let contents = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let texts: Vec<&str> = contents.lines().collect();

            let results = recommender
                .recommend_codes_batch(&texts, top_k)
                .context("Failed to recommend codes for batch")?;

            let output: Vec<serde_json::Value> = texts
                .iter()
                .zip(results)
                .map(|(text, recs)| {
                    serde_json::json!({
                        "diagnosis_text": text,
                        "recommendations": recs,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Search {
            keyword,
            max_results,
        } => {
            let recommender = build_recommender()?;
            let results = recommender.search_by_keyword(&keyword, max_results);
            if results.is_empty() {
                println!("No codes match '{}'", keyword);
            }
            for entry in results {
                println!(
                    "{:<10} {:<18} {}",
                    entry.code(),
                    entry.specialty().to_string(),
                    entry.description()
                );
            }
        }

        Commands::Details { code } => {
            let recommender = build_recommender()?;
            match recommender.get_code_details(&code) {
                Some(entry) => println!("{}", serde_json::to_string_pretty(entry)?),
                None => bail!("Unknown code: {}", code),
            }
        }

        Commands::Distribution { text } => {
            let recommender = build_recommender()?;
            let distribution = recommender
                .category_distribution(&text)
                .context("Failed to score text")?;
            if distribution.is_empty() {
                println!("No specialty matched");
            }
            for (specialty, score) in distribution {
                println!("{:<18} {:.3}", specialty.to_string(), score);
            }
        }

        Commands::Extract {
            text,
            extractor,
            threshold,
            by_category,
        } => {
            if !(0.0..=1.0).contains(&threshold) {
                bail!("Threshold must be between 0.0 and 1.0, got {}", threshold);
            }
            let extractor = build_extractor(extractor)?;
            let entities = extractor.extract(&text, threshold).await;

            if by_category {
                let grouped = icd_recommender::entity::group_by_label(&entities, None);
                println!("{}", serde_json::to_string_pretty(&grouped)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&entities)?);
                let summary = EntitySummary::from_entities(&entities);
                info!(
                    "{} entities ({} unique), average confidence {:.2}",
                    summary.total_entities, summary.unique_entities, summary.average_confidence
                );
            }
        }
    }

    Ok(())
}

fn build_recommender() -> Result<IcdRecommender> {
    recommender_from_env().context("Failed to initialize recommender")
}

fn build_extractor(kind: ExtractorKind) -> Result<EntityExtractor> {
    let extractor = match kind {
        ExtractorKind::Rules => EntityExtractor::rules(),
        ExtractorKind::Model => EntityExtractor::model(LlmParams::from_env()),
    };
    extractor.context("Failed to initialize entity extractor")
}

fn print_recommendations(recs: &[Recommendation]) {
    if recs.is_empty() {
        println!("No matching codes");
        return;
    }
    for (rank, rec) in recs.iter().enumerate() {
        println!(
            "{}. {:<10} {:.3} [{}] {} ({})",
            rank + 1,
            rec.icd_code,
            rec.confidence_score,
            rec.confidence_tier,
            rec.description,
            rec.specialty
        );
        if !rec.matched_keywords.is_empty() {
            println!("   matched: {}", rec.matched_keywords.join(", "));
        }
    }
}
