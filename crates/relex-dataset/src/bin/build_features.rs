//! Build a labeled feature file from an annotated corpus.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use relex_core::ner::{GazetteerTagger, NamedEntityTagger, StanfordTagger};
use relex_core::RelationKind;
use relex_dataset::{default_cache_dir, Annotations, DatasetBuilder, DatasetConfig};
use tracing::info;

/// CLI arguments
#[derive(Parser)]
#[command(name = "build-features")]
#[command(about = "Extract labeled relation features from a parsed, NER-tagged corpus")]
#[command(version)]
struct Cli {
    /// Parsed corpus (one token per line, blank-line separated sentences)
    #[arg(short, long)]
    corpus: PathBuf,

    /// Gold relation annotations
    #[arg(short, long)]
    annotations: PathBuf,

    /// Feature file to write
    #[arg(short, long)]
    output: PathBuf,

    /// Relation to label (live-in or work-for)
    #[arg(short, long)]
    relation: Option<RelationKind>,

    /// Tokens on each side of an entity
    #[arg(short, long)]
    window_radius: Option<usize>,

    /// JSON run configuration; command-line flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cache directory for tagged corpora and path indices
    #[arg(long, env = "RELEX_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Recompute cached stages
    #[arg(long)]
    refresh_cache: bool,

    /// Disable the on-disk cache; wins over --cache-dir and RELEX_CACHE_DIR
    #[arg(long)]
    no_cache: bool,

    /// Also emit candidates from sentences missing from the annotations
    #[arg(long)]
    all_sentences: bool,

    /// stanford-ner.jar
    #[arg(long, env = "STANFORD_NER_JAR", requires = "stanford_model")]
    stanford_jar: Option<PathBuf>,

    /// Serialized CRF classifier for the Stanford tagger
    #[arg(long, env = "STANFORD_NER_MODEL", requires = "stanford_jar")]
    stanford_model: Option<PathBuf>,

    /// Java executable used to run the Stanford tagger
    #[arg(long)]
    java: Option<PathBuf>,

    /// Gazetteer file used as the primary tagger
    #[arg(long, conflicts_with = "stanford_jar")]
    gazetteer: Option<PathBuf>,
}

fn tagger(cli: &Cli) -> Result<Option<Box<dyn NamedEntityTagger>>> {
    match (&cli.stanford_jar, &cli.stanford_model, &cli.gazetteer) {
        (Some(jar), Some(model), None) => {
            let mut tagger = StanfordTagger::new(jar, model)?;
            if let Some(java) = &cli.java {
                tagger = tagger.with_java(java);
            }
            Ok(Some(Box::new(tagger)))
        }
        (None, None, Some(path)) => {
            let tagger = GazetteerTagger::load(path)
                .with_context(|| format!("failed to load gazetteer {}", path.display()))?;
            Ok(Some(Box::new(tagger)))
        }
        (None, None, None) => Ok(None),
        _ => bail!("use either --stanford-jar with --stanford-model, or --gazetteer"),
    }
}

/// Merge the optional config file with the command-line flags.
fn run_config(cli: &Cli) -> Result<DatasetConfig> {
    let mut config = match &cli.config {
        Some(path) => DatasetConfig::from_file(path)?,
        None => DatasetConfig::default(),
    };
    if let Some(relation) = cli.relation {
        config.extractor.relation = relation;
    }
    if let Some(radius) = cli.window_radius {
        config.extractor.window_radius = radius;
    }
    if cli.no_cache {
        config = config.without_cache();
    } else {
        let dir = cli
            .cache_dir
            .clone()
            .or_else(|| config.cache_dir.clone())
            .unwrap_or_else(default_cache_dir);
        let refresh = cli.refresh_cache || config.refresh_cache;
        config = config.with_cache_dir(dir).with_refresh_cache(refresh);
    }
    if cli.all_sentences {
        config = config.with_annotated_only(false);
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = run_config(&cli)?;

    let relation = config.extractor.relation;
    let mut builder = DatasetBuilder::new(config)?;
    if let Some(tagger) = tagger(&cli)? {
        info!(tagger = tagger.name(), "using external tagger");
        builder = builder.with_tagger(tagger);
    }

    let annotations = Annotations::load(&cli.annotations, relation)?;
    let stats = builder.run(&cli.corpus, &annotations, &cli.output)?;

    println!("{stats}");
    Ok(())
}
