use anyhow::{bail, Context};
use clap::Parser;
use crud_scaffold::config::{Dialect, GeneratorConfig};
use crud_scaffold::sources::GeneratedFiles;
use crud_scaffold::Scaffold;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Derives request model, paged queries, handler and list/form views from a
/// generated entity and its mapper document.
#[derive(Parser, Debug)]
#[command(name = "crud-scaffold", version)]
struct Cli {
    /// Generator settings; defaults apply when the file is absent.
    #[arg(long, default_value = "scaffold.toml")]
    config: PathBuf,

    /// Base entity source; the first one is used.
    #[arg(long)]
    model: Vec<PathBuf>,

    /// Base mapper document; the first one is used.
    #[arg(long)]
    mapping: Vec<PathBuf>,

    /// Entity name, locating the base files through the configured layout.
    #[arg(long, conflicts_with_all = ["model", "mapping"])]
    entity: Option<String>,

    #[arg(long)]
    dialect: Option<Dialect>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        GeneratorConfig::load(&cli.config)
            .with_context(|| format!("failed to load {}", cli.config.display()))?
    } else {
        GeneratorConfig::default()
    };

    if let Some(dialect) = cli.dialect {
        config.dialect = dialect;
    }

    let source = match cli.entity {
        Some(entity) => GeneratedFiles::for_entity(&config.targets, &entity),
        None if !cli.model.is_empty() && !cli.mapping.is_empty() => {
            GeneratedFiles::new(cli.model, cli.mapping)
        }
        None => bail!("either --entity or both --model and --mapping are required"),
    };

    let report = Scaffold::new(&config)
        .run(&source)
        .context("scaffold run failed")?;

    for (kind, path, outcome) in &report.committed {
        info!(artifact = %kind, path = %path.display(), %outcome, "done");
    }
    info!(entity = %report.entity, artifacts = report.committed.len(), "scaffold complete");

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crud_scaffold=info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
