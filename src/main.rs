use anyhow::Context;
use clap::{Parser, Subcommand};
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use osm_embed::catalog::{Dependency, StyleCatalog};
use osm_embed::config::Settings;
use osm_embed::globals::client_globals;
use osm_embed::logging;
use osm_embed::{Migrator, Renderer};

#[derive(Parser)]
#[command(name = "osm-embed")]
#[command(about = "Migrate and render map embed shortcodes")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./osm_embed.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite legacy map shortcodes in a document into the current schema
    Migrate {
        /// Document to migrate
        file: PathBuf,
        /// Write the result back to the file instead of printing it
        #[arg(long)]
        in_place: bool,
    },
    /// Render every map shortcode in a document to HTML
    Render {
        /// Document to render
        file: PathBuf,
    },
    /// List map styles, optionally only those needing a credential
    Styles {
        /// Only styles with this dependency (apikey or accesstoken)
        #[arg(long)]
        dependency: Option<Dependency>,
    },
    /// Print the front-end globals object as JSON
    Globals,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;

    logging::init_logging(&settings.logging);

    let catalog = StyleCatalog::load(&settings.data).context("failed to build style catalog")?;

    match cli.command {
        Commands::Migrate { file, in_place } => {
            let document = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let migrated = Migrator::new(&catalog).migrate(&document);
            match (&migrated, in_place) {
                (Cow::Borrowed(_), _) => {
                    info!("{} needs no migration", file.display());
                    if !in_place {
                        print!("{}", document);
                    }
                }
                (Cow::Owned(updated), true) => {
                    fs::write(&file, updated)
                        .with_context(|| format!("failed to write {}", file.display()))?;
                    info!("Migrated {}", file.display());
                }
                (Cow::Owned(updated), false) => print!("{}", updated),
            }
        }
        Commands::Render { file } => {
            let document = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let renderer = Renderer::new(&catalog, settings.migration.enabled);
            print!("{}", renderer.render_document(&document));
        }
        Commands::Styles { dependency } => {
            let keys: Vec<&str> = match dependency {
                Some(dependency) => catalog.dependent_styles(dependency),
                None => catalog.styles().keys().map(String::as_str).collect(),
            };
            for key in keys {
                let style = &catalog.styles()[key];
                match style.dependency {
                    Some(dependency) => println!("{}\t{}\t{}", key, style.label, dependency),
                    None => println!("{}\t{}", key, style.label),
                }
            }
        }
        Commands::Globals => {
            println!("{}", serde_json::to_string_pretty(&client_globals(&catalog))?);
        }
    }

    Ok(())
}
