//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Markdown content pipeline for a personal blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Slug (file name) for the new post; defaults to the slugified title
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Rebuild the post index
    Index {
        /// Keep rebuilding as posts change
        #[arg(short, long)]
        watch: bool,
    },

    /// Build the index, feed, sitemap, robots.txt and llms.txt
    #[command(alias = "g")]
    Generate,

    /// List posts, categories or tags
    List {
        /// Type of content to list (post, category, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Print a rendered post by slug or legacy id
    Show {
        /// Slug or numeric id
        key: String,

        /// Print the markdown source instead of HTML
        #[arg(long)]
        raw: bool,
    },

    /// Start the preview server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Rebuild the index when posts change
        #[arg(short, long)]
        watch: bool,
    },

    /// Remove the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            folio::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { title, slug } => {
            let site = folio::Folio::new(&base_dir)?;
            let path = site.new_post(&title, slug.as_deref())?;
            println!("Created {}", path.display());
        }

        Commands::Index { watch } => {
            let site = folio::Folio::new(&base_dir)?;
            if watch {
                tokio::task::spawn_blocking(move || folio::commands::index::watch(&site)).await??;
            } else {
                let summary = folio::commands::index::run(&site)?;
                println!(
                    "Indexed {} posts into {}",
                    summary.posts,
                    summary.index_path.display()
                );
            }
        }

        Commands::Generate => {
            let site = folio::Folio::new(&base_dir)?;
            tracing::info!("Generating...");
            site.generate()?;
            println!("Generated successfully!");
        }

        Commands::List { r#type } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::commands::list::run(&site, &r#type)?;
        }

        Commands::Show { key, raw } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::commands::show::run(&site, &key, raw)?;
        }

        Commands::Server { port, ip, watch } => {
            let site = folio::Folio::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating...");
            site.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio::server::start(&site, &ip, port, watch).await?;
        }

        Commands::Clean => {
            let site = folio::Folio::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
