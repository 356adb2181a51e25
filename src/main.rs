//! # Indoor-wayfinder CLI
//!
//! Command-line interface for the indoor-wayfinder library.
//! Computes routes, lists POIs and serves the engine over HTTP.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indoor_wayfinder::{
    Closures, Config, LayoutSource, NavigationEngine, PreferenceType, PreferencesUpdate,
};
use log::{error, LevelFilter};
use std::path::PathBuf;

mod cli;

/// Command-line interface for indoor-wayfinder
#[derive(Parser)]
#[command(name = "indoor-wayfinder")]
#[command(about = "Indoor wayfinding: preference-aware routes between points of interest")]
#[command(long_about = "Finds routes inside multi-floor venues:
  indoor-wayfinder route --from g_entrance_1 --to l1_food_court
  indoor-wayfinder route --from g_store_a --to l1_store_c --avoid-escalators
  indoor-wayfinder route --from g_store_a --to l1_store_c --close-poi g_elevator_1
  indoor-wayfinder pois --floor 1
  indoor-wayfinder serve --port 3000

Layout sources:
  --layout ./mall.json             # Local JSON file
  --layout https://host/mall.json  # HTTP endpoint
  --layout bundled:sample          # Two-floor sample venue (default)")]
#[command(version = env!("WAYFINDER_VERSION"))]
struct Cli {
    /// TOML config file (defaults to $WAYFINDER_CONFIG, then ./wayfinder.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a route between two POIs
    Route {
        /// Origin POI id
        #[arg(long)]
        from: String,
        /// Destination POI id
        #[arg(long)]
        to: String,
        /// Layout source, overrides the config file
        #[arg(long)]
        layout: Option<String>,
        /// Only use accessible segments for this request
        #[arg(long)]
        accessible: bool,
        /// Never take stairs
        #[arg(long)]
        avoid_stairs: bool,
        /// Never take escalators
        #[arg(long)]
        avoid_escalators: bool,
        /// Temporarily closed POI (repeatable)
        #[arg(long = "close-poi")]
        close_poi: Vec<String>,
        /// Temporarily closed path segment (repeatable)
        #[arg(long = "close-segment")]
        close_segment: Vec<String>,
        /// Print the route as JSON
        #[arg(long)]
        json: bool,
    },
    /// List points of interest
    Pois {
        /// Layout source, overrides the config file
        #[arg(long)]
        layout: Option<String>,
        /// Only POIs on this level
        #[arg(long)]
        floor: Option<i32>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start the HTTP API server
    Serve {
        /// Layout source, overrides the config file
        #[arg(long)]
        layout: Option<String>,
        /// Port to listen on, overrides the config file
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let mut logger = env_logger::Builder::from_default_env();
    logger.target(env_logger::Target::Stderr);
    apply_verbosity(&mut logger, cli.verbose);
    logger.init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Route {
            from,
            to,
            layout,
            accessible,
            avoid_stairs,
            avoid_escalators,
            close_poi,
            close_segment,
            json,
        } => {
            let mut engine = load_engine(&config, layout.as_deref()).await?;

            // Flags stack on top of the configured session preferences.
            let update = PreferencesUpdate {
                avoid_stairs: avoid_stairs.then_some(true),
                avoid_escalators: avoid_escalators.then_some(true),
                ..Default::default()
            };
            engine.update_user_preferences(&update);
            let preference_type = accessible.then_some(PreferenceType::Accessible);

            let closures = Closures {
                closed_poi_ids: close_poi,
                closed_segment_ids: close_segment,
            };
            let route = if closures.is_empty() {
                engine.try_find_route(&from, &to, preference_type)?
            } else {
                engine.try_dynamic_route(&from, &to, &closures, preference_type)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&route)?);
            } else {
                print!("{}", cli::format_route(&route));
            }
        }
        Commands::Pois {
            layout,
            floor,
            json,
        } => {
            let engine = load_engine(&config, layout.as_deref()).await?;
            let pois = engine.all_pois(floor);
            if json {
                println!("{}", serde_json::to_string_pretty(&pois)?);
            } else {
                print!("{}", cli::format_pois(&pois));
            }
        }
        Commands::Serve { layout, port } => {
            let engine = load_engine(&config, layout.as_deref()).await?;
            let port = port.unwrap_or(config.server.port);
            eprintln!("🚀 Server starting on http://{}:{port}", config.server.host);
            indoor_wayfinder::server::run_server(engine, &config.server.host, port).await?;
        }
    }

    Ok(())
}

/// `--verbose` raises this crate to debug, leaving hyper and reqwest alone.
fn apply_verbosity(logger: &mut env_logger::Builder, verbose: bool) {
    if verbose {
        logger.filter_module("indoor_wayfinder", LevelFilter::Debug);
    }
}

/// Load the layout named on the command line, or the configured one.
async fn load_engine(config: &Config, layout: Option<&str>) -> Result<NavigationEngine> {
    let source = layout
        .map(LayoutSource::parse)
        .unwrap_or_else(|| config.layout_source());

    let layout = source
        .load()
        .await
        .with_context(|| format!("Failed to load layout from {source}"))?;

    NavigationEngine::with_preferences(layout, config.preferences.clone())
        .context("Layout rejected")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_route_flags() {
        let cli = Cli::parse_from([
            "indoor-wayfinder",
            "route",
            "--from",
            "g_store_a",
            "--to",
            "l1_store_c",
            "--avoid-escalators",
            "--close-poi",
            "g_elevator_1",
            "--close-poi",
            "g_restroom_1",
        ]);
        match cli.command {
            Commands::Route {
                from,
                avoid_escalators,
                avoid_stairs,
                close_poi,
                ..
            } => {
                assert_eq!(from, "g_store_a");
                assert!(avoid_escalators);
                assert!(!avoid_stairs);
                assert_eq!(close_poi, vec!["g_elevator_1", "g_restroom_1"]);
            }
            _ => panic!("Expected route command"),
        }
    }

    #[test]
    fn test_verbose_scoped_to_crate() {
        use log::{Level, Log, Metadata};

        let mut builder = env_logger::Builder::new();
        apply_verbosity(&mut builder, true);
        let logger = builder.build();
        let debug = |target: &'static str| -> Metadata<'static> {
            Metadata::builder().level(Level::Debug).target(target).build()
        };

        assert!(logger.enabled(&debug("indoor_wayfinder::core::graph")));
        assert!(!logger.enabled(&debug("hyper::proto::h1")));
        assert!(!logger.enabled(&debug("reqwest::connect")));
    }

    #[test]
    fn test_cli_global_config_after_subcommand() {
        let cli = Cli::parse_from(["indoor-wayfinder", "pois", "--floor", "1", "--config", "x.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        match cli.command {
            Commands::Pois { floor, .. } => assert_eq!(floor, Some(1)),
            _ => panic!("Expected pois command"),
        }
    }
}
