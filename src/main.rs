use clap::{Parser, Subcommand};
use simple_folio::contact::{self, DryRunTransport, MailTransport, SpoolTransport};
use simple_folio::probe::{FsProbe, ImageProbe};
use simple_folio::{check, config, content, output, replay};
use std::path::PathBuf;
use std::sync::Arc;

fn version_string() -> &'static str {
    let on_tag = env!("FOLIO_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("FOLIO_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "simple-folio")]
#[command(about = "Interaction core for a single-page portfolio")]
#[command(long_about = "\
Interaction core for a single-page portfolio

Tracks the active section while the visitor scrolls, drives the preview
dialogs for certifications, achievements and projects, filters projects by
category, and implements the contact form endpoint.

Site structure:

  content/
  ├── config.toml        # Offsets, timings, dialog sizing, contact mail (optional)
  └── content.toml       # Gallery items and project filter buttons
  public/
  └── images/            # Files referenced as /images/... from content.toml

Set RUST_LOG=debug to trace state transitions.

Run 'simple-folio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Public asset directory image URIs resolve against
    #[arg(long, default_value = "public", global = true)]
    public: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate content and probe every gallery image
    Check,
    /// Run a scripted visitor session and print the page state after each step
    Replay {
        /// TOML script with sections, optional image sizes and timed steps
        script: PathBuf,
    },
    /// Run a JSON submission through the contact endpoint
    Contact {
        /// JSON request body
        file: PathBuf,

        /// HTTP method to simulate
        #[arg(long, default_value = "POST")]
        method: String,

        /// Write delivered mail as JSON into this directory instead of a dry run
        #[arg(long)]
        spool: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            println!("==> Checking {}", cli.source.display());
            let content = content::load_content(&cli.source)?;
            let report = check::check_site(&content, &FsProbe::new(&cli.public));
            output::print_check_output(&report);
            if report.failed() == 0 {
                println!("==> Content is valid");
            } else {
                println!("==> Content loads; failed images fall back to the placeholder size");
            }
        }
        Command::Replay { script } => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            let content = content::load_content(&cli.source)?;
            let script = replay::Script::load(&script)?;
            let probe: Arc<dyn ImageProbe> = match script.static_probe() {
                Some(table) => Arc::new(table),
                None => Arc::new(FsProbe::new(&cli.public)),
            };
            let steps = replay::run_script(&script, site_config, content, probe);
            output::print_replay_output(&steps);
        }
        Command::Contact {
            file,
            method,
            spool,
        } => {
            let site_config = config::load_config(&cli.source)?;
            let body = std::fs::read_to_string(&file)?;
            match spool {
                Some(dir) => {
                    let transport = SpoolTransport::new(dir);
                    let reply = run_contact(&method, &body, &site_config, &transport);
                    output::print_contact_output(&reply, None);
                }
                None => {
                    let transport = DryRunTransport::default();
                    let reply = run_contact(&method, &body, &site_config, &transport);
                    output::print_contact_output(&reply, transport.sent().last());
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn run_contact(
    method: &str,
    body: &str,
    site_config: &config::SiteConfig,
    transport: &dyn MailTransport,
) -> contact::ContactReply {
    contact::handle_contact(method, body, &site_config.contact, transport)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
