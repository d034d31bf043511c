use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use modstats_core::{
    SteamClient, Upstream, count_mods, get_author_stats, get_mod_history, get_mod_info, get_mod_list,
};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;

mod echo;

use echo::{format_size, print_banner, print_info, print_step, print_success, print_timing};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fetch tModLoader mod statistics and print them as JSON
#[derive(Parser, Debug)]
#[command(name = "modstats")]
#[command(version)]
#[command(about = "Fetch tModLoader mod statistics as JSON", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output file (default: stdout)
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    compact: bool,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, global = true, value_name = "UA")]
    user_agent: Option<String>,

    /// Steam Web API key, needed by `author`
    #[arg(long, global = true, env = "STEAM_API_KEY", hide_env_values = true, value_name = "KEY")]
    steam_key: Option<String>,

    /// Base URL of the statistics site
    #[arg(long, global = true, value_name = "URL")]
    site_url: Option<String>,

    /// Print progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Today's mod list with all-time rank and total downloads
    List,
    /// Number of mods in today's list
    Count,
    /// Statistics of one author
    Author {
        /// SteamID64 or custom profile name
        #[arg(value_name = "ID_OR_NAME")]
        id: String,
    },
    /// Details of one mod
    Mod {
        /// Internal mod name
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Download history of one mod, per version
    History {
        /// Internal mod name
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Generate shell completion script
    Completions {
        #[arg(value_enum, value_name = "SHELL")]
        shell: Shell,
    },
}

impl Command {
    fn describe(&self) -> String {
        match self {
            Self::List => "Fetching mod list and all-time ranks".to_string(),
            Self::Count => "Counting mods".to_string(),
            Self::Author { id } => format!("Fetching author {}", id.bright_white()),
            Self::Mod { name } => format!("Fetching mod {}", name.bright_white()),
            Self::History { name } => format!("Fetching history of {}", name.bright_white()),
            Self::Completions { .. } => "Generating completions".to_string(),
        }
    }
}

fn render<T: Serialize>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact { serde_json::to_string(value) } else { serde_json::to_string_pretty(value) }
}

fn build_upstream(args: &Args) -> anyhow::Result<Upstream> {
    let mut builder = Upstream::builder().timeout(args.timeout);
    if let Some(ua) = &args.user_agent {
        builder = builder.user_agent(ua.as_str());
    }
    if let Some(site) = &args.site_url {
        builder = builder.site(site.as_str());
    }
    builder.build().context("Failed to set up HTTP client")
}

async fn run(args: &Args, upstream: &Upstream) -> anyhow::Result<String> {
    let rendered = match &args.command {
        Command::List => {
            let list = get_mod_list(upstream).await.context("Failed to fetch mod list")?;
            if args.verbose {
                print_info(&format!("{} mods", list.len()));
            }
            render(&list, args.compact)?
        }
        Command::Count => {
            let total = count_mods(upstream).await.context("Failed to count mods")?;
            render(&json!({ "total": total }), args.compact)?
        }
        Command::Author { id } => {
            let Some(key) = args.steam_key.as_deref() else {
                bail!("A Steam Web API key is required: pass --steam-key or set STEAM_API_KEY");
            };
            let steam = SteamClient::new(upstream.clone(), key)?;
            let steamid = steam.resolve(id).await.with_context(|| format!("Failed to resolve author {}", id))?;
            let author = get_author_stats(upstream, &steam, steamid)
                .await
                .with_context(|| format!("Failed to fetch author {}", steamid))?;
            if args.verbose {
                print_info(&format!("{} ({}), {} mods", author.steam_name, steamid, author.mods.len()));
            }
            render(&author, args.compact)?
        }
        Command::Mod { name } => {
            let info = get_mod_info(upstream, name).await.with_context(|| format!("Failed to fetch mod {}", name))?;
            render(&info, args.compact)?
        }
        Command::History { name } => {
            let history = get_mod_history(upstream, name)
                .await
                .with_context(|| format!("Failed to fetch history of {}", name))?;
            if args.verbose {
                print_info(&format!("{} versions", history.len()));
            }
            render(&history, args.compact)?
        }
        Command::Completions { shell } => {
            let mut script = Vec::new();
            clap_complete::generate(*shell, &mut Args::command(), "modstats", &mut script);
            String::from_utf8(script).context("Completion script is not UTF-8")?
        }
    };

    Ok(rendered)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.verbose {
        print_banner();
        print_step(1, 2, &args.command.describe());
    }

    let upstream = build_upstream(&args)?;
    if args.verbose {
        let config = upstream.config();
        print_info(&format!("Timeout {}s, User-Agent {}", config.timeout, config.user_agent));
    }
    let started = Instant::now();
    let output = run(&args, &upstream).await?;

    if args.verbose {
        print_timing("Fetched", started.elapsed());
        eprintln!("  {} {}", "Size:".dimmed(), format_size(output.len()).bright_white());
        eprintln!();
        print_step(2, 2, "Writing output");
    }

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", output))
                .with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => println!("{}", output),
    }

    Ok(())
}
