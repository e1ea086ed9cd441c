use anyhow::{Context, Result};
use clap::Parser;
use logasaurus::{ConfigSources, SettingsOverrides, TailConfig, logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "logasaurus",
    version,
    about = "Tail Elasticsearch logs from the command line",
    long_about = None
)]
struct Cli {
    /// Search query (Lucene query string syntax)
    #[arg(conflicts_with = "define")]
    query: Option<String>,

    /// Use a query from the [define] table of the config file
    #[arg(short, long)]
    define: Option<String>,

    /// Additional config file (repeatable, applied in order)
    #[arg(short, long)]
    config: Vec<PathBuf>,

    /// Ignore the default config file locations
    #[arg(long)]
    no_config: bool,

    /// Elasticsearch host
    #[arg(short = 'e', long)]
    elasticsearch_url: Option<String>,

    /// Elasticsearch port
    #[arg(short = 'p', long)]
    elasticsearch_port: Option<u16>,

    /// Minutes before now the search window ends
    #[arg(short = 's', long)]
    start_time: Option<i64>,

    /// Minutes the first search looks back
    #[arg(long)]
    sync_depth: Option<i64>,

    /// Seconds between searches
    #[arg(short = 'i', long)]
    sync_interval: Option<u64>,

    /// Maximum number of hits per search
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Prefix each line with the originating host
    #[arg(long, overrides_with = "no_search_host")]
    search_host: bool,

    /// Print only the message, even if the config enables --search-host
    #[arg(long)]
    no_search_host: bool,

    /// Highlight the first query word in each line (drops lines without it)
    #[arg(long, overrides_with = "no_highlight")]
    highlight: bool,

    /// Turn off highlighting enabled in the config
    #[arg(long)]
    no_highlight: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Stop after this many searches
    #[arg(long)]
    max_polls: Option<u64>,

    /// Retry failed connections this many times before giving up
    #[arg(long = "retries")]
    transport_retries: Option<u32>,

    /// Seconds to wait before the first retry (doubles each retry)
    #[arg(long)]
    retry_backoff: Option<u64>,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout")]
    request_timeout: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Do not print the banner
    #[arg(long)]
    no_banner: bool,

    /// List the defined queries and exit
    #[arg(long)]
    list_defines: bool,
}

impl Cli {
    fn sources(&self) -> ConfigSources {
        ConfigSources {
            files: self.config.clone(),
            no_config: self.no_config,
            environment: None,
        }
    }

    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            elasticsearch_url: self.elasticsearch_url.clone(),
            elasticsearch_port: self.elasticsearch_port,
            start_time: self.start_time,
            sync_depth: self.sync_depth,
            sync_interval: self.sync_interval,
            count: self.count,
            search_host: switch(self.search_host, self.no_search_host),
            highlight: switch(self.highlight, self.no_highlight),
            log_verbose: self.verbose.then_some(true),
            transport_retries: self.transport_retries,
            retry_backoff: self.retry_backoff,
            request_timeout: self.request_timeout,
            max_polls: self.max_polls,
        }
    }
}

/// `Some` only when one of an on/off flag pair was given.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = TailConfig::load(&cli.sources(), &cli.overrides())
        .context("failed to load configuration")?;

    if cli.list_defines {
        for (name, query) in &config.define {
            println!("{name}\t{query}");
        }
        return Ok(());
    }

    if !cli.no_banner {
        print_banner();
    }

    logging::init_tracing(config.log_verbose);
    tracing::debug!("{:?}", config);

    let query = config.resolve_query(cli.query.as_deref(), cli.define.as_deref())?;
    tracing::info!("Starting new search for {}", query);

    logasaurus::tail(&config, &query)
        .with_context(|| format!("tailing {} failed", config.search_url()))?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"                        .       .
                       / '.   .' \
               .---.  <    > <    >  .---.
               |    \  \ - ~ ~ - /  /    |
               ~-..-~             ~-..-~
            \~~~\.'                    './~~~/
  .-~~^-.    \__/                        \__/
.'  O    \     /               /       \  \
(_____'    \._.'              |         }}  \/~~~/
  ----.         /       }}     |        /    \__/
      \-.      |       /      |       /      \.,~~|
          ~-.__|      /_ - ~ ^|      /- _     \..-'   f: f:
               |     /        |     /     ~-.     -. _||_||_
               |_____|        |_____|         ~ - . _ _ _ _ _>
██╗      ██████╗  ██████╗  █████╗ ███████╗ █████╗ ██╗   ██╗██████╗ ██╗   ██╗███████╗
██║     ██╔═══██╗██╔════╝ ██╔══██╗██╔════╝██╔══██╗██║   ██║██╔══██╗██║   ██║██╔════╝
██║     ██║   ██║██║  ███╗███████║███████╗███████║██║   ██║██████╔╝██║   ██║███████╗
██║     ██║   ██║██║   ██║██╔══██║╚════██║██╔══██║██║   ██║██╔══██╗██║   ██║╚════██║
███████╗╚██████╔╝╚██████╔╝██║  ██║███████║██║  ██║╚██████╔╝██║  ██║╚██████╔╝███████║
╚══════╝ ╚═════╝  ╚═════╝ ╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝ ╚═════╝ ╚═╝  ╚═╝ ╚═════╝ ╚══════╝
"#
    );
}
