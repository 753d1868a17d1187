use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pokedex",
    version,
    about = "terminal catalog viewer for paginated REST collections",
    long_about = "Pokedex browses a paginated REST catalog (PokeAPI by default) from the terminal: a grid of cards per page, lookup by name, and a detail view per entry.\n\nExamples:\n  pokedex\n  pokedex -p 5 -n 40\n  pokedex -s pikachu -d 1\n  pokedex -I\n  pokedex -p 3 -o page3.json\n\nTip: Use --init-config to write ~/.pokedex/config.yml and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        long = "cols",
        visible_alias = "columns",
        value_name = "N",
        help_heading = "Output",
        help = "Cards per grid row."
    )]
    pub columns: Option<usize>,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the first screen to a file (format from --output-format or the extension)."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output file format: text or json."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.pokedex/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Input",
        help = "Write a default config file if none exists, then continue."
    )]
    pub init_config: bool,

    #[arg(
        short = 'b',
        long = "url",
        visible_alias = "base-url",
        value_name = "URL",
        help_heading = "Catalog",
        help = "Base URL of the catalog API."
    )]
    pub base_url: Option<String>,

    #[arg(
        long = "res",
        visible_alias = "resource",
        value_name = "NAME",
        help_heading = "Catalog",
        help = "Collection path under the base URL."
    )]
    pub resource: Option<String>,

    #[arg(
        short = 'n',
        long = "ps",
        visible_alias = "page-size",
        value_name = "N",
        help_heading = "Browse",
        help = "Entries per page."
    )]
    pub page_size: Option<u64>,

    #[arg(
        short = 'p',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "Browse",
        help = "Page to open."
    )]
    pub page: Option<u64>,

    #[arg(
        short = 's',
        long = "sr",
        visible_alias = "search",
        value_name = "NAME",
        help_heading = "Browse",
        help = "Look up an entry by name instead of listing a page."
    )]
    pub search: Option<String>,

    #[arg(
        short = 'd',
        long = "dt",
        visible_alias = "details",
        value_name = "CARD",
        help_heading = "Browse",
        help = "Show the detail view for card CARD (1-based) of the opened screen."
    )]
    pub details: Option<usize>,

    #[arg(
        short = 'I',
        long = "it",
        visible_alias = "interactive",
        help_heading = "Browse",
        help = "Start an interactive prompt after opening the first screen."
    )]
    pub interactive: bool,

    #[arg(
        short = 'r',
        long = "rt",
        visible_alias = "rate",
        value_name = "RPS",
        help_heading = "Performance",
        help = "Request rate limit (requests per second)."
    )]
    pub rate: Option<u32>,

    #[arg(
        long = "cnc",
        visible_alias = "concurrency",
        value_name = "N",
        help_heading = "Performance",
        help = "Card details fetched in parallel (1 = sequential)."
    )]
    pub concurrency: Option<usize>,

    #[arg(
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "Performance",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "wrk",
        visible_alias = "workers",
        value_name = "N",
        help_heading = "Performance",
        help = "Runtime worker threads."
    )]
    pub workers: Option<usize>,

    #[arg(
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL."
    )]
    pub proxy: Option<String>,

    #[arg(
        long = "ua",
        visible_alias = "user-agent",
        value_name = "STRING",
        help_heading = "HTTP",
        help = "User-Agent header sent with every request."
    )]
    pub user_agent: Option<String>,

    #[arg(
        long = "frd",
        visible_alias = "follow-redirects",
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL",
        help_heading = "HTTP",
        help = "Follow HTTP redirects (default true)."
    )]
    pub follow_redirects: Option<bool>,
}
