//! `newsgraph` command line: watch a feed or print one snapshot

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

mod commands;

fn cli() -> Command {
    let feed_args = [
        Arg::new("config")
            .long("config")
            .short('c')
            .value_name("PATH")
            .help("TOML configuration file"),
        Arg::new("url")
            .long("url")
            .value_name("URL")
            .help("Feed URL or local JSON file (overrides config)"),
    ];

    Command::new("newsgraph")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Author/story graph over a live news feed")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON on stderr"),
        )
        .subcommand(
            Command::new("watch")
                .about("Refresh the graph on an interval until interrupted")
                .args(feed_args.clone())
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .value_name("SECS")
                        .value_parser(value_parser!(u64).range(1..))
                        .help("Seconds between refreshes (overrides config)"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("log")
                        .value_parser(["log", "json"])
                        .help("log: summary per cycle; json: one graph per line on stdout"),
                ),
        )
        .subcommand(
            Command::new("snapshot")
                .about("Fetch once and print the graph as JSON")
                .args(feed_args)
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .action(ArgAction::SetTrue)
                        .help("Single-line JSON"),
                ),
        )
}

fn init_tracing(matches: &ArgMatches) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if matches.get_flag("log-json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(&matches);

    match matches.subcommand() {
        Some(("watch", args)) => commands::watch(args).await,
        Some(("snapshot", args)) => commands::snapshot(args).await,
        _ => Ok(()),
    }
}
