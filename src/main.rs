use clap::{Parser, Subcommand};
use anyhow::Result;
use dotenvy::dotenv;

mod config;
mod measure;
mod output;
mod publish;
mod source;
mod split;
mod telemetry;
mod thread;

#[cfg(test)]
mod test_support;

#[derive(Parser)]
#[command(name = "pororoca", version, about = "Split text into a numbered thread of short posts")]
struct Cli {
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Split(split::SplitCmd),
    Publish(publish::PublishCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and POROROCA_LOG_FORMAT
    telemetry::config::init_tracing();

    match cli.command {
        Commands::Split(args) => split::run(args).await?,
        Commands::Publish(args) => publish::run(args).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_split_with_thread_flags() {
        let cli = Cli::try_parse_from([
            "pororoca", "--json", "split", "hello world", "--budget", "280", "--measure", "chars", "--suffix",
        ]).unwrap();
        assert!(cli.json);
        let Commands::Split(args) = cli.command else { panic!("expected split") };
        assert_eq!(args.resource, "hello world");
        assert_eq!(args.thread.budget, Some(280));
        assert_eq!(args.thread.measure, Some(measure::MeasureKind::Chars));
        assert_eq!(args.thread.suffix, Some(None));
    }

    #[test]
    fn publish_is_plan_only_by_default() {
        let cli = Cli::try_parse_from(["pororoca", "publish", "notes.txt", "--endpoint", "https://example.com/posts"]).unwrap();
        let Commands::Publish(args) = cli.command else { panic!("expected publish") };
        assert!(!args.apply);
        assert_eq!(args.endpoint.as_deref(), Some("https://example.com/posts"));
    }
}
