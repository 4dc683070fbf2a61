use clap::{Parser, Subcommand, ValueEnum};
use lists_core::{write_artifact, ListsError, Period};
use std::path::PathBuf;
use trending_blend::{BlendConfig, TrendingClient};

/// Generates newline-delimited subreddit lists for publication.
#[derive(Parser, Debug)]
#[command(name = "subreddit-lists", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Top popular subreddits from the Reddit API, in rank order.
    Popular {
        /// How many unique names to collect.
        #[arg(long, default_value_t = 1000)]
        count: usize,

        /// Output file, overwritten on success.
        #[arg(long, default_value = "popular_subreddits.txt")]
        out: PathBuf,
    },
    /// Top trending subreddits per size bucket for one period.
    Trending {
        /// Trending period.
        #[arg(value_enum)]
        period: PeriodArg,

        /// Output file, overwritten on success.
        #[arg(long, default_value = "trending_subreddits.txt")]
        out: PathBuf,
    },
    /// Blended trending list across all size buckets and both periods.
    Blend {
        /// Output file, overwritten on success.
        #[arg(long, default_value = "trending_blend.txt")]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PeriodArg {
    Daily,
    Weekly,
}

impl From<PeriodArg> for Period {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Daily => Period::Daily,
            PeriodArg::Weekly => Period::Weekly,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "subreddit_lists=info,lists_core=info,reddit_popular=info,trending_blend=info",
                )
            }),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        tracing::error!("run failed: {err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ListsError> {
    match cli.command {
        Command::Popular { count, out } => {
            let names = reddit_popular::generate(count).await?;
            write_artifact(&names, &out)?;
        }
        Command::Trending { period, out } => {
            let client = TrendingClient::new()?;
            let names = trending_blend::period_buckets(&client, period.into()).await?;
            write_artifact(&names, &out)?;
        }
        Command::Blend { out } => {
            let client = TrendingClient::new()?;
            let names = trending_blend::generate_blended(&client, &BlendConfig::default()).await?;
            write_artifact(&names, &out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_period_argument_is_restricted() {
        assert!(Cli::try_parse_from(["subreddit-lists", "trending", "daily"]).is_ok());
        assert!(Cli::try_parse_from(["subreddit-lists", "trending", "weekly"]).is_ok());
        // Outside the enumerated set, and missing entirely.
        assert!(Cli::try_parse_from(["subreddit-lists", "trending", "monthly"]).is_err());
        assert!(Cli::try_parse_from(["subreddit-lists", "trending"]).is_err());
    }

    #[test]
    fn test_popular_defaults() {
        let cli = Cli::try_parse_from(["subreddit-lists", "popular"]).unwrap();
        match cli.command {
            Command::Popular { count, out } => {
                assert_eq!(count, 1000);
                assert_eq!(out, PathBuf::from("popular_subreddits.txt"));
            }
            other => panic!("expected popular, got {other:?}"),
        }
    }
}
