use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use tracing_subscriber::EnvFilter;

use formcast::dataset::MatchHistory;
use formcast::match_sim::{self, SimConfig};
use formcast::possession::NormalizationMode;
use formcast::standings::StandingsTable;

const USAGE: &str = "\
Usage: formcast <dataset.csv> <home> <away> [options]
       formcast <dataset.csv> --teams

Options:
  --standings <file.json>  league table for the standings adjustment
  --trials <n>             trial count (default 5000)
  --lookback <n>           matches of recent form per team (default 5)
  --noise <sd>             goal/chance noise std dev (default 0.1)
  --seed <n>               fix the random seed for reproducible runs
  --raw-share              raw-ratio possession instead of half-blend
  --json                   print the forecast as JSON
  --teams                  list the dataset's team names and exit
";

struct Cli {
    dataset: PathBuf,
    home: Option<String>,
    away: Option<String>,
    standings: Option<PathBuf>,
    list_teams: bool,
    json: bool,
    config: SimConfig,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print!("{USAGE}");
        return Ok(());
    }

    run(parse_args(&args)?)
}

fn run(cli: Cli) -> Result<()> {
    let history = MatchHistory::from_csv_path(&cli.dataset)?;
    if history.is_empty() {
        bail!("dataset {} contains no usable matches", cli.dataset.display());
    }

    if cli.list_teams {
        for team in history.teams() {
            println!("{team}");
        }
        return Ok(());
    }

    let (Some(home), Some(away)) = (cli.home.as_deref(), cli.away.as_deref()) else {
        bail!("home and away team names are required (or pass --teams)");
    };

    let standings = match cli.standings.as_deref() {
        Some(path) => Some(StandingsTable::from_json_path(path)?),
        None => None,
    };

    match history.date_range() {
        Some((first, last)) => eprintln!("{} matches, {first} to {last}", history.len()),
        None => eprintln!("{} matches", history.len()),
    }

    let forecast = match_sim::simulate_match(home, away, &history, standings.as_ref(), &cli.config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&forecast)?);
    } else {
        println!("{home} vs {away}");
        println!("Score: {}-{}", forecast.home_goals, forecast.away_goals);
        println!(
            "Possession: {:.1}% - {:.1}%",
            forecast.home_possession_pct, forecast.away_possession_pct
        );
        println!(
            "Shots on target: {} - {}",
            forecast.home_chances, forecast.away_chances
        );
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<Cli> {
    let mut config = SimConfig::default();
    let mut positional: Vec<String> = Vec::new();
    let mut standings = None;
    let mut list_teams = false;
    let mut json = false;

    let mut idx = 0usize;
    while idx < args.len() {
        let arg = args[idx].as_str();
        if !arg.starts_with("--") {
            positional.push(arg.to_string());
            idx += 1;
            continue;
        }

        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag, Some(value.to_string())),
            None => (arg, None),
        };
        let mut value = || -> Result<String> {
            if let Some(v) = inline.clone() {
                return Ok(v);
            }
            idx += 1;
            args.get(idx)
                .cloned()
                .ok_or_else(|| anyhow!("{flag} expects a value"))
        };

        match flag {
            "--teams" => list_teams = true,
            "--json" => json = true,
            "--raw-share" => config.normalization = NormalizationMode::RawShare,
            "--standings" => standings = Some(PathBuf::from(value()?)),
            "--trials" => {
                config.trials = value()?
                    .parse()
                    .context("--trials expects a positive integer")?;
            }
            "--lookback" => {
                config.lookback = value()?
                    .parse()
                    .context("--lookback expects a positive integer")?;
            }
            "--noise" => {
                config.noise_std_dev = value()?.parse().context("--noise expects a number")?;
            }
            "--seed" => {
                config.seed = Some(value()?.parse().context("--seed expects an integer")?);
            }
            _ => bail!("unknown flag {flag}\n{USAGE}"),
        }
        idx += 1;
    }

    let mut positional = positional.into_iter();
    let Some(dataset) = positional.next() else {
        bail!("a dataset path is required\n{USAGE}");
    };
    let cli = Cli {
        dataset: PathBuf::from(dataset),
        home: positional.next(),
        away: positional.next(),
        standings,
        list_teams,
        json,
        config,
    };
    if positional.next().is_some() {
        bail!("unexpected extra positional argument\n{USAGE}");
    }
    Ok(cli)
}
