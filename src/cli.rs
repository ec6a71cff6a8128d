//! Level-lab argument parsing

use std::path::PathBuf;

use anyhow::{anyhow, Result};

pub const USAGE: &str = "\
usage: cat-shelf [generate] [--config <path>] [--seed <u64>] [--runs <n>] [--budget <n>]
       cat-shelf evaluate <level.json> [--config <path>] [--runs <n>] [--budget <n>]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate,
    Evaluate { level: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub runs: Option<u32>,
    pub budget: Option<u32>,
}

/// Parse arguments after the program name; no subcommand means `generate`
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut i = 0usize;
    let command = match args.first().map(String::as_str) {
        Some("generate") => {
            i = 1;
            Command::Generate
        }
        Some("evaluate") => {
            let level = args
                .get(1)
                .filter(|a| !a.starts_with("--"))
                .ok_or_else(|| anyhow!("evaluate: missing level file"))?;
            i = 2;
            Command::Evaluate {
                level: PathBuf::from(level),
            }
        }
        _ => Command::Generate,
    };

    let mut out = CliArgs {
        command,
        config: None,
        seed: None,
        runs: None,
        budget: None,
    };
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        let value = || {
            args.get(i)
                .ok_or_else(|| anyhow!("missing value for {}", flag))
        };
        match flag {
            "--config" => out.config = Some(PathBuf::from(value()?)),
            "--seed" => out.seed = Some(parse_number(flag, value()?)?),
            "--runs" => out.runs = Some(parse_number(flag, value()?)?),
            "--budget" => out.budget = Some(parse_number(flag, value()?)?),
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(out)
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_generate() {
        let cli = parse_args(&[]).unwrap();
        assert_eq!(cli.command, Command::Generate);
        assert_eq!(cli.seed, None);
    }

    #[test]
    fn parses_flags() {
        let cli = parse_args(&args(&[
            "generate", "--seed", "42", "--runs", "16", "--budget", "80", "--config", "lab.json",
        ]))
        .unwrap();
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.runs, Some(16));
        assert_eq!(cli.budget, Some(80));
        assert_eq!(cli.config, Some(PathBuf::from("lab.json")));
    }

    #[test]
    fn evaluate_takes_a_level_path() {
        let cli = parse_args(&args(&["evaluate", "level.json", "--runs", "4"])).unwrap();
        assert_eq!(
            cli.command,
            Command::Evaluate {
                level: PathBuf::from("level.json")
            }
        );
        assert_eq!(cli.runs, Some(4));
        assert!(parse_args(&args(&["evaluate"])).is_err());
        assert!(parse_args(&args(&["evaluate", "--runs", "4"])).is_err());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(&args(&["--seed"])).is_err());
        assert!(parse_args(&args(&["--seed", "x"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
    }
}
