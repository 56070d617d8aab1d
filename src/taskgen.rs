//! Synthetic task set generator.
//!
//! Writes a deterministic task dump that the viewer can open with
//! "Open JSON…". Paths ending in `.br` are Brotli-compressed.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tasktree::{write_task_file, SyntheticGenerator};
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT: &str = "tasks.json";

struct Config {
    count: usize,
    branches: usize,
    seed: u64,
    output_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            count: 500,
            branches: 4,
            seed: 42,
            output_file: None,
        }
    }
}

/// Value following the flag at `args[*i]`.
fn flag_value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str> {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value),
        None => anyhow::bail!("{} requires an argument", flag),
    }
}

fn parse_args(args: &[String]) -> Result<Option<Config>> {
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-count" => {
                let value = flag_value(args, &mut i)?;
                config.count = value.parse().with_context(|| format!("invalid -count: {}", value))?;
            }
            "-branches" => {
                let value = flag_value(args, &mut i)?;
                config.branches = value.parse().with_context(|| format!("invalid -branches: {}", value))?;
            }
            "-seed" => {
                let value = flag_value(args, &mut i)?;
                config.seed = value.parse().with_context(|| format!("invalid -seed: {}", value))?;
            }
            "-out" => {
                config.output_file = Some(flag_value(args, &mut i)?.to_string());
            }
            "-h" | "-help" | "--help" => {
                print_help();
                return Ok(None);
            }
            other => anyhow::bail!("Unknown argument: {}", other),
        }
        i += 1;
    }

    Ok(Some(config))
}

fn print_help() {
    println!("Synthetic Task Set Generator");
    println!("Usage: tasktree-gen [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -count <N>             Number of task records (default: 500)");
    println!("  -branches <N>          Number of branches (default: 4)");
    println!("  -seed <N>              Random seed (default: 42)");
    println!("  -out <FILE>            Output file path (default: tasks.json)");
    println!("                         Use a .br extension for Brotli compression");
    println!("  -h, -help, --help      Show this help message");
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let args: Vec<String> = env::args().collect();
    let Some(config) = parse_args(&args)? else {
        return Ok(());
    };

    let generator = SyntheticGenerator::with_config(config.count, config.branches, config.seed);
    let records = generator.generate();

    let output_path = PathBuf::from(config.output_file.as_deref().unwrap_or(DEFAULT_OUTPUT));
    write_task_file(&output_path, &records)?;

    println!("{} tasks written to: {}", records.len(), output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("tasktree-gen")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args() {
        let config = parse_args(&args(&["-count", "10", "-seed", "7", "-out", "x.json.br"]))
            .unwrap()
            .unwrap();
        assert_eq!(config.count, 10);
        assert_eq!(config.branches, 4);
        assert_eq!(config.seed, 7);
        assert_eq!(config.output_file.as_deref(), Some("x.json.br"));
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let err = parse_args(&args(&["-count"])).err().unwrap();
        assert_eq!(err.to_string(), "-count requires an argument");
        assert!(parse_args(&args(&["-bogus"])).is_err());
    }

    #[test]
    fn test_help_stops_parsing() {
        assert!(parse_args(&args(&["-h"])).unwrap().is_none());
    }
}
