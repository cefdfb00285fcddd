//! Interactive session over stdin.
//!
//! Every non-command line is treated as a product query. Commands start with
//! a colon:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `:top N` | set the number of recommendations per query |
//! | `:reload` | re-read the catalogue and swap the index in place |
//! | `:quit` | leave the session (EOF works too) |

use anyhow::{Context, Result};
use product_recs_core::Recommender;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

use crate::catalogue::load_catalogue;
use crate::config::Config;
use crate::recommend::recommend_with;
use crate::stats::print_stats;

#[derive(Debug, PartialEq)]
enum ShellCommand {
    Query(String),
    Top(usize),
    Reload,
    Quit,
    Blank,
    Unknown(String),
}

fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Blank;
    }
    let Some(cmd) = line.strip_prefix(':') else {
        return ShellCommand::Query(line.to_string());
    };

    let mut parts = cmd.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("quit" | "q" | "exit"), None, None) => ShellCommand::Quit,
        (Some("reload"), None, None) => ShellCommand::Reload,
        (Some("top"), Some(n), None) => match n.parse::<usize>() {
            Ok(n) if n > 0 => ShellCommand::Top(n),
            _ => ShellCommand::Unknown(line.to_string()),
        },
        _ => ShellCommand::Unknown(line.to_string()),
    }
}

fn reload(recommender: &Recommender, config: &Config) -> Result<()> {
    let table = load_catalogue(config)?;
    let stats = recommender.reload(&table).context("Reload failed")?;
    println!("Catalogue reloaded.");
    print_stats(&stats);
    Ok(())
}

pub fn run_shell(recommender: &Recommender, config: &Config) -> Result<()> {
    let mut top_n = config.ranking.default_top_n;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    info!(products = recommender.snapshot().catalogue().len(), "shell started");
    println!("Type a product name, :top N, :reload or :quit.");

    loop {
        print!("recs> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        match parse_line(&line) {
            ShellCommand::Blank => {}
            ShellCommand::Quit => break,
            ShellCommand::Top(n) => {
                top_n = n;
                println!("top_n = {}", top_n);
            }
            ShellCommand::Reload => {
                // The previous catalogue keeps serving when this fails.
                if let Err(e) = reload(recommender, config) {
                    warn!(error = %e, "shell reload failed");
                    println!("{:#}", e);
                }
            }
            ShellCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
            }
            ShellCommand::Query(q) => {
                recommend_with(recommender, config, &q, top_n, false)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_queries_and_blank_lines() {
        assert_eq!(parse_line("  \n"), ShellCommand::Blank);
        assert_eq!(
            parse_line(" Vitamin C Serum \n"),
            ShellCommand::Query("Vitamin C Serum".to_string())
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line(":quit"), ShellCommand::Quit);
        assert_eq!(parse_line(":reload\n"), ShellCommand::Reload);
        assert_eq!(parse_line(":top 3"), ShellCommand::Top(3));
    }

    #[test]
    fn test_parse_rejects_bad_top() {
        assert!(matches!(parse_line(":top 0"), ShellCommand::Unknown(_)));
        assert!(matches!(parse_line(":top many"), ShellCommand::Unknown(_)));
        assert!(matches!(parse_line(":top"), ShellCommand::Unknown(_)));
        assert!(matches!(parse_line(":frobnicate"), ShellCommand::Unknown(_)));
    }
}
