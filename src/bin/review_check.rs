// src/bin/review_check.rs
// DOCUMENTATION: Command-line validator for review candidates
// PURPOSE: Check newline-delimited JSON records from a file or stdin before import
//
// Usage: review-check [FILE]
// Exit codes: 0 all valid, 1 some records invalid, 2 I/O or malformed JSON

use anyhow::{Context, Result};
use review_model::{validate, Config, ReviewsError};
use serde_json::{json, Value};
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::process::ExitCode;

#[derive(Debug, Default, PartialEq, Eq)]
struct CheckSummary {
    valid: usize,
    invalid: usize,
}

/// Validate each non-blank line, writing one JSON result line per record
fn check_records<R: BufRead, W: Write>(reader: R, mut out: W) -> Result<CheckSummary> {
    let mut summary = CheckSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read line {}", line_no))?;
        if line.trim().is_empty() {
            continue;
        }

        let candidate: Value = serde_json::from_str(&line)
            .with_context(|| format!("line {} is not valid JSON", line_no))?;

        let result = match validate(&candidate) {
            Ok(review) => {
                summary.valid += 1;
                json!({ "line": line_no, "ok": true, "review": review })
            }
            Err(e) => {
                summary.invalid += 1;
                log::debug!("Line {} rejected: {}", line_no, e);
                let body = ReviewsError::from(e).to_body();
                json!({ "line": line_no, "ok": false, "error": body["error"] })
            }
        };
        writeln!(out, "{}", result)?;
    }

    Ok(summary)
}

fn run(path: Option<String>) -> Result<CheckSummary> {
    let stdout = io::stdout();
    match path {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("cannot open {}", path))?;
            check_records(BufReader::new(file), stdout.lock())
        }
        None => check_records(io::stdin().lock(), stdout.lock()),
    }
}

fn main() -> ExitCode {
    let config = Config::from_env();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    match run(env::args().nth(1)) {
        Ok(summary) => {
            log::info!(
                "Checked {} records: {} valid, {} invalid",
                summary.valid + summary.invalid,
                summary.valid,
                summary.invalid
            );
            if summary.invalid > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(input: &str) -> (Result<CheckSummary>, Vec<Value>) {
        let mut out = Vec::new();
        let result = check_records(input.as_bytes(), &mut out);
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (result, lines)
    }

    #[test]
    fn test_mixed_records() {
        let input = concat!(
            r#"{"comment": "Great stay", "rating": 5, "author": "64f1a2b3c4d5e6f7a8b9c0d1"}"#,
            "\n\n",
            r#"{"rating": 7}"#,
            "\n"
        );
        let (result, lines) = check(input);

        assert_eq!(result.unwrap(), CheckSummary { valid: 1, invalid: 1 });
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["ok"], true);
        assert_eq!(lines[0]["review"]["rating"], 5);
        assert_eq!(lines[1]["line"], 3);
        assert_eq!(lines[1]["error"]["violations"][0]["field"], "rating");
        assert_eq!(lines[1]["error"]["violations"][0]["kind"], "range");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let (result, _) = check("{\"rating\": 3}\n{not json\n");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
