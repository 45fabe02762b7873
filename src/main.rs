// CLI binary entry point for playtime
//
// This is the main entry point for the playtime command-line tool.

use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use playtime::AudioFormat;

/// playtime - audio duration CLI tool
#[derive(Parser, Debug)]
#[command(name = "playtime")]
#[command(about = "Estimate audio playback duration without decoding", long_about = None)]
#[command(version)]
struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Quiet mode (suppress per-file output, keep errors)
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate the duration of audio file(s)
    Duration {
        /// Audio file path(s)
        files: Vec<String>,
    },
    /// Estimate durations for every file matching a glob pattern
    Scan {
        /// Glob pattern, e.g. "music/**/*.flac"
        pattern: String,
    },
    /// Report the format a file would be dispatched to
    Detect {
        /// Audio file path(s)
        files: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    path: &'a str,
    format: String,
    seconds: u64,
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let failed = match &config.command {
        Commands::Duration { files } => report_files(files, &config)?,
        Commands::Scan { pattern } => {
            let files: Vec<String> = glob::glob(pattern)
                .with_context(|| format!("invalid glob pattern: {}", pattern))?
                .filter_map(|entry| entry.ok())
                .map(|path| path.display().to_string())
                .collect();
            report_files(&files, &config)?
        }
        Commands::Detect { files } => detect_files(files, &config),
    };

    if failed {
        process::exit(1);
    }
    Ok(())
}

fn report_files(files: &[String], config: &Config) -> anyhow::Result<bool> {
    if files.is_empty() {
        eprintln!("Error: No files specified");
        return Ok(true);
    }

    let mut failed = false;
    for file_path in files {
        match playtime::probe_path(file_path) {
            Ok(seconds) => {
                let format = AudioFormat::from_path(file_path)
                    .map(|format| format.to_string())
                    .unwrap_or_default();

                match config.format {
                    OutputFormat::Pretty => {
                        if !config.quiet {
                            println!("{}: {} ({})", file_path, format_clock(seconds), format);
                        }
                    }
                    OutputFormat::Json => {
                        let report = Report {
                            path: file_path,
                            format,
                            seconds,
                        };
                        println!("{}", serde_json::to_string(&report)?);
                    }
                }
            }
            Err(e) => {
                eprintln!("✗ {}: {}", file_path, e);
                failed = true;
            }
        }
    }
    Ok(failed)
}

fn detect_files(files: &[String], config: &Config) -> bool {
    if files.is_empty() {
        eprintln!("Error: No files specified");
        return true;
    }

    let mut failed = false;
    for file_path in files {
        match AudioFormat::from_path(file_path) {
            Some(format) => {
                if !config.quiet {
                    println!("  {}: {}", file_path, format);
                }
            }
            None => {
                eprintln!("✗ {}: unsupported extension", file_path);
                failed = true;
            }
        }
    }
    failed
}

/// Render whole seconds as h:mm:ss or m:ss
fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(61), "1:01");
        assert_eq!(format_clock(3599), "59:59");
        assert_eq!(format_clock(3661), "1:01:01");
    }
}
