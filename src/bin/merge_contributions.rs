use anyhow::Context;
use clap::Parser;
use contribution_sheets::logging;
use contribution_sheets::report::merge::{self, MergeOptions, PeriodOutcome, DEFAULT_PATTERN};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    version,
    about = "Merges per-period contribution CSV files into one Excel workbook per period",
    long_about = None
)]
struct Cli {
    /// Directory containing the CSV files
    #[arg(short, long, default_value = ".")]
    input_dir: PathBuf,

    /// Directory for the merged workbooks (created if missing)
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// File name pattern of the CSV files (glob format)
    #[arg(short, long, default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Keep the source CSV files after merging
    #[arg(short, long)]
    keep_csv: bool,

    /// Show debug output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            pattern: self.pattern.clone(),
            keep_csv: self.keep_csv,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            err.print()?;
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    };
    logging::init(logging::level_from_flags(cli.verbose, cli.quiet));

    let run = merge::run(&cli.merge_options()).context("Failed to merge contribution CSV files")?;

    let outputs = run.report.outputs();
    println!("Merged {} workbook(s):", outputs.len());
    for output in &outputs {
        println!("  - {}", output.display());
    }

    for outcome in &run.report.periods {
        match outcome {
            PeriodOutcome::Skipped { .. } => {
                println!("Skipped period {}: no readable CSV files", outcome.period());
            }
            PeriodOutcome::WriteFailed { error, .. } => {
                println!("Failed period {}: {}", outcome.period(), error);
            }
            PeriodOutcome::Merged { .. } => {}
        }
    }

    match &run.cleanup {
        Some(cleanup) => println!(
            "Deleted {} of {} source CSV file(s)",
            cleanup.deleted.len(),
            run.discovered.len()
        ),
        None => println!("Kept {} source CSV file(s)", run.discovered.len()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["merge-contributions"]).unwrap();
        let options = cli.merge_options();

        assert_eq!(options.input_dir, PathBuf::from("."));
        assert_eq!(options.output_dir, PathBuf::from("."));
        assert_eq!(options.pattern, DEFAULT_PATTERN);
        assert!(!options.keep_csv);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "merge-contributions",
            "-i",
            "stats",
            "-o",
            "out",
            "-p",
            "*.csv",
            "-k",
        ])
        .unwrap();
        let options = cli.merge_options();

        assert_eq!(options.input_dir, PathBuf::from("stats"));
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert_eq!(options.pattern, "*.csv");
        assert!(options.keep_csv);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["merge-contributions", "-v", "-q"]).is_err());
    }
}
