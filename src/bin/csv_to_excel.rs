use anyhow::Context;
use clap::Parser;
use contribution_sheets::logging;
use contribution_sheets::report::{convert, ConversionInput};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(
    version,
    about = "Converts contribution statistics CSV files into an Excel workbook",
    long_about = None,
    override_usage = "csv-to-excel <DETAIL_CSV> <SUMMARY_CSV> <OUTPUT_XLSX>\n       \
                      csv-to-excel <INPUT_CSV> <OUTPUT_XLSX>"
)]
struct Cli {
    /// Input CSV file(s) followed by the output workbook path
    #[arg(required = true, num_args = 2..=3, value_name = "PATHS")]
    paths: Vec<PathBuf>,
}

impl Cli {
    fn into_request(mut self) -> (ConversionInput, PathBuf) {
        let output = self.paths.pop().unwrap_or_default();
        let input = match <[PathBuf; 2]>::try_from(self.paths) {
            Ok([detail, summary]) => ConversionInput::DetailAndSummary { detail, summary },
            Err(mut paths) => ConversionInput::Single(paths.pop().unwrap_or_default()),
        };
        (input, output)
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
    logging::init(Level::INFO);

    let (input, output) = cli.into_request();
    let conversion = convert(&input, &output)
        .with_context(|| format!("Failed to convert CSV to Excel workbook {}", output.display()))?;

    println!("✓ Converted to Excel workbook: {}", conversion.output.display());
    println!("  Sheets: {}", conversion.sheet_names().join(", "));

    Ok(())
}
