//! Checks the structure of a crawl result file
//!
//! Usage: `sanity-check [FILE]` (defaults to `result.json`). Exits non-zero
//! when the file is missing, is not JSON, is not an array, or holds a record
//! missing required keys.

use alkoteka_crawler::output::{validate_file, ValidationError};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "sanity-check")]
#[command(version = "1.0.0")]
#[command(about = "Validates a crawl result file", long_about = None)]
struct Cli {
    /// Result file to check
    #[arg(value_name = "FILE", default_value = "result.json")]
    file: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match validate_file(&cli.file) {
        Ok(report) => {
            println!(
                "✅ Loaded {} items from '{}'.",
                report.records,
                cli.file.display()
            );

            if report.is_empty() {
                println!("⚠️  Warning: List is empty.");
                return ExitCode::SUCCESS;
            }

            println!("✅ Top-level schema: OK");
            println!("✅ Price Data: OK");
            println!("✅ Stock Data: OK");
            println!("✅ Metadata (__description): OK");
            println!("   Sample specs: {:?}", report.sample_metadata_keys);
            println!("\n🎉 Sanity check passed!");
            ExitCode::SUCCESS
        }
        Err(ValidationError::NotFound(path)) => {
            println!("❌ File '{}' not found.", path);
            ExitCode::FAILURE
        }
        Err(e) => {
            println!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
