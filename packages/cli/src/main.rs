mod generate;

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

/// Generate TypeScript declaration files from Lua modules
#[derive(Parser, Debug)]
#[command(name = "declua")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input .lua file; the .d.ts lands next to it
    input: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    match generate::generate(&cli.input) {
        Ok(output) => {
            println!(
                "{} {} → {}",
                "✓".green(),
                cli.input.display(),
                output.display()
            );
        }
        Err(err) => {
            eprintln!("{} {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    }
}
