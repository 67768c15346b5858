//! CLI tool for Iranian bank card detection.
//!
//! # Usage
//!
//! ```bash
//! # Detect the issuing bank
//! iran-banks detect 6037991234567893 --lang fa
//!
//! # JSON output
//! iran-banks detect "6037-9912-3456-7893" --output json
//!
//! # List the known banks
//! iran-banks banks
//!
//! # Load banks from a file instead of the built-in table
//! iran-banks --registry banks.json banks
//!
//! # Generate test card numbers
//! iran-banks generate 610433 --count 5
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use iran_banks::bank::JsonBankLoader;
use iran_banks::{
    clean_card_number, generate, luhn, mask_card_number, BankDetector, RegistryError,
    ValidationResult,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "iran-banks")]
#[command(author, version, about = "Iranian bank card detection and validation tool")]
struct Cli {
    /// JSON bank registry to use instead of the built-in table
    #[arg(long, global = true, env = "IRAN_BANKS_REGISTRY")]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the issuing bank and validate a card number
    Detect {
        /// Card number (spaces, dashes and other separators allowed)
        card_number: String,

        /// Message language (en, fa)
        #[arg(short, long, default_value = "en")]
        lang: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// List all known banks
    Banks {
        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Check if a card passes the Luhn algorithm
    Luhn {
        /// Card number to check (separators are ignored)
        card_number: String,
    },

    /// Generate test card numbers for a bank code (for testing only)
    Generate {
        /// Six-digit bank code
        bin: String,

        /// Number of cards to generate
        #[arg(short, long, default_value = "1")]
        count: usize,
    },

    /// Mask a card number, keeping the bank code and last four digits
    Mask {
        /// Card number to mask
        card_number: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let detector = match load_detector(cli.registry.as_deref()) {
        Ok(detector) => detector,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    match cli.command {
        Commands::Detect {
            card_number,
            lang,
            output,
        } => cmd_detect(&detector, &card_number, &lang, output),
        Commands::Banks { output } => cmd_banks(&detector, output),
        Commands::Luhn { card_number } => cmd_luhn(&card_number),
        Commands::Generate { bin, count } => cmd_generate(&bin, count),
        Commands::Mask { card_number } => {
            println!("{}", mask_card_number(&card_number));
            ExitCode::SUCCESS
        }
    }
}

fn load_detector(registry: Option<&Path>) -> Result<BankDetector, RegistryError> {
    match registry {
        Some(path) => Ok(BankDetector::with_table(JsonBankLoader::from_file(path)?)),
        None => Ok(BankDetector::new()),
    }
}

fn cmd_detect(
    detector: &BankDetector,
    card_number: &str,
    lang: &str,
    output: OutputFormat,
) -> ExitCode {
    let result = detector.detect_bank(card_number, lang);

    match output {
        OutputFormat::Text => print_result(&result),
        OutputFormat::Json => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(2);
            }
        },
    }

    if result.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_result(result: &ValidationResult) {
    println!("Valid: {}", if result.valid { "yes" } else { "no" });
    println!("Message: {}", result.message);
    if let Some(bin) = &result.bin_code {
        println!("Bank Code: {}", bin);
    }
}

fn cmd_banks(detector: &BankDetector, output: OutputFormat) -> ExitCode {
    let mut banks: Vec<(String, String)> = detector.get_all_banks().into_iter().collect();
    banks.sort();

    match output {
        OutputFormat::Text => {
            for (code, name) in &banks {
                println!("{}  {}", code, name);
            }
        }
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = banks
                .into_iter()
                .map(|(code, name)| (code, serde_json::Value::String(name)))
                .collect();
            match serde_json::to_string_pretty(&map) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(2);
                }
            }
        }
    }

    ExitCode::SUCCESS
}

fn cmd_luhn(card_number: &str) -> ExitCode {
    if luhn::validate_str(&clean_card_number(card_number)) {
        println!("Luhn check: PASS");
        ExitCode::SUCCESS
    } else {
        println!("Luhn check: FAIL");
        ExitCode::FAILURE
    }
}

fn cmd_generate(bin: &str, count: usize) -> ExitCode {
    match generate::generate_cards(bin, count) {
        Ok(cards) => {
            for card in cards {
                println!("{}", card);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
