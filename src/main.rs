//! settlement-engine CLI
//!
//! Run the netting engine and pain.001 emitter from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Net a settlement window
//! settlement-engine net --input window.json
//!
//! # Net a window and emit a pain.001.001.03 payment file
//! settlement-engine emit --input window.json --directory directory.json --template skeleton.xml
//! ```

use settlement_engine::core::position::SettlementWindow;
use settlement_engine::iso20022::PaymentDocument;
use settlement_engine::prelude::*;
use settlement_engine::rng::CryptoRandomSource;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"settlement-engine — minimum-payments netting and pain.001 emission

USAGE:
    settlement-engine <COMMAND> [OPTIONS]

COMMANDS:
    net      Validate and net a settlement window
    emit     Net a settlement window and emit a pain.001.001.03 payment file
    help     Show this message

OPTIONS (net, emit):
    --input <FILE>       Path to JSON SettlementWindow file

OPTIONS (emit, additionally):
    --directory <FILE>   Path to JSON DfspDirectory file
    --template <FILE>    Path to a pain.001.001.03 XML skeleton document"#
    );
}

fn load_window(path: &str) -> SettlementWindow {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        process::exit(1);
    });
    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing settlement window JSON: {e}");
        process::exit(1);
    })
}

fn cmd_net(args: &[String]) {
    let input = parse_input_flag(args);
    let window = load_window(&input);

    match validate_window(&window) {
        Ok(positions) => match net(&positions) {
            Ok(matrix) => {
                log::info!(
                    "netted window {} into {} transfer(s)",
                    window.id,
                    matrix.transaction_count()
                );
                for (payer, payee, amount) in matrix.iter() {
                    println!("{payer} -> {payee}: {amount} {}", matrix.currency());
                }
            }
            Err(e) => {
                eprintln!("netting failed: {e}");
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("validation failed: {e}");
            process::exit(1);
        }
    }
}

fn cmd_emit(args: &[String]) {
    let mut input_path = None;
    let mut directory_path = None;
    let mut template_path = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = args.get(i).cloned();
            }
            "--directory" => {
                i += 1;
                directory_path = args.get(i).cloned();
            }
            "--template" => {
                i += 1;
                template_path = args.get(i).cloned();
            }
            other => {
                eprintln!("Unknown option: {other}");
                process::exit(1);
            }
        }
        i += 1;
    }

    let input_path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    let directory_path = directory_path.unwrap_or_else(|| {
        eprintln!("Error: --directory <FILE> is required");
        process::exit(1);
    });
    let template_path = template_path.unwrap_or_else(|| {
        eprintln!("Error: --template <FILE> is required");
        process::exit(1);
    });

    let window = load_window(&input_path);

    let directory: DfspDirectory = serde_json::from_str(
        &fs::read_to_string(&directory_path).unwrap_or_else(|e| {
            eprintln!("Error reading '{directory_path}': {e}");
            process::exit(1);
        }),
    )
    .unwrap_or_else(|e| {
        eprintln!("Error parsing directory JSON: {e}");
        process::exit(1);
    });

    let template: PaymentDocument = quick_xml::de::from_str(
        &fs::read_to_string(&template_path).unwrap_or_else(|e| {
            eprintln!("Error reading '{template_path}': {e}");
            process::exit(1);
        }),
    )
    .unwrap_or_else(|e| {
        eprintln!("Error parsing template XML: {e}");
        process::exit(1);
    });

    let window_id = window.id;
    let positions = validate_window(&window).unwrap_or_else(|e| {
        eprintln!("validation failed: {e}");
        process::exit(1);
    });
    let matrix = net(&positions).unwrap_or_else(|e| {
        eprintln!("netting failed: {e}");
        process::exit(1);
    });

    let mut rng = CryptoRandomSource::new();
    let document = emit_pain001(&template, &matrix, &directory, window_id, &mut rng)
        .unwrap_or_else(|e| {
            eprintln!("emission failed: {e}");
            process::exit(1);
        });

    let xml = settlement_engine::iso20022::serialize(&document).unwrap_or_else(|e| {
        eprintln!("serialisation failed: {e}");
        process::exit(1);
    });
    println!("{xml}");
}

fn parse_input_flag(args: &[String]) -> String {
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--input" {
            i += 1;
            return args.get(i).cloned().unwrap_or_else(|| {
                eprintln!("--input requires a file path");
                process::exit(1);
            });
        }
        i += 1;
    }
    eprintln!("Error: --input <FILE> is required");
    process::exit(1);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "net" => cmd_net(rest),
        "emit" => cmd_emit(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {command}");
            print_usage();
            process::exit(1);
        }
    }
}
