use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use fernmark_core::{to_html, to_html_sanitized};

fn main() {
    env_logger::init();

    let mut input: Option<String> = None;
    let mut sanitized = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "--sanitized" => sanitized = true,
            _ if arg.starts_with('-') && arg != "-" => {
                eprintln!("unknown option: {}", arg);
                print_usage();
                process::exit(2);
            }
            _ => {
                if input.is_none() {
                    input = Some(arg);
                } else {
                    eprintln!("unexpected argument: {}", arg);
                    print_usage();
                    process::exit(2);
                }
            }
        }
    }

    let source = match input.as_deref() {
        Some(path) if path != "-" => {
            log::debug!("reading {}", path);
            fs::read_to_string(path).unwrap_or_else(|err| {
                eprintln!("failed to read {}: {}", path, err);
                process::exit(1);
            })
        }
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).unwrap_or_else(|err| {
                eprintln!("failed to read stdin: {}", err);
                process::exit(1);
            });
            buffer
        }
    };

    let html = if sanitized {
        to_html_sanitized(&source)
    } else {
        to_html(&source)
    };
    print!("{}", html);
}

fn print_usage() {
    eprintln!("Usage: fernmark [--sanitized] [FILE]");
    eprintln!("Converts CommonMark from FILE (or stdin) to an HTML fragment on stdout.");
}
