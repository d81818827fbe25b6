//! A thin, illustrative command line front end for [`shex::explain`].
//!
//! Seeds a small bundled fixture [`shex_store::InMemoryStore`] (see
//! [`shex::fixtures`]) and prints the spans `explain` finds in the
//! command line given on the command line. This is not the production
//! man-page ingestion or HTTP presentation layer — both are out of
//! scope here (§6).

use std::process::ExitCode;

use shex::args::{self, Parse};
use shex::fixtures;

const USAGE: &str = "\
usage: shex-cli [-p|--pretty] COMMAND
       shex-cli -h|--help
       shex-cli -V|--version

Explains a shell COMMAND line against a small bundled set of example man
pages (echo, tar, find, grep, cat, xargs).";

fn main() -> ExitCode {
    let parsed = match args::parse(std::env::args()) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("shex-cli: {e}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match parsed {
        Parse::Help => {
            println!("{USAGE}");
            ExitCode::SUCCESS
        }
        Parse::Version => {
            println!("shex-cli {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Parse::Run { command, pretty } => run(&command, pretty),
    }
}

fn run(command: &str, pretty: bool) -> ExitCode {
    let store = fixtures::bundled();
    match shex::explain(command, &store) {
        Ok(groups) => {
            for group in groups {
                println!("{}:", group.name);
                for result in &group.results {
                    match &result.text {
                        Some(text) => println!("  {:>3}..{:<3} {:?}  {text}", result.start, result.end, result.matched),
                        None => println!("  {:>3}..{:<3} {:?}  (unexplained)", result.start, result.end, result.matched),
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if pretty {
                #[cfg(feature = "pretty")]
                eprint!("{}", shex::diagnostic::render(&e, command));
                #[cfg(not(feature = "pretty"))]
                eprintln!("shex-cli: {e} (build with --features pretty for annotated output)");
            } else {
                eprintln!("shex-cli: {e}");
            }
            ExitCode::FAILURE
        }
    }
}
