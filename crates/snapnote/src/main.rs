#![doc = include_str!(concat!(env!("OUT_DIR"), "/README.md"))]

/// CLI module - command-line interface for snapnote
mod cli;

fn main() {
    cli::run_cli();
}
