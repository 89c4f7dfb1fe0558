use colored::Colorize;
use std::process;

fn main() {
    if let Err(e) = rmk::cli::run() {
        eprintln!("{} {:#}", "rmk:".red().bold(), e);
        process::exit(1);
    }
}
