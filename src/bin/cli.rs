// src/bin/cli.rs
use penn_classlist::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run()
}
