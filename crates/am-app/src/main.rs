use anyhow::Result;
use clap::Parser;

pub mod cli;
pub mod commands;
pub mod gallery;

use cli::Command;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config (défauts si le fichier est absent)
    let settings = commands::resolve_settings(&cli.config)?;

    // 4. Exécuter la sous-commande
    match cli.command {
        Command::Render(ref args) => commands::run_render(&settings, args).map(|_| ()),
        Command::Analyze(ref args) => commands::run_analyze(args).map(|_| ()),
        Command::Transform(ref args) => commands::run_transform(args).map(|_| ()),
        Command::Multires(ref args) => commands::run_multires(&settings, args),
    }
}
