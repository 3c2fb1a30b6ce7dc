use std::path::PathBuf;

use am_core::charset::RampPreset;
use am_core::config::FrameStyle;
use am_transform::TransformOp;
use clap::{Args, Parser, Subcommand};

/// asciimorph: image to ASCII art conversion.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convertir une image en texte.
    Render(RenderArgs),
    /// Analyser une image et proposer une stratégie de conversion.
    Analyze(AnalyzeArgs),
    /// Appliquer des transformations et écrire un PNG.
    Transform(TransformArgs),
    /// Rendre une image à plusieurs largeurs (galerie + résumé).
    Multires(MultiresArgs),
}

/// Overrides shared by `render` and `multires`.
#[derive(Args, Debug, Default)]
pub struct RenderOverrides {
    /// Rampe prédéfinie : minimal, standard, dense, ultradense, artistic,
    /// blocks, gradient, dots, unicode, professional.
    #[arg(long)]
    pub ramp: Option<RampPreset>,

    /// Rampe personnalisée, du plus sombre au plus dense.
    #[arg(long, conflicts_with = "ramp")]
    pub custom_ramp: Option<String>,

    /// Inverser la luminance.
    #[arg(long, default_value_t = false)]
    pub invert: bool,

    /// Désactiver le renforcement des contours.
    #[arg(long, default_value_t = false)]
    pub no_edges: bool,

    /// Désactiver l'interpolation bilinéaire.
    #[arg(long, default_value_t = false)]
    pub no_aa: bool,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Image source (PNG, JPEG, BMP, GIF).
    pub image: PathBuf,

    /// Fichier texte de sortie. Absent : sortie standard.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Largeur en glyphes.
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Hauteur en lignes (dérivée du ratio si absente).
    #[arg(long)]
    pub height: Option<u32>,

    /// Cadre : none, simple, double, artistic.
    #[arg(long)]
    pub frame: Option<FrameStyle>,

    /// Transformation avant rendu, répétable : invert, greyscale,
    /// brightness=0.3, contrast=0.5, noise=20.
    #[arg(long = "apply", value_name = "OP")]
    pub apply: Vec<TransformOp>,

    /// Appliquer le plan et la rampe recommandés par l'analyse.
    #[arg(long, default_value_t = false)]
    pub auto: bool,

    #[command(flatten)]
    pub overrides: RenderOverrides,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Image source.
    pub image: PathBuf,

    /// Sortie JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Image source.
    pub image: PathBuf,

    /// PNG de sortie.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Transformation, répétable, appliquée dans l'ordre donné.
    #[arg(long = "apply", value_name = "OP", required = true)]
    pub apply: Vec<TransformOp>,
}

#[derive(Args, Debug)]
pub struct MultiresArgs {
    /// Image source.
    pub image: PathBuf,

    /// Dossier de sortie de la galerie.
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Largeurs cibles, séparées par des virgules.
    #[arg(long, value_delimiter = ',')]
    pub widths: Vec<u32>,

    /// Largeur du terminal pour l'aperçu.
    #[arg(long)]
    pub terminal_width: Option<u32>,

    /// Ne pas appliquer la préparation (niveaux de gris + contraste).
    #[arg(long, default_value_t = false)]
    pub no_prepare: bool,

    /// Afficher l'aperçu terminal du rendu le plus large.
    #[arg(long, default_value_t = false)]
    pub preview: bool,

    #[command(flatten)]
    pub overrides: RenderOverrides,
}
