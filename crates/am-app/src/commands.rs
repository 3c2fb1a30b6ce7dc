use std::path::Path;

use am_analysis::analyze;
use am_ascii::{MultiResolution, Renderer, frame_text};
use am_core::charset::GlyphRamp;
use am_core::config::{RenderConfig, Settings, load_config};
use am_core::frame::PixelBuffer;
use am_source::export::{FileSink, persist_artifact};
use am_source::image::{load_image, save_png};
use am_transform::apply_plan;
use anyhow::{Context, Result};

use crate::cli::{AnalyzeArgs, MultiresArgs, RenderArgs, RenderOverrides, TransformArgs};
use crate::gallery::write_gallery;

/// Load `path` if it exists, defaults otherwise.
pub fn resolve_settings(path: &Path) -> Result<Settings> {
    if path.exists() {
        load_config(path)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            path.display()
        );
        Ok(Settings::default())
    }
}

fn apply_overrides(config: &mut RenderConfig, overrides: &RenderOverrides) -> Result<()> {
    if let Some(preset) = overrides.ramp {
        config.ramp = preset.ramp();
    }
    if let Some(ref glyphs) = overrides.custom_ramp {
        config.ramp = GlyphRamp::new(glyphs)?;
    }
    if overrides.invert {
        config.invert = true;
    }
    if overrides.no_edges {
        config.use_edge_detection = false;
    }
    if overrides.no_aa {
        config.use_anti_aliasing = false;
    }
    Ok(())
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("image")
}

/// `render`: returns the text that was printed or written.
pub fn run_render(settings: &Settings, args: &RenderArgs) -> Result<String> {
    let mut buffer = load_image(&args.image)?;
    let mut config = settings.render.clone();

    if args.auto {
        let analysis = analyze(&buffer);
        log::info!("{}", analysis.strategy());
        let rec = analysis.recommendations;
        config.width = rec.optimal_width;
        config.ramp = rec.ramp.ramp();
        buffer = apply_plan(buffer, &rec.plan());
    }
    if let Some(w) = args.width {
        config.width = w;
    }
    if args.height.is_some() {
        config.height = args.height;
    }
    if let Some(frame) = args.frame {
        config.frame = frame;
    }
    apply_overrides(&mut config, &args.overrides)?;

    let buffer = apply_plan(buffer, &args.apply);
    let renderer = Renderer::new(config)?;
    let result = renderer.render(&buffer);
    let text = frame_text(&result.grid, renderer.config().frame);
    log::info!(
        "{} : {} caractères, {} octets, ratio {:.4}",
        result.dimensions(),
        result.stats.char_count,
        result.stats.byte_count,
        result.stats.compression_ratio
    );

    match args.output {
        Some(ref out) => {
            if let Err(e) = persist_artifact(text.as_bytes(), out) {
                // le rendu reste disponible : on l'affiche avant de signaler l'échec
                print!("{text}");
                return Err(e).context("Écriture du rendu");
            }
            log::info!("Rendu écrit dans {}", out.display());
        }
        None => print!("{text}"),
    }
    Ok(text)
}

/// `analyze`: human-readable report or JSON.
pub fn run_analyze(args: &AnalyzeArgs) -> Result<String> {
    let buffer = load_image(&args.image)?;
    let result = analyze(&buffer);
    let plan: Vec<String> = result.recommendations.plan().iter().map(ToString::to_string).collect();

    let report = if args.json {
        let value = serde_json::json!({
            "analysis": &result,
            "strategy": result.strategy(),
            "plan": result.recommendations.plan(),
        });
        serde_json::to_string_pretty(&value)? + "\n"
    } else {
        let rec = &result.recommendations;
        let colours: Vec<String> = result
            .dominant_colours
            .iter()
            .map(|c| format!("#{:02x}{:02x}{:02x} ({:.0}%)", c.rgb[0], c.rgb[1], c.rgb[2], c.share * 100.0))
            .collect();
        format!(
            "Dimensions : {}\nLuminosité : {:.0}\nContraste : {:.2}\nRatio : {:.2}\n\
             Complexité : {}\nTonalité : {}\nCouleurs : {}\n\
             Rampe : {}\nLargeur : {}\nPlan : {}\n{}\n",
            result.dimensions(),
            result.mean_brightness,
            result.contrast,
            result.aspect_ratio,
            result.complexity,
            result.tone,
            colours.join(", "),
            rec.ramp,
            rec.optimal_width,
            if plan.is_empty() { "aucun".to_string() } else { plan.join(" → ") },
            result.strategy(),
        )
    };
    print!("{report}");
    Ok(report)
}

/// `transform`: apply the plan and save a PNG.
pub fn run_transform(args: &TransformArgs) -> Result<PixelBuffer> {
    let buffer = apply_plan(load_image(&args.image)?, &args.apply);
    save_png(&buffer, &args.output)?;
    log::info!("Image transformée écrite dans {}", args.output.display());
    Ok(buffer)
}

/// `multires`: gallery plus summary; optional terminal preview.
pub fn run_multires(settings: &Settings, args: &MultiresArgs) -> Result<()> {
    let buffer = load_image(&args.image)?;

    let mut render = settings.render.clone();
    apply_overrides(&mut render, &args.overrides)?;
    let mut multires = settings.multires.clone();
    if !args.widths.is_empty() {
        multires.widths.clone_from(&args.widths);
    }
    if let Some(tw) = args.terminal_width {
        multires.terminal_width = tw;
    }
    if args.no_prepare {
        multires.prepare = false;
    }

    let variants = MultiResolution::new(render, multires)?.render(&buffer);
    let report = write_gallery(&FileSink, &variants, &args.out_dir, file_stem(&args.image));

    if args.preview
        && let Some(widest) = variants.iter().max_by_key(|v| v.result.width())
    {
        print!("{}", widest.result.display_grid().to_text());
    }

    if let Some((path, err)) = report.failed.first() {
        anyhow::bail!(
            "{} fichier(s) non écrit(s), dont {} : {err}",
            report.failed.len(),
            path.display()
        );
    }
    log::info!("{} fichiers écrits dans {}", report.written.len(), args.out_dir.display());
    Ok(())
}
