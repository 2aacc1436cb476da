//! CLI entry point for huepick.

use std::io::stdout;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use color_eyre::eyre::{Result, WrapErr, eyre};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use huepick::cli::Cli;
use huepick::config::HuepickConfig;
use huepick::export::{self, render_text, to_color_list, to_palette};
use huepick::geometry::fit_to_viewport;
use huepick::gradient::Gradient;
use huepick::library::Library;
use huepick::logging::init_logging;
use huepick::persistence::LocalStore;
use huepick::pixel_buffer::PixelBuffer;
use huepick::store::{InputProfile, PlacementOutcome, SamplePointStore, Surface};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "huepick", &mut stdout());
        return Ok(());
    }

    let _guard = init_logging(cli.log_file.as_deref(), Some(&cli.log_level));

    let config = HuepickConfig::layered(cli.config.as_deref(), &cli.to_config_overrides())
        .wrap_err("Failed to load configuration")?;

    if let Some(ref path) = cli.save_config {
        config
            .save(path)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Wrote configuration to {}", path.display());
    }

    let local_store = LocalStore::new(&config.storage.path);
    let mut library = local_store.load();
    let mut library_changed = false;

    if let Some(ref name) = cli.delete_palette {
        match library.delete_palette(name) {
            Ok(_) => {
                eprintln!("Deleted palette '{name}'");
                library_changed = true;
            }
            Err(e) => eprintln!("{e}"),
        }
    }

    if cli.list_palettes {
        for palette in &library.palettes {
            println!("{}: {}", palette.name, palette.colors.join(" "));
        }
    }

    if let Some(ref image_path) = cli.image {
        library_changed |= sample_image(&cli, &config, image_path, &mut library)?;
    }

    if library_changed {
        local_store.save(&library).wrap_err_with(|| {
            format!("Failed to write store {}", local_store.path().display())
        })?;
    }

    Ok(())
}

/// Sample, edit, print and save. Returns whether the library changed.
fn sample_image(
    cli: &Cli,
    config: &HuepickConfig,
    image_path: &std::path::Path,
    library: &mut Library,
) -> Result<bool> {
    let buffer = PixelBuffer::open(image_path)
        .map_err(|e| eyre!("Failed to load image {}: {}", image_path.display(), e))?;
    let rect = fit_to_viewport(
        buffer.width(),
        buffer.height(),
        config.display.max_width,
        config.display.max_height,
    );
    let surface = Surface::new(&buffer, rect);
    info!(width = rect.width, height = rect.height, "Displaying image");

    let mut rng = match config.sampling.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut points = SamplePointStore::new();
    let outcome = points.regenerate_with_retry(
        config.sampling.count,
        surface,
        &config.placement,
        config.sampling.placement_retries,
        Duration::from_millis(config.sampling.retry_backoff_ms),
        &mut rng,
    )?;
    if outcome == PlacementOutcome::RetryLater {
        eprintln!("No distinct colors could be sampled from this image");
    }

    if let Some(count) = cli.resize {
        let outcome = points.resize(count, surface, &config.placement, &mut rng)?;
        if outcome == PlacementOutcome::RetryLater {
            warn!(count, "Could not add sample points");
        }
    }

    let profile = if cli.touch {
        InputProfile::Touch
    } else {
        InputProfile::Pointer
    };

    for m in &cli.moves {
        drag(&mut points, m.index, m.to, surface, profile);
    }
    for d in &cli.drags {
        match points.point_at(d.from, rect, profile) {
            Some(index) => drag(&mut points, index, d.to, surface, profile),
            None => eprintln!("No sample point at {},{}", d.from.x, d.from.y),
        }
    }

    let colors = to_color_list(points.points());
    let gradient = if (cli.gradient || cli.save_gradient) && !colors.is_empty() {
        match Gradient::from_colors(&colors, cli.direction) {
            Ok(gradient) => Some(gradient),
            Err(e) => {
                eprintln!("Cannot build gradient: {e}");
                None
            }
        }
    } else {
        None
    };

    if cli.gradient {
        if let Some(ref gradient) = gradient {
            println!("{}", gradient.to_css());
        }
    } else {
        let text = render_text(points.points(), cli.format.into())
            .map_err(|e| eyre!("Failed to render output: {}", e))?;
        print!("{text}");
    }

    if let Some(ref path) = cli.swatch {
        export::write_swatch_image(&colors, path)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Wrote swatches to {}", path.display());
    }

    if let Some(ref path) = cli.palette_json {
        let name = cli.name.clone().unwrap_or_else(|| library.next_palette_name());
        let json = export::palette_to_json(&huepick::library::Palette::new(name, colors.clone()))
            .wrap_err("Failed to serialize palette")?;
        std::fs::write(path, json + "\n")
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Wrote palette to {}", path.display());
    }

    let mut changed = false;

    if cli.save {
        if colors.is_empty() {
            eprintln!("Nothing to save");
        } else {
            match to_palette(points.points(), cli.name.as_deref(), &library.palettes)
                .and_then(|palette| library.save_palette(palette).map(|p| p.name.clone()))
            {
                Ok(name) => {
                    eprintln!("Saved palette '{name}'");
                    changed = true;
                }
                Err(e) => eprintln!("{e}"),
            }
        }
    }

    if let Some(gradient) = gradient.as_ref().filter(|_| cli.save_gradient) {
        match library.save_gradient(gradient, cli.name.clone()) {
            Ok(saved) => {
                eprintln!("Saved gradient '{}'", saved.label);
                changed = true;
            }
            Err(e) => eprintln!("{e}"),
        }
    }

    if cli.save_colors {
        for color in &colors {
            match library.add_color(color, None) {
                Ok(_) => changed = true,
                Err(e) => eprintln!("{e}"),
            }
        }
    }

    Ok(changed)
}

/// Press, move and release a point, the way a single drag gesture would.
fn drag(
    points: &mut SamplePointStore,
    index: usize,
    to: huepick::geometry::DisplayPoint,
    surface: Surface<'_>,
    profile: InputProfile,
) {
    let result = points
        .begin_drag(index, profile)
        .and_then(|_| points.move_point(index, to, surface, profile).map(|_| ()));
    if let Err(e) = result {
        eprintln!("Cannot move point {index}: {e}");
    }
    // Released even when the move failed so no point stays marked as dragging
    if points.finalize(index, profile).is_err() {
        points.cancel_drag();
    }
}
