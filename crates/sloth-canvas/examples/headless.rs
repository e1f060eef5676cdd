//! Example: draw a small scene against the headless GPU

use sloth_canvas::atlas::HeadlessGpu;
use sloth_canvas::{CanvasConfig, Color, SkiaRasterizer, SlothCanvas};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = CanvasConfig::default().with_atlas_size(256);
    let mut canvas = SlothCanvas::new(
        config,
        SkiaRasterizer::with_system_fonts(),
        HeadlessGpu::new(),
        (800, 600),
    )?;

    canvas.set_font("16px sans-serif")?;
    for (i, word) in "the quick brown fox jumps over the lazy dog".split(' ').enumerate() {
        canvas.fill_text(word, 20.0 + i as f32 * 60.0, 40.0);
    }

    canvas.set_fill_style("#3366cc".parse()?);
    let banner = canvas.fill_rect(20.0, 80.0, 200, 40);

    canvas.begin_path();
    canvas.move_to(300.0, 100.0);
    canvas.line_to(400.0, 200.0);
    canvas.line_to(300.0, 200.0);
    canvas.close_path();
    canvas.set_stroke_style(Color::BLACK);
    canvas.stroke();

    let stats = canvas.render();
    println!("Frame 1: {} drawn, {} failed", stats.items_drawn, stats.items_failed);

    canvas.set_translation(banner, 0.0, 50.0)?;
    let stats = canvas.render();
    println!("Frame 2: {} drawn, {} failed", stats.items_drawn, stats.items_failed);

    let allocator = canvas.allocator().stats();
    println!(
        "{} atlases, {} placements, {:.1}% used, {} GPU uploads",
        canvas.allocator().len(),
        allocator.placements,
        allocator.utilization(canvas.allocator().atlas_size()) * 100.0,
        canvas.gpu().upload_count(),
    );

    Ok(())
}
