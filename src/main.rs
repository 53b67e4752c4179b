use std::time::Instant;

use marquee::config::{DEFAULT_SETTINGS_PATH, load_settings};
use marquee::markup::DEFAULT_LAYOUT_PATH;
use marquee::preview::Preview;
use marquee::ui::Theme;

/// Headless marquee preview.
///
/// Usage: `marquee [layout.kdl] [settings.ron]`
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let layout_path = args
        .next()
        .unwrap_or_else(|| DEFAULT_LAYOUT_PATH.to_string());
    let settings_path = args
        .next()
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());

    let settings = load_settings(&settings_path);
    log::info!(
        "tick {} ms, speed {} px/s, pause {} s, seed {}",
        settings.tick_interval_ms,
        settings.marquee.scroll_speed,
        settings.marquee.pause_duration,
        settings.preview.seed
    );

    let mut preview = Preview::new(&settings, Theme::default(), Instant::now());
    if !preview.load_file(&layout_path) {
        eprintln!("could not load layout {}", layout_path);
        std::process::exit(1);
    }

    for report in preview.run() {
        println!("[{:>6} ms]", report.at_ms);
        for line in &report.lines {
            println!(
                "  {:<16} {:<14} {:>8.1} |{}|",
                line.label,
                format!("{:?}", line.phase),
                line.offset,
                line.window
            );
        }
    }
}
