use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use crate::config::Settings;
use crate::markup::{self, Layout};
use crate::rng::{create_rng, jitter_ms};
use crate::ui::{
    GLYPH_WIDTH_RATIO, MarqueeSet, MarqueeWidget, Phase, Size, Theme, WidgetTree,
    substitute_labels,
};

/// Snapshot of one marquee at a report point.
#[derive(Debug, Clone, PartialEq)]
pub struct MarqueeLine {
    /// Element name, or the start of the text for anonymous widgets.
    pub label: String,
    pub phase: Phase,
    pub offset: f32,
    /// Characters currently inside the clip rect.
    pub window: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub at_ms: u64,
    pub lines: Vec<MarqueeLine>,
}

/// Headless host: owns a widget tree and drives it with a simulated,
/// jittered frame clock.
pub struct Preview {
    pub tree: WidgetTree,
    pub marquees: MarqueeSet,
    theme: Theme,
    settings: Settings,
    rng: StdRng,
    start: Instant,
    clock_ms: u64,
}

impl Preview {
    pub fn new(settings: &Settings, theme: Theme, start: Instant) -> Self {
        let settings = settings.clone().sanitized();
        let marquees = MarqueeSet::new(&theme, settings.tick_interval());
        Self {
            tree: WidgetTree::new(),
            marquees,
            rng: create_rng(settings.preview.seed),
            theme,
            settings,
            start,
            clock_ms: 0,
        }
    }

    pub fn now(&self) -> Instant {
        self.start + Duration::from_millis(self.clock_ms)
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Load a KDL layout file. Returns false if it could not be loaded.
    pub fn load_file(&mut self, path: &str) -> bool {
        let now = self.now();
        let layout = markup::load_layout(
            path,
            &mut self.tree,
            &mut self.marquees,
            &self.theme,
            self.settings.marquee,
            now,
        );
        self.finish_load(layout)
    }

    /// Load KDL layout source. Returns false if it could not be parsed.
    pub fn load_str(&mut self, src: &str) -> bool {
        let now = self.now();
        let layout = markup::parse_layout(
            src,
            &mut self.tree,
            &mut self.marquees,
            &self.theme,
            self.settings.marquee,
            now,
        );
        self.finish_load(layout)
    }

    fn finish_load(&mut self, layout: Option<Layout>) -> bool {
        let Some(layout) = layout else {
            return false;
        };
        if self.settings.substitute_labels {
            let now = self.now();
            let mut replaced = 0;
            for &root in &layout.roots {
                replaced += substitute_labels(
                    &mut self.tree,
                    &mut self.marquees,
                    root,
                    self.settings.marquee,
                    now,
                );
            }
            log::info!("substituted {} labels", replaced);
        }
        log::info!(
            "loaded {} roots, {} marquees",
            layout.roots.len(),
            self.marquees.len()
        );
        true
    }

    /// Advance one host frame: lay out, forward geometry changes, tick.
    pub fn step(&mut self) {
        let preview = &self.settings.preview;
        let (frame, jitter) = (preview.frame_ms, preview.jitter_ms);
        let screen = Size {
            width: preview.screen_width,
            height: preview.screen_height,
        };
        self.clock_ms += frame + jitter_ms(&mut self.rng, jitter);
        self.tree.layout(screen);
        let now = self.now();
        self.marquees.pump(&mut self.tree, now);
    }

    /// Run for the configured length, reporting at the configured cadence.
    pub fn run(&mut self) -> Vec<Report> {
        let end_ms = (self.settings.preview.seconds * 1000.0) as u64;
        let every = self.settings.preview.report_every_ms;
        let mut next_report = 0;
        let mut reports = Vec::new();
        while self.clock_ms < end_ms {
            self.step();
            if self.clock_ms >= next_report {
                reports.push(self.report());
                next_report = self.clock_ms + every;
            }
        }
        reports
    }

    pub fn report(&self) -> Report {
        let mut lines: Vec<MarqueeLine> = self
            .marquees
            .iter()
            .map(|(_, m)| describe(&self.tree, m))
            .collect();
        lines.sort_by(|a, b| a.label.cmp(&b.label));
        Report {
            at_ms: self.clock_ms,
            lines,
        }
    }
}

fn describe(tree: &WidgetTree, marquee: &MarqueeWidget) -> MarqueeLine {
    let text_node = marquee.text_node();
    let text = tree.text(text_node).unwrap_or_default();
    let label = marquee
        .container()
        .and_then(|c| tree.get(c)?.name.clone())
        .or_else(|| tree.get(text_node)?.name.clone())
        .unwrap_or_else(|| text.chars().take(16).collect());
    let offset = tree.offset_x(text_node).unwrap_or_default();
    let visible = marquee
        .container()
        .and_then(|c| tree.get(c))
        .map_or(0.0, |n| n.content_width());
    let font_size = tree.font_size(text_node).unwrap_or_default();
    MarqueeLine {
        label,
        phase: marquee.phase(),
        offset,
        window: visible_window(text, font_size, offset, visible),
    }
}

/// Characters of `text` that fall fully inside a clip `visible_width` wide
/// when the text is shifted by `offset`.
pub fn visible_window(text: &str, font_size: f32, offset: f32, visible_width: f32) -> String {
    let glyph = font_size * GLYPH_WIDTH_RATIO;
    if !(glyph > 0.0) || !(visible_width > 0.0) {
        return String::new();
    }
    let first = (-offset / glyph - 1e-3).ceil().max(0.0) as usize;
    let end = ((visible_width - offset) / glyph + 1e-3).floor().max(0.0) as usize;
    text.chars()
        .skip(first)
        .take(end.saturating_sub(first))
        .collect()
}
