//! Randomized invariant sweep.
//!
//! Drives several marquees with jittered frame times while resizing
//! containers, swapping texts and detaching/reattaching widgets, and checks
//! the scroll-state invariants after every frame.

use std::time::{Duration, Instant};

use rand::RngExt;
use rand::rngs::StdRng;

use marquee::markup::parse_layout;
use marquee::rng::{create_rng, jitter_ms};
use marquee::ui::{
    DEFAULT_TICK_INTERVAL, MarqueeConfig, MarqueeId, MarqueeSet, Phase, Size, Sizing, Theme,
    WidgetTree,
};

const SCREEN: Size = Size {
    width: 800.0,
    height: 600.0,
};

const LAYOUT: &str = r#"
    column name="root" gap=4 {
        marquee "A long headline that scrolls across a narrow box" width=120 font-size=12 scroll-speed=60 pause-time=0.5
        marquee "Short" width=200 font-size=12
        marquee "Another rather long line of text for the sweep" width=90 font-size=10 scroll-speed=200 pause-time=0
        marquee "Slow and steady wins nothing in particular today" width=150 font-size=14 scroll-speed=5 pause-time=2
    }
"#;

const TEXTS: [&str; 4] = [
    "tiny",
    "medium length text",
    "a considerably longer string that will overflow most boxes",
    "",
];

struct Sweep {
    tree: WidgetTree,
    marquees: MarqueeSet,
    ids: Vec<MarqueeId>,
    root: marquee::ui::WidgetId,
    rng: StdRng,
    t0: Instant,
    clock_ms: u64,
}

impl Sweep {
    fn new(seed: u64) -> Self {
        let theme = Theme::default();
        let mut tree = WidgetTree::new();
        let mut marquees = MarqueeSet::new(&theme, DEFAULT_TICK_INTERVAL);
        let t0 = Instant::now();
        let layout = parse_layout(
            LAYOUT,
            &mut tree,
            &mut marquees,
            &theme,
            MarqueeConfig::default(),
            t0,
        )
        .expect("layout");
        Self {
            root: layout.roots[0],
            ids: layout.marquees,
            tree,
            marquees,
            rng: create_rng(seed),
            t0,
            clock_ms: 0,
        }
    }

    fn mutate(&mut self) {
        let idx = self.rng.random_range(0..self.ids.len());
        let id = self.ids[idx];
        let Some(container) = self.marquees.get(id).and_then(|m| m.container()) else {
            return;
        };
        match self.rng.random_range(0..100) {
            0..5 => {
                let width = self.rng.random_range(20.0..400.0);
                self.tree
                    .set_sizing(container, Sizing::Fixed(width), Sizing::Fit);
            }
            5..8 => {
                let text = TEXTS[self.rng.random_range(0..TEXTS.len())];
                self.marquees.set_text(&mut self.tree, id, text);
            }
            8..10 => {
                if self.tree.is_attached(container) {
                    self.tree.detach(container);
                } else {
                    let index = self.rng.random_range(0..=self.ids.len());
                    self.tree.attach_at(self.root, index, container);
                }
            }
            _ => {}
        }
    }

    fn frame(&mut self) {
        self.clock_ms += 10 + jitter_ms(&mut self.rng, 25);
        self.tree.layout(SCREEN);
        let now = self.t0 + Duration::from_millis(self.clock_ms);
        self.marquees.pump(&mut self.tree, now);
    }

    fn check(&self) {
        for &id in &self.ids {
            let m = self.marquees.get(id).expect("marquee alive");
            let c = m.controller();
            let s = c.state();
            let at = self.clock_ms;

            assert!(
                s.end_offset <= s.offset && s.offset <= 0.0,
                "offset {} outside [{}, 0] at {at} ms",
                s.offset,
                s.end_offset
            );
            if s.enabled {
                assert!(s.end_offset < 0.0, "enabled without overflow at {at} ms");
            } else {
                assert_eq!(s.offset, 0.0, "disabled with offset at {at} ms");
                assert_ne!(s.phase, Phase::Scrolling, "disabled but scrolling at {at} ms");
            }
            if s.phase != Phase::Scrolling && s.enabled {
                let pause = c.config().pause_duration;
                assert!(s.timer <= pause + 1e-4, "timer above pause at {at} ms");
            }
            if s.phase == Phase::PausedAtEnd {
                assert_eq!(s.offset, s.end_offset, "end pause away from end at {at} ms");
            }
            if !m.is_attached() {
                assert!(!s.enabled, "pending widget scrolling at {at} ms");
            }

            // What is drawn matches the controller.
            assert_eq!(self.tree.offset_x(m.text_node()), Some(s.offset));
        }
    }
}

#[test]
fn invariants_hold_under_jitter() {
    for seed in [1, 7, 42, 1234, 98765] {
        let mut sweep = Sweep::new(seed);
        for _ in 0..1500 {
            sweep.mutate();
            sweep.frame();
            sweep.check();
        }
    }
}

#[test]
fn every_overflowing_widget_completes_cycles() {
    let mut sweep = Sweep::new(3);
    let mut seen_end = vec![false; sweep.ids.len()];
    let mut seen_snap = vec![false; sweep.ids.len()];
    let mut last_phase: Vec<Phase> = vec![Phase::PausedAtStart; sweep.ids.len()];

    // No mutations: just time passing.
    for _ in 0..3000 {
        sweep.frame();
        sweep.check();
        for (i, &id) in sweep.ids.iter().enumerate() {
            let phase = sweep.marquees.get(id).expect("m").phase();
            if phase == Phase::PausedAtEnd {
                seen_end[i] = true;
            }
            if last_phase[i] == Phase::PausedAtEnd && phase == Phase::PausedAtStart {
                seen_snap[i] = true;
            }
            last_phase[i] = phase;
        }
    }

    // Widgets 0 and 2 overflow with a useful speed; 1 fits; 3 crawls.
    assert!(seen_end[0] && seen_snap[0]);
    assert!(seen_end[2] && seen_snap[2]);
    assert!(!seen_end[1]);
    assert!(!sweep.marquees.get(sweep.ids[1]).expect("m").controller().is_enabled());
}

#[test]
fn zero_elapsed_ticks_change_nothing() {
    let mut sweep = Sweep::new(11);
    for _ in 0..200 {
        sweep.frame();
    }
    let before: Vec<(f32, Phase)> = sweep
        .ids
        .iter()
        .map(|&id| {
            let m = sweep.marquees.get(id).expect("m");
            (m.offset(), m.phase())
        })
        .collect();

    // Re-pumping at the same instant fires no ticks.
    let now = sweep.t0 + Duration::from_millis(sweep.clock_ms);
    for _ in 0..10 {
        sweep.marquees.pump(&mut sweep.tree, now);
    }
    let after: Vec<(f32, Phase)> = sweep
        .ids
        .iter()
        .map(|&id| {
            let m = sweep.marquees.get(id).expect("m");
            (m.offset(), m.phase())
        })
        .collect();
    assert_eq!(before, after);
}
