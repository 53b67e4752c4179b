use serde::{Deserialize, Serialize};

/// Default scroll speed in pixels per second.
pub const DEFAULT_SCROLL_SPEED: f32 = 50.0;
/// Default pause at each end of the scroll, in seconds.
pub const DEFAULT_PAUSE_DURATION: f32 = 1.0;

/// Tunables for one marquee. Speed is absolute (pixels per second) and does
/// not scale with the font size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeConfig {
    /// Pixels per second of horizontal motion.
    pub scroll_speed: f32,
    /// Seconds spent paused at the start and at the end of each pass.
    pub pause_duration: f32,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            scroll_speed: DEFAULT_SCROLL_SPEED,
            pause_duration: DEFAULT_PAUSE_DURATION,
        }
    }
}

impl MarqueeConfig {
    /// Negative values clamp to zero, non-finite values fall back to defaults.
    pub fn sanitized(self) -> Self {
        Self {
            scroll_speed: non_negative(self.scroll_speed, DEFAULT_SCROLL_SPEED),
            pause_duration: non_negative(self.pause_duration, DEFAULT_PAUSE_DURATION),
        }
    }
}

fn non_negative(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}

/// Where the text is in its scroll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Resting at offset 0 until the pause timer runs out.
    #[default]
    PausedAtStart,
    /// Moving left toward `end_offset`.
    Scrolling,
    /// Resting at `end_offset` until the pause timer runs out.
    PausedAtEnd,
}

/// Mutable scroll state. Replaced wholesale on every geometry change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub phase: Phase,
    /// Seconds left in the current pause. Unused while scrolling; may go
    /// negative on the tick that exhausts a pause.
    pub timer: f32,
    /// Horizontal translation of the text. Always in `[end_offset, 0]`.
    pub offset: f32,
    /// `container_width - text_width` while enabled, 0 otherwise.
    pub end_offset: f32,
    pub enabled: bool,
}

impl ScrollState {
    /// Text fits (or the container has no width yet): nothing moves.
    pub fn disabled() -> Self {
        Self {
            phase: Phase::PausedAtStart,
            timer: 0.0,
            offset: 0.0,
            end_offset: 0.0,
            enabled: false,
        }
    }

    fn overflowing(end_offset: f32, pause: f32) -> Self {
        Self {
            phase: Phase::PausedAtStart,
            timer: pause,
            offset: 0.0,
            end_offset,
            enabled: true,
        }
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Scroll state machine for a single line of text inside a clipping box.
///
/// Driven by two inputs: geometry re-evaluation (`on_geometry_changed`) and
/// elapsed wall-clock time (`advance`). It never touches the widget tree; the
/// caller applies the returned offset to whatever draws the text.
///
/// ```text
/// PausedAtStart --timer expires--> Scrolling
/// Scrolling --offset reaches end--> PausedAtEnd
/// PausedAtEnd --timer expires--> PausedAtStart (offset snaps to 0)
/// ```
#[derive(Debug, Clone)]
pub struct MarqueeController {
    config: MarqueeConfig,
    state: ScrollState,
}

impl MarqueeController {
    pub fn new(config: MarqueeConfig) -> Self {
        Self {
            config: config.sanitized(),
            state: ScrollState::disabled(),
        }
    }

    pub fn config(&self) -> MarqueeConfig {
        self.config
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn offset(&self) -> f32 {
        self.state.offset
    }

    pub fn end_offset(&self) -> f32 {
        self.state.end_offset
    }

    pub fn timer(&self) -> f32 {
        self.state.timer
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Takes effect from the next `advance`; does not reset the cycle.
    pub fn set_scroll_speed(&mut self, speed: f32) {
        self.config.scroll_speed = non_negative(speed, DEFAULT_SCROLL_SPEED);
    }

    /// Takes effect at the next pause; the running pause keeps its timer.
    pub fn set_pause_duration(&mut self, seconds: f32) {
        self.config.pause_duration = non_negative(seconds, DEFAULT_PAUSE_DURATION);
    }

    /// Discard the scroll state (widget left the tree).
    pub fn reset(&mut self) {
        self.state = ScrollState::disabled();
    }

    /// Re-evaluate whether the text overflows. Always restarts the cycle from
    /// the beginning; never resumes mid-scroll.
    ///
    /// A container width of zero or less means the box has not been laid out
    /// yet and is treated as "no overflow".
    pub fn on_geometry_changed(&mut self, text_width: f32, container_width: f32) {
        let laid_out = container_width.is_finite() && container_width > 0.0;
        self.state = if laid_out && text_width.is_finite() && text_width > container_width {
            ScrollState::overflowing(container_width - text_width, self.config.pause_duration)
        } else {
            ScrollState::disabled()
        };
    }

    /// Advance by `elapsed` seconds of real time and return the offset to
    /// apply. Non-positive elapsed time is a no-op.
    ///
    /// A pause is drained first; whatever time is left after the start pause
    /// runs out goes into motion within the same call. The end pause never
    /// carries over: the call that exhausts it leaves the text at the end and
    /// the following call snaps back. Time left over when the text reaches
    /// the end is dropped, so every pause starts full.
    pub fn advance(&mut self, elapsed: f32) -> f32 {
        let pause = self.config.pause_duration;
        let state = &mut self.state;
        if !state.enabled || !(elapsed > 0.0) {
            return state.offset;
        }

        let mut remaining = elapsed;
        if state.phase != Phase::Scrolling {
            if state.timer > 0.0 {
                state.timer -= remaining;
                // The end pause consumes the whole tick; snap-back waits for
                // the next call.
                if state.timer >= 0.0 || state.phase == Phase::PausedAtEnd {
                    return state.offset;
                }
                remaining = -state.timer;
            }

            if state.phase == Phase::PausedAtEnd {
                state.offset = 0.0;
                state.timer = pause;
                state.phase = Phase::PausedAtStart;
                return state.offset;
            }
            state.phase = Phase::Scrolling;
        }

        state.offset = (state.offset - self.config.scroll_speed * remaining).min(0.0);
        if state.offset <= state.end_offset {
            state.offset = state.end_offset;
            state.timer = pause;
            state.phase = Phase::PausedAtEnd;
        }
        state.offset
    }
}

impl Default for MarqueeController {
    fn default() -> Self {
        Self::new(MarqueeConfig::default())
    }
}
