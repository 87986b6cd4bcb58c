//! Carousel controller state machine.
//!
//! One [`CarouselController`] drives a single carousel row. It reconciles
//! every input source — drag, wheel scroll, keyboard, direct jumps — into a
//! single clamped `current_index`, keeps the continuous scroll offset
//! consistent with that index, and tracks which slides have had their
//! images materialized.
//!
//! The controller is headless: it never touches the terminal. The app's
//! event loop feeds it millisecond timestamps and polls [`tick`] and
//! [`poll_settle`] each frame.
//!
//! [`tick`]: CarouselController::tick
//! [`poll_settle`]: CarouselController::poll_settle

use std::collections::BTreeSet;

use crossterm::event::KeyCode;

/// Multiplier applied to mouse-drag displacement so a short mouse drag
/// covers a full slide. Touch-style drags track the pointer 1:1.
pub const MOUSE_DRAG_GAIN: f64 = 2.0;

/// Quiet period after the last scroll event before the slide index is
/// recomputed from the live offset.
pub const SCROLL_SETTLE_MS: u64 = 100;

/// Duration of the eased glide toward a slide boundary.
const GLIDE_MS: u64 = 160;

/// Image load window around the current slide: one behind, two ahead.
/// Forward-biased because forward navigation dominates.
const LOAD_BEHIND: usize = 1;
const LOAD_AHEAD: usize = 2;

/// Which kind of pointer started a drag.
///
/// Mouse drags are amplified by [`MOUSE_DRAG_GAIN`]; touch-style drags
/// track 1:1, matching natural touch-scroll physics. The two are kept
/// deliberately distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

impl PointerKind {
    const fn gain(self) -> f64 {
        match self {
            Self::Mouse => MOUSE_DRAG_GAIN,
            Self::Touch => 1.0,
        }
    }
}

/// Derived state for the row's controls, recomputed on every index change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlState {
    /// Whether the previous-slide control is actionable.
    pub prev_enabled: bool,
    /// Whether the next-slide control is actionable.
    pub next_enabled: bool,
    /// The single active progress dot, when the row has dots.
    pub active_dot: Option<usize>,
}

/// Construction options for one carousel row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselOptions {
    /// Rendered slide width in columns.
    pub slide_width: u16,
    /// Inter-slide gap in columns.
    pub gap: u16,
    /// Whether the row has prev/next controls.
    pub arrows: bool,
    /// Whether the row has progress dots.
    pub dots: bool,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            slide_width: 26,
            gap: 2,
            arrows: true,
            dots: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    start_x: f64,
    scroll_start: f64,
    gain: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Glide {
    from: f64,
    to: f64,
    started_ms: u64,
}

/// At-most-one pending settle slot; each scroll event cancels and replaces
/// the previous one.
#[derive(Debug)]
struct SettleDebouncer {
    delay_ms: u64,
    queued_at: Option<u64>,
}

impl SettleDebouncer {
    const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            queued_at: None,
        }
    }

    const fn queue(&mut self, now_ms: u64) {
        self.queued_at = Some(now_ms);
    }

    fn take_ready(&mut self, now_ms: u64) -> bool {
        let Some(queued_at) = self.queued_at else {
            return false;
        };
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.queued_at = None;
            return true;
        }
        false
    }

    const fn cancel(&mut self) {
        self.queued_at = None;
    }

    const fn is_pending(&self) -> bool {
        self.queued_at.is_some()
    }
}

/// State machine for one carousel row.
///
/// # Example
///
/// ```
/// use reel::carousel::{CarouselController, CarouselOptions};
///
/// let mut row = CarouselController::new(5, CarouselOptions::default());
/// assert_eq!(row.current_index(), 0);
///
/// row.next(0);
/// assert_eq!(row.current_index(), 1);
/// ```
#[derive(Debug)]
pub struct CarouselController {
    slide_count: usize,
    current_index: usize,
    /// Continuous scroll position in columns.
    scroll_offset: f64,
    slide_width: u16,
    gap: u16,
    has_arrows: bool,
    has_dots: bool,
    drag: Option<DragAnchor>,
    glide: Option<Glide>,
    settle: SettleDebouncer,
    /// Slide indices whose image has been materialized. Grows monotonically.
    loaded: BTreeSet<usize>,
    controls: ControlState,
    /// Assistive announcement text, created lazily on first refresh.
    announcement: Option<String>,
}

impl CarouselController {
    /// Create a controller for a row with `slide_count` slides.
    ///
    /// A zero-slide row yields an inert controller: every operation is a
    /// no-op and no derived state is produced. That is a defined degenerate
    /// case, not an error.
    pub fn new(slide_count: usize, options: CarouselOptions) -> Self {
        let mut controller = Self {
            slide_count,
            current_index: 0,
            scroll_offset: 0.0,
            slide_width: options.slide_width,
            gap: options.gap,
            has_arrows: options.arrows,
            has_dots: options.dots,
            drag: None,
            glide: None,
            settle: SettleDebouncer::new(SCROLL_SETTLE_MS),
            loaded: BTreeSet::new(),
            controls: ControlState::default(),
            announcement: None,
        };
        if !controller.is_empty() {
            controller.refresh_derived();
        }
        controller
    }

    /// Number of slides, fixed at construction.
    pub const fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// Whether the row has no slides (inert controller).
    pub const fn is_empty(&self) -> bool {
        self.slide_count == 0
    }

    /// The slide currently focused. Always in `[0, slide_count - 1]` for a
    /// non-empty row.
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// The live scroll position in columns.
    pub const fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Derived control state (arrow enablement, active dot).
    pub const fn controls(&self) -> ControlState {
        self.controls
    }

    /// The "Slide i of N" announcement, present after the first refresh of
    /// a non-empty row.
    pub fn announcement(&self) -> Option<&str> {
        self.announcement.as_deref()
    }

    /// Whether a drag is in progress.
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether an eased glide is still animating.
    pub const fn is_gliding(&self) -> bool {
        self.glide.is_some()
    }

    /// Whether a scroll settle is waiting for its quiet period.
    pub const fn is_settling(&self) -> bool {
        self.settle.is_pending()
    }

    /// Scroll distance between consecutive slides: slide width plus gap.
    ///
    /// Both directions of translation (index to offset, offset to index)
    /// go through this single computation so they cannot drift apart.
    pub fn pitch(&self) -> f64 {
        f64::from(self.slide_width.saturating_add(self.gap)).max(1.0)
    }

    fn max_offset(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        // Slide counts are tiny; well within f64 integer precision.
        {
            self.slide_count.saturating_sub(1) as f64 * self.pitch()
        }
    }

    /// Jump to slide `index`, clamped into range, with an eased glide.
    ///
    /// Always succeeds: clamping absorbs any input, including negatives.
    pub fn go_to_slide(&mut self, index: isize, now_ms: u64) {
        if self.is_empty() {
            return;
        }
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
        // slide_count - 1 fits isize for any realistic row; index is
        // non-negative after the clamp.
        let clamped = index.clamp(0, (self.slide_count - 1) as isize) as usize;
        self.current_index = clamped;

        #[allow(clippy::cast_precision_loss)]
        let target = clamped as f64 * self.pitch();
        if (target - self.scroll_offset).abs() < f64::EPSILON {
            self.glide = None;
        } else {
            self.glide = Some(Glide {
                from: self.scroll_offset,
                to: target,
                started_ms: now_ms,
            });
        }
        self.refresh_derived();
    }

    /// Move to the previous slide; a no-op on the index at slide 0.
    pub fn prev(&mut self, now_ms: u64) {
        #[allow(clippy::cast_possible_wrap)]
        self.go_to_slide(self.current_index as isize - 1, now_ms);
    }

    /// Move to the next slide; a no-op on the index at the last slide.
    pub fn next(&mut self, now_ms: u64) {
        #[allow(clippy::cast_possible_wrap)]
        self.go_to_slide(self.current_index as isize + 1, now_ms);
    }

    /// Begin a drag at column `x`.
    ///
    /// Any glide in flight is cancelled so the viewport tracks the pointer
    /// 1:1 for the duration of the drag.
    pub fn handle_drag_start(&mut self, x: u16, kind: PointerKind) {
        if self.is_empty() {
            return;
        }
        self.glide = None;
        self.drag = Some(DragAnchor {
            start_x: f64::from(x),
            scroll_start: self.scroll_offset,
            gain: kind.gain(),
        });
    }

    /// Update an in-progress drag; a no-op when not dragging.
    pub fn handle_drag_move(&mut self, x: u16) {
        let Some(anchor) = self.drag else {
            return;
        };
        let walk = (f64::from(x) - anchor.start_x) * anchor.gain;
        self.scroll_offset = (anchor.scroll_start - walk).clamp(0.0, self.max_offset());
    }

    /// End a drag and snap to the nearest slide boundary.
    pub fn handle_drag_end(&mut self, now_ms: u64) {
        if self.drag.take().is_none() {
            return;
        }
        // A pending wheel settle is superseded by the snap.
        self.settle.cancel();
        self.go_to_slide(self.nearest_index(), now_ms);
    }

    /// Handle a navigation key. Returns true when the key was consumed, so
    /// the caller can suppress any default handling for it.
    pub fn handle_key(&mut self, key: KeyCode, now_ms: u64) -> bool {
        if self.is_empty() {
            return false;
        }
        match key {
            KeyCode::Left => self.prev(now_ms),
            KeyCode::Right => self.next(now_ms),
            KeyCode::Home => self.go_to_slide(0, now_ms),
            KeyCode::End => {
                #[allow(clippy::cast_possible_wrap)]
                self.go_to_slide(self.slide_count as isize - 1, now_ms);
            }
            _ => return false,
        }
        true
    }

    /// Apply a free scroll delta (wheel / trackpad) and arm the settle
    /// debounce. Rapid bursts collapse to a single index recomputation
    /// once [`poll_settle`] observes the quiet period.
    ///
    /// [`poll_settle`]: Self::poll_settle
    pub fn handle_scroll(&mut self, delta: f64, now_ms: u64) {
        if self.is_empty() {
            return;
        }
        self.glide = None;
        self.scroll_offset = (self.scroll_offset + delta).clamp(0.0, self.max_offset());
        self.settle.queue(now_ms);
    }

    /// Poll the settle debounce. After the quiet period, recompute the
    /// index from the last observed offset and refresh derived state.
    /// Returns true when a recomputation happened (the caller should
    /// materialize newly windowed images and re-render).
    pub fn poll_settle(&mut self, now_ms: u64) -> bool {
        if !self.settle.take_ready(now_ms) {
            return false;
        }
        #[allow(clippy::cast_sign_loss)]
        // nearest_index clamps into [0, slide_count - 1].
        {
            self.current_index = self.nearest_index() as usize;
        }
        self.refresh_derived();
        true
    }

    /// Advance the glide animation. Returns true while the offset is still
    /// moving (a render is needed).
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let Some(glide) = self.glide else {
            return false;
        };
        let elapsed = now_ms.saturating_sub(glide.started_ms);
        if elapsed >= GLIDE_MS {
            self.scroll_offset = glide.to;
            self.glide = None;
        } else {
            #[allow(clippy::cast_precision_loss)]
            let t = elapsed as f64 / GLIDE_MS as f64;
            self.scroll_offset = glide.from + (glide.to - glide.from) * ease_out_cubic(t);
        }
        true
    }

    /// Update geometry after a layout change (terminal resize).
    ///
    /// Only bookkeeping: the offset is clamped to the new range and derived
    /// control state refreshed. The index is not recomputed; the next
    /// operation reads the new pitch.
    pub fn set_geometry(&mut self, slide_width: u16, gap: u16) {
        if self.is_empty() {
            return;
        }
        self.slide_width = slide_width;
        self.gap = gap;
        self.scroll_offset = self.scroll_offset.clamp(0.0, self.max_offset());
        self.refresh_derived();
    }

    /// Slide indices that just entered the load window and still need their
    /// image materialized: `[current - 1, current + 2]` clamped to range.
    ///
    /// Marks the returned indices as loaded, so a repeat call at the same
    /// index returns nothing. The loaded set only ever grows.
    pub fn take_pending_loads(&mut self) -> Vec<usize> {
        if self.is_empty() {
            return Vec::new();
        }
        let start = self.current_index.saturating_sub(LOAD_BEHIND);
        let end = (self.current_index + LOAD_AHEAD).min(self.slide_count - 1);
        let mut pending = Vec::new();
        for index in start..=end {
            if self.loaded.insert(index) {
                pending.push(index);
            }
        }
        pending
    }

    /// Whether a slide's image has been materialized.
    pub fn is_loaded(&self, index: usize) -> bool {
        self.loaded.contains(&index)
    }

    #[allow(clippy::cast_possible_truncation)]
    // Offsets are bounded by max_offset, far below isize range.
    fn nearest_index(&self) -> isize {
        (self.scroll_offset / self.pitch()).round() as isize
    }

    fn refresh_derived(&mut self) {
        if self.is_empty() {
            return;
        }
        self.controls = ControlState {
            prev_enabled: self.has_arrows && self.current_index > 0,
            next_enabled: self.has_arrows && self.current_index < self.slide_count - 1,
            active_dot: self.has_dots.then_some(self.current_index),
        };
        let text = format!("Slide {} of {}", self.current_index + 1, self.slide_count);
        match self.announcement.as_mut() {
            Some(existing) => *existing = text,
            None => self.announcement = Some(text),
        }
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
