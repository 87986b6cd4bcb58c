use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, ToastLevel, update};
use crate::watcher::DeckWatcher;

use super::effects::{WATCH_DEBOUNCE, handle_message_side_effects};
use super::input;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization, deck parsing, or the
    /// event loop encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        // Create image picker BEFORE initializing terminal (queries stdio)
        let picker = if self.images_enabled {
            let picker_scope = crate::perf::scope("app.create_picker");
            let picker = crate::image::create_picker(self.force_half_cell);
            drop(picker_scope);
            picker
        } else {
            None
        };

        let load_scope = crate::perf::scope("app.load_deck");
        let deck = crate::deck::Deck::load(&self.deck_path)
            .with_context(|| format!("Failed to load deck {}", self.deck_path.display()))?;
        drop(load_scope);

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - reel requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        crate::perf::log_event(
            "init.layout",
            format!(
                "terminal={}x{} rows={} slide_width={:?}",
                size.width,
                size.height,
                deck.rows.len(),
                self.slide_width
            ),
        );

        let mut model =
            Model::new(self.deck_path.clone(), deck, (size.width, size.height)).with_picker(picker);
        model.slide_width_override = self.slide_width;
        model.watch_enabled = self.watch_enabled;
        model.images_enabled = self.images_enabled;
        // Controllers were bound before the override was known; resync
        // their geometry with it applied.
        model.apply_resize(size.width, size.height);

        let images_scope = crate::perf::scope("app.materialize_images.initial");
        model.materialize_pending_images();
        drop(images_scope);

        execute!(stdout(), EnableMouseCapture)?;
        let result = Self::event_loop(&mut terminal, &mut model);

        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut deck_watcher = if model.watch_enabled {
            match DeckWatcher::new(&model.deck_path, WATCH_DEBOUNCE) {
                Ok(watcher) => Some(watcher),
                Err(err) => {
                    model.watch_enabled = false;
                    model.show_toast(ToastLevel::Warning, format!("Watch unavailable: {err}"));
                    crate::perf::log_event(
                        "watcher.error",
                        format!("failed path={} err={err}", model.deck_path.display()),
                    );
                    None
                }
            }
        } else {
            None
        };
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if advance_animations(model, now_ms) {
                needs_render = true;
            }

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                crate::perf::log_event(
                    "event.resize.apply",
                    format!("frame={frame_idx} width={width} height={height}"),
                );
                *model = update(
                    std::mem::take(model),
                    Message::Resize(width, height),
                    now_ms,
                );
                needs_render = true;
            }

            if model.watch_enabled
                && deck_watcher
                    .as_mut()
                    .is_some_and(DeckWatcher::take_change_ready)
            {
                *model = update(std::mem::take(model), Message::DeckChanged, now_ms);
                *model = handle_message_side_effects(
                    std::mem::take(model),
                    &Message::DeckChanged,
                    &mut deck_watcher,
                );
                needs_render = true;
            }

            // Handle events
            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() || any_motion_pending(model) {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamp after poll wait so debouncers and
                // controllers use accurate times.
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                if Self::dispatch_event(
                    &event::read()?,
                    model,
                    event_ms,
                    &mut resize_debouncer,
                    &mut deck_watcher,
                    frame_idx,
                )? {
                    needs_render = true;
                }

                // Coalesce key repeat and drag bursts into a single render.
                let mut drained = 0_u32;
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    if Self::dispatch_event(
                        &event::read()?,
                        model,
                        drain_ms,
                        &mut resize_debouncer,
                        &mut deck_watcher,
                        frame_idx,
                    )? {
                        drained += 1;
                        needs_render = true;
                    }
                }
                if drained > 0 {
                    crate::perf::log_event(
                        "event.drain",
                        format!("frame={frame_idx} drained={drained}"),
                    );
                }
            }

            if needs_render {
                frame_idx += 1;

                // Materialize images that entered a load window before drawing
                let prep_start = Instant::now();
                model.materialize_pending_images();
                crate::perf::log_event(
                    "frame.prep",
                    format!(
                        "frame={} prep_ms={:.3} focused_row={} resize_pending={}",
                        frame_idx,
                        prep_start.elapsed().as_secs_f64() * 1000.0,
                        model.focused_row,
                        resize_debouncer.is_pending()
                    ),
                );

                let draw_start = Instant::now();
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0
                    ),
                );
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }

    /// Translate one terminal event and apply it. Returns true when the
    /// model changed and a repaint is needed.
    fn dispatch_event(
        event: &event::Event,
        model: &mut Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
        deck_watcher: &mut Option<DeckWatcher>,
        frame_idx: u64,
    ) -> Result<bool> {
        let Some(msg) = input::handle_event(event, model) else {
            return Ok(false);
        };
        if let Message::Resize(width, height) = msg {
            resize_debouncer.queue(width, height, now_ms);
            return Ok(false);
        }
        crate::perf::log_event("event.message", format!("frame={frame_idx} msg={msg:?}"));
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg, now_ms);
        *model = handle_message_side_effects(std::mem::take(model), &side_msg, deck_watcher);
        Ok(true)
    }
}

/// Advance glide animation and scroll settling on every controller.
fn advance_animations(model: &mut Model, now_ms: u64) -> bool {
    let mut changed = false;
    for controller in model.controllers.values_mut() {
        changed |= controller.tick(now_ms);
        changed |= controller.poll_settle(now_ms);
    }
    changed
}

fn any_motion_pending(model: &Model) -> bool {
    model
        .controllers
        .values()
        .any(|controller| controller.is_gliding() || controller.is_settling())
}
