/// The frame loop.
///
/// Every tick clears the surface and draws the background, then either
/// advances and draws the session or, in a terminal state, draws the
/// overlay. The loop keeps running in every state; only quitting stops it.

use std::io::Write;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use tracing::{info, warn};

use crate::assets::Assets;
use crate::audio::CuePlayer;
use crate::compute::Session;
use crate::display::Renderer;
use crate::entities::{GameEvent, GameStatus};
use crate::input::{apply_command, pointer_command, Command, KeyTracker};
use crate::surface::{ScoreSink, Surface};
use crate::terminal::TerminalSurface;

pub struct FrameDriver {
    pub session: Session,
    renderer: Renderer,
    assets: Assets,
    cues: CuePlayer,
    keys: KeyTracker,
    frame: u64,
}

impl FrameDriver {
    pub fn new(session: Session, renderer: Renderer, assets: Assets, cues: CuePlayer) -> Self {
        Self {
            session,
            renderer,
            assets,
            cues,
            keys: KeyTracker::new(),
            frame: 0,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Run one tick against `surface` at `now_ms` since the loop started.
    pub fn run_frame<S>(&mut self, surface: &mut S, now_ms: u64) -> std::io::Result<()>
    where
        S: Surface + ScoreSink,
    {
        self.frame += 1;
        self.assets.poll();

        surface.clear();
        self.renderer.draw_background(surface);

        if self.session.status == GameStatus::Playing {
            let input = self.keys.input_state(self.frame);
            let events = self.session.update(input, now_ms);
            self.dispatch(&events, surface);
            self.renderer.draw_entities(surface, &self.session, &self.assets);
        } else {
            self.renderer.draw_overlay(surface, &self.session);
        }

        surface.present()
    }

    fn dispatch(&self, events: &[GameEvent], score: &mut dyn ScoreSink) {
        for event in events {
            match *event {
                GameEvent::Shot => self.cues.play_shoot_cue(),
                GameEvent::EnemyDestroyed { score: total } => {
                    self.cues.play_destroy_cue();
                    score.show_score(total);
                }
                GameEvent::WaveCleared => self.cues.play_wave_clear_cue(),
                GameEvent::GameOver => {}
            }
        }
    }

    /// Feed a key event into the held-key tracker. Returns `true` on quit.
    pub fn handle_key(&mut self, event: KeyEvent, score: &mut dyn ScoreSink) -> bool {
        match self.keys.handle_key(event, self.frame, &self.session) {
            Some(Command::Quit) => true,
            Some(command) => {
                self.execute(command, score);
                false
            }
            None => false,
        }
    }

    /// A pointer click at logical field coordinates.
    pub fn handle_click(&mut self, x: f32, y: f32, score: &mut dyn ScoreSink) {
        if let Some(command) = pointer_command(&self.session, x, y) {
            self.execute(command, score);
        }
    }

    fn execute(&mut self, command: Command, score: &mut dyn ScoreSink) {
        apply_command(&mut self.session, command);
        self.keys.clear();
        score.show_score(self.session.score);
    }

    /// Drive `surface` until the player quits or the event source goes away.
    pub fn run<W: Write>(
        &mut self,
        surface: &mut TerminalSurface<W>,
        events: &Receiver<Event>,
        frame_budget: Duration,
    ) -> crate::error::Result<()> {
        let started = Instant::now();
        surface.show_score(self.session.score);
        info!(fps = 1.0 / frame_budget.as_secs_f64(), "frame loop started");

        loop {
            let frame_start = Instant::now();

            // ── Drain all pending input events (non-blocking) ─────────────────
            loop {
                match events.try_recv() {
                    Ok(Event::Key(key)) => {
                        if self.handle_key(key, surface) {
                            info!(frames = self.frame, "quit requested");
                            return Ok(());
                        }
                    }
                    Ok(Event::Mouse(MouseEvent {
                        kind: MouseEventKind::Down(MouseButton::Left),
                        column,
                        row,
                        ..
                    })) => {
                        if let Some((x, y)) = surface.to_logical(column, row) {
                            self.handle_click(x, y, surface);
                        }
                    }
                    Ok(Event::Resize(cols, rows)) => {
                        if let Err(err) = surface.resize(cols, rows) {
                            warn!(error = %err, "ignoring resize");
                        }
                    }
                    Ok(_) => {}
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        warn!("input source closed, stopping");
                        return Ok(());
                    }
                }
            }

            let now_ms = started.elapsed().as_millis() as u64;
            self.run_frame(surface, now_ms)?;

            let elapsed = frame_start.elapsed();
            if elapsed < frame_budget {
                std::thread::sleep(frame_budget - elapsed);
            }
        }
    }
}
