//! Record page: capture from the microphone, play the clip back and send it
//! for transcription.

use super::spinner::{LoadingSpinner, SpinnerSize};
use super::toast::Toasts;
use crate::recording::meter::{volume_percent, window_len};
use crate::recording::playback::{cleanup_playback_file, play_clip};
use crate::recording::session::MICROPHONE_UNAVAILABLE;
use crate::recording::{AudioRecorder, RecordSession, RecordedClip, RecorderStatus};
use crate::transcription::{AudioUpload, TranscriptionClient};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Sparkline, Wrap},
};
use std::process::Child;
use std::time::Instant;

/// Longest level history kept for the meter.
const METER_HISTORY: usize = 256;

const MUTED: Color = Color::Rgb(148, 163, 184);
const ERROR: Color = Color::Rgb(239, 68, 68);
const RECORDING: Color = Color::Rgb(239, 68, 68);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAction {
    Toggle,
    Send,
    Reset,
    Play,
    Quit,
}

impl RecordAction {
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Char(' ') => Some(Self::Toggle),
            KeyCode::Enter => Some(Self::Send),
            KeyCode::Char('x') => Some(Self::Reset),
            KeyCode::Char('p') => Some(Self::Play),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            _ => None,
        }
    }
}

pub struct RecordPage {
    pub session: RecordSession,
    recorder: AudioRecorder,
    reference_level_db: i8,
    levels: Vec<u64>,
    recording_started: Option<Instant>,
    player: Option<Child>,
    spinner: LoadingSpinner,
    meter_spinner: LoadingSpinner,
}

impl RecordPage {
    pub fn new(recorder: AudioRecorder, reference_level_db: i8) -> Self {
        Self {
            session: RecordSession::new(),
            recorder,
            reference_level_db,
            levels: Vec::new(),
            recording_started: None,
            player: None,
            spinner: LoadingSpinner::new(SpinnerSize::Sm).with_text("Processing audio..."),
            meter_spinner: LoadingSpinner::new(SpinnerSize::Lg),
        }
    }

    /// Applies a key action. Returns true when the app should quit.
    pub fn apply(&mut self, action: RecordAction, client: &TranscriptionClient, toasts: &mut Toasts) -> bool {
        match action {
            RecordAction::Toggle if self.session.can_stop() => self.stop(toasts),
            RecordAction::Toggle => self.request_start(toasts),
            RecordAction::Send => self.send(client, toasts),
            RecordAction::Reset => self.reset(toasts),
            RecordAction::Play => self.play(toasts),
            RecordAction::Quit => return true,
        }
        false
    }

    /// Marks the microphone as being acquired. The device is opened on the next tick
    /// so the loading toast is drawn first.
    fn request_start(&mut self, toasts: &mut Toasts) {
        if !self.session.can_start() {
            return;
        }
        self.session.begin_acquire();
        toasts.loading("Accessing microphone...");
    }

    fn acquire(&mut self, toasts: &mut Toasts) {
        match self.recorder.start_recording() {
            Ok(()) => {
                self.session.media_acquired();
                self.levels.clear();
                self.recording_started = Some(Instant::now());
                toasts.success("Recording started");
            }
            Err(e) => {
                tracing::error!("Failed to start recording: {}", e);
                self.session.media_failed();
                toasts.error(MICROPHONE_UNAVAILABLE);
            }
        }
    }

    /// Stops an ongoing recording. Also used for the external SIGUSR1 trigger.
    pub fn stop(&mut self, toasts: &mut Toasts) {
        if !self.session.can_stop() {
            return;
        }
        let clip = self.recorder.stop_recording();
        self.recording_started = None;
        if clip.is_some() {
            toasts.success("Recording completed");
        }
        self.session.stopped(clip);
    }

    fn send(&mut self, client: &TranscriptionClient, toasts: &mut Toasts) {
        if !self.session.can_send() {
            return;
        }
        let Some(clip) = self.session.clip() else {
            return;
        };
        match AudioUpload::recording(clip) {
            Ok(upload) => {
                if self.session.transcription.submit(client, upload) {
                    toasts.loading("Transcribing audio...");
                }
            }
            Err(e) => {
                tracing::error!("Failed to prepare recording for upload: {}", e);
                let message = e.to_string();
                self.session.transcription.set_error(message.clone());
                toasts.error(message);
            }
        }
    }

    fn reset(&mut self, toasts: &mut Toasts) {
        if !self.session.can_reset() {
            return;
        }
        toasts.dismiss();
        self.stop_playback();
        self.levels.clear();
        self.session.reset();
    }

    fn play(&mut self, toasts: &mut Toasts) {
        if let Err(e) = self.replace_player(play_clip) {
            tracing::warn!("Playback failed: {}", e);
            toasts.error(e.to_string());
        }
    }

    /// Stops the current player, then hands the clip to `start`.
    ///
    /// The old player must be gone before `start` rewrites the shared temp file.
    fn replace_player(
        &mut self,
        start: impl FnOnce(&RecordedClip) -> anyhow::Result<Child>,
    ) -> anyhow::Result<()> {
        if self.session.clip().is_none() {
            return Ok(());
        }
        self.stop_playback();
        if let Some(clip) = self.session.clip() {
            self.player = Some(start(clip)?);
        }
        Ok(())
    }

    fn stop_playback(&mut self) {
        if let Some(mut child) = self.player.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    /// Advances animations, samples the input level and opens the microphone if requested.
    pub fn tick(&mut self, toasts: &mut Toasts) {
        if self.session.status() == RecorderStatus::AcquiringMedia {
            self.acquire(toasts);
        }

        if self.session.transcription.is_transcribing() {
            self.spinner.tick();
            self.meter_spinner.tick();
        }

        if self.session.status() == RecorderStatus::Recording {
            let rate = self.recorder.sample_rate();
            let recent = self.recorder.recent_samples(window_len(rate));
            let level = volume_percent(&recent, rate, self.reference_level_db);
            self.levels.push(level as u64);
            if self.levels.len() > METER_HISTORY {
                self.levels.remove(0);
            }
        }

        if let Some(child) = self.player.as_mut() {
            if matches!(child.try_wait(), Ok(Some(_))) {
                self.player = None;
            }
        }
    }

    /// Stops capture and playback before the app exits.
    pub fn shutdown(&mut self) {
        if self.recorder.is_recording() {
            self.recorder.stop_recording();
        }
        self.stop_playback();
        cleanup_playback_file();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let [header, meter, status, controls, clip_area, result] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(6),
            Constraint::Length(self.spinner.height()),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(3),
        ])
        .areas(area.inner(Margin::new(2, 1)));

        frame.render_widget(
            Paragraph::new(vec![
                Line::from("Record Audio").bold(),
                Line::from(Span::styled(
                    "Record from your microphone and send it for transcription",
                    Style::default().fg(MUTED),
                )),
            ]),
            header,
        );

        self.render_meter(frame, meter);

        if self.session.transcription.is_transcribing() {
            frame.render_widget(&self.spinner, status);
        } else {
            let style = if self.session.transcription.error().is_some() {
                Style::default().fg(ERROR)
            } else {
                Style::default()
            };
            frame.render_widget(
                Paragraph::new(self.session.status_message())
                    .style(style)
                    .alignment(Alignment::Center),
                status,
            );
        }

        frame.render_widget(
            Paragraph::new(self.controls_line()).alignment(Alignment::Center),
            controls,
        );

        if let Some(clip) = self.session.clip() {
            let playing = if self.player.is_some() { "  ▶ playing" } else { "" };
            frame.render_widget(
                Paragraph::new(format!(
                    "Clip: {:.1}s at {} Hz{}",
                    clip.duration().as_secs_f32(),
                    clip.sample_rate,
                    playing
                ))
                .style(Style::default().fg(MUTED))
                .alignment(Alignment::Center),
                clip_area,
            );
        }

        if let Some(text) = self.session.transcription.transcription() {
            render_result(frame, result, text);
        }
    }

    fn render_meter(&self, frame: &mut Frame, area: Rect) {
        let recording = self.session.status() == RecorderStatus::Recording;
        let title = match self.recording_started {
            Some(started) if recording => {
                let secs = started.elapsed().as_secs();
                format!(" ● {:02}:{:02} ", secs / 60, secs % 60)
            }
            _ => format!(" {} ", self.session.status()),
        };
        let border = if recording { RECORDING } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(title);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if recording {
            let visible = self.levels.len().saturating_sub(inner.width as usize);
            let sparkline = Sparkline::default()
                .data(&self.levels[visible..])
                .max(100)
                .style(Style::default().fg(Color::Rgb(206, 224, 220)));
            frame.render_widget(sparkline, inner);
        } else if self.session.transcription.is_transcribing() {
            let [_, middle, _] = Layout::vertical([
                Constraint::Min(0),
                Constraint::Length(self.meter_spinner.height()),
                Constraint::Min(0),
            ])
            .areas(inner);
            frame.render_widget(&self.meter_spinner, middle);
        }
    }

    fn controls_line(&self) -> Line<'static> {
        let session = &self.session;
        let mut hints: Vec<(&str, &str)> = Vec::new();
        if session.can_stop() {
            hints.push(("Space", "stop"));
        } else if session.can_start() {
            hints.push(("Space", "record"));
        }
        if session.clip().is_some() {
            hints.push(("p", "play"));
        }
        if session.can_send() {
            hints.push(("Enter", "transcribe"));
        }
        if session.can_reset() {
            hints.push(("x", "reset"));
        }
        hints.push(("q", "quit"));

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled(format!("[{key}]"), Style::default().bold()));
            spans.push(Span::styled(format!(" {label}"), Style::default().fg(MUTED)));
        }
        Line::from(spans)
    }
}

/// Draws a transcription result box.
pub fn render_result(frame: &mut Frame, area: Rect, text: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(34, 197, 94)))
        .title(" Transcription Result ");
    frame.render_widget(
        Paragraph::new(text.to_string())
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}
