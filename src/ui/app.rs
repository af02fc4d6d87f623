//! The terminal application: sidebar navigation between the record and upload
//! pages, toasts, and the event loop that drives both.

use super::layout::{render_title, Page, Sidebar};
use super::record_page::{RecordAction, RecordPage};
use super::toast::Toasts;
use super::upload_page::UploadPage;
use crate::transcription::{SubmissionOutcome, TranscriptionClient};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const FRAME_INTERVAL: Duration = Duration::from_millis(50);

pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    client: TranscriptionClient,
    page: Page,
    sidebar: Sidebar,
    toasts: Toasts,
    record: RecordPage,
    upload: UploadPage,
    last_transcription: Option<String>,
}

impl App {
    /// Enters the alternate screen and builds both pages.
    ///
    /// # Errors
    /// - If raw mode cannot be enabled
    /// - If the alternate screen cannot be entered
    pub fn new(client: TranscriptionClient, record: RecordPage, page: Page) -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            client,
            page,
            sidebar: Sidebar::new(),
            toasts: Toasts::new(),
            record,
            upload: UploadPage::new(),
            last_transcription: None,
        })
    }

    /// Runs until the user quits and returns the most recent transcription.
    ///
    /// `stop_requested` is raised externally (SIGUSR1) to stop an ongoing recording.
    ///
    /// # Errors
    /// - If drawing or reading terminal events fails
    pub async fn run(&mut self, stop_requested: Arc<AtomicBool>) -> anyhow::Result<Option<String>> {
        tracing::debug!("Entering app loop on {:?} page", self.page);

        loop {
            if stop_requested.swap(false, Ordering::Relaxed) {
                tracing::info!("Received SIGUSR1: stopping recording");
                self.record.stop(&mut self.toasts);
            }

            if let Some(outcome) = self.record.session.transcription.poll().await {
                self.announce(outcome);
            }
            if let Some(outcome) = self.upload.transcription.poll().await {
                self.announce(outcome);
            }

            self.record.tick(&mut self.toasts);
            self.upload.tick();
            self.toasts.expire();

            self.draw()?;

            if event::poll(FRAME_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key) {
                        break;
                    }
                }
            }
        }

        self.record.shutdown();
        tracing::debug!("Leaving app loop");
        Ok(self.last_transcription.take())
    }

    fn announce(&mut self, outcome: SubmissionOutcome) {
        match outcome {
            SubmissionOutcome::Completed(text) => {
                self.toasts.success("Transcription completed!");
                self.last_transcription = Some(text);
            }
            SubmissionOutcome::Failed(message) => self.toasts.error(message),
        }
    }

    /// Routes a key press. Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return true,
            KeyCode::Char('b') if ctrl => {
                self.sidebar.toggle(self.page);
                return false;
            }
            _ => {}
        }

        if self.sidebar.is_open() {
            if let Some(page) = self.sidebar.handle_key(key) {
                self.switch_to(page);
            }
            return false;
        }

        if key.code == KeyCode::Tab {
            self.switch_to(self.page.next());
            return false;
        }

        match self.page {
            Page::Record => match RecordAction::from_key(key) {
                Some(action) => self.record.apply(action, &self.client, &mut self.toasts),
                None => false,
            },
            Page::Upload => {
                if key.code == KeyCode::Esc {
                    return true;
                }
                self.upload.handle_key(key, &self.client, &mut self.toasts);
                false
            }
        }
    }

    fn switch_to(&mut self, page: Page) {
        if page != self.page {
            tracing::debug!("Switching to {:?} page", page);
            self.page = page;
        }
    }

    fn draw(&mut self) -> anyhow::Result<()> {
        let Self {
            terminal,
            page,
            sidebar,
            toasts,
            record,
            upload,
            ..
        } = self;

        terminal.draw(|frame| {
            let [title, body] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(frame.area());
            render_title(frame, title);

            let regions = sidebar.regions(body);
            match page {
                Page::Record => record.render(frame, regions.content),
                Page::Upload => upload.render(frame, regions.content),
            }
            if let Some(area) = regions.sidebar {
                sidebar.render(frame, area, *page);
            }
            toasts.render(frame, body);
        })?;
        Ok(())
    }

    /// Restores the terminal.
    ///
    /// # Errors
    /// - If raw mode cannot be disabled
    /// - If the alternate screen cannot be left
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
