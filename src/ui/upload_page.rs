//! Upload page: pick an audio file from disk and send it for transcription.

use super::record_page::render_result;
use super::spinner::{LoadingSpinner, SpinnerSize};
use super::toast::Toasts;
use crate::transcription::upload::supported_formats_label;
use crate::transcription::{AudioUpload, TranscriptionClient, TranscriptionError, TranscriptionState};
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use std::path::PathBuf;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

const MUTED: Color = Color::Rgb(148, 163, 184);
const ERROR: Color = Color::Rgb(239, 68, 68);

pub struct UploadPage {
    pub transcription: TranscriptionState,
    input: Input,
    selected: Option<String>,
    spinner: LoadingSpinner,
}

impl UploadPage {
    pub fn new() -> Self {
        Self {
            transcription: TranscriptionState::new(),
            input: Input::default(),
            selected: None,
            spinner: LoadingSpinner::new(SpinnerSize::Md).with_text("Processing audio..."),
        }
    }

    /// Feeds a key to the path input; Enter submits the path.
    pub fn handle_key(&mut self, key: KeyEvent, client: &TranscriptionClient, toasts: &mut Toasts) {
        match key.code {
            KeyCode::Enter => self.submit(client, toasts),
            _ => {
                self.input.handle_event(&Event::Key(key));
            }
        }
    }

    fn submit(&mut self, client: &TranscriptionClient, toasts: &mut Toasts) {
        let value = self.input.value().trim();
        if value.is_empty() || self.transcription.is_transcribing() {
            return;
        }
        let path = PathBuf::from(value);

        match AudioUpload::from_path(&path) {
            Ok(upload) => {
                tracing::info!("Uploading {} ({} bytes)", path.display(), upload.size());
                self.selected = Some(format!("{} ({})", upload.file_name, format_size(upload.size())));
                if self.transcription.submit(client, upload) {
                    toasts.loading("Transcribing audio...");
                }
            }
            Err(TranscriptionError::NotAudio) => {
                tracing::info!("Rejected non-audio file: {}", path.display());
                toasts.error(TranscriptionError::NotAudio.to_string());
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                let message = e.to_string();
                self.transcription.set_error(message.clone());
                toasts.error(message);
            }
        }
    }

    pub fn tick(&mut self) {
        if self.transcription.is_transcribing() {
            self.spinner.tick();
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let [header, input_area, hint, status, error, result] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(self.spinner.height() + 1),
            Constraint::Length(if self.transcription.error().is_some() { 3 } else { 0 }),
            Constraint::Min(3),
        ])
        .areas(area.inner(Margin::new(2, 1)));

        frame.render_widget(
            Paragraph::new(vec![
                Line::from("Upload Audio").bold(),
                Line::from(Span::styled(
                    "Transcribe an audio file from disk",
                    Style::default().fg(MUTED),
                )),
            ]),
            header,
        );

        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Audio file path ");
        let input_inner = input_block.inner(input_area);
        frame.render_widget(input_block, input_area);

        let scroll = self.input.visual_scroll(input_inner.width.saturating_sub(1) as usize);
        frame.render_widget(
            Paragraph::new(self.input.value()).scroll((0, scroll as u16)),
            input_inner,
        );
        let cursor_x = input_inner.x + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
        frame.set_cursor_position(Position::new(cursor_x, input_inner.y));

        frame.render_widget(
            Paragraph::new(format!(
                "Supported formats: {}   [Enter] transcribe",
                supported_formats_label()
            ))
            .style(Style::default().fg(MUTED)),
            hint,
        );

        if self.transcription.is_transcribing() {
            frame.render_widget(&self.spinner, status);
        } else if let Some(selected) = &self.selected {
            frame.render_widget(
                Paragraph::new(format!("Selected: {selected}")).style(Style::default().fg(MUTED)),
                status,
            );
        }

        if let Some(message) = self.transcription.error() {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ERROR));
            frame.render_widget(
                Paragraph::new(message.to_string())
                    .style(Style::default().fg(ERROR))
                    .block(block)
                    .wrap(Wrap { trim: true }),
                error,
            );
        }

        if let Some(text) = self.transcription.transcription() {
            render_result(frame, result, text);
        }
    }
}

fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes >= KIB * KIB {
        format!("{:.1} MB", bytes / (KIB * KIB))
    } else if bytes >= KIB {
        format!("{:.1} KB", bytes / KIB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::toast::ToastKind;
    use crossterm::event::KeyModifiers;
    use std::time::Duration;

    fn type_text(page: &mut UploadPage, client: &TranscriptionClient, toasts: &mut Toasts, text: &str) {
        for c in text.chars() {
            page.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), client, toasts);
        }
    }

    fn client() -> TranscriptionClient {
        TranscriptionClient::new("http://127.0.0.1:9/api/transcribe", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_non_audio_file_only_raises_toast() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not audio").unwrap();

        let client = client();
        let mut page = UploadPage::new();
        let mut toasts = Toasts::new();
        type_text(&mut page, &client, &mut toasts, &path.to_string_lossy());
        page.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &client, &mut toasts);

        let toast = toasts.current().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Please upload an audio file");
        assert!(page.transcription.error().is_none());
        assert!(!page.transcription.is_transcribing());
    }

    #[test]
    fn test_empty_input_is_ignored() {
        let client = client();
        let mut page = UploadPage::new();
        let mut toasts = Toasts::new();

        page.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &client, &mut toasts);

        assert!(toasts.current().is_none());
    }

    #[tokio::test]
    async fn test_audio_file_is_submitted() {
        let base = crate::server::spawn_test_server("uploaded").await;
        let client =
            TranscriptionClient::new(format!("{base}/api/transcribe"), Duration::from_secs(5)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.wav");
        crate::recording::RecordedClip::new(vec![0; 800], 16000)
            .write_wav(&path)
            .unwrap();

        let mut page = UploadPage::new();
        let mut toasts = Toasts::new();
        type_text(&mut page, &client, &mut toasts, &path.to_string_lossy());
        page.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &client, &mut toasts);

        assert!(page.transcription.is_transcribing());
        assert_eq!(toasts.current().unwrap().message, "Transcribing audio...");

        page.transcription.wait().await;
        assert_eq!(page.transcription.transcription(), Some("uploaded"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
