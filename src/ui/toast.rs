//! Transient notifications drawn in the bottom-right corner.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use std::time::{Duration, Instant};

const TOAST_WIDTH: u16 = 44;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Loading,
    Success,
    Error,
}

impl ToastKind {
    /// How long the toast stays up. Loading toasts stay until replaced.
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            Self::Loading => None,
            Self::Success => Some(Duration::from_secs(2)),
            Self::Error => Some(Duration::from_secs(4)),
        }
    }

    fn color(&self) -> Color {
        match self {
            Self::Loading => Color::Rgb(59, 130, 246),
            Self::Success => Color::Rgb(34, 197, 94),
            Self::Error => Color::Rgb(239, 68, 68),
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Self::Loading => "…",
            Self::Success => "✓",
            Self::Error => "✗",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    shown_at: Instant,
}

impl Toast {
    fn is_expired(&self, now: Instant) -> bool {
        self.kind
            .ttl()
            .is_some_and(|ttl| now.duration_since(self.shown_at) >= ttl)
    }
}

/// Holds at most one toast; showing a new one replaces the current one.
#[derive(Debug, Default)]
pub struct Toasts {
    current: Option<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.show_at(kind, message, Instant::now());
    }

    fn show_at(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) {
        let message = message.into();
        tracing::debug!("Toast ({:?}): {}", kind, message);
        self.current = Some(Toast {
            kind,
            message,
            shown_at: now,
        });
    }

    pub fn loading(&mut self, message: impl Into<String>) {
        self.show(ToastKind::Loading, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(ToastKind::Error, message);
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Drops the current toast once its time is up.
    pub fn expire(&mut self) {
        self.expire_at(Instant::now());
    }

    fn expire_at(&mut self, now: Instant) {
        if self.current.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(toast) = &self.current else {
            return;
        };

        let width = TOAST_WIDTH.min(area.width);
        let inner_width = width.saturating_sub(4).max(1) as usize;
        let text_rows = (toast.message.chars().count() + 2).div_ceil(inner_width) as u16;
        let height = (text_rows + 2).min(area.height);
        let toast_area = Rect {
            x: area.x + area.width - width,
            y: area.y + area.height - height,
            width,
            height,
        };

        let color = toast.kind.color();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color));
        let text = Line::from(vec![
            Span::styled(toast.kind.icon(), Style::default().fg(color).bold()),
            Span::raw(" "),
            Span::raw(toast.message.as_str()),
        ]);

        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(text)
                .block(block)
                .wrap(Wrap { trim: true }),
            toast_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_toast_replaces_current() {
        let mut toasts = Toasts::new();
        toasts.loading("Accessing microphone...");
        toasts.success("Recording started");

        let current = toasts.current().unwrap();
        assert_eq!(current.kind, ToastKind::Success);
        assert_eq!(current.message, "Recording started");
    }

    #[test]
    fn test_success_expires_after_two_seconds() {
        let start = Instant::now();
        let mut toasts = Toasts::new();
        toasts.show_at(ToastKind::Success, "Recording completed", start);

        toasts.expire_at(start + Duration::from_millis(1999));
        assert!(toasts.current().is_some());

        toasts.expire_at(start + Duration::from_secs(2));
        assert!(toasts.current().is_none());
    }

    #[test]
    fn test_error_lasts_longer_than_success() {
        let start = Instant::now();
        let mut toasts = Toasts::new();
        toasts.show_at(ToastKind::Error, "Please upload an audio file", start);

        toasts.expire_at(start + Duration::from_secs(3));
        assert!(toasts.current().is_some());

        toasts.expire_at(start + Duration::from_secs(4));
        assert!(toasts.current().is_none());
    }

    #[test]
    fn test_loading_stays_until_replaced() {
        let start = Instant::now();
        let mut toasts = Toasts::new();
        toasts.show_at(ToastKind::Loading, "Transcribing audio...", start);

        toasts.expire_at(start + Duration::from_secs(600));
        assert_eq!(toasts.current().unwrap().kind, ToastKind::Loading);

        toasts.dismiss();
        assert!(toasts.current().is_none());
    }
}
