//! Loading spinner widget.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

const SM_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const MD_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];
const LG_FRAMES: &[&str] = &["( ●    )", "(  ●   )", "(   ●  )", "(    ● )", "(   ●  )", "(  ●   )"];

const SPINNER_COLOR: Color = Color::Rgb(59, 130, 246);
const CAPTION_COLOR: Color = Color::Rgb(148, 163, 184);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinnerSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl SpinnerSize {
    fn frames(&self) -> &'static [&'static str] {
        match self {
            Self::Sm => SM_FRAMES,
            Self::Md => MD_FRAMES,
            Self::Lg => LG_FRAMES,
        }
    }
}

/// Animated spinner with an optional caption shown below the glyph.
#[derive(Debug, Clone, Default)]
pub struct LoadingSpinner {
    size: SpinnerSize,
    text: Option<String>,
    frame: usize,
}

impl LoadingSpinner {
    pub fn new(size: SpinnerSize) -> Self {
        Self {
            size,
            text: None,
            frame: 0,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Advances the animation by one frame.
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % self.size.frames().len();
    }

    pub fn glyph(&self) -> &'static str {
        self.size.frames()[self.frame % self.size.frames().len()]
    }

    /// Rows needed to draw the spinner and its caption.
    pub fn height(&self) -> u16 {
        if self.text.is_some() {
            2
        } else {
            1
        }
    }
}

impl Widget for &LoadingSpinner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![Line::from(Span::styled(
            self.glyph(),
            Style::default().fg(SPINNER_COLOR).add_modifier(Modifier::BOLD),
        ))];
        if let Some(text) = &self.text {
            lines.push(Line::from(Span::styled(
                text.clone(),
                Style::default().fg(CAPTION_COLOR),
            )));
        }
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
