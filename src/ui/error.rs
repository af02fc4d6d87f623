//! Full-screen error message shown when the app cannot start.

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph, Wrap},
};
use std::io::{self, Stdout};
use std::time::Duration;

const ERROR_BG: Color = Color::Rgb(127, 29, 29);

/// Red full-screen panel with a centered message, dismissed by any key.
pub struct ErrorScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl ErrorScreen {
    /// # Errors
    /// - If raw mode or the alternate screen cannot be entered
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    /// Shows `message` until a key is pressed.
    ///
    /// # Errors
    /// - If rendering or reading terminal events fails
    pub fn show_error(&mut self, title: &str, message: &str) -> anyhow::Result<()> {
        loop {
            self.terminal.draw(|frame| {
                let area = frame.area();
                frame.render_widget(Block::default().style(Style::default().bg(ERROR_BG)), area);

                let text = vec![
                    Line::from(title.to_string()).bold(),
                    Line::default(),
                    Line::from(message.to_string()),
                    Line::default(),
                    Line::from("Press any key to exit").italic(),
                ];
                let height = (text.len() as u16 + 4).min(area.height);
                let width = area.width * 8 / 10;
                let centered = Rect {
                    x: area.x + (area.width - width) / 2,
                    y: area.y + area.height.saturating_sub(height) / 2,
                    width,
                    height,
                };

                frame.render_widget(
                    Paragraph::new(text)
                        .style(Style::default().fg(Color::White).bg(ERROR_BG))
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true }),
                    centered,
                );
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// # Errors
    /// - If the terminal cannot be restored
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for ErrorScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
