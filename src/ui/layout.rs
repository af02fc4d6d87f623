//! Application frame: title bar, navigation sidebar and content area.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState},
};

pub const APP_TITLE: &str = "Transcribe App";

/// Sidebar width in columns.
pub const SIDEBAR_WIDTH: u16 = 26;

/// Terminals at least this wide keep the sidebar docked.
pub const WIDE_MIN_WIDTH: u16 = 80;

const ACCENT: Color = Color::Rgb(59, 130, 246);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Page {
    #[default]
    Record,
    Upload,
}

impl Page {
    pub fn next(self) -> Self {
        match self {
            Self::Record => Self::Upload,
            Self::Upload => Self::Record,
        }
    }
}

pub struct MenuItem {
    pub label: &'static str,
    pub page: Page,
}

pub const MENU_ITEMS: &[MenuItem] = &[
    MenuItem {
        label: "Record Audio",
        page: Page::Record,
    },
    MenuItem {
        label: "Upload Audio",
        page: Page::Upload,
    },
];

pub fn is_wide(width: u16) -> bool {
    width >= WIDE_MIN_WIDTH
}

/// Regions of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub sidebar: Option<Rect>,
    pub content: Rect,
}

/// Navigation sidebar.
///
/// Docked on wide terminals. On narrow ones it is hidden until opened with
/// Ctrl+B and then drawn as an overlay over the content.
#[derive(Debug, Default)]
pub struct Sidebar {
    open: bool,
    selected: usize,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Opens the sidebar with the cursor on `active`, or closes it.
    pub fn toggle(&mut self, active: Page) {
        self.open = !self.open;
        if self.open {
            self.selected = MENU_ITEMS
                .iter()
                .position(|item| item.page == active)
                .unwrap_or(0);
        }
    }

    /// Handles a key while the sidebar is open.
    ///
    /// Returns the chosen page when an item is picked; picking or Esc closes the sidebar.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Page> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.checked_sub(1).unwrap_or(MENU_ITEMS.len() - 1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % MENU_ITEMS.len();
            }
            KeyCode::Enter => {
                self.open = false;
                return MENU_ITEMS.get(self.selected).map(|item| item.page);
            }
            KeyCode::Esc => self.open = false,
            _ => {}
        }
        None
    }

    /// Splits the frame below the title bar into sidebar and content.
    pub fn regions(&self, area: Rect) -> Regions {
        if is_wide(area.width) {
            let [sidebar, content] =
                Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                    .areas(area);
            Regions {
                sidebar: Some(sidebar),
                content,
            }
        } else {
            let sidebar = self.open.then(|| Rect {
                width: SIDEBAR_WIDTH.min(area.width),
                ..area
            });
            Regions {
                sidebar,
                content: area,
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, active: Page) {
        let items: Vec<ListItem> = MENU_ITEMS
            .iter()
            .map(|item| {
                let style = if item.page == active {
                    Style::default().fg(ACCENT).bold()
                } else {
                    Style::default()
                };
                ListItem::new(format!(" {}", item.label)).style(style)
            })
            .collect();

        let border_style = if self.open {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border_style),
            )
            .highlight_symbol("›");

        let mut state = ListState::default();
        if self.open {
            state.select(Some(self.selected));
        }

        frame.render_widget(Clear, area);
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// Draws the title bar with the key hints for the current terminal width.
pub fn render_title(frame: &mut Frame, area: Rect) {
    let hint = if is_wide(area.width) {
        "Tab switch page · Ctrl+B menu"
    } else {
        "Ctrl+B menu"
    };
    let title = Line::from(vec![
        Span::styled(format!(" {APP_TITLE} "), Style::default().fg(Color::White).bg(ACCENT).bold()),
        Span::raw("  "),
        Span::styled(hint, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(title, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_menu_items() {
        let labels: Vec<&str> = MENU_ITEMS.iter().map(|item| item.label).collect();
        assert_eq!(labels, vec!["Record Audio", "Upload Audio"]);
        assert_eq!(Page::Record.next(), Page::Upload);
        assert_eq!(Page::Upload.next(), Page::Record);
    }

    #[test]
    fn test_wide_terminal_docks_sidebar() {
        let sidebar = Sidebar::new();
        let regions = sidebar.regions(Rect::new(0, 0, 100, 30));

        assert_eq!(regions.sidebar, Some(Rect::new(0, 0, SIDEBAR_WIDTH, 30)));
        assert_eq!(regions.content, Rect::new(SIDEBAR_WIDTH, 0, 100 - SIDEBAR_WIDTH, 30));
    }

    #[test]
    fn test_narrow_terminal_hides_sidebar_until_toggled() {
        let mut sidebar = Sidebar::new();
        let area = Rect::new(0, 1, 60, 20);

        let regions = sidebar.regions(area);
        assert_eq!(regions.sidebar, None);
        assert_eq!(regions.content, area);

        sidebar.toggle(Page::Record);
        let regions = sidebar.regions(area);
        assert_eq!(regions.sidebar, Some(Rect::new(0, 1, SIDEBAR_WIDTH, 20)));
        assert_eq!(regions.content, area);
    }

    #[test]
    fn test_choosing_item_closes_overlay() {
        let mut sidebar = Sidebar::new();
        sidebar.toggle(Page::Record);

        assert_eq!(sidebar.handle_key(key(KeyCode::Down)), None);
        assert_eq!(sidebar.handle_key(key(KeyCode::Enter)), Some(Page::Upload));
        assert!(!sidebar.is_open());
    }

    #[test]
    fn test_escape_closes_without_navigating() {
        let mut sidebar = Sidebar::new();
        sidebar.toggle(Page::Upload);

        assert_eq!(sidebar.handle_key(key(KeyCode::Esc)), None);
        assert!(!sidebar.is_open());
    }

    #[test]
    fn test_toggle_starts_on_active_page() {
        let mut sidebar = Sidebar::new();
        sidebar.toggle(Page::Upload);
        assert_eq!(sidebar.handle_key(key(KeyCode::Enter)), Some(Page::Upload));
    }
}
