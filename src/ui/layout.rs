use tui::layout::{Constraint, Layout, Rect, Size};

pub const TAB_BAR_HEIGHT: u16 = 3;
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Screen regions carved out once per frame: tab bar (with a spinner cell on
/// the right), the main sheet area, and a one-line status bar.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    pub status_bar: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        Self::compute(Rect::new(0, 0, size.width, size.height), false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool) {
        *self = Self::compute(area, full_screen);
    }

    /// Full-screen drops the chrome and hands the sheet the whole terminal.
    fn compute(area: Rect, full_screen: bool) -> Self {
        if full_screen {
            return Self { tab_bar: [Rect::ZERO; 2], main: area, status_bar: Rect::ZERO };
        }

        let [tab, main, status_bar] = Layout::vertical([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .areas(area);
        let tab_bar = Layout::horizontal([Constraint::Fill(1), Constraint::Length(6)]).areas(tab);

        Self { tab_bar, main, status_bar }
    }
}
