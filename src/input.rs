//! Input normalisation: keyboard and pointer events become `InputEvent`s,
//! pointer pixels become terminal cells, and cells are hit-tested against
//! the targets registered during the last render.

use ratzilla::ratatui::layout::Rect;

/// Everything the app reacts to, independent of the device it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A printable key. Tab and Enter arrive as `'\t'` and `'\n'`.
    Key(char),
    /// A tap on a registered target, identified by its action ID.
    Click(u16),
    /// An arrow key, as a step in terminal cells.
    Nudge { dx: i16, dy: i16 },
}

/// A region on screen that can be tapped/clicked to trigger an action.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Hit region in terminal cells.
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets from the last render plus the terminal size they were laid out for.
#[derive(Debug, Default)]
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame at the given terminal size.
    pub fn begin_frame(&mut self, area: Rect) {
        self.terminal_cols = area.width;
        self.terminal_rows = area.height;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        if rect.width > 0 && rect.height > 0 {
            self.targets.push(ClickTarget { rect, action_id });
        }
    }

    /// A full-width, one-row target, ignored when `row` lies outside `area`.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.bottom() {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Targets for a row of tab labels. `labels` holds each label's display
    /// width and action ID. A tab owns its label plus the separator that
    /// follows it; the last tab runs to the right edge of `area`.
    pub fn add_tab_targets(&mut self, labels: &[(u16, u16)], separator_width: u16, area: Rect) {
        let right_edge = area.right();
        let mut x = area.x;
        for (i, &(width, action_id)) in labels.iter().enumerate() {
            if x >= right_edge {
                break;
            }
            let end = if i + 1 == labels.len() {
                right_edge
            } else {
                (x + width + separator_width).min(right_edge)
            };
            self.add_click_target(Rect::new(x, area.y, end - x, area.height.max(1)), action_id);
            x = end;
        }
    }

    /// Action at a cell. Later targets sit on top of earlier ones.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets
            .iter()
            .rev()
            .find(|t| {
                col >= t.rect.x && col < t.rect.right() && row >= t.rect.y && row < t.rect.bottom()
            })
            .map(|t| t.action_id)
    }
}

/// Convert a pixel offset inside the grid element to a cell index along one
/// axis. `None` when outside the grid or the grid has no size.
pub fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 || offset >= extent {
        return None;
    }
    let cell = (offset * cells as f64 / extent) as u16;
    Some(cell.min(cells - 1))
}
