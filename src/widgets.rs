//! Clickable UI components.
//!
//! Each component renders itself and registers its own click targets, so
//! the hit regions always match what is on screen.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

/// A single row of tab labels.
///
/// ```ignore
/// TabBar::new(" │ ")
///     .tab("Units", style(0), TAB_UNITS)
///     .tab("Upgrades", style(1), TAB_UPGRADES)
///     .render(f, area, &mut cs);
/// ```
pub struct TabBar<'a> {
    tabs: Vec<(String, Style, u16)>,
    separator: &'a str,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            separator,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.tabs.push((label.into(), style, action_id));
        self
    }

    /// `(display width, action id)` of each padded label.
    fn label_widths(&self) -> Vec<(u16, u16)> {
        self.tabs
            .iter()
            .map(|(label, _, id)| (Line::from(format!(" {label} ")).width() as u16, *id))
            .collect()
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let widths = self.label_widths();
        let separator_width = Line::from(self.separator).width() as u16;

        let mut spans = Vec::with_capacity(self.tabs.len() * 2);
        for (i, (label, style, _)) in self.tabs.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    self.separator,
                    Style::default().fg(Color::DarkGray),
                ));
            }
            spans.push(Span::styled(format!(" {label} "), style));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
        cs.add_tab_targets(&widths, separator_width, area);
    }
}

/// Lines paired with the action each clickable one triggers.
///
/// Rows are resolved when targets are registered, so inserting a line above
/// a clickable one moves its target with it.
#[derive(Default)]
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line index, action id)`
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len() as u16, action_id));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Register a row target for each clickable line visible in `inner`
    /// (the content area inside any borders) after scrolling by `scroll` rows.
    pub fn register_targets(&self, inner: Rect, scroll: u16, cs: &mut ClickState) {
        for &(index, action_id) in &self.actions {
            let Some(visible) = index.checked_sub(scroll) else {
                continue;
            };
            if visible >= inner.height {
                continue;
            }
            cs.add_row_target(inner, inner.y + visible, action_id);
        }
    }

    /// Render inside `block`, scrolled by `scroll` rows, and register targets.
    pub fn render(self, f: &mut Frame, area: Rect, block: Block<'a>, scroll: u16, cs: &mut ClickState) {
        let inner = block.inner(area);
        self.register_targets(inner, scroll, cs);
        let paragraph = Paragraph::new(self.lines).block(block).scroll((scroll, 0));
        f.render_widget(paragraph, area);
    }
}

/// Scroll offset that keeps `cursor` visible in a `height`-row viewport.
pub fn scroll_to(cursor: usize, height: u16) -> u16 {
    if height == 0 {
        return 0;
    }
    cursor.saturating_sub(height as usize - 1) as u16
}
