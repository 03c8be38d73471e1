//! Card Clicker rendering: the board with cards, ball and payout popups,
//! the shop, and a status line.
//!
//! The engine works in pixels; the board maps them onto cells at a fixed
//! `PX_PER_COL` × `PX_PER_ROW` so card and ball sizes keep their proportions.

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;
use crate::widgets::{scroll_to, ClickableList, TabBar};

use super::actions::*;
use super::agent::Arena;
use super::catalog::TrackId;
use super::engine::ClickerGame;
use super::format::format_money;
use super::view::{ShopTab, ViewState};

pub const PX_PER_COL: f64 = 10.0;
pub const PX_PER_ROW: f64 = 20.0;

/// Shop column width on wide screens.
const SHOP_WIDTH: u16 = 40;
/// Upgrade description text width: shop minus borders and indent.
const DESCRIPTION_WIDTH: usize = SHOP_WIDTH as usize - 6;

pub struct ScreenLayout {
    pub board: Rect,
    pub shop: Rect,
    pub status: Rect,
}

/// Split the screen. Wide terminals put the shop beside the board, narrow
/// ones stack it underneath.
pub fn layout(area: Rect) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(1)])
        .split(area);
    let main = rows[0];
    let status = rows[1];

    let parts = if area.width >= 80 {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(SHOP_WIDTH)])
            .split(main)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main)
    };

    ScreenLayout {
        board: parts[0],
        shop: parts[1],
        status,
    }
}

fn board_block<'a>(title: Line<'a>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
}

/// Cells inside the board border.
pub fn board_inner(board: Rect) -> Rect {
    board_block(Line::default()).inner(board)
}

/// Arena size in engine pixels for a board content area.
pub fn arena_for(inner: Rect) -> Arena {
    Arena::new(
        inner.width as f64 * PX_PER_COL,
        inner.height as f64 * PX_PER_ROW,
    )
}

/// Cell rectangle covering a pixel box, clipped to `inner`.
fn px_rect(inner: Rect, x: f64, y: f64, width: f64, height: f64) -> Rect {
    let col = inner.x.saturating_add((x.max(0.0) / PX_PER_COL) as u16);
    let row = inner.y.saturating_add((y.max(0.0) / PX_PER_ROW) as u16);
    let w = ((width / PX_PER_COL).round() as u16).max(1);
    let h = ((height / PX_PER_ROW).round() as u16).max(1);
    Rect::new(col, row, w, h).intersection(inner)
}

pub fn render(game: &ClickerGame, view: &ViewState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let screen = layout(area);
    render_board(game, view, f, screen.board, cs);
    render_shop(game, view, f, screen.shop, cs);
    render_status(view, f, screen.status);
}

fn render_board(game: &ClickerGame, view: &ViewState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let economy = game.economy();
    let title = Line::from(vec![
        Span::styled(" Card Clicker ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(" ${} ", format_money(economy.currency())),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]);
    let block = board_block(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let config = game.config();
    for (i, unit) in economy.units().iter().enumerate() {
        let rect = px_rect(inner, unit.x, unit.y, config.card_width, config.card_height);
        if rect.is_empty() {
            continue;
        }
        let unit_type = economy.catalog().unit_type(&unit.type_id);
        let name = unit_type.map_or(unit.type_id.as_str(), |t| t.name);
        let value = unit_type.map_or(0.0, |t| t.activation_value);
        let selected = view.selected == Some(unit.instance_id);
        let cooling = game.agent().is_cooling(unit.instance_id);

        let border = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if cooling {
            Style::default().fg(Color::LightMagenta)
        } else {
            Style::default().fg(Color::White)
        };
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("+${}", format_money(value)),
                Style::default().fg(Color::Green),
            )),
            Line::from(Span::styled(
                format!("#{}", unit.instance_id),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(name, border)),
        );
        f.render_widget(card, rect);
        cs.add_click_target(rect, ACTIVATE_CARD_BASE + i as u16);
    }

    let agent = game.agent();
    if agent.is_active() {
        let rect = px_rect(inner, agent.x, agent.y, agent.size(), agent.size());
        if !rect.is_empty() {
            let row = "●".repeat(rect.width as usize);
            let lines: Vec<Line> = (0..rect.height).map(|_| Line::from(row.clone())).collect();
            f.render_widget(
                Paragraph::new(lines).style(Style::default().fg(Color::Magenta)),
                rect,
            );
        }
    }

    for popup in &view.popups {
        let text_width = Line::from(popup.text.as_str()).width() as f64 * PX_PER_COL;
        let rect = px_rect(inner, popup.x, popup.current_y(), text_width, PX_PER_ROW);
        if rect.is_empty() {
            continue;
        }
        let color = if popup.manual { Color::Yellow } else { Color::Green };
        f.render_widget(
            Paragraph::new(Span::styled(
                popup.text.as_str(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            rect,
        );
    }
}

fn render_shop(game: &ClickerGame, view: &ViewState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Shop ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 2 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let tab_style = |tab: ShopTab| {
        if view.tab == tab {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    };
    TabBar::new(" │ ")
        .tab("Units", tab_style(ShopTab::Units), TAB_UNITS)
        .tab("Upgrades", tab_style(ShopTab::Upgrades), TAB_UPGRADES)
        .render(f, chunks[0], cs);

    let list = match view.tab {
        ShopTab::Units => unit_rows(game, view),
        ShopTab::Upgrades => upgrade_rows(game, view),
    };
    let scroll = scroll_to(view.cursor, chunks[1].height);
    list.render(f, chunks[1], Block::default(), scroll, cs);
}

fn cursor_marker(active: bool) -> Span<'static> {
    if active {
        Span::styled("▶ ", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("  ")
    }
}

fn price_style(affordable: bool) -> Style {
    if affordable {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn unit_rows<'a>(game: &'a ClickerGame, view: &ViewState) -> ClickableList<'a> {
    let economy = game.economy();
    let mut cl = ClickableList::new();
    for (i, unit_type) in economy.catalog().units.iter().enumerate() {
        let cost = economy.unit_cost(unit_type.id).unwrap_or(unit_type.base_cost);
        let affordable = economy.currency() >= cost;
        let owned = economy.count_of(unit_type.id);
        let line = Line::from(vec![
            cursor_marker(view.cursor == i),
            Span::styled(
                format!("{:<12}", unit_type.name),
                Style::default().fg(if affordable { Color::White } else { Color::Gray }),
            ),
            Span::styled(format!("${:<9}", format_money(cost)), price_style(affordable)),
            Span::styled(format!("x{owned}"), Style::default().fg(Color::Cyan)),
        ]);
        cl.push_clickable(line, BUY_UNIT_BASE + i as u16);
    }
    cl
}

fn upgrade_rows<'a>(game: &'a ClickerGame, view: &ViewState) -> ClickableList<'a> {
    let economy = game.economy();
    let mut cl = ClickableList::new();
    for (i, &track) in TrackId::all().iter().enumerate() {
        let level = economy.upgrade_level(track);
        let max = economy.catalog().track(track).map_or(0, |t| t.max_level());
        let mut spans = vec![
            cursor_marker(view.cursor == i),
            Span::styled(
                format!("{:<6}{}/{} ", track.label(), level, max),
                Style::default().fg(Color::White),
            ),
        ];
        match economy.next_upgrade(track) {
            Some(next) => {
                let affordable = economy.currency() >= next.cost;
                spans.push(Span::styled(
                    format!("{} ", next.name),
                    Style::default().fg(Color::Gray),
                ));
                spans.push(Span::styled(
                    format!("${}", format_money(next.cost)),
                    price_style(affordable),
                ));
            }
            None => spans.push(Span::styled("MAX", Style::default().fg(Color::Yellow))),
        }
        cl.push_clickable(Line::from(spans), BUY_UPGRADE_BASE + i as u16);
        if view.cursor == i {
            if let Some(next) = economy.next_upgrade(track) {
                for text in wrap_words(next.description, DESCRIPTION_WIDTH) {
                    cl.push(Line::from(Span::styled(
                        format!("    {text}"),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
        }
    }

    let click = economy.click_multiplier();
    cl.push(Line::from(Span::styled(
        format!("  click x{click}  ball {}", describe_agent(game)),
        Style::default().fg(Color::DarkGray),
    )));
    cl.push(Line::default());
    if view.confirm_reset {
        cl.push_clickable(
            Line::from(Span::styled(
                " [y] Yes, erase all progress",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            RESET_CONFIRM,
        );
    } else {
        cl.push_clickable(
            Line::from(Span::styled(" [R] Reset game", Style::default().fg(Color::DarkGray))),
            RESET,
        );
    }
    cl
}

/// Greedy word wrap; a word longer than `width` gets a line of its own.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn describe_agent(game: &ClickerGame) -> String {
    let agent = game.agent();
    if agent.is_active() {
        format!("{}px/s {}px", agent.speed(), agent.size())
    } else {
        "locked".to_string()
    }
}

fn render_status(view: &ViewState, f: &mut Frame, area: Rect) {
    let line = if view.confirm_reset {
        Line::from(Span::styled(
            "Reset all progress? y = yes, any other key cancels",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if let Some(message) = view.message() {
        Line::from(Span::styled(message, Style::default().fg(Color::Yellow)))
    } else {
        Line::from(Span::styled(
            "Space:click  Tab:select  ←↑↓→:move  w/s:cursor  Enter:buy  u:tab  R:reset",
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(line), area);
}
