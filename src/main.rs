use std::{cell::RefCell, io, rc::Rc};

use card_clicker::clicker::config::GameConfig;
use card_clicker::clicker::ClickerApp;
use card_clicker::input::{pixel_to_cell, ClickState, InputEvent};
use card_clicker::logging;
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::{closure::Closure, JsCast};

#[cfg(target_arch = "wasm32")]
type Backend = card_clicker::clicker::save::LocalStorage;
#[cfg(not(target_arch = "wasm32"))]
type Backend = card_clicker::clicker::save::MemoryStorage;

/// Element holding an optional JSON override of the game tunables.
const CONFIG_ELEMENT_ID: &str = "card-clicker-config";

/// Query the grid container's bounding rect and convert pixel coordinates to a cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let document = web_sys::window()?.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_to_cell(mouse_x as f64 - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_to_cell(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

fn load_config() -> GameConfig {
    let json = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|e| e.text_content());
    match json {
        Some(json) if !json.trim().is_empty() => GameConfig::from_json(&json).unwrap_or_else(|e| {
            log::warn!("Card Clicker: ignoring invalid config: {e}");
            GameConfig::default()
        }),
        _ => GameConfig::default(),
    }
}

/// Save whenever the page is hidden or unloaded, between autosaves too.
fn save_on_page_hide(app: &Rc<RefCell<ClickerApp<Backend>>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let app = app.clone();
    let cb = Closure::wrap(Box::new(move || {
        app.borrow_mut().save();
    }) as Box<dyn FnMut()>);
    for event in ["pagehide", "beforeunload"] {
        if let Err(e) = window.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
            log::warn!("Card Clicker: cannot listen for {event}: {e:?}");
        }
    }
    // The listener lives as long as the page.
    cb.forget();
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logging::init();

    let seed = (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64;
    let app = Rc::new(RefCell::new(ClickerApp::new(
        load_config(),
        seed,
        Backend::default(),
    )));
    save_on_page_hide(&app);
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let app = app.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                    .and_then(|(col, row)| cs.hit_test(col, row))
            };

            if let Some(action_id) = action {
                app.borrow_mut().handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let app = app.clone();
        move |key_event| {
            let event = match key_event.code {
                KeyCode::Char(c) => InputEvent::Key(c),
                KeyCode::Tab => InputEvent::Key('\t'),
                KeyCode::Enter => InputEvent::Key('\n'),
                KeyCode::Left => InputEvent::Nudge { dx: -1, dy: 0 },
                KeyCode::Right => InputEvent::Nudge { dx: 1, dy: 0 },
                KeyCode::Up => InputEvent::Nudge { dx: 0, dy: -1 },
                KeyCode::Down => InputEvent::Nudge { dx: 0, dy: 1 },
                _ => return,
            };
            app.borrow_mut().handle_input(&event);
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let area = f.area();
            click_state.borrow_mut().begin_frame(area);

            let mut app = app.borrow_mut();
            app.frame(now_ms(), area);
            app.render(f, area, &click_state);
        }
    });

    Ok(())
}
