use crate::internal::ui::app::Action;
use crate::internal::ui::keybindings::{KeyBindingContext, KeyBindingMap};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Create default keybindings for the application
pub fn create_default_keybindings() -> KeyBindingMap {
    let mut map = KeyBindingMap::new();

    add_global_bindings(&mut map);
    add_page_bindings(&mut map);

    map
}

fn add_global_bindings(map: &mut KeyBindingMap) {
    let ctx = KeyBindingContext::Global;

    // Help
    map.add_binding(ctx, key('?'), Action::ShowHelp);

    // Quit
    map.add_binding(ctx, key('q'), Action::Quit);

    // Theme
    map.add_binding(ctx, key('t'), Action::ToggleTheme);
}

fn add_page_bindings(map: &mut KeyBindingMap) {
    let ctx = KeyBindingContext::Page;

    // Scrolling
    map.add_binding(ctx, key('j'), Action::ScrollDown);
    map.add_binding(ctx, key('k'), Action::ScrollUp);
    map.add_binding(ctx, key_code(KeyCode::Down), Action::ScrollDown);
    map.add_binding(ctx, key_code(KeyCode::Up), Action::ScrollUp);
    map.add_binding(ctx, key_code(KeyCode::PageDown), Action::PageDown);
    map.add_binding(ctx, key_code(KeyCode::PageUp), Action::PageUp);
    map.add_binding(ctx, key('g'), Action::BackToTop);
    map.add_binding(ctx, key_code(KeyCode::Home), Action::BackToTop);
    map.add_binding(ctx, key('G'), Action::BottomOfPage);
    map.add_binding(ctx, key_code(KeyCode::End), Action::BottomOfPage);

    // Section jumps; labels 1-6 match the nav order in the top bar
    for (i, c) in ('1'..='6').enumerate() {
        map.add_binding(ctx, key(c), Action::JumpToSection(i));
    }

    // Project grid
    map.add_binding(ctx, key('c'), Action::NextChip);
    map.add_binding(ctx, key('C'), Action::PrevChip);
    map.add_binding(ctx, key('n'), Action::NextProject);
    map.add_binding(ctx, key('N'), Action::PrevProject);
    map.add_binding(ctx, key('o'), Action::OpenProjectLink);
    map.add_binding(ctx, key_code(KeyCode::Enter), Action::OpenProjectLink);
    map.add_binding(ctx, key('Q'), Action::ClearSearch);

    // Contact form
    map.add_binding(ctx, key('f'), Action::FocusForm);

    // Esc quits from normal browsing
    map.add_binding(ctx, key_code(KeyCode::Esc), Action::Quit);

    // Search entry ('/') is handled directly in input handling since it
    // switches the input mode.
}

/// Helper to create a simple char key event
fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
}

/// Helper to create a key event from KeyCode
fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}
