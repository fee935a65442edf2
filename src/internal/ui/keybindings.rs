use crate::internal::ui::app::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Binding contexts. `Page` covers normal browsing of the portfolio page;
/// `Global` bindings apply everywhere as a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyBindingContext {
    Global,
    Page,
}

/// Maps key events to actions per context.
#[derive(Debug, Clone, Default)]
pub struct KeyBindingMap {
    global: HashMap<KeyEvent, Action>,
    page: HashMap<KeyEvent, Action>,
}

impl KeyBindingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the action for a key, checking the context first and falling
    /// back to global bindings.
    pub fn get_action(&self, key: &KeyEvent, context: KeyBindingContext) -> Option<Action> {
        let context_map = match context {
            KeyBindingContext::Global => &self.global,
            KeyBindingContext::Page => &self.page,
        };

        if let Some(action) = context_map.get(key) {
            return Some(action.clone());
        }

        self.global.get(key).cloned()
    }

    pub fn add_binding(&mut self, context: KeyBindingContext, key: KeyEvent, action: Action) {
        let map = match context {
            KeyBindingContext::Global => &mut self.global,
            KeyBindingContext::Page => &mut self.page,
        };
        map.insert(key, action);
    }

    /// Merge custom keybindings from configuration over the defaults.
    pub fn merge_config(&mut self, config: &crate::config::KeyBindingConfig) {
        let mut merge = |ctx: KeyBindingContext, bindings: &HashMap<String, Action>| {
            for (key_str, action) in bindings {
                if let Some(key_event) = parse_key_str(key_str) {
                    self.add_binding(ctx, key_event, action.clone());
                } else {
                    tracing::warn!("Invalid key string in config: {}", key_str);
                }
            }
        };

        merge(KeyBindingContext::Global, &config.global);
        merge(KeyBindingContext::Page, &config.page);
    }
}

/// Parse a key string into a KeyEvent.
/// Supported formats:
/// - Single char: "j", "k", "1"
/// - Special keys: "Enter", "Tab", "Esc", "Up", "Down", "Left", "Right"
/// - Function keys: "F1" through "F12"
/// - With modifiers: "Ctrl+C", "Shift+Tab"
pub fn parse_key_str(key_str: &str) -> Option<KeyEvent> {
    let parts: Vec<&str> = key_str.split('+').collect();

    let mut modifiers = KeyModifiers::empty();
    let key_part = if parts.len() > 1 {
        for modifier in &parts[..parts.len() - 1] {
            match modifier.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                "alt" => modifiers |= KeyModifiers::ALT,
                _ => return None,
            }
        }
        parts[parts.len() - 1]
    } else {
        parts[0]
    };

    let code = match key_part {
        "Enter" => KeyCode::Enter,
        "Tab" => KeyCode::Tab,
        "Esc" => KeyCode::Esc,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Backspace" => KeyCode::Backspace,
        "Delete" => KeyCode::Delete,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        s if s.len() > 1 && s.starts_with('F') => {
            let n: u8 = s[1..].parse().ok()?;
            if (1..=12).contains(&n) {
                KeyCode::F(n)
            } else {
                return None;
            }
        }
        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };

    Some(KeyEvent::new(code, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_char() {
        let key = parse_key_str("j").unwrap();
        assert_eq!(key.code, KeyCode::Char('j'));
        assert_eq!(key.modifiers, KeyModifiers::empty());
    }

    #[test]
    fn parses_special_key() {
        let key = parse_key_str("Enter").unwrap();
        assert_eq!(key.code, KeyCode::Enter);
    }

    #[test]
    fn parses_function_keys() {
        assert_eq!(parse_key_str("F2").unwrap().code, KeyCode::F(2));
        assert_eq!(parse_key_str("F12").unwrap().code, KeyCode::F(12));
        assert!(parse_key_str("F13").is_none());
        assert!(parse_key_str("F0").is_none());
    }

    #[test]
    fn parses_with_modifier() {
        let key = parse_key_str("Ctrl+C").unwrap();
        assert_eq!(key.code, KeyCode::Char('C'));
        assert!(key.modifiers.contains(KeyModifiers::CONTROL));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_key_str("NotAKey").is_none());
        assert!(parse_key_str("Hyper+x").is_none());
        assert!(parse_key_str("").is_none());
    }

    #[test]
    fn global_bindings_apply_in_any_context() {
        let mut map = KeyBindingMap::new();
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::empty());

        map.add_binding(KeyBindingContext::Global, key, Action::Quit);

        assert!(matches!(
            map.get_action(&key, KeyBindingContext::Page),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn context_binding_overrides_global() {
        let mut map = KeyBindingMap::new();
        let key = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::empty());

        map.add_binding(KeyBindingContext::Global, key, Action::Quit);
        map.add_binding(KeyBindingContext::Page, key, Action::BackToTop);

        assert!(matches!(
            map.get_action(&key, KeyBindingContext::Page),
            Some(Action::BackToTop)
        ));
        assert!(matches!(
            map.get_action(&key, KeyBindingContext::Global),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn merge_config_overrides_and_reports_bad_keys() {
        let mut map = KeyBindingMap::new();
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::empty());
        map.add_binding(KeyBindingContext::Page, key, Action::ScrollDown);

        let mut config = crate::config::KeyBindingConfig::default();
        config.page.insert("x".to_string(), Action::ScrollUp);
        config.page.insert("Bogus+Key".to_string(), Action::Quit);

        map.merge_config(&config);

        assert!(matches!(
            map.get_action(&key, KeyBindingContext::Page),
            Some(Action::ScrollUp)
        ));
    }
}
