//! Key spec parsing shared by config validation and the runtime key map.

use crossterm::event::KeyCode;

/// Parse a key spec such as `"up"`, `"space"` or `"q"` into a `KeyCode`.
///
/// Named keys are matched case-insensitively; a single character maps to
/// itself (case-sensitive, so `"Q"` is shift+q).
pub fn parse_key(spec: &str) -> Option<KeyCode> {
    let mut chars = spec.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }

    let code = match spec.trim().to_ascii_lowercase().as_str() {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        _ => return None,
    };
    Some(code)
}

/// Short label for a key spec, as shown in the status line and help text.
pub fn key_label(spec: &str) -> String {
    match parse_key(spec) {
        Some(KeyCode::Up) => "↑".to_string(),
        Some(KeyCode::Down) => "↓".to_string(),
        Some(KeyCode::Left) => "←".to_string(),
        Some(KeyCode::Right) => "→".to_string(),
        Some(KeyCode::Char(' ')) => "Space".to_string(),
        Some(KeyCode::Char(c)) => c.to_string(),
        Some(KeyCode::Enter) => "Enter".to_string(),
        Some(KeyCode::Esc) => "Esc".to_string(),
        Some(KeyCode::Backspace) => "Backspace".to_string(),
        Some(KeyCode::Delete) => "Del".to_string(),
        Some(KeyCode::Tab) => "Tab".to_string(),
        Some(KeyCode::Home) => "Home".to_string(),
        Some(KeyCode::End) => "End".to_string(),
        Some(KeyCode::PageUp) => "PgUp".to_string(),
        Some(KeyCode::PageDown) => "PgDn".to_string(),
        _ => spec.to_string(),
    }
}
