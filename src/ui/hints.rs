//! Key binding hints for the footer and the help popup.

use crate::app::COMMAND_HELP;
use crate::config::KeyBindings;
use crate::config::keys::key_label;

const VIEW_HINTS: &str = "1:Library 2:Queue 3:Albums";

fn describe(binding: &str) -> &'static str {
    match binding {
        "up" => "Up",
        "down" => "Down",
        "enter" => "Play",
        "play_pause" => "Play/Pause",
        "next" => "Next",
        "prev" => "Prev",
        "shuffle" => "Shuffle",
        "repeat" => "Repeat",
        "search" => "Search",
        "volume_up" => "Vol+",
        "volume_down" => "Vol-",
        "queue" => "Queue",
        "quit" => "Quit",
        "fade_out" => "Fade",
        "seek_forward" => "Seek+",
        "seek_backward" => "Seek-",
        "remove" => "Remove",
        "pane_left" => "Albums pane",
        "pane_right" => "Tracks pane",
        _ => "?",
    }
}

fn labels(specs: &[String]) -> String {
    specs
        .iter()
        .map(|s| key_label(s))
        .collect::<Vec<_>>()
        .join("/")
}

/// One line listing every bound key plus the view switches.
pub fn status_hints(keys: &KeyBindings) -> String {
    let mut parts: Vec<String> = keys
        .entries()
        .iter()
        .filter(|(_, specs)| !specs.is_empty())
        .map(|(name, specs)| format!("{}:{}", labels(specs), describe(name)))
        .collect();
    parts.push(VIEW_HINTS.to_string());
    parts.join(" | ")
}

pub fn help_text(keys: &KeyBindings) -> String {
    let mut lines = vec!["Keys:".to_string()];
    for (name, specs) in keys.entries() {
        if specs.is_empty() {
            continue;
        }
        lines.push(format!("  {:<14} {}", labels(specs), describe(name)));
    }
    lines.push(format!("  {:<14} {}", ":", "Command"));
    lines.push(format!("  {:<14} {}", "1/2/3", "Library/Queue/Albums view"));
    lines.push(String::new());
    lines.push("Commands:".to_string());
    for (cmd, what) in COMMAND_HELP {
        lines.push(format!("  {cmd:<14} {what}"));
    }
    lines.join("\n")
}
