use std::time::Duration;

use ratatui::style::Color;

/// Input poll timeout; also the render/notification tick.
pub const TICK_INTERVAL: Duration = Duration::from_millis(75);

pub const APP_TITLE: &str = " Document Q&A ";
pub const INPUT_TITLE: &str = " Ask a question ";
pub const PICKER_TITLE: &str = " Upload documents ";
pub const PICKER_HINT: &str = "Paths separated by ';'. Enter uploads, Esc cancels.";
pub const CONFIRM_TITLE: &str = " Clear all data ";
pub const CONFIRM_HINT: &str = "[y] Yes    [n] No";
pub const SCROLLED_HINT: &str = " more below (PgDn) ";

pub const KEY_HINTS: &[(&str, &str)] = &[
    ("Enter", "Send"),
    ("Ctrl+U", "Upload"),
    ("Ctrl+L", "Clear data"),
    ("PgUp/PgDn", "Scroll"),
    ("Ctrl+C", "Quit"),
];

pub const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Bubbles never use more than this share of the transcript width.
pub const BUBBLE_WIDTH_PERCENT: u16 = 80;
pub const SCROLL_PAGE: usize = 10;

pub const USER_FG: Color = Color::Rgb(0xFF, 0xFF, 0xFF);
pub const USER_BG: Color = Color::Rgb(0x4F, 0x46, 0xE5);
pub const BOT_FG: Color = Color::Rgb(0x1E, 0x40, 0xAF);
pub const BOT_BG: Color = Color::Rgb(0xDB, 0xEA, 0xFE);
pub const SOURCES_FG: Color = Color::Rgb(0x6B, 0x72, 0x80);

pub const INFO_BG: Color = Color::Rgb(0x25, 0x63, 0xEB);
pub const SUCCESS_BG: Color = Color::Rgb(0x16, 0xA3, 0x4A);
pub const ERROR_BG: Color = Color::Rgb(0xDC, 0x26, 0x26);
pub const PENDING_FG: Color = Color::Rgb(0xCA, 0x8A, 0x04);
