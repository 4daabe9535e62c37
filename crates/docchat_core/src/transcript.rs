/// The turn every fresh (or freshly cleared) transcript starts with.
pub const GREETING: &str =
    "Hello! Upload some documents to get started, then ask me questions about them.";

const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

/// One rendered message bubble. User turns never carry sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    speaker: Speaker,
    text: String,
    sources: Vec<String>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            sources: Vec::new(),
        }
    }

    pub fn bot(text: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.into(),
            sources,
        }
    }

    pub fn greeting() -> Self {
        Self::bot(GREETING, Vec::new())
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Display lines: sanitized text split on line breaks.
    pub fn display_lines(&self) -> Vec<String> {
        sanitize_for_display(&self.text)
            .split('\n')
            .map(ToOwned::to_owned)
            .collect()
    }

    /// `Sources: a, b` when the turn cites anything.
    pub fn sources_line(&self) -> Option<String> {
        if self.sources.is_empty() {
            return None;
        }
        let joined = self
            .sources
            .iter()
            .map(|source| sanitize_for_display(source).replace('\n', " "))
            .collect::<Vec<_>>()
            .join(", ");
        Some(format!("Sources: {joined}"))
    }
}

/// Strip terminal control sequences from untrusted text.
///
/// Line breaks survive (`\r\n` and lone `\r` become `\n`), tabs expand to
/// spaces, ANSI CSI/OSC sequences and every other control character are
/// dropped.
pub fn sanitize_for_display(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\n' => out.push('\n'),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\t' => out.extend(std::iter::repeat_n(' ', TAB_WIDTH)),
            '\u{1b}' => skip_escape_sequence(&mut chars),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out
}

fn skip_escape_sequence(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    match chars.next() {
        // CSI: parameters and intermediates, terminated by a byte in '@'..='~'.
        Some('[') => {
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        }
        // OSC: terminated by BEL or ST (ESC \).
        Some(']') => {
            while let Some(c) = chars.next() {
                if c == '\u{7}' {
                    break;
                }
                if c == '\u{1b}' {
                    if chars.peek() == Some(&'\\') {
                        chars.next();
                    }
                    break;
                }
            }
        }
        _ => {}
    }
}
