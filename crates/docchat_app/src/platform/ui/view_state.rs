//! Terminal-only state that the core does not model: cursors, scrolling, picker draft.

use super::input_buffer::InputBuffer;

#[derive(Debug, Default)]
pub struct UiState {
    pub query: InputBuffer,
    pub picker: FilePicker,
    pub scroll: TranscriptScroll,
    pub spinner_frame: usize,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt the core's idea of the query text (e.g. cleared after sending).
    pub fn sync_query(&mut self, input: &str) {
        if self.query.text() != input {
            self.query.set_text(input);
        }
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

/// The file-selection prompt. The draft survives closing the prompt until the
/// core asks for a reset after an upload settles.
#[derive(Debug, Default)]
pub struct FilePicker {
    pub open: bool,
    pub draft: InputBuffer,
}

impl FilePicker {
    pub fn open(&mut self) {
        self.open = true;
        self.draft.move_end();
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn reset(&mut self) {
        self.open = false;
        self.draft.clear();
    }
}

/// Scroll position of the transcript, measured in wrapped lines from the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptScroll {
    offset: usize,
    max_offset: usize,
    follow: bool,
    seen_revision: Option<u64>,
}

impl Default for TranscriptScroll {
    fn default() -> Self {
        Self {
            offset: 0,
            max_offset: 0,
            follow: true,
            seen_revision: None,
        }
    }
}

impl TranscriptScroll {
    /// Recompute the offset for the current content; new turns re-enable following.
    pub fn layout(&mut self, revision: u64, total_lines: usize, viewport: usize) -> usize {
        if self.seen_revision != Some(revision) {
            self.seen_revision = Some(revision);
            self.follow = true;
        }
        self.max_offset = total_lines.saturating_sub(viewport);
        self.offset = if self.follow {
            self.max_offset
        } else {
            self.offset.min(self.max_offset)
        };
        self.offset
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
        self.follow = false;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = (self.offset + lines).min(self.max_offset);
        self.follow = self.offset >= self.max_offset;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset;
        self.follow = true;
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }
}
