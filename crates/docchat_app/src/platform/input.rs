use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use docchat_core::{AppViewModel, Msg, UploadBatch};

use super::ui::constants::SCROLL_PAGE;
use super::ui::view_state::UiState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    Dispatch(Msg),
    /// Only terminal-side state changed.
    Redraw,
    Quit,
    Ignored,
}

/// Translate one terminal event. Modal priority: confirmation, busy overlay, file picker.
pub fn handle_event(event: &Event, ui: &mut UiState, view: &AppViewModel) -> InputOutcome {
    if let Event::Resize(..) = event {
        return InputOutcome::Redraw;
    }
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        ..
    }) = event
    else {
        return InputOutcome::Ignored;
    };

    if *modifiers == KeyModifiers::CONTROL && *code == KeyCode::Char('c') {
        return InputOutcome::Quit;
    }
    if view.confirmation.is_some() {
        return confirmation_key(*code);
    }
    if view.busy.is_some() {
        return InputOutcome::Ignored;
    }
    if ui.picker.open {
        return picker_key(ui, *modifiers, *code);
    }
    main_key(ui, *modifiers, *code)
}

fn confirmation_key(code: KeyCode) -> InputOutcome {
    match code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => InputOutcome::Dispatch(Msg::ClearConfirmed),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => InputOutcome::Dispatch(Msg::ClearDeclined),
        _ => InputOutcome::Ignored,
    }
}

fn picker_key(ui: &mut UiState, modifiers: KeyModifiers, code: KeyCode) -> InputOutcome {
    let draft = &mut ui.picker.draft;
    match (modifiers, code) {
        (KeyModifiers::NONE, KeyCode::Enter) => {
            let batch = parse_selection(draft.text());
            ui.picker.close();
            InputOutcome::Dispatch(Msg::FilesSelected(batch))
        }
        (KeyModifiers::NONE, KeyCode::Esc) => {
            ui.picker.reset();
            InputOutcome::Dispatch(Msg::FilesSelected(UploadBatch::default()))
        }
        (KeyModifiers::NONE, KeyCode::Backspace) => redraw_if(draft.backspace()),
        (KeyModifiers::NONE, KeyCode::Delete) => redraw_if(draft.delete()),
        (KeyModifiers::NONE, KeyCode::Left) => {
            draft.move_left();
            InputOutcome::Redraw
        }
        (KeyModifiers::NONE, KeyCode::Right) => {
            draft.move_right();
            InputOutcome::Redraw
        }
        (KeyModifiers::NONE, KeyCode::Home) => {
            draft.move_home();
            InputOutcome::Redraw
        }
        (KeyModifiers::NONE, KeyCode::End) => {
            draft.move_end();
            InputOutcome::Redraw
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            draft.insert_char(c);
            InputOutcome::Redraw
        }
        _ => InputOutcome::Ignored,
    }
}

fn main_key(ui: &mut UiState, modifiers: KeyModifiers, code: KeyCode) -> InputOutcome {
    match (modifiers, code) {
        (KeyModifiers::NONE, KeyCode::Enter) | (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
            InputOutcome::Dispatch(Msg::SendClicked)
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            ui.picker.open();
            InputOutcome::Redraw
        }
        (KeyModifiers::CONTROL, KeyCode::Char('l')) => InputOutcome::Dispatch(Msg::ClearDataClicked),
        (KeyModifiers::NONE, KeyCode::Esc) => {
            if ui.query.text().is_empty() {
                InputOutcome::Quit
            } else {
                ui.query.clear();
                query_changed(ui)
            }
        }
        (KeyModifiers::NONE, KeyCode::PageUp) => {
            ui.scroll.scroll_up(SCROLL_PAGE);
            InputOutcome::Redraw
        }
        (KeyModifiers::NONE, KeyCode::PageDown) => {
            ui.scroll.scroll_down(SCROLL_PAGE);
            InputOutcome::Redraw
        }
        (KeyModifiers::CONTROL, KeyCode::End) => {
            ui.scroll.scroll_to_bottom();
            InputOutcome::Redraw
        }
        (KeyModifiers::NONE, KeyCode::Backspace) => {
            if ui.query.backspace() {
                query_changed(ui)
            } else {
                InputOutcome::Ignored
            }
        }
        (KeyModifiers::NONE, KeyCode::Delete) => {
            if ui.query.delete() {
                query_changed(ui)
            } else {
                InputOutcome::Ignored
            }
        }
        (KeyModifiers::NONE, KeyCode::Left) => {
            ui.query.move_left();
            InputOutcome::Redraw
        }
        (KeyModifiers::NONE, KeyCode::Right) => {
            ui.query.move_right();
            InputOutcome::Redraw
        }
        (KeyModifiers::NONE, KeyCode::Home) => {
            ui.query.move_home();
            InputOutcome::Redraw
        }
        (KeyModifiers::NONE, KeyCode::End) => {
            ui.query.move_end();
            InputOutcome::Redraw
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            ui.query.insert_char(c);
            query_changed(ui)
        }
        _ => InputOutcome::Ignored,
    }
}

fn query_changed(ui: &UiState) -> InputOutcome {
    InputOutcome::Dispatch(Msg::InputChanged(ui.query.text().to_owned()))
}

fn redraw_if(changed: bool) -> InputOutcome {
    if changed {
        InputOutcome::Redraw
    } else {
        InputOutcome::Ignored
    }
}

/// Split a `;`-separated path list; surrounding quotes and blank entries are dropped.
pub fn parse_selection(raw: &str) -> UploadBatch {
    UploadBatch::from_paths(
        raw.split(';')
            .map(|entry| entry.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|entry| !entry.is_empty())
            .map(str::to_owned),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_core::{update, AppState};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn idle_view() -> AppViewModel {
        AppState::new().view()
    }

    #[test]
    fn typing_dispatches_the_whole_query() {
        let mut ui = UiState::new();
        let view = idle_view();
        handle_event(&key(KeyCode::Char('h')), &mut ui, &view);
        let outcome = handle_event(&key(KeyCode::Char('i')), &mut ui, &view);

        assert_eq!(outcome, InputOutcome::Dispatch(Msg::InputChanged("hi".to_string())));
    }

    #[test]
    fn enter_sends_and_ctrl_l_asks_to_clear() {
        let mut ui = UiState::new();
        let view = idle_view();
        assert_eq!(
            handle_event(&key(KeyCode::Enter), &mut ui, &view),
            InputOutcome::Dispatch(Msg::SendClicked)
        );
        assert_eq!(
            handle_event(&ctrl('l'), &mut ui, &view),
            InputOutcome::Dispatch(Msg::ClearDataClicked)
        );
    }

    #[test]
    fn keys_are_swallowed_while_busy_except_quit() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("q".to_string()));
        let (state, _) = update(state, Msg::SendClicked);
        let view = state.view();
        let mut ui = UiState::new();

        assert_eq!(handle_event(&key(KeyCode::Enter), &mut ui, &view), InputOutcome::Ignored);
        assert_eq!(handle_event(&ctrl('u'), &mut ui, &view), InputOutcome::Ignored);
        assert!(!ui.picker.open);
        assert_eq!(handle_event(&ctrl('c'), &mut ui, &view), InputOutcome::Quit);
    }

    #[test]
    fn confirmation_keys_map_to_confirm_and_decline() {
        let (state, _) = update(AppState::new(), Msg::ClearDataClicked);
        let view = state.view();
        let mut ui = UiState::new();

        assert_eq!(
            handle_event(&key(KeyCode::Char('y')), &mut ui, &view),
            InputOutcome::Dispatch(Msg::ClearConfirmed)
        );
        assert_eq!(
            handle_event(&key(KeyCode::Esc), &mut ui, &view),
            InputOutcome::Dispatch(Msg::ClearDeclined)
        );
        assert_eq!(handle_event(&key(KeyCode::Char('x')), &mut ui, &view), InputOutcome::Ignored);
    }

    #[test]
    fn picker_collects_paths_and_submits_on_enter() {
        let mut ui = UiState::new();
        let view = idle_view();
        assert_eq!(handle_event(&ctrl('u'), &mut ui, &view), InputOutcome::Redraw);
        for c in "a.pdf;b.md".chars() {
            handle_event(&key(KeyCode::Char(c)), &mut ui, &view);
        }

        let outcome = handle_event(&key(KeyCode::Enter), &mut ui, &view);
        assert_eq!(
            outcome,
            InputOutcome::Dispatch(Msg::FilesSelected(UploadBatch::from_paths(["a.pdf", "b.md"])))
        );
        assert!(!ui.picker.open);
        assert_eq!(ui.query.text(), "");
    }

    #[test]
    fn escaping_the_picker_submits_an_empty_selection() {
        let mut ui = UiState::new();
        let view = idle_view();
        handle_event(&ctrl('u'), &mut ui, &view);
        handle_event(&key(KeyCode::Char('x')), &mut ui, &view);

        let outcome = handle_event(&key(KeyCode::Esc), &mut ui, &view);
        assert_eq!(outcome, InputOutcome::Dispatch(Msg::FilesSelected(UploadBatch::default())));
        assert_eq!(ui.picker.draft.text(), "");
    }

    #[test]
    fn esc_clears_the_query_then_quits() {
        let mut ui = UiState::new();
        let view = idle_view();
        handle_event(&key(KeyCode::Char('a')), &mut ui, &view);

        assert_eq!(
            handle_event(&key(KeyCode::Esc), &mut ui, &view),
            InputOutcome::Dispatch(Msg::InputChanged(String::new()))
        );
        assert_eq!(handle_event(&key(KeyCode::Esc), &mut ui, &view), InputOutcome::Quit);
    }

    #[test]
    fn parse_selection_trims_quotes_and_blanks() {
        let batch = parse_selection(r#" "/tmp/My Report.pdf" ; ;notes.txt;  "#);
        let paths: Vec<PathBuf> = batch.files().iter().map(|f| f.path.clone()).collect();

        assert_eq!(
            paths,
            vec![PathBuf::from("/tmp/My Report.pdf"), PathBuf::from("notes.txt")]
        );
        assert_eq!(batch.files()[0].file_name, "My Report.pdf");
        assert!(parse_selection("  ").is_empty());
    }
}
