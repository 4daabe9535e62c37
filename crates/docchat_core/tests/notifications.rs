use std::time::{Duration, Instant};

use docchat_core::{update, AppState, Msg, RequestFailure, NOTIFICATION_TTL};

fn fail_chat(state: AppState) -> AppState {
    let (state, _) = update(state, Msg::InputChanged("q".to_string()));
    let (state, effects) = update(state, Msg::SendClicked);
    let request_id = match effects.as_slice() {
        [docchat_core::Effect::SendChat { request_id, .. }] => *request_id,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::ChatSettled {
            request_id,
            result: Err(RequestFailure::Timeout),
        },
    );
    state
}

#[test]
fn notification_hides_after_ttl() {
    let state = AppState::new();
    let start = Instant::now();
    let (state, _) = update(state, Msg::Tick { now: start });
    let state = fail_chat(state);

    let (state, _) = update(
        state,
        Msg::Tick {
            now: start + NOTIFICATION_TTL - Duration::from_millis(100),
        },
    );
    assert!(state.view().notification.is_some());

    let (mut state, _) = update(
        state,
        Msg::Tick {
            now: start + NOTIFICATION_TTL,
        },
    );
    assert!(state.view().notification.is_none());
    assert!(state.consume_dirty());
}

#[test]
fn newer_notification_is_not_hidden_by_older_deadline() {
    let start = Instant::now();
    let (state, _) = update(AppState::new(), Msg::Tick { now: start });
    let state = fail_chat(state);
    let first_id = state.notification().unwrap().id;

    // Second notification three seconds later.
    let later = start + Duration::from_secs(3);
    let (state, _) = update(state, Msg::Tick { now: later });
    let state = fail_chat(state);
    let second_id = state.notification().unwrap().id;
    assert_ne!(first_id, second_id);

    // The first one's deadline passes; the second must stay.
    let (state, _) = update(
        state,
        Msg::Tick {
            now: start + NOTIFICATION_TTL,
        },
    );
    assert_eq!(state.notification().map(|n| n.id), Some(second_id));

    let (state, _) = update(
        state,
        Msg::Tick {
            now: later + NOTIFICATION_TTL,
        },
    );
    assert!(state.notification().is_none());
}

#[test]
fn tick_without_notification_is_not_dirty() {
    let (mut state, _) = update(AppState::new(), Msg::Tick { now: Instant::now() });
    assert!(!state.consume_dirty());
}
