use std::sync::Once;

use docchat_core::{
    update, AppState, ChatAnswer, Effect, Msg, RequestFailure, RequestKind, Severity, Speaker,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn send_query(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::SendClicked)
}

fn sent_request_id(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SendChat { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("send chat effect")
}

fn settle_chat(state: AppState, result: Result<ChatAnswer, RequestFailure>) -> AppState {
    let (state, effects) = send_query(state, "what is in the report?");
    let request_id = sent_request_id(&effects);
    let (state, effects) = update(state, Msg::ChatSettled { request_id, result });
    assert!(effects.is_empty());
    state
}

#[test]
fn send_trims_clears_input_and_renders_user_turn_immediately() {
    init_logging();
    let (mut state, effects) = send_query(AppState::new(), "  hello there \n");
    let view = state.view();

    assert_eq!(view.input, "");
    assert_eq!(view.turns.len(), 2);
    assert_eq!(view.turns[1].speaker, Speaker::User);
    assert_eq!(view.turns[1].text(), "hello there");
    assert_eq!(view.turns[1].sources_line, None);
    assert_eq!(view.busy, Some(RequestKind::Chat));
    assert_eq!(
        effects,
        vec![Effect::SendChat {
            request_id: 1,
            query: "hello there".to_string(),
        }]
    );
    assert!(state.consume_dirty());
}

#[test]
fn whitespace_only_query_is_ignored() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::InputChanged(" \t \n".to_string()));
    let before = state.view();

    let (next, effects) = update(state, Msg::SendClicked);

    assert!(effects.is_empty());
    assert_eq!(next.view().turns, before.turns);
    assert_eq!(next.view().busy, None);
}

#[test]
fn successful_answer_renders_text_and_sources() {
    init_logging();
    let state = settle_chat(
        AppState::new(),
        Ok(ChatAnswer {
            answer: "A".to_string(),
            sources: vec!["S1".to_string(), "S2".to_string()],
        }),
    );
    let view = state.view();
    let reply = view.turns.last().unwrap();

    assert_eq!(reply.speaker, Speaker::Bot);
    assert_eq!(reply.text(), "A");
    assert_eq!(reply.sources_line.as_deref(), Some("Sources: S1, S2"));
    assert_eq!(view.busy, None);
    assert_eq!(view.notification, None);
}

#[test]
fn multi_line_answer_becomes_separate_lines() {
    init_logging();
    let state = settle_chat(
        AppState::new(),
        Ok(ChatAnswer {
            answer: "first\nsecond".to_string(),
            sources: Vec::new(),
        }),
    );
    let reply = state.view().turns.last().unwrap().clone();

    assert_eq!(reply.lines, vec!["first", "second"]);
    assert_eq!(reply.sources_line, None);
}

#[test]
fn http_error_renders_server_message_and_error_notification() {
    init_logging();
    let state = settle_chat(
        AppState::new(),
        Err(RequestFailure::Http {
            status: 400,
            message: Some("bad query".to_string()),
        }),
    );
    let view = state.view();

    assert_eq!(view.turns.last().unwrap().text(), "Error: bad query");
    let note = view.notification.expect("notification");
    assert_eq!(note.severity, Severity::Error);
    assert_eq!(note.text, "Chat error: bad query");
    assert_eq!(view.busy, None);
}

#[test]
fn http_error_without_message_uses_generic_text() {
    init_logging();
    let state = settle_chat(
        AppState::new(),
        Err(RequestFailure::Http {
            status: 500,
            message: None,
        }),
    );

    assert_eq!(
        state.view().turns.last().unwrap().text(),
        "Error: Something went wrong."
    );
}

#[test]
fn timeout_is_reported_differently_from_network_failure() {
    init_logging();
    let timed_out = settle_chat(AppState::new(), Err(RequestFailure::Timeout)).view();
    let offline = settle_chat(AppState::new(), Err(RequestFailure::Network)).view();

    assert_eq!(
        timed_out.turns.last().unwrap().text(),
        "The request timed out. Please try again or simplify your query."
    );
    assert_eq!(
        timed_out.notification.unwrap().text,
        "Chat request timed out."
    );
    assert_eq!(
        offline.turns.last().unwrap().text(),
        "Sorry, I could not connect to the server."
    );
    assert_eq!(
        offline.notification.unwrap().text,
        "Network error: Could not connect to the server."
    );
}

#[test]
fn busy_clears_on_every_outcome() {
    init_logging();
    let outcomes = vec![
        Ok(ChatAnswer {
            answer: "ok".to_string(),
            sources: Vec::new(),
        }),
        Err(RequestFailure::Http {
            status: 502,
            message: None,
        }),
        Err(RequestFailure::Timeout),
        Err(RequestFailure::Network),
        Err(RequestFailure::Cancelled),
    ];

    for outcome in outcomes {
        let (state, effects) = send_query(AppState::new(), "q");
        assert_eq!(state.view().busy, Some(RequestKind::Chat));
        let request_id = sent_request_id(&effects);

        let (state, _) = update(
            state,
            Msg::ChatSettled {
                request_id,
                result: outcome.clone(),
            },
        );
        assert_eq!(state.view().busy, None, "outcome {outcome:?}");
    }
}

#[test]
fn send_while_pending_is_rejected_and_keeps_the_draft() {
    init_logging();
    let (state, _) = send_query(AppState::new(), "first");
    let (state, effects) = send_query(state, "second");
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.input, "second");
    assert_eq!(view.turns.len(), 2);
    assert_eq!(state.pending().map(|p| p.id), Some(1));
}

#[test]
fn stale_settlement_is_ignored() {
    init_logging();
    let (state, _) = send_query(AppState::new(), "first");
    let before = state.view();

    let (state, effects) = update(
        state,
        Msg::ChatSettled {
            request_id: 99,
            result: Err(RequestFailure::Network),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.view().turns, before.turns);
    assert_eq!(state.view().busy, Some(RequestKind::Chat));
}

#[test]
fn request_ids_increase_across_requests() {
    init_logging();
    let (state, effects) = send_query(AppState::new(), "one");
    let first = sent_request_id(&effects);
    let (state, _) = update(
        state,
        Msg::ChatSettled {
            request_id: first,
            result: Err(RequestFailure::Network),
        },
    );
    let (_state, effects) = send_query(state, "two");

    assert!(sent_request_id(&effects) > first);
}
