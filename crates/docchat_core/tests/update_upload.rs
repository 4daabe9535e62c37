use docchat_core::{
    update, AppState, Effect, Msg, RequestFailure, RequestKind, SelectedFile, Severity,
    UploadBatch, UploadStatus, UploadTone,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    client_logging::initialize_for_tests();
}

fn two_files() -> UploadBatch {
    UploadBatch::from_paths(["docs/report.pdf", "notes.md"])
}

fn upload_request_id(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::UploadDocuments { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("upload effect")
}

fn settle_upload(result: Result<Option<String>, RequestFailure>) -> (AppState, Vec<Effect>) {
    let (state, effects) = update(AppState::new(), Msg::FilesSelected(two_files()));
    let request_id = upload_request_id(&effects);
    update(state, Msg::UploadSettled { request_id, result })
}

#[test]
fn empty_selection_clears_status_and_sends_nothing() {
    init_logging();
    let (state, _) = settle_upload(Ok(Some("Uploaded".to_string())));
    assert!(state.view().upload_status.is_some());

    let (state, effects) = update(state, Msg::FilesSelected(UploadBatch::default()));

    assert!(effects.is_empty());
    assert_eq!(state.view().upload_status, None);
    assert_eq!(state.view().busy, None);
}

#[test]
fn selection_issues_one_request_with_every_file() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::FilesSelected(two_files()));

    assert_eq!(
        effects,
        vec![Effect::UploadDocuments {
            request_id: 1,
            batch: UploadBatch::new(vec![
                SelectedFile::from_path("docs/report.pdf"),
                SelectedFile::from_path("notes.md"),
            ]),
        }]
    );
    let view = state.view();
    assert_eq!(view.busy, Some(RequestKind::Upload));
    assert_eq!(
        view.upload_status,
        Some(UploadStatus {
            text: "Uploading and processing...".to_string(),
            tone: UploadTone::Pending,
        })
    );
}

#[test]
fn selected_file_names_come_from_the_path() {
    let batch = two_files();
    let names: Vec<_> = batch.files().iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, vec!["report.pdf", "notes.md"]);
}

#[test]
fn success_shows_server_message() {
    init_logging();
    let (state, _) = settle_upload(Ok(Some("Processed 2 documents.".to_string())));
    let view = state.view();

    assert_eq!(
        view.upload_status,
        Some(UploadStatus {
            text: "Processed 2 documents.".to_string(),
            tone: UploadTone::Success,
        })
    );
    let note = view.notification.expect("notification");
    assert_eq!(note.severity, Severity::Success);
    assert_eq!(note.text, "Processed 2 documents.");
    assert_eq!(view.busy, None);
}

#[test]
fn failures_map_to_distinct_status_texts() {
    init_logging();
    let cases = vec![
        (
            Err(RequestFailure::Http {
                status: 400,
                message: Some("Invalid file type".to_string()),
            }),
            "Invalid file type",
        ),
        (
            Err(RequestFailure::Http {
                status: 500,
                message: None,
            }),
            "Upload failed.",
        ),
        (
            Err(RequestFailure::Timeout),
            "Upload timed out. File might be too large or complex.",
        ),
        (Err(RequestFailure::Network), "Network error during upload."),
        (
            Err(RequestFailure::Local("Could not read notes.md".to_string())),
            "Could not read notes.md",
        ),
    ];

    for (result, expected) in cases {
        let (state, _) = settle_upload(result);
        let view = state.view();
        assert_eq!(
            view.upload_status,
            Some(UploadStatus {
                text: expected.to_string(),
                tone: UploadTone::Error,
            })
        );
        let note = view.notification.expect("notification");
        assert_eq!(note.severity, Severity::Error);
        assert_eq!(note.text, expected);
    }
}

#[test]
fn file_picker_resets_after_every_outcome() {
    init_logging();
    let outcomes = vec![
        Ok(None),
        Err(RequestFailure::Http {
            status: 400,
            message: None,
        }),
        Err(RequestFailure::Timeout),
        Err(RequestFailure::Network),
        Err(RequestFailure::Cancelled),
    ];

    for outcome in outcomes {
        let (state, effects) = settle_upload(outcome.clone());
        assert_eq!(effects, vec![Effect::ResetFilePicker], "outcome {outcome:?}");
        assert_eq!(state.view().busy, None, "outcome {outcome:?}");
    }
}

#[test]
fn selection_while_busy_only_resets_picker() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::InputChanged("question".to_string()));
    let (state, _) = update(state, Msg::SendClicked);

    let (state, effects) = update(state, Msg::FilesSelected(two_files()));

    assert_eq!(effects, vec![Effect::ResetFilePicker]);
    assert_eq!(state.view().busy, Some(RequestKind::Chat));
    assert_eq!(state.view().upload_status, None);
}
