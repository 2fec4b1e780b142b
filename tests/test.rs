mod example_document;

use std::path::Path;

use example_document::{Document, ExampleCase, Task};
use pretty_assertions::assert_eq;
use reversion::{
    ErrorPolicy, Fingerprint, HistoryConfig, HistoryController, HistoryError, Operation,
    OperationKind, RevertError, diff,
};

fn get_all_cases() -> Vec<ExampleCase> { ExampleCase::load_all(Path::new("tests/cases")) }

#[test]
fn test_cases_render_expected_operations() {
    for case in &get_all_cases() {
        let rendered = diff(&case.current, &case.previous)
            .map(|reversion| {
                reversion
                    .operations()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        assert_eq!(rendered, case.operations, "case: {}", case.name);
    }
}

#[test]
fn test_cases_revert_to_previous() {
    for case in &get_all_cases() {
        let mut value = case.current.clone();
        if let Some(reversion) = diff(&case.current, &case.previous) {
            reversion.revert(&mut value).unwrap();
        }

        assert_eq!(value, case.previous, "case: {}", case.name);
    }
}

#[test]
fn test_cases_revert_inverse_way() {
    for case in &get_all_cases() {
        let mut value = case.previous.clone();
        if let Some(reversion) = diff(&case.previous, &case.current) {
            reversion.revert(&mut value).unwrap();
        }

        assert_eq!(value, case.current, "case: {}", case.name);
    }
}

#[test]
fn test_cases_through_history() {
    for case in &get_all_cases() {
        let history = HistoryController::new(case.previous.clone(), HistoryConfig::default());
        history.append(case.current.clone());

        assert_eq!(
            history.has_undo(),
            !case.operations.is_empty(),
            "case: {}",
            case.name
        );
        assert_eq!(history.undo().unwrap(), case.previous, "case: {}", case.name);
        assert_eq!(history.redo().unwrap(), case.current, "case: {}", case.name);
    }
}

#[test]
fn test_reversion_refuses_other_versions() {
    let cases = get_all_cases();
    let edited = cases
        .iter()
        .find(|case| !case.operations.is_empty())
        .expect("at least one case has operations");
    let reversion = diff(&edited.current, &edited.previous).unwrap();

    let mut unrelated = Document {
        title: "Something else entirely".to_owned(),
        ..Document::default()
    };
    let before = unrelated.clone();

    assert_eq!(
        reversion.revert(&mut unrelated),
        Err(RevertError::VersionMismatch {
            expected: edited.current.fingerprint(),
            found: before.fingerprint(),
        })
    );
    assert_eq!(unrelated, before);
}

#[test]
fn test_task_swap_moves_without_rebuilding() {
    let first = Task {
        id: 1,
        label: "first".to_owned(),
        done: false,
    };
    let second = Task {
        id: 2,
        label: "second".to_owned(),
        done: true,
    };
    let current = Document {
        tasks: vec![first.clone(), second.clone()],
        ..Document::default()
    };
    let previous = Document {
        tasks: vec![second, first],
        ..Document::default()
    };

    let reversion = diff(&current, &previous).unwrap();
    assert_eq!(
        reversion
            .operations()
            .iter()
            .map(Operation::kind)
            .collect::<Vec<_>>(),
        vec![OperationKind::Move]
    );
    assert_eq!(reversion.reverted(&current).unwrap(), previous);
}

#[test]
fn test_editing_session_with_scopes() {
    let history = HistoryController::new(Document::default(), HistoryConfig::default());
    let mut document = Document::default();

    document.title = "Plan".to_owned();
    history.append(document.clone());

    history.push_new_scope();
    document.tags.insert("draft".to_owned());
    history.append(document.clone());
    document.note = Some("remember the milk".to_owned());
    history.append(document.clone());
    history.pop_current_scope().unwrap();

    history.push_new_scope();
    document.revision = 7;
    history.append(document.clone());
    assert_eq!(history.undo_and_discard_current_scope().unwrap().revision, 0);

    assert_eq!(history.scope_level(), 0);
    assert_eq!(history.undo_count(), 3);
    assert_eq!(history.undo().unwrap().note, None);
    assert!(history.undo().unwrap().tags.is_empty());
    assert_eq!(history.undo().unwrap(), Document::default());
    assert!(!history.has_undo());
}

#[test]
fn test_capture_policy_keeps_editing_session_alive() {
    let history = HistoryController::new(
        Document::default(),
        HistoryConfig::default().with_error_policy(ErrorPolicy::Capture),
    );

    assert_eq!(history.discard_current_scope(), Ok(()));
    assert_eq!(history.take_last_error(), Some(HistoryError::ScopeUnderflow));

    let edited = Document {
        revision: 1,
        ..Document::default()
    };
    history.append(edited.clone());
    assert_eq!(history.undo().unwrap(), Document::default());
    assert_eq!(history.last_error(), None);
}
