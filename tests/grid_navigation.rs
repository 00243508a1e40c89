//! Grid viewer state transitions
//!
//! Property tests drive random event sequences through the viewer and
//! check the viewport invariants after every step.

mod common;

use common::{grid, people, sized_viewer};
use pam::grid::{Feedback, GridCommand, GridEvent, GridViewer, Position};
use proptest::prelude::*;

fn navigation_event() -> impl Strategy<Value = GridEvent> {
    prop_oneof![
        Just(GridEvent::MoveUp),
        Just(GridEvent::MoveDown),
        Just(GridEvent::MoveLeft),
        Just(GridEvent::MoveRight),
        Just(GridEvent::JumpFirstRow),
        Just(GridEvent::JumpLastRow),
        Just(GridEvent::JumpFirstCol),
        Just(GridEvent::JumpLastCol),
        Just(GridEvent::PageUp),
        Just(GridEvent::PageDown),
        Just(GridEvent::CopyCell),
        Just(GridEvent::FeedbackExpired),
        (1u16..120, 1u16..50).prop_map(|(width, height)| GridEvent::Resize { width, height }),
    ]
}

fn assert_selection_visible(viewer: &GridViewer) {
    let (selected, offset, visible) = (viewer.selected(), viewer.offset(), viewer.visible());
    let rows = viewer.results().row_count();
    let cols = viewer.results().col_count();

    assert!(selected.row < rows, "row {} of {}", selected.row, rows);
    assert!(selected.col < cols, "col {} of {}", selected.col, cols);
    assert!(offset.row <= selected.row, "{offset:?} past {selected:?}");
    assert!(offset.col <= selected.col, "{offset:?} past {selected:?}");
    if visible.row > 0 {
        assert!(selected.row < offset.row + visible.row);
    }
    if visible.col > 0 {
        assert!(selected.col < offset.col + visible.col);
    }
}

proptest! {
    #[test]
    fn selection_stays_visible(
        rows in 1usize..60,
        cols in 1usize..12,
        width in 1u16..120,
        height in 1u16..50,
        events in proptest::collection::vec(navigation_event(), 0..80),
    ) {
        let mut viewer = sized_viewer(grid(rows, cols), width, height);
        assert_selection_visible(&viewer);
        for event in events {
            viewer.handle(event);
            assert_selection_visible(&viewer);
        }
    }

    #[test]
    fn jump_last_then_first_restores_origin_row(
        rows in 1usize..60,
        height in 4u16..40,
        events in proptest::collection::vec(navigation_event(), 0..30),
    ) {
        let mut viewer = sized_viewer(grid(rows, 3), 80, height);
        for event in events {
            viewer.handle(event);
        }
        let col = viewer.selected().col;
        let offset_col = viewer.offset().col;

        viewer.handle(GridEvent::JumpLastRow);
        prop_assert_eq!(viewer.selected().row, rows - 1);
        viewer.handle(GridEvent::JumpFirstRow);
        prop_assert_eq!(viewer.selected(), Position::new(0, col));
        prop_assert_eq!(viewer.offset(), Position::new(0, offset_col));
    }

    #[test]
    fn page_down_never_overshoots(rows in 1usize..100, height in 4u16..30, presses in 1usize..20) {
        let mut viewer = sized_viewer(grid(rows, 2), 80, height);
        let page = viewer.visible().row;
        for _ in 0..presses {
            viewer.handle(GridEvent::PageDown);
        }
        prop_assert_eq!(viewer.selected().row, (page * presses).min(rows - 1));
        prop_assert!(viewer.offset().row <= rows.saturating_sub(page));
    }
}

#[test]
fn test_move_down_scrolls_one_row_window() {
    // One visible row: three rows of chrome plus one of data
    let mut viewer = sized_viewer(people(), 40, 4);
    assert_eq!(viewer.visible(), Position::new(1, 2));
    assert_eq!(viewer.selected(), Position::new(0, 0));

    viewer.handle(GridEvent::MoveDown);
    assert_eq!(viewer.selected(), Position::new(1, 0));
    assert_eq!(viewer.offset().row, 1);
}

#[test]
fn test_copy_null_cell_copies_null_text() {
    let mut viewer = sized_viewer(people(), 40, 4);
    viewer.handle(GridEvent::MoveDown);
    viewer.handle(GridEvent::MoveRight);

    let commands = viewer.handle(GridEvent::CopyCell);
    assert_eq!(
        commands.first(),
        Some(&GridCommand::CopyToClipboard("NULL".to_string()))
    );
    assert!(matches!(
        commands.get(1),
        Some(GridCommand::ScheduleFeedbackExpiry(_))
    ));
    assert_eq!(viewer.feedback(), Feedback::Copied);

    viewer.handle(GridEvent::FeedbackExpired);
    assert_eq!(viewer.feedback(), Feedback::None);
}

#[test]
fn test_empty_result_ignores_navigation_and_copy() {
    let mut viewer = sized_viewer(grid(0, 3), 80, 24);
    for event in [
        GridEvent::MoveDown,
        GridEvent::JumpLastRow,
        GridEvent::PageDown,
        GridEvent::MoveRight,
    ] {
        assert!(viewer.handle(event).is_empty());
    }
    assert!(viewer.handle(GridEvent::CopyCell).is_empty());
    assert_eq!(viewer.selected(), Position::new(0, 0));
    assert_eq!(viewer.feedback(), Feedback::None);
}

#[test]
fn test_unsized_viewer_still_moves() {
    let results = grid(10, 2);
    let elapsed = results.execution_time;
    let mut viewer = GridViewer::new(results, elapsed);
    viewer.handle(GridEvent::MoveDown);
    viewer.handle(GridEvent::PageDown);
    assert_eq!(viewer.selected().row, 2);
    viewer.handle(GridEvent::JumpLastRow);
    assert_eq!(viewer.selected().row, 9);
}

#[test]
fn test_quit_ends_session() {
    let mut viewer = sized_viewer(people(), 40, 10);
    assert_eq!(viewer.handle(GridEvent::Quit), vec![GridCommand::Quit]);
    assert!(!viewer.is_running());
}
