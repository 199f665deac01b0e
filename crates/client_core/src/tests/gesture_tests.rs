use super::*;
use crate::reorder::Frame;

const A: TodoId = TodoId(1);
const B: TodoId = TodoId(2);
const C: TodoId = TodoId(3);

fn row(id: TodoId, index: usize) -> DropZone {
    DropZone::Item {
        id,
        frame: Frame::new(index as f32 * 30.0, 30.0),
    }
}

#[test]
fn small_movement_ends_without_effect() {
    let mut gesture = DragGesture::new();
    gesture.press(A, 10.0, 10.0);
    gesture.motion(13.0, 14.0, &row(A, 0));
    assert!(!gesture.is_dragging());

    let outcome = gesture.release(14.0, 15.0, &row(A, 0), &[A, B, C]);
    assert_eq!(outcome, Some(GestureOutcome::Cancelled));
    assert_eq!(gesture.subject(), None);
}

#[test]
fn crossing_the_threshold_starts_a_drag() {
    let mut gesture = DragGesture::new();
    gesture.press(C, 10.0, 75.0);
    gesture.motion(10.0, 70.0, &row(C, 2));
    assert!(!gesture.is_dragging());

    let marker = gesture.motion(10.0, 69.9, &row(C, 2));
    assert!(gesture.is_dragging());
    assert_eq!(marker, InsertionMarker::Hidden);
}

#[test]
fn marker_follows_the_hovered_half() {
    let mut gesture = DragGesture::new();
    gesture.press(C, 10.0, 75.0);

    assert_eq!(
        gesture.motion(10.0, 35.0, &row(B, 1)),
        InsertionMarker::Line { y: 30.0 }
    );
    assert_eq!(gesture.intent(), Some(DropIntent::Before(B)));

    assert_eq!(
        gesture.motion(10.0, 50.0, &row(B, 1)),
        InsertionMarker::Line { y: 60.0 }
    );
    assert_eq!(
        gesture.motion(10.0, -20.0, &DropZone::ActiveSlot),
        InsertionMarker::ActiveSlot
    );
    assert_eq!(
        gesture.motion(200.0, 500.0, &DropZone::Outside),
        InsertionMarker::Hidden
    );
}

#[test]
fn release_over_upper_half_reorders() {
    let mut gesture = DragGesture::new();
    gesture.press(C, 10.0, 75.0);
    gesture.motion(10.0, 33.0, &row(B, 1));

    let outcome = gesture.release(10.0, 33.0, &row(B, 1), &[A, B, C]);
    assert_eq!(outcome, Some(GestureOutcome::Reorder(vec![A, C, B])));
    assert!(!gesture.is_dragging());
}

#[test]
fn release_without_motion_events_still_detects_drag() {
    let mut gesture = DragGesture::new();
    gesture.press(A, 10.0, 15.0);

    let outcome = gesture.release(10.0, 400.0, &DropZone::Outside, &[A, B, C]);
    assert_eq!(outcome, Some(GestureOutcome::Reorder(vec![B, C, A])));
}

#[test]
fn drop_on_itself_is_cancelled() {
    let mut gesture = DragGesture::new();
    gesture.press(B, 10.0, 35.0);
    gesture.motion(10.0, 50.0, &row(B, 1));

    let outcome = gesture.release(10.0, 50.0, &row(B, 1), &[A, B, C]);
    assert_eq!(outcome, Some(GestureOutcome::Cancelled));
}

#[test]
fn cancel_abandons_without_outcome() {
    let mut gesture = DragGesture::new();
    gesture.press(A, 0.0, 0.0);
    gesture.motion(0.0, 100.0, &DropZone::Outside);
    gesture.cancel();

    assert_eq!(gesture.subject(), None);
    assert_eq!(gesture.marker(), InsertionMarker::Hidden);
    assert_eq!(
        gesture.release(0.0, 100.0, &DropZone::Outside, &[A, B, C]),
        None
    );
}
