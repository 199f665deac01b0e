//! Press / motion / release interpreter for drag-to-reorder.
//!
//! A press on a row starts a pending gesture and owns the pointer until
//! release: the row never sees a click. It only turns into a drag once the
//! pointer has travelled past [`DRAG_THRESHOLD_PX`] on either axis, so jitter
//! while pressing does not reorder anything.

use shared::domain::TodoId;

use crate::reorder::{apply_intent, resolve_intent, DropIntent, DropZone};

pub const DRAG_THRESHOLD_PX: f32 = 5.0;

/// Visual feedback the front end should draw while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InsertionMarker {
    #[default]
    Hidden,
    ActiveSlot,
    Line { y: f32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    Reorder(Vec<TodoId>),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Phase {
    #[default]
    Idle,
    Pending {
        subject: TodoId,
        origin: (f32, f32),
    },
    Dragging {
        subject: TodoId,
    },
}

#[derive(Debug, Default)]
pub struct DragGesture {
    phase: Phase,
    intent: Option<DropIntent>,
    marker: InsertionMarker,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a gesture on `subject`, abandoning any gesture still in flight.
    pub fn press(&mut self, subject: TodoId, x: f32, y: f32) {
        self.reset();
        self.phase = Phase::Pending {
            subject,
            origin: (x, y),
        };
    }

    pub fn motion(&mut self, x: f32, y: f32, zone: &DropZone) -> InsertionMarker {
        self.promote_if_moved(x, y);

        if let Phase::Dragging { subject } = self.phase {
            let intent = resolve_intent(subject, zone, y);
            self.intent = Some(intent);
            self.marker = marker_for(intent, zone);
        }
        self.marker
    }

    /// Ends the gesture. Returns `None` when nothing was pressed.
    pub fn release(
        &mut self,
        x: f32,
        y: f32,
        zone: &DropZone,
        order: &[TodoId],
    ) -> Option<GestureOutcome> {
        self.promote_if_moved(x, y);

        let outcome = match self.phase {
            Phase::Idle => None,
            Phase::Pending { .. } => Some(GestureOutcome::Cancelled),
            Phase::Dragging { subject } => {
                let intent = resolve_intent(subject, zone, y);
                Some(match apply_intent(subject, order, intent) {
                    Some(ordered_ids) => GestureOutcome::Reorder(ordered_ids),
                    None => GestureOutcome::Cancelled,
                })
            }
        };
        self.reset();
        outcome
    }

    pub fn cancel(&mut self) {
        self.reset();
    }

    pub fn subject(&self) -> Option<TodoId> {
        match self.phase {
            Phase::Idle => None,
            Phase::Pending { subject, .. } | Phase::Dragging { subject } => Some(subject),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    pub fn intent(&self) -> Option<DropIntent> {
        self.intent
    }

    pub fn marker(&self) -> InsertionMarker {
        self.marker
    }

    fn promote_if_moved(&mut self, x: f32, y: f32) {
        if let Phase::Pending { subject, origin } = self.phase {
            let (dx, dy) = ((x - origin.0).abs(), (y - origin.1).abs());
            if dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX {
                self.phase = Phase::Dragging { subject };
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

fn marker_for(intent: DropIntent, zone: &DropZone) -> InsertionMarker {
    match (intent, zone) {
        (DropIntent::MoveToFront, _) => InsertionMarker::ActiveSlot,
        (DropIntent::Before(_), DropZone::Item { frame, .. }) => {
            InsertionMarker::Line { y: frame.top }
        }
        (DropIntent::After(_), DropZone::Item { frame, .. }) => InsertionMarker::Line {
            y: frame.bottom(),
        },
        _ => InsertionMarker::Hidden,
    }
}

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod tests;
