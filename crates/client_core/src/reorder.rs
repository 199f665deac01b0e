//! Maps a drop location onto a new total order.
//!
//! Nothing here knows about windows or pointers beyond a vertical coordinate:
//! callers hand in the zone under the pointer (already hit-tested) and the
//! pointer's y in the same space as the zone's frame.

use shared::domain::TodoId;

/// Vertical extent of a rendered list row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub top: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn midpoint(&self) -> f32 {
        self.top + self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// What the pointer is over when a drag moves or ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropZone {
    /// The compact slot that shows the active todo.
    ActiveSlot,
    Item { id: TodoId, frame: Frame },
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIntent {
    MoveToFront,
    Before(TodoId),
    After(TodoId),
    Append,
    Unchanged,
}

pub fn resolve_intent(subject: TodoId, zone: &DropZone, pointer_y: f32) -> DropIntent {
    match *zone {
        DropZone::ActiveSlot => DropIntent::MoveToFront,
        DropZone::Outside => DropIntent::Append,
        DropZone::Item { id, .. } if id == subject => DropIntent::Unchanged,
        DropZone::Item { id, frame } => {
            if pointer_y < frame.midpoint() {
                DropIntent::Before(id)
            } else {
                DropIntent::After(id)
            }
        }
    }
}

/// Index at which `subject` lands once it has been removed from `order`.
///
/// A target that is not part of the working list falls back to appending.
pub fn insertion_index(subject: TodoId, order: &[TodoId], intent: DropIntent) -> Option<usize> {
    let working: Vec<TodoId> = order.iter().copied().filter(|id| *id != subject).collect();
    let position_of = |target: TodoId| working.iter().position(|id| *id == target);

    match intent {
        DropIntent::Unchanged => None,
        DropIntent::MoveToFront => Some(0),
        DropIntent::Append => Some(working.len()),
        DropIntent::Before(target) => Some(position_of(target).unwrap_or(working.len())),
        DropIntent::After(target) => Some(
            position_of(target)
                .map(|index| index + 1)
                .unwrap_or(working.len()),
        ),
    }
}

/// Applies an already resolved intent. `None` means there is nothing to send.
pub fn apply_intent(subject: TodoId, order: &[TodoId], intent: DropIntent) -> Option<Vec<TodoId>> {
    if !order.contains(&subject) {
        return None;
    }
    let index = insertion_index(subject, order, intent)?;

    let mut next: Vec<TodoId> = order.iter().copied().filter(|id| *id != subject).collect();
    next.insert(index, subject);
    Some(next)
}

pub fn reorder(
    subject: TodoId,
    order: &[TodoId],
    zone: &DropZone,
    pointer_y: f32,
) -> Option<Vec<TodoId>> {
    apply_intent(subject, order, resolve_intent(subject, zone, pointer_y))
}

#[cfg(test)]
#[path = "tests/reorder_tests.rs"]
mod tests;
