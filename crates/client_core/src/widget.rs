//! State and behaviour of the floating todo widget, minus the window.
//!
//! Front ends feed pointer events and user commands in and render whatever
//! [`WidgetEvent`]s come out. The server is authoritative: every mutation is
//! followed by a full reload instead of patching local state.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use shared::{
    domain::TodoId,
    error::ApiError,
    protocol::{CreateTodoRequest, TodoItem, UpdateTodoRequest},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    error::ClientError,
    gesture::{DragGesture, GestureOutcome, InsertionMarker},
    reorder::{apply_intent, resolve_intent, DropIntent, DropZone},
    transport::TodoApi,
};

pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(60);
pub const EMPTY_HEADLINE: &str = "No todos yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    Snapshot(Vec<TodoItem>),
    Notice(String),
    Expanded(bool),
}

#[derive(Debug, Clone, Default)]
pub struct WidgetState {
    /// Display order, exactly as the server returned it.
    pub todos: Vec<TodoItem>,
    pub expanded: bool,
    pub notice: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl WidgetState {
    /// First incomplete todo in display order.
    pub fn active_todo(&self) -> Option<&TodoItem> {
        self.todos.iter().find(|todo| !todo.is_completed)
    }

    pub fn headline(&self) -> &str {
        self.active_todo()
            .map(|todo| todo.content.as_str())
            .unwrap_or(EMPTY_HEADLINE)
    }

    pub fn order(&self) -> Vec<TodoId> {
        self.todos.iter().map(|todo| todo.id).collect()
    }

    pub fn find(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|todo| todo.id == id)
    }
}

pub struct TodoWidget {
    api: Arc<dyn TodoApi>,
    state: Mutex<WidgetState>,
    gesture: Mutex<DragGesture>,
    events: broadcast::Sender<WidgetEvent>,
}

impl TodoWidget {
    pub fn new(api: Arc<dyn TodoApi>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            state: Mutex::new(WidgetState::default()),
            gesture: Mutex::new(DragGesture::new()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WidgetEvent> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> WidgetState {
        self.state.lock().await.clone()
    }

    /// Replaces the local list with the server's. Whichever load finishes last
    /// wins, including the background sync.
    pub async fn reload(&self) -> Result<(), ClientError> {
        match self.api.list_todos().await {
            Ok(todos) => {
                debug!(count = todos.len(), "todo list loaded");
                {
                    let mut state = self.state.lock().await;
                    state.todos = todos.clone();
                    state.notice = None;
                    state.last_synced_at = Some(Utc::now());
                }
                let _ = self.events.send(WidgetEvent::Snapshot(todos));
                Ok(())
            }
            Err(err) => Err(self.report(err).await),
        }
    }

    pub async fn add(
        &self,
        content: &str,
        due_date: Option<String>,
        priority: Option<i64>,
    ) -> Result<TodoItem, ClientError> {
        let content = content.trim();
        if content.is_empty() {
            let err = ClientError::Validation(ApiError::validation("Todo content cannot be empty."));
            return Err(self.report(err).await);
        }

        let request = CreateTodoRequest {
            content: Some(content.to_string()),
            due_date,
            priority,
        };
        let created = match self.api.create_todo(&request).await {
            Ok(created) => created,
            Err(err) => return Err(self.report(err).await),
        };
        info!(id = %created.id, "todo added");
        self.reload().await?;
        Ok(created)
    }

    /// Flips completion based on the last loaded state.
    pub async fn toggle_complete(&self, id: TodoId) -> Result<TodoItem, ClientError> {
        let current = self.state.lock().await.find(id).map(|todo| todo.is_completed);
        let Some(is_completed) = current else {
            let err = ClientError::NotFound(ApiError::todo_not_found(id));
            return Err(self.report(err).await);
        };
        self.set_completed(id, !is_completed).await
    }

    pub async fn set_completed(
        &self,
        id: TodoId,
        is_completed: bool,
    ) -> Result<TodoItem, ClientError> {
        let updated = match self
            .api
            .update_todo(id, &UpdateTodoRequest::completed(is_completed))
            .await
        {
            Ok(updated) => updated,
            Err(err) => return Err(self.report(err).await),
        };
        self.reload().await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: TodoId) -> Result<(), ClientError> {
        if let Err(err) = self.api.delete_todo(id).await {
            return Err(self.report(err).await);
        }
        info!(%id, "todo deleted");
        self.reload().await
    }

    pub async fn toggle_expanded(&self) -> Result<bool, ClientError> {
        let expanded = {
            let mut state = self.state.lock().await;
            state.expanded = !state.expanded;
            state.expanded
        };
        let _ = self.events.send(WidgetEvent::Expanded(expanded));
        if expanded {
            self.reload().await?;
        }
        Ok(expanded)
    }

    /// Sends a full ordering and reloads whatever the server ended up with,
    /// also when the reorder itself failed.
    pub async fn submit_reorder(&self, ordered_ids: &[TodoId]) -> Result<(), ClientError> {
        let submitted = self.api.reorder_todos(ordered_ids).await;
        let reloaded = self.reload().await;

        match submitted {
            Ok(response) => {
                info!(reordered = response.reordered, "todos reordered");
                reloaded
            }
            Err(err) => Err(self.report(err).await),
        }
    }

    /// Moves `subject` as if it had been dropped on `zone` at `pointer_y`.
    /// Returns `false` when the drop changes nothing and no request was sent.
    pub async fn move_todo(
        &self,
        subject: TodoId,
        zone: &DropZone,
        pointer_y: f32,
    ) -> Result<bool, ClientError> {
        self.move_with_intent(subject, resolve_intent(subject, zone, pointer_y))
            .await
    }

    /// Same as [`Self::move_todo`] for callers that already know where the
    /// todo should go, e.g. keyboard or command-line moves.
    pub async fn move_with_intent(
        &self,
        subject: TodoId,
        intent: DropIntent,
    ) -> Result<bool, ClientError> {
        let order = self.state.lock().await.order();
        if !order.contains(&subject) {
            let err = ClientError::NotFound(ApiError::todo_not_found(subject));
            return Err(self.report(err).await);
        }
        match apply_intent(subject, &order, intent) {
            Some(ordered_ids) => self.submit_reorder(&ordered_ids).await.map(|_| true),
            None => Ok(false),
        }
    }

    pub async fn pointer_pressed(&self, subject: TodoId, x: f32, y: f32) {
        self.gesture.lock().await.press(subject, x, y);
    }

    pub async fn pointer_moved(&self, x: f32, y: f32, zone: &DropZone) -> InsertionMarker {
        self.gesture.lock().await.motion(x, y, zone)
    }

    /// Finishes a gesture on a row. Only a drag does anything: it submits the
    /// new order. Expanding and collapsing belongs to the window background.
    pub async fn pointer_released(
        &self,
        x: f32,
        y: f32,
        zone: &DropZone,
    ) -> Result<Option<GestureOutcome>, ClientError> {
        let order = self.state.lock().await.order();
        let outcome = self.gesture.lock().await.release(x, y, zone, &order);

        if let Some(GestureOutcome::Reorder(ordered_ids)) = &outcome {
            self.submit_reorder(ordered_ids).await?;
        }
        Ok(outcome)
    }

    pub async fn pointer_cancelled(&self) {
        self.gesture.lock().await.cancel();
    }

    /// Periodically reloads until the returned handle is aborted. Failures
    /// only surface as notices.
    pub fn spawn_sync_task(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let widget = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = widget.reload().await {
                    warn!(error = %err, "background sync failed");
                }
            }
        })
    }

    async fn report(&self, err: ClientError) -> ClientError {
        let notice = err.notice();
        warn!(error = %err, "todo request failed");
        self.state.lock().await.notice = Some(notice.clone());
        let _ = self.events.send(WidgetEvent::Notice(notice));
        err
    }
}

#[cfg(test)]
#[path = "tests/widget_tests.rs"]
mod tests;
