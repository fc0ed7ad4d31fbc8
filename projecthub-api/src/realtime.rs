/// Live update fan-out for project subscribers
///
/// WebSocket connections register a per-project channel here; task
/// handlers broadcast lifecycle events to every subscriber of the
/// affected project. Broadcasting snapshots the subscriber list under
/// the lock and sends outside it, so a slow socket never blocks the
/// registry. Dead subscribers are ignored by the broadcaster and
/// cleaned up when their connection task unsubscribes.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Live event kind sent to project subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskEventKind {
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
}

/// Event envelope broadcast to a project's subscribers
#[derive(Debug, Serialize)]
pub struct TaskEvent<T: Serialize> {
    /// Event kind
    #[serde(rename = "type")]
    pub kind: TaskEventKind,

    /// Event payload (the task, or just its id when deleted)
    pub data: T,
}

impl<T: Serialize> TaskEvent<T> {
    /// Serializes the event to its wire form
    pub fn to_message(&self) -> String {
        // A Serialize impl over plain data cannot fail here
        serde_json::to_string(self).unwrap_or_default()
    }
}

struct Subscriber {
    id: Uuid,
    sender: mpsc::UnboundedSender<String>,
}

/// Per-project subscriber registry
///
/// One instance lives in the application state and is shared by the
/// WebSocket endpoint and the task handlers.
#[derive(Default)]
pub struct ProjectChannels {
    channels: Mutex<HashMap<Uuid, Vec<Subscriber>>>,
}

impl ProjectChannels {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber for a project's events
    ///
    /// Returns the subscriber id (for [`ProjectChannels::unsubscribe`])
    /// and the receiving end of the channel.
    pub fn subscribe(&self, project_id: Uuid) -> (Uuid, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();

        let mut channels = self.channels.lock().expect("channel registry poisoned");
        channels
            .entry(project_id)
            .or_default()
            .push(Subscriber { id, sender });

        (id, receiver)
    }

    /// Removes a subscriber, dropping the project entry when it was
    /// the last one
    pub fn unsubscribe(&self, project_id: Uuid, subscriber_id: Uuid) {
        let mut channels = self.channels.lock().expect("channel registry poisoned");
        if let Some(subscribers) = channels.get_mut(&project_id) {
            subscribers.retain(|s| s.id != subscriber_id);
            if subscribers.is_empty() {
                channels.remove(&project_id);
            }
        }
    }

    /// Broadcasts an event to every subscriber of the project
    ///
    /// Send failures (closed connections) are ignored; the owning
    /// connection task unsubscribes on its way out.
    pub fn broadcast<T: Serialize>(&self, project_id: Uuid, event: &TaskEvent<T>) {
        let senders: Vec<mpsc::UnboundedSender<String>> = {
            let channels = self.channels.lock().expect("channel registry poisoned");
            match channels.get(&project_id) {
                Some(subscribers) => subscribers.iter().map(|s| s.sender.clone()).collect(),
                None => return,
            }
        };

        let message = event.to_message();
        for sender in senders {
            let _ = sender.send(message.clone());
        }
    }

    /// Counts subscribers for a project
    pub fn subscriber_count(&self, project_id: Uuid) -> usize {
        let channels = self.channels.lock().expect("channel registry poisoned");
        channels.get(&project_id).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_format() {
        let event = TaskEvent {
            kind: TaskEventKind::TaskCreated,
            data: json!({"id": "abc", "title": "Write docs"}),
        };

        let message = event.to_message();
        assert!(message.contains("\"type\":\"task_created\""));
        assert!(message.contains("\"title\":\"Write docs\""));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_subscribers() {
        let channels = ProjectChannels::new();
        let project_id = Uuid::new_v4();

        let (_id_a, mut rx_a) = channels.subscribe(project_id);
        let (_id_b, mut rx_b) = channels.subscribe(project_id);

        channels.broadcast(
            project_id,
            &TaskEvent {
                kind: TaskEventKind::TaskUpdated,
                data: json!({"id": "t1"}),
            },
        );

        let msg_a = rx_a.recv().await.unwrap();
        let msg_b = rx_b.recv().await.unwrap();
        assert_eq!(msg_a, msg_b);
        assert!(msg_a.contains("task_updated"));
    }

    #[tokio::test]
    async fn test_broadcast_scoped_to_project() {
        let channels = ProjectChannels::new();
        let project_a = Uuid::new_v4();
        let project_b = Uuid::new_v4();

        let (_id, mut rx) = channels.subscribe(project_b);

        channels.broadcast(
            project_a,
            &TaskEvent {
                kind: TaskEventKind::TaskDeleted,
                data: json!({"id": "t1"}),
            },
        );

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_survives_dropped_receiver() {
        let channels = ProjectChannels::new();
        let project_id = Uuid::new_v4();

        let (_dead, dead_rx) = channels.subscribe(project_id);
        drop(dead_rx);
        let (_live, mut live_rx) = channels.subscribe(project_id);

        channels.broadcast(
            project_id,
            &TaskEvent {
                kind: TaskEventKind::TaskCreated,
                data: json!({"id": "t2"}),
            },
        );

        // The live subscriber still gets the event
        assert!(live_rx.recv().await.unwrap().contains("task_created"));
    }

    #[test]
    fn test_unsubscribe_removes_empty_project_entry() {
        let channels = ProjectChannels::new();
        let project_id = Uuid::new_v4();

        let (id, _rx) = channels.subscribe(project_id);
        assert_eq!(channels.subscriber_count(project_id), 1);

        channels.unsubscribe(project_id, id);
        assert_eq!(channels.subscriber_count(project_id), 0);
    }
}
