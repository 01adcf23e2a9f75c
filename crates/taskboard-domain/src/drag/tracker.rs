//! Drag session state machine.
//!
//! ```text
//! Idle --(press + travel >= activation distance)--> Dragging
//! Dragging --(cancel)--> Idle
//! Dragging --(release)--> Committing --(finish)--> Idle
//! ```
//!
//! A press only arms the tracker; nothing is emitted until the pointer has
//! travelled far enough, so a plain click never starts a drag.

use serde::{Deserialize, Serialize};

use super::intent::DropTarget;
use crate::column::ColumnId;
use crate::task::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The element under the pointer when it went down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum DragSource {
    Task(TaskId),
    ColumnHeader(ColumnId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Start {
        task_id: TaskId,
    },
    Over {
        task_id: TaskId,
        target: DropTarget,
    },
    /// `target` is the last drop target seen during the gesture.
    End {
        task_id: TaskId,
        target: Option<DropTarget>,
    },
    Cancelled {
        task_id: TaskId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrackerState {
    #[default]
    Idle,
    Dragging {
        task_id: TaskId,
        last_target: Option<DropTarget>,
    },
    Committing {
        task_id: TaskId,
    },
}

#[derive(Debug, Clone)]
struct Press {
    task_id: TaskId,
    origin: Point,
}

#[derive(Debug, Clone)]
pub struct DragTracker {
    activation_distance: f64,
    state: TrackerState,
    press: Option<Press>,
}

impl DragTracker {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            activation_distance: activation_distance.max(0.0),
            state: TrackerState::Idle,
            press: None,
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, TrackerState::Idle)
    }

    pub fn active_task(&self) -> Option<&str> {
        match &self.state {
            TrackerState::Idle => None,
            TrackerState::Dragging { task_id, .. } | TrackerState::Committing { task_id } => {
                Some(task_id)
            }
        }
    }

    /// Arm the tracker. Ignored unless idle and the press is on a task card.
    pub fn pointer_down(&mut self, source: DragSource, at: Point) {
        if !self.is_idle() {
            tracing::debug!("Ignoring pointer down while {:?}", self.state);
            return;
        }
        match source {
            DragSource::Task(task_id) => {
                self.press = Some(Press {
                    task_id,
                    origin: at,
                });
            }
            DragSource::ColumnHeader(column_id) => {
                tracing::debug!("Column {} is not draggable", column_id);
                self.press = None;
            }
        }
    }

    /// Feed a pointer move. Returns a `Start` when the activation distance is
    /// crossed, and an `Over` whenever the pointer enters a new drop target.
    /// Leaving every target keeps the last one as the candidate.
    pub fn pointer_move(&mut self, at: Point, over: Option<DropTarget>) -> Vec<DragEvent> {
        let mut events = Vec::new();

        if self.is_idle() {
            let Some(press) = &self.press else {
                return events;
            };
            if press.origin.distance_to(&at) < self.activation_distance {
                return events;
            }
            let task_id = press.task_id.clone();
            self.press = None;
            tracing::debug!("Drag started for task {}", task_id);
            self.state = TrackerState::Dragging {
                task_id: task_id.clone(),
                last_target: None,
            };
            events.push(DragEvent::Start { task_id });
        }

        if let (
            TrackerState::Dragging {
                task_id,
                last_target,
            },
            Some(target),
        ) = (&mut self.state, over)
        {
            if last_target.as_ref() != Some(&target) {
                *last_target = Some(target.clone());
                events.push(DragEvent::Over {
                    task_id: task_id.clone(),
                    target,
                });
            }
        }

        events
    }

    /// Release. Emits exactly one `End` if a drag was in progress and moves
    /// to `Committing`; a release before activation is just a click.
    pub fn pointer_up(&mut self) -> Option<DragEvent> {
        self.press = None;
        match std::mem::take(&mut self.state) {
            TrackerState::Dragging {
                task_id,
                last_target,
            } => {
                self.state = TrackerState::Committing {
                    task_id: task_id.clone(),
                };
                Some(DragEvent::End {
                    task_id,
                    target: last_target,
                })
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    pub fn cancel(&mut self) -> Option<DragEvent> {
        self.press = None;
        match std::mem::take(&mut self.state) {
            TrackerState::Dragging { task_id, .. } => {
                tracing::debug!("Drag cancelled for task {}", task_id);
                Some(DragEvent::Cancelled { task_id })
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Leave `Committing` once the drag-end has been handled.
    pub fn finish(&mut self) {
        if matches!(self.state, TrackerState::Committing { .. }) {
            self.state = TrackerState::Idle;
        }
    }
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new(taskboard_core::AppConfig::default().activation_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(tracker: &mut DragTracker, task: &str) {
        tracker.pointer_down(DragSource::Task(task.to_string()), Point::new(0.0, 0.0));
        let events = tracker.pointer_move(Point::new(0.0, 30.0), None);
        assert_eq!(
            events,
            vec![DragEvent::Start {
                task_id: task.to_string()
            }]
        );
    }

    #[test]
    fn test_click_does_not_start_drag() {
        let mut tracker = DragTracker::new(20.0);
        tracker.pointer_down(DragSource::Task("A".to_string()), Point::new(10.0, 10.0));
        let events = tracker.pointer_move(Point::new(15.0, 15.0), Some(DropTarget::task("B")));
        assert!(events.is_empty());
        assert!(tracker.is_idle());
        assert_eq!(tracker.pointer_up(), None);
    }

    #[test]
    fn test_column_header_never_drags() {
        let mut tracker = DragTracker::new(5.0);
        tracker.pointer_down(
            DragSource::ColumnHeader("col-1".to_string()),
            Point::new(0.0, 0.0),
        );
        assert!(tracker.pointer_move(Point::new(100.0, 0.0), None).is_empty());
        assert!(tracker.is_idle());
    }

    #[test]
    fn test_activation_emits_start_and_first_target() {
        let mut tracker = DragTracker::new(20.0);
        tracker.pointer_down(DragSource::Task("A".to_string()), Point::new(0.0, 0.0));
        let events = tracker.pointer_move(Point::new(12.0, 16.0), Some(DropTarget::task("B")));
        assert_eq!(
            events,
            vec![
                DragEvent::Start {
                    task_id: "A".to_string()
                },
                DragEvent::Over {
                    task_id: "A".to_string(),
                    target: DropTarget::task("B")
                },
            ]
        );
        assert_eq!(tracker.active_task(), Some("A"));
    }

    #[test]
    fn test_over_only_on_new_target() {
        let mut tracker = DragTracker::new(20.0);
        started(&mut tracker, "A");

        assert_eq!(
            tracker
                .pointer_move(Point::new(0.0, 40.0), Some(DropTarget::task("B")))
                .len(),
            1
        );
        assert!(tracker
            .pointer_move(Point::new(0.0, 41.0), Some(DropTarget::task("B")))
            .is_empty());
        assert!(tracker.pointer_move(Point::new(0.0, 42.0), None).is_empty());
        assert_eq!(
            tracker
                .pointer_move(Point::new(0.0, 90.0), Some(DropTarget::column("col-3", -1)))
                .len(),
            1
        );
    }

    #[test]
    fn test_release_keeps_last_known_target() {
        let mut tracker = DragTracker::new(20.0);
        started(&mut tracker, "A");
        tracker.pointer_move(Point::new(0.0, 40.0), Some(DropTarget::task("B")));
        tracker.pointer_move(Point::new(500.0, 40.0), None);

        let end = tracker.pointer_up();
        assert_eq!(
            end,
            Some(DragEvent::End {
                task_id: "A".to_string(),
                target: Some(DropTarget::task("B")),
            })
        );
        assert!(matches!(tracker.state(), TrackerState::Committing { .. }));

        tracker.pointer_down(DragSource::Task("C".to_string()), Point::new(0.0, 0.0));
        assert!(tracker.pointer_move(Point::new(0.0, 50.0), None).is_empty());

        tracker.finish();
        assert!(tracker.is_idle());
    }

    #[test]
    fn test_release_without_target() {
        let mut tracker = DragTracker::new(20.0);
        started(&mut tracker, "A");
        assert_eq!(
            tracker.pointer_up(),
            Some(DragEvent::End {
                task_id: "A".to_string(),
                target: None,
            })
        );
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut tracker = DragTracker::new(20.0);
        started(&mut tracker, "A");
        assert_eq!(
            tracker.cancel(),
            Some(DragEvent::Cancelled {
                task_id: "A".to_string()
            })
        );
        assert!(tracker.is_idle());
        assert_eq!(tracker.pointer_up(), None);
    }
}
