pub mod controller;
pub mod dispatcher;
pub mod notify;
pub mod store;
pub mod traits;

pub use controller::BoardController;
pub use dispatcher::{MoveDispatcher, MoveOutcome, MoveReport};
pub use notify::{RecordingNotifier, TracingNotifier};
pub use store::{MemoryTaskStore, StoreFailure};
pub use traits::{Notification, NotificationKind, NotificationSink, TaskStore};
