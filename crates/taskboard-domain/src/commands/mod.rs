use taskboard_core::TaskboardResult;

pub mod task_commands;

pub use task_commands::*;

/// A local mutation of the task collection.
pub trait Command: Send + Sync {
    fn execute(&self, context: &mut CommandContext) -> TaskboardResult<()>;

    /// Human-readable description of what this command does
    fn description(&self) -> String;
}

pub struct CommandContext<'a> {
    pub tasks: &'a mut Vec<crate::Task>,
}
