use clap::{Args, Parser, Subcommand, ValueEnum};
use taskboard_domain::{BoardScope, Role};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Inspect kanban boards and replay drag-and-drop gestures", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to board file (or set TASKBOARD_FILE env var)
    #[arg(short, long, value_name = "FILE", env = "TASKBOARD_FILE", global = true)]
    pub file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the board as ordered columns
    Show(ShowArgs),
    /// Replay a script of pointer events against the board
    Replay(ReplayArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    All,
    Private,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Admin,
    Member,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => Role::Admin,
            RoleArg::Member => Role::Member,
        }
    }
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(long, value_enum, default_value_t = ScopeArg::All)]
    pub scope: ScopeArg,
    /// Case-insensitive match on task name
    #[arg(long)]
    pub search: Option<String>,
    /// User whose assigned tasks make up the private scope
    #[arg(long, default_value = "admin")]
    pub user: String,
}

impl ShowArgs {
    pub fn board_scope(&self) -> BoardScope {
        match self.scope {
            ScopeArg::All => BoardScope::All,
            ScopeArg::Private => BoardScope::Private {
                user_id: self.user.clone(),
            },
            ScopeArg::Public => BoardScope::Public,
        }
    }
}

#[derive(Args)]
pub struct ReplayArgs {
    /// JSON file with the pointer events to replay
    #[arg(long)]
    pub script: String,
    #[arg(long, default_value = "admin")]
    pub user: String,
    #[arg(long, value_enum, default_value_t = RoleArg::Admin)]
    pub role: RoleArg,
    /// Write the resulting tasks back to FILE
    #[arg(long)]
    pub write: bool,
}
