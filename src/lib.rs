pub mod api;
pub mod error;
pub mod logging;
pub mod operation;
pub mod run;
pub mod state_machine;
pub mod strategy;
pub mod supervisor;
pub mod task;
pub mod types;

pub use api::*;
pub use error::*;
pub use run::Run;
pub use supervisor::{SupervisorConfig, TimeoutExecutor};
pub use task::FnTask;
pub use types::*;
