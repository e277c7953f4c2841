//! Command envelope types and pattern-keyed routing

pub mod message;
pub mod router;

pub use message::{Command, CommandMetadata, CommandPattern, CommandReply, CommandSource};
pub use router::{
    CommandExecution, CommandHandler, CommandRouter, CommandRouterConfig, CommandRouterError,
    CommandRouterStats,
};
