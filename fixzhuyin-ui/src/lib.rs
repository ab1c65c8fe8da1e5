pub mod config;
pub mod error;
pub mod host;
pub mod page;
pub mod source;
pub mod storage;
pub mod surface;
pub mod tasks;

pub use config::UiConfig;
pub use error::{Result, UiError};
pub use host::{CommandHost, Host, HostError, Invoke};
pub use page::Page;
pub use source::{Attachment, EventBus, EventSource};
pub use storage::{FlagStore, MemoryFlagStore, TomlFlagStore};
pub use surface::Surface;
pub use tasks::{ErrorReporter, LogReporter, TaskRunner};
