//! Service freeze merge guard
//!
//! Watches a pull-request page, asks the freeze-status component whether the
//! pull request's service is frozen, and disables the merge control while it
//! is, unless the pull request is the freeze's designated changelog.
//!
//! The host page is abstracted behind [`page::Page`]; the freeze lookup behind
//! [`oracle::FreezeOracle`]. [`runtime::MonitorRuntime`] drives a
//! [`monitor::FreezeMonitor`] from navigation, mutation and timer events.

pub mod actions;
pub mod bypass;
pub mod dispatcher;
pub mod domain_models;
pub mod merge_gate;
pub mod monitor;
pub mod navigation;
pub mod oracle;
pub mod page;
pub mod runtime;

pub use actions::{Action, CheckReason};
pub use dispatcher::Dispatcher;
pub use monitor::{CheckRequest, FreezeMonitor, MonitorState};
pub use oracle::{FreezeOracle, MessageChannel, MessageOracle, OracleError};
pub use runtime::MonitorRuntime;
