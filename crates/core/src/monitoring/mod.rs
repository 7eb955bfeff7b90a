//! Execution monitoring and notification
//!
//! [`MonitoringWrapper`] measures how long an operation runs and posts a
//! success or failure report through a [`Notifier`]. Concrete webhook
//! notifiers live in `tether-infra`; this module only defines the port and
//! the message model.

pub mod config;
pub mod message;
pub mod ports;
pub mod wrapper;

pub use config::NotifierConfig;
pub use message::{ErrorDetail, ExecutionStatus, NotificationMessage};
pub use ports::{BoxedError, NoopNotifier, Notifier, NotifyError};
pub use wrapper::MonitoringWrapper;
