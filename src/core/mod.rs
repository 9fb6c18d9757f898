//! Poller core: configuration, construction and the attempt loop.
//!
//! Internal modules:
//! - [`config`]: plain-data settings ([`PollConfig`]);
//! - [`builder`]: validates settings and resolves the delay policy ([`PollerBuilder`]);
//! - [`poller`]: runs the attempt / evaluate / wait loop ([`Poller`]).

mod builder;
mod config;
mod poller;

pub use builder::PollerBuilder;
pub use config::PollConfig;
pub use poller::Poller;
