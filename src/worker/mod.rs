//! Job lifecycle: dispatch, status polling and result relay.

pub mod dispatch;
pub mod poller;
pub mod relay;

pub use dispatch::{DispatchOutcome, dispatch};
pub use poller::poll_job;
pub use relay::{deliver_results, finish_job};
