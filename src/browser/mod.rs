//! Browser orchestration module
//!
//! This module drives the headless browser through ChromiumOxide:
//! session lifecycle, request interception, trace capture, and the
//! navigation state machine.

pub mod driver;
pub mod intercept;
pub mod session;
pub mod trace;

pub use driver::NavigationDriver;
pub use intercept::ResponseInfo;
pub use session::BrowserSession;
pub use trace::TraceRecorder;
