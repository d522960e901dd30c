//! domcurl - curl for rendered pages
//!
//! This crate fetches a single URL through headless Chromium and emits
//! the rendered DOM, with curl-style shaping of the navigation request:
//! method and body overrides, extra headers, cookies, referer, and user
//! agent.
//!
//! # Architecture
//!
//! ```text
//! CLI options ──▶ {Cookie Parser, Header Builder} ──▶ NavigationOptions
//!                                                          │
//!                                                          ▼
//!                 Request Override Policy ◀──── Navigation Driver (CDP)
//!                   (per intercepted request)              │
//!                                                          ▼
//!                                              rendered HTML + header echo
//! ```
//!
//! The override policy is the heart of the pipeline: exactly one request
//! per run (the top-level navigation) may be rewritten; every
//! sub-resource request passes through untouched.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use domcurl::browser::NavigationDriver;
//! use domcurl::options::NavigationOptions;
//! use domcurl::output::Sink;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = NavigationOptions::builder("https://example.com")
//!         .method("POST")
//!         .body("a=1")
//!         .build()?;
//!
//!     NavigationDriver::new(options, Sink::stdout()).run().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod browser;
pub mod cookie;
pub mod error;
pub mod headers;
pub mod options;
pub mod output;
pub mod policy;

// Re-exports for convenience
pub use browser::NavigationDriver;
pub use cookie::Cookie;
pub use error::{Error, Result};
pub use options::{NavigationOptions, Viewport, WaitUntil};
pub use policy::RequestOverridePolicy;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
