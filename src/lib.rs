//! # api-chain
//!
//! Sequential HTTP request chains with response-to-request data threading.
//!
//! A chain is an ordered list of steps. Each step issues one HTTP request,
//! and a step that opts in can splice fields of the previous step's JSON
//! response into its own URL or body before sending. Steps run strictly in
//! order; the first failure halts the run and is recorded on the step that
//! failed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use api_chain::{Chain, Step};
//!
//! # async fn demo() -> Result<(), api_chain::ChainError> {
//! let mut chain = Chain::new("post-then-comment")
//!     .step(Step::get("https://jsonplaceholder.typicode.com/posts/1"))
//!     .step(Step::post("https://jsonplaceholder.typicode.com/comments")
//!         .with_field("postId", "{id}")
//!         .with_field("body", "Great post!")
//!         .use_last_response())
//!     .build();
//!
//! let report = chain.run().await?;
//! println!("attempted {} steps", report.attempted);
//! # Ok(())
//! # }
//! ```
//!
//! ## YAML Definition
//!
//! ```yaml
//! name: post-then-comment
//! steps:
//!   - kind: get
//!     url: https://jsonplaceholder.typicode.com/posts/1
//!   - kind: post
//!     url: https://jsonplaceholder.typicode.com/comments
//!     body:
//!       postId: "{id}"
//!       body: "Great post!"
//!     use_last_response: true
//! ```

mod chain;
mod context;
mod error;
mod executor;
mod step;
pub mod yaml;

pub use chain::{Chain, ChainBuilder};
pub use context::Context;
pub use error::{ChainError, StepError};
pub use executor::{execute, Executor, RunReport, RunStatus, COMMENTS_ENDPOINT};
pub use step::{RequestKind, Step, StepBuilder, StepOutcome};
pub use yaml::parse_yaml;

/// Re-export common types
pub use serde_json::Value;
