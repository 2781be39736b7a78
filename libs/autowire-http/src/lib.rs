//! HTTP protocol runtime for autowire.
//!
//! Endpoints bound through [`HttpRuntime`] are served under a configurable
//! root path:
//!
//! | Method | Path                          | Action                          |
//! |--------|-------------------------------|---------------------------------|
//! | GET    | `{root}`                      | list bound endpoints            |
//! | GET    | `{root}/{endpoint}`           | describe one endpoint           |
//! | POST   | `{root}/{endpoint}/{op}`      | invoke `op` with a JSON payload |
//!
//! `POST {root}/{op}` addresses the endpoint bound at `/`.

pub mod config;
pub mod problem;
mod router;
pub mod runtime;

pub use config::HttpConfig;
pub use problem::{APPLICATION_PROBLEM_JSON, Problem};
pub use runtime::HttpRuntime;
