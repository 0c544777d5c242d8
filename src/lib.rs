//! # LearnHub API
//!
//! A REST API built with Rust, Axum, and PostgreSQL for a learning
//! platform: courses, lessons, assignments, submissions, and grades.
//!
//! ## Overview
//!
//! - **Courses**: catalog with category/level filters, publishing, and
//!   student enrollment
//! - **Lessons**: ordered course content with a dense, gapless sequence
//!   maintained on insert and delete
//! - **Assignments**: due-date-gated submissions with
//!   at-most-one-per-student semantics and instructor grading
//! - **Access control**: a pure evaluator deciding every read/write/
//!   enroll/submit/grade against the principal's role, course ownership
//!   and enrollment
//!
//! ## Architecture
//!
//! The codebase follows a modular architecture inspired by NestJS:
//!
//! ```text
//! src/
//! ├── config/           # Configuration modules (JWT, database, CORS)
//! ├── middleware/       # Auth middleware and extractors
//! ├── modules/          # Feature modules
//! │   ├── courses/     # Course catalog and enrollment
//! │   ├── lessons/     # Lesson content and ordering
//! │   ├── assignments/ # Assignments, submissions, grading
//! │   └── users/       # Shared user types
//! └── utils/           # Shared utilities (errors, JWT, pagination)
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `model.rs`: Data models, DTOs, database structs
//! - `router.rs`: Axum router configuration
//!
//! Authentication itself is delegated to an external identity provider;
//! this service verifies the bearer token's signature and expiry and
//! trusts the embedded user id and role.

pub mod access;
pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;
