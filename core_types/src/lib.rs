//! # Core Types
//!
//! This crate defines the fundamental types shared by every Bucketview crate.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: Requests and sessions carry typed identifiers.
//! - **Validate at the edge**: A `BucketName` is checked once, when it is built.
//! - **No ambient state**: Identifiers are values passed around, never globals.
//!
//! ## Key Types
//!
//! - [`RequestId`]: Correlates an issued fetch with its log lines and response
//! - [`SessionId`]: Identifies one verified credential session
//! - [`BucketName`]: A bucket name accepted by the browser

pub mod bucket;
pub mod ids;

pub use bucket::{BucketName, BucketNameError};
pub use ids::{RequestId, SessionId};
