//! Client-side core of the e-learning admin dashboard's category manager.
//!
//! The admin REST API owns persistence; this crate fetches the flat category
//! list, derives the three-level tree views from it, tracks filter and expansion
//! state, and validates mutations before sending them.

pub mod core;
pub mod features;
pub mod shared;
