//! # Utility Modules
//!
//! This module contains utility constants and validators used throughout
//! the Fixly application.
//!
//! ## Available Utilities
//!
//! - **Constants** (`constant`) - Application-wide configuration constants
//! - **Validators** (`validator`) - Input validation regex patterns

pub mod constant;
pub mod validator;
