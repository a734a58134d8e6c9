//! # Business Logic Services
//!
//! This module contains the core business logic services for the Fixly
//! application. Services encapsulate domain-specific functionality and
//! provide clean interfaces for use by HTTP handlers and middleware.
//!
//! ## Available Services
//!
//! - **JWT** (`jwt`) - JSON Web Token creation and validation
//! - **Password** (`password`) - Argon2 password hashing and verification

pub mod jwt;
pub mod password;
