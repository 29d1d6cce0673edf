//! # QBank API Server Library
//!
//! HTTP surface of the interview question bank: sessions, interview
//! submissions, the shared question bank and the admin bulk account import.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers and session guards
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
