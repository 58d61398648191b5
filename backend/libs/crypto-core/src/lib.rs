//! Shared cryptographic helpers for Meetapp services.
//!
//! Currently this is the RS256 JWT layer: every service that authenticates
//! requests validates tokens through [`jwt`] so that key handling and the
//! accepted algorithm stay identical across the platform.

pub mod jwt;
