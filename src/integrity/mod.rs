//! Content digests and tamper checks.
//!
//! A forecast's digest covers only the fields that make up its claim
//! (what, when, where, how sure). Lifecycle state is left out, so a forecast
//! hashes the same before and after it is validated or invalidated.

pub mod verifier;
