#![no_std]

//! Types and helpers shared by every contract in a loan set.

pub mod guard;
pub mod math;
pub mod types;

pub use types::{LoanParams, LoanStatus, LoanTerms, TimeUnit};
