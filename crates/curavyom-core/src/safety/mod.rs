//! Advisory safety checks over generated text.
//!
//! Both checks are total over arbitrary input and never modify the text
//! they inspect. Their results are meant to be attached as metadata.

mod fact_check;
pub mod patterns;
mod risk;

pub use fact_check::{verify, FactChecker};
pub use risk::{assess_risk, RiskDetector};
