//! Specialist agents consulted by topic handlers.
//!
//! A specialist answers one narrow question (clinical trials, patents,
//! market data, ...) from a research provider. Handlers fan out to several
//! of them and synthesize the reports.

mod fanout;
mod traits;
mod workers;

pub use fanout::{consult_all, consult_one, FanOut};
pub use traits::{AgentError, Specialist, SpecialistKind, SpecialistReport};
pub use workers::{
    specialist_for, ClinicalSpecialist, DocSpecialist, MarketSpecialist, PatentSpecialist,
    RegulatorySpecialist, SearchSpecialist,
};
