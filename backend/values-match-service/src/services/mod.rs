pub mod candidates;
pub mod geo;
pub mod matching;
pub mod questions;
pub mod scoring;

pub use candidates::{CandidateSource, SheetsCandidateSource, SourceError, StaticCandidateSource};
pub use geo::IpLocator;
pub use matching::MatchService;
pub use questions::QuestionBank;
pub use scoring::{AxisWeights, Scorer};
