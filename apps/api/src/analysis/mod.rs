pub mod extract;
pub mod gaps;
pub mod handlers;
pub mod job_match;
pub mod manifests;
pub mod matcher;
pub mod normalize;
pub mod portfolio;
pub mod store;
