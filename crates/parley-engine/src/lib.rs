pub mod builder;
pub mod orchestrator;
pub mod policy;

pub use builder::provider_chain;
pub use orchestrator::TranslationOrchestrator;
pub use policy::{Ineligible, eligible_text};

#[cfg(test)]
mod tests;
