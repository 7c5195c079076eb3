//! PRD and test-case drafting over pluggable text-generation providers.
//!
//! Provider failures never reach the caller: an unreachable provider, a
//! missing credential, a timeout or an unparseable reply all yield the
//! canned fallback documents from [`fallback`].

mod assembler;
mod error;
pub mod fallback;
pub mod parse;
pub mod prompts;
mod provider;
pub mod providers;

pub use assembler::{AssemblerConfig, Credentials, DraftAssembler, Drafted, GenerationOptions};
pub use error::{DraftError, DraftResult};
pub use prompts::RequirementBrief;
pub use provider::{catalog, ProviderId, ProviderInfo, TextProvider};
