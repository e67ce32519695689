pub mod dns;

pub use dns::{Resolution, ResolutionOutcome, ResolveQueryUseCase};
