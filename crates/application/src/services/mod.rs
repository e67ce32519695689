pub mod upstream_forwarder;

pub use upstream_forwarder::{AttemptOutcome, UpstreamAnswer, UpstreamForwarder};
