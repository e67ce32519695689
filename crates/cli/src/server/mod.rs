pub mod dns;

pub use dns::{bind_listeners, run_udp_listener};
