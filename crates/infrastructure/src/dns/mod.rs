pub mod forwarding;
pub mod response_builder;
pub mod server;
pub mod transport;

pub use forwarding::UdpForwarder;
pub use response_builder::ResponseBuilder;
pub use server::DnsServerHandler;
