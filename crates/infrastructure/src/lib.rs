//! splitdns infrastructure: UDP forwarding and DNS wire handling.
pub mod dns;
