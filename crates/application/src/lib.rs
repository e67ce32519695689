//! splitdns application layer: the resolution decision and the upstream
//! fallback policy, independent of any socket or wire format.
pub mod ports;
pub mod services;
pub mod use_cases;
