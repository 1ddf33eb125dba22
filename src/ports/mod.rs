mod local_network_address;
mod xcap_display_enumerator;

pub use local_network_address::resolve_local_ip_address;
pub use xcap_display_enumerator::XcapDisplayEnumerator;
