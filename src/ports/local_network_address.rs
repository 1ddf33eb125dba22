use std::net::{IpAddr, UdpSocket};

use crate::global_constants::{LOCAL_ADDRESS_FALLBACK, LOCAL_ADDRESS_PROBE_TARGET, LOG_TAG_NETWORK};

/// LAN address other devices can reach this host on. Connecting a UDP socket
/// only selects a route, nothing is sent.
pub fn resolve_local_ip_address() -> String {
    match query_outbound_interface_address() {
        Ok(address) if !address.is_loopback() && !address.is_unspecified() => {
            log::info!("{} local address: {}", LOG_TAG_NETWORK, address);
            address.to_string()
        }
        Ok(address) => {
            log::warn!(
                "{} outbound address {} is not routable, using {}",
                LOG_TAG_NETWORK,
                address,
                LOCAL_ADDRESS_FALLBACK
            );
            LOCAL_ADDRESS_FALLBACK.to_string()
        }
        Err(e) => {
            log::warn!(
                "{} failed to resolve local address: {}, using {}",
                LOG_TAG_NETWORK,
                e,
                LOCAL_ADDRESS_FALLBACK
            );
            LOCAL_ADDRESS_FALLBACK.to_string()
        }
    }
}

fn query_outbound_interface_address() -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect(LOCAL_ADDRESS_PROBE_TARGET)?;
    Ok(socket.local_addr()?.ip())
}
