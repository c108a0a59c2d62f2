//! Client identification.

use actix_web::dev::ConnectionInfo;

/// Address used to key per-client limits.
///
/// `Forwarded` and `X-Forwarded-For` are client-controlled unless a trusted
/// proxy rewrites them, so they are only read when `trust_forwarded` is set.
/// Otherwise the socket peer address is used.
pub fn client_address(info: &ConnectionInfo, trust_forwarded: bool) -> String {
    let addr = if trust_forwarded {
        info.realip_remote_addr()
    } else {
        info.peer_addr()
    };
    addr.unwrap_or("unknown").to_string()
}
