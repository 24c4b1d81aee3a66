//! System resolver discovery from `/etc/resolv.conf`.
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use tracing::{debug, warn};

pub const RESOLV_CONF_PATH: &str = "/etc/resolv.conf";

const FALLBACK_RESOLVERS: [SocketAddr; 2] = [
    SocketAddr::new(IpAddr::V4(std::net::Ipv4Addr::new(1, 1, 1, 1)), 53),
    SocketAddr::new(IpAddr::V4(std::net::Ipv4Addr::new(8, 8, 8, 8)), 53),
];

/// `nameserver` lines of a resolv.conf, on port 53. Comments, other
/// directives and unparsable addresses are skipped.
pub fn parse_resolv_conf(content: &str) -> Vec<SocketAddr> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            if parts.next() != Some("nameserver") {
                return None;
            }
            // Scoped IPv6 (`fe80::1%eth0`) is not routable from here.
            parts.next()?.parse::<IpAddr>().ok()
        })
        .map(|ip| SocketAddr::new(ip, 53))
        .collect()
}

pub fn read_resolvers(path: &Path) -> Option<Vec<SocketAddr>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Cannot read resolver config");
            return None;
        }
    };

    let resolvers = parse_resolv_conf(&content);
    if resolvers.is_empty() {
        None
    } else {
        Some(resolvers)
    }
}

/// System resolvers, or Cloudflare and Google when none can be read.
pub fn system_resolvers() -> Vec<SocketAddr> {
    read_resolvers(Path::new(RESOLV_CONF_PATH)).unwrap_or_else(|| {
        warn!(
            path = RESOLV_CONF_PATH,
            "No usable nameserver entries, falling back to public resolvers"
        );
        FALLBACK_RESOLVERS.to_vec()
    })
}
