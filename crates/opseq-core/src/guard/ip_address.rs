use super::Guard;
use ipnet::IpNet;
use std::net::IpAddr;

/// Matches the current host's address against an allow-list of exact
/// IPv4/IPv6 addresses or CIDR blocks, for either family. A missing or
/// empty list always passes.
pub struct IpAddressGuard {
    allowed: Vec<IpNet>,
    current: Vec<IpAddr>,
}

impl IpAddressGuard {
    pub fn new(allowed: Vec<IpNet>, current: Vec<IpAddr>) -> Self {
        IpAddressGuard { allowed, current }
    }

    pub fn parse(allowed: impl IntoIterator<Item = impl AsRef<str>>, current: Vec<IpAddr>) -> Result<Self, String> {
        let allowed = allowed
            .into_iter()
            .map(|s| parse_entry(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(IpAddressGuard { allowed, current })
    }
}

fn parse_entry(entry: &str) -> Result<IpNet, String> {
    if entry.contains('/') {
        entry.parse::<IpNet>().map_err(|e| format!("invalid CIDR {entry:?}: {e}"))
    } else {
        entry
            .parse::<IpAddr>()
            .map(IpNet::from)
            .map_err(|e| format!("invalid IP {entry:?}: {e}"))
    }
}

impl Guard for IpAddressGuard {
    fn name(&self) -> &str {
        "ip_address"
    }

    fn should_execute(&self) -> bool {
        self.allowed.is_empty() || self.current.iter().any(|ip| self.allowed.iter().any(|net| net.contains(ip)))
    }

    fn reason(&self) -> String {
        format!("addresses {:?} match none of {:?}", self.current, self.allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_allow_list_passes() {
        let g = IpAddressGuard::new(Vec::new(), vec!["10.0.0.5".parse().unwrap()]);
        assert!(g.should_execute());
    }

    #[test]
    fn exact_match_and_cidr_match() {
        let g = IpAddressGuard::parse(["10.0.0.5"], vec!["10.0.0.5".parse().unwrap()]).unwrap();
        assert!(g.should_execute());

        let g = IpAddressGuard::parse(["10.0.0.0/24"], vec!["10.0.0.200".parse().unwrap()]).unwrap();
        assert!(g.should_execute());

        let g = IpAddressGuard::parse(["10.0.1.0/24"], vec!["10.0.0.200".parse().unwrap()]).unwrap();
        assert!(!g.should_execute());
    }

    #[test]
    fn ipv6_cidr_match() {
        let g = IpAddressGuard::parse(["2001:db8::/32"], vec!["2001:db8::1".parse().unwrap()]).unwrap();
        assert!(g.should_execute());
    }
}
