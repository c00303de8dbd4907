use ferrous_dnsq_domain::DomainError;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

const DNS_PORT: u16 = 53;

/// The parts of a `resolv.conf(5)` file a stub resolver needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvConf {
    pub nameservers: Vec<SocketAddr>,
    pub timeout: Option<Duration>,
    pub attempts: Option<u32>,
}

impl ResolvConf {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DomainError::ResolverConfig(format!("{}: {}", path.display(), e)))?;

        let conf = Self::parse(&contents).map_err(|e| match e {
            DomainError::ResolverConfig(msg) => {
                DomainError::ResolverConfig(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        debug!(
            path = %path.display(),
            nameservers = conf.nameservers.len(),
            "Loaded resolver configuration"
        );
        Ok(conf)
    }

    pub fn parse(contents: &str) -> Result<Self, DomainError> {
        let mut nameservers = Vec::new();
        let mut timeout = None;
        let mut attempts = None;

        for line in contents.lines() {
            let line = match line.find(['#', ';']) {
                Some(pos) => &line[..pos],
                None => line,
            };

            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("nameserver") => {
                    let Some(address) = tokens.next() else {
                        continue;
                    };
                    match Self::parse_nameserver(address) {
                        Some(ip) => nameservers.push(SocketAddr::new(ip, DNS_PORT)),
                        None => warn!(address = %address, "Ignoring unparsable nameserver"),
                    }
                }
                Some("options") => {
                    for option in tokens {
                        if let Some(value) = option.strip_prefix("timeout:") {
                            if let Ok(secs) = value.parse::<u64>() {
                                timeout = Some(Duration::from_secs(secs.max(1)));
                            }
                        } else if let Some(value) = option.strip_prefix("attempts:") {
                            if let Ok(count) = value.parse::<u32>() {
                                attempts = Some(count.max(1));
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        if nameservers.is_empty() {
            return Err(DomainError::ResolverConfig(
                "no usable nameserver entry".to_string(),
            ));
        }

        Ok(Self {
            nameservers,
            timeout,
            attempts,
        })
    }

    fn parse_nameserver(address: &str) -> Option<IpAddr> {
        let address = address.split('%').next().unwrap_or(address);
        address.parse().ok()
    }
}
