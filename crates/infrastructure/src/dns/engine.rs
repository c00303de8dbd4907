use super::dnssec::{
    DnssecCache, DnssecValidator, TrustAnchor, TrustAnchorStore, ValidationOutcome,
    ValidationResult,
};
use super::upstream::{ResolvConf, UpstreamClient, UpstreamExchange};
use ferrous_dnsq_application::ports::{EngineResponse, RawResolution, ValidatingEngine};
use ferrous_dnsq_domain::{DomainError, EngineStatus, ResolverConfig};
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

/// Validating stub resolver: forwards each question to the `resolv.conf`
/// nameservers with DO and CD set, then validates the reply locally against
/// the installed trust anchors.
///
/// The public API is blocking; every call drives a private current-thread
/// runtime, so it must not be used from inside another tokio runtime.
pub struct ValidatingStubEngine {
    runtime: Runtime,
    client: Option<UpstreamClient>,
    validator: DnssecValidator,
    query_timeout: Duration,
    attempts: u32,
}

impl ValidatingStubEngine {
    pub fn new(settings: &ResolverConfig) -> Result<Self, DomainError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DomainError::IoError(format!("failed to start engine runtime: {}", e)))?;

        Ok(Self {
            runtime,
            client: None,
            validator: DnssecValidator::new(TrustAnchorStore::empty(), Arc::new(DnssecCache::new())),
            query_timeout: Duration::from_millis(settings.query_timeout_ms),
            attempts: settings.attempts,
        })
    }

    /// Point the engine at explicit upstreams instead of a `resolv.conf`.
    pub fn set_upstreams(&mut self, servers: Vec<SocketAddr>) {
        self.client = Some(UpstreamClient::new(servers, self.query_timeout, self.attempts));
    }

    pub fn upstream(&self) -> Option<&UpstreamClient> {
        self.client.as_ref()
    }

    pub fn trust_anchor_count(&self) -> usize {
        self.validator.trust_store().len()
    }

    async fn run_query(
        &self,
        client: &UpstreamClient,
        name: &Name,
        record_type: RecordType,
    ) -> EngineResponse {
        let exchange = match client.query(name, record_type).await {
            Ok(exchange) => exchange,
            Err(e) => {
                warn!(domain = %name, record_type = %record_type, error = %e, "Upstream query failed");
                let status = match e {
                    DomainError::IoError(_) => EngineStatus::SOCKET,
                    _ => EngineStatus::SERVFAIL,
                };
                return EngineResponse::failed(status, e.to_string());
            }
        };

        debug!(
            domain = %name,
            server = %exchange.server,
            latency_ms = exchange.latency_ms,
            "Upstream answered"
        );

        let outcome = self
            .validator
            .validate(client, name, record_type, &exchange.response)
            .await;

        match Self::build_resolution(&exchange, name, record_type, outcome) {
            Ok(resolution) => EngineResponse::ok(resolution),
            Err(e) => {
                warn!(domain = %name, error = %e, "Failed to assemble resolution");
                EngineResponse::failed(EngineStatus::SERVFAIL, e.to_string())
            }
        }
    }

    fn build_resolution(
        exchange: &UpstreamExchange,
        name: &Name,
        record_type: RecordType,
        outcome: ValidationOutcome,
    ) -> Result<RawResolution, DomainError> {
        let security = outcome.result.indicator();
        let response = &exchange.response;

        // A bogus answer is withheld, the way validating resolvers answer SERVFAIL.
        if outcome.result == ValidationResult::Bogus {
            let mut resolution = RawResolution::new(
                u16::from(ResponseCode::ServFail),
                security,
                0,
                exchange.raw.clone(),
            );
            resolution.why_bogus = outcome.reason;
            return Ok(resolution);
        }

        let chain = response.answer_chain(name, record_type);
        let records: Vec<&Record> = response.chain_answers(&chain, record_type).collect();
        let answers = records
            .iter()
            .map(|record| encode_rdata(record.data()))
            .collect::<Result<Vec<_>, _>>()?;

        let ttl = records
            .iter()
            .map(|record| record.ttl())
            .min()
            .or_else(|| response.negative_ttl())
            .unwrap_or(0);

        let mut resolution = RawResolution::new(
            u16::from(response.rcode),
            security,
            ttl,
            exchange.raw.clone(),
        )
        .with_answers(answers);
        resolution.canonical_name = chain.target().map(Name::to_utf8);

        Ok(resolution)
    }
}

impl ValidatingEngine for ValidatingStubEngine {
    fn load_resolver_config(&mut self, path: &str) -> Result<(), DomainError> {
        let conf = ResolvConf::from_file(path)?;

        let timeout = conf.timeout.unwrap_or(self.query_timeout);
        let attempts = conf.attempts.unwrap_or(self.attempts);

        info!(
            path = %path,
            nameservers = conf.nameservers.len(),
            timeout_ms = timeout.as_millis() as u64,
            attempts,
            "Resolver configuration loaded"
        );

        self.client = Some(UpstreamClient::new(conf.nameservers, timeout, attempts));
        Ok(())
    }

    fn add_trust_anchor(&mut self, anchor: &str) -> Result<(), DomainError> {
        let anchor = TrustAnchor::parse(anchor)?;

        info!(
            zone = %anchor.zone,
            key_tag = anchor.key_tag(),
            algorithm = anchor.dnskey.algorithm,
            "Trust anchor installed"
        );

        self.validator.trust_store_mut().add_anchor(anchor);
        Ok(())
    }

    fn resolve(&self, qname: &str, qtype: u16, qclass: u16) -> EngineResponse {
        if DNSClass::from(qclass) != DNSClass::IN {
            return EngineResponse::failed(
                EngineStatus::SYNTAX,
                format!("unsupported query class {}", qclass),
            );
        }

        let Some(client) = &self.client else {
            return EngineResponse::failed(
                EngineStatus::INITFAIL,
                "resolver configuration not loaded",
            );
        };

        let name = match parse_qname(qname) {
            Ok(name) => name,
            Err(e) => return EngineResponse::failed(EngineStatus::SYNTAX, e.to_string()),
        };
        let record_type = RecordType::from(qtype);

        debug!(domain = %name, record_type = %record_type, "Resolving");
        let response = self.runtime.block_on(self.run_query(client, &name, record_type));

        let stats = self.validator.cache_stats();
        debug!(
            dnskey_hits = stats.dnskey_hits,
            ds_hits = stats.ds_hits,
            "DNSSEC cache usage"
        );
        response
    }
}

fn parse_qname(qname: &str) -> Result<Name, DomainError> {
    let trimmed = qname.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidDomainName(qname.to_string()));
    }

    let fqdn = if trimmed.ends_with('.') {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    };

    Name::from_str(&fqdn).map_err(|e| DomainError::InvalidDomainName(format!("{}: {}", qname, e)))
}

/// RDATA in uncompressed wire form, so each answer decodes on its own.
fn encode_rdata(rdata: &RData) -> Result<Vec<u8>, DomainError> {
    let mut bytes = Vec::new();
    {
        let mut encoder = BinEncoder::new(&mut bytes);
        encoder.set_canonical_form(true);
        rdata
            .emit(&mut encoder)
            .map_err(|e| DomainError::InvalidDnsResponse(format!("failed to encode RDATA: {}", e)))?;
    }
    Ok(bytes)
}
