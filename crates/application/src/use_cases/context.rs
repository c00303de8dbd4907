use crate::ports::ValidatingEngine;
use ferrous_dnsq_domain::DomainError;
use tracing::{debug, info, warn};

/// Setup phase of a resolution context.
///
/// The first failed step poisons the builder: every later step and `build()`
/// return that error, so a context with a partial trust store never exists.
pub struct ContextBuilder<E: ValidatingEngine> {
    engine: E,
    resolver_config: Option<String>,
    trust_anchors: Vec<String>,
    failure: Option<DomainError>,
}

impl<E: ValidatingEngine> ContextBuilder<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            resolver_config: None,
            trust_anchors: Vec::new(),
            failure: None,
        }
    }

    pub fn load_resolver_config(&mut self, path: &str) -> Result<(), DomainError> {
        self.check_poisoned()?;

        match self.engine.load_resolver_config(path) {
            Ok(()) => {
                debug!(path = %path, "Resolver configuration loaded");
                self.resolver_config = Some(path.to_string());
                Ok(())
            }
            Err(e) => {
                let error = match e {
                    DomainError::ResolverConfig(_) => e,
                    other => DomainError::ResolverConfig(format!("{}: {}", path, other)),
                };
                Err(self.poison(error))
            }
        }
    }

    pub fn install_trust_anchor(&mut self, anchor: &str) -> Result<(), DomainError> {
        self.check_poisoned()?;

        match self.engine.add_trust_anchor(anchor) {
            Ok(()) => {
                debug!(anchor = %anchor, "Trust anchor installed");
                self.trust_anchors.push(anchor.to_string());
                Ok(())
            }
            Err(e) => {
                let error = match e {
                    DomainError::InvalidTrustAnchor(_) => e,
                    other => DomainError::InvalidTrustAnchor(other.to_string()),
                };
                Err(self.poison(error))
            }
        }
    }

    pub fn is_poisoned(&self) -> bool {
        self.failure.is_some()
    }

    pub fn build(self) -> Result<ResolutionContext<E>, DomainError> {
        if let Some(error) = self.failure {
            return Err(error);
        }

        let resolver_config = self.resolver_config.ok_or_else(|| {
            DomainError::ResolverConfig("resolver configuration was never loaded".to_string())
        })?;

        if self.trust_anchors.is_empty() {
            return Err(DomainError::InvalidTrustAnchor(
                "no trust anchor installed".to_string(),
            ));
        }

        info!(
            resolv_conf = %resolver_config,
            anchors = self.trust_anchors.len(),
            "Resolution context ready"
        );

        Ok(ResolutionContext {
            engine: self.engine,
            resolver_config,
            trust_anchors: self.trust_anchors,
        })
    }

    fn check_poisoned(&self) -> Result<(), DomainError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn poison(&mut self, error: DomainError) -> DomainError {
        warn!(error = %error, "Resolution context setup failed");
        self.failure = Some(error.clone());
        error
    }
}

/// A configured engine plus the trust anchors it was given. Read-only once
/// built; any number of queries may be issued against it.
pub struct ResolutionContext<E: ValidatingEngine> {
    engine: E,
    resolver_config: String,
    trust_anchors: Vec<String>,
}

impl<E: ValidatingEngine> ResolutionContext<E> {
    /// Create, load the resolver configuration, then install every anchor in
    /// order. Stops at the first failure.
    pub fn setup<I, S>(engine: E, resolv_conf: &str, anchors: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = ContextBuilder::new(engine);
        builder.load_resolver_config(resolv_conf)?;
        for anchor in anchors {
            builder.install_trust_anchor(anchor.as_ref())?;
        }
        builder.build()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn resolver_config(&self) -> &str {
        &self.resolver_config
    }

    pub fn trust_anchors(&self) -> &[String] {
        &self.trust_anchors
    }
}
