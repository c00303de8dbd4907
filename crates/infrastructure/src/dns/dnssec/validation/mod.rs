mod chain;

pub use chain::{ChainVerifier, SignedRrset};

use ferrous_dnsq_domain::SecurityIndicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationResult {
    Secure,

    Insecure,

    Bogus,

    Indeterminate,
}

impl ValidationResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secure => "Secure",
            Self::Insecure => "Insecure",
            Self::Bogus => "Bogus",
            Self::Indeterminate => "Indeterminate",
        }
    }

    pub fn indicator(&self) -> SecurityIndicator {
        match self {
            Self::Secure => SecurityIndicator::SECURE,
            Self::Insecure => SecurityIndicator::INSECURE,
            Self::Bogus => SecurityIndicator::BOGUS,
            Self::Indeterminate => SecurityIndicator::INDETERMINATE,
        }
    }

    fn severity(&self) -> u8 {
        match self {
            Self::Secure => 0,
            Self::Indeterminate => 1,
            Self::Insecure => 2,
            Self::Bogus => 3,
        }
    }
}

/// Verdict for a response plus the reason when it is bogus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub result: ValidationResult,
    pub reason: Option<String>,
}

impl ValidationOutcome {
    pub fn secure() -> Self {
        Self {
            result: ValidationResult::Secure,
            reason: None,
        }
    }

    pub fn insecure() -> Self {
        Self {
            result: ValidationResult::Insecure,
            reason: None,
        }
    }

    pub fn indeterminate() -> Self {
        Self {
            result: ValidationResult::Indeterminate,
            reason: None,
        }
    }

    pub fn bogus(reason: impl Into<String>) -> Self {
        Self {
            result: ValidationResult::Bogus,
            reason: Some(reason.into()),
        }
    }

    pub fn is_secure(&self) -> bool {
        self.result == ValidationResult::Secure
    }

    /// Keeps the worse of two verdicts: bogus, then insecure, then
    /// indeterminate, then secure.
    pub fn merge(self, other: Self) -> Self {
        if other.result.severity() > self.result.severity() {
            other
        } else {
            self
        }
    }
}
