use std::fmt;

/// Security indicator reported by a validating engine for one resolution.
///
/// Only [`SecurityIndicator::SECURE`] means the answer was authenticated.
/// Insecure, bogus and indeterminate all collapse to "not secure" for callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SecurityIndicator(pub u8);

impl SecurityIndicator {
    pub const INDETERMINATE: SecurityIndicator = SecurityIndicator(0);
    pub const SECURE: SecurityIndicator = SecurityIndicator(1);
    pub const INSECURE: SecurityIndicator = SecurityIndicator(2);
    pub const BOGUS: SecurityIndicator = SecurityIndicator(3);

    pub fn is_secure(&self) -> bool {
        *self == Self::SECURE
    }

    pub fn is_bogus(&self) -> bool {
        *self == Self::BOGUS
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::INDETERMINATE => "Indeterminate",
            Self::SECURE => "Secure",
            Self::INSECURE => "Insecure",
            Self::BOGUS => "Bogus",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for SecurityIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.as_str(), self.0)
    }
}

/// Operation status of an engine call. Zero is success; negative values
/// identify engine-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineStatus(pub i32);

impl EngineStatus {
    pub const OK: EngineStatus = EngineStatus(0);
    pub const SOCKET: EngineStatus = EngineStatus(-1);
    pub const SYNTAX: EngineStatus = EngineStatus(-3);
    pub const SERVFAIL: EngineStatus = EngineStatus(-4);
    pub const INITFAIL: EngineStatus = EngineStatus(-7);

    pub fn is_ok(&self) -> bool {
        self.0 == 0
    }

    pub fn code(&self) -> i32 {
        self.0
    }

    pub fn describe(&self) -> &'static str {
        match *self {
            Self::OK => "no error",
            Self::SOCKET => "socket error",
            Self::SYNTAX => "syntax error",
            Self::SERVFAIL => "server failure",
            Self::INITFAIL => "initialization failure",
            _ => "unknown engine error",
        }
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.describe())
    }
}
