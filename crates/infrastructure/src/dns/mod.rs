pub mod codec;
pub mod dnssec;
pub mod engine;
pub mod forwarding;
pub mod transport;
pub mod upstream;

pub use codec::HickoryWireCodec;
pub use engine::ValidatingStubEngine;
pub use upstream::{ResolvConf, UpstreamClient};
