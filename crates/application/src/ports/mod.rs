mod validating_engine;
mod wire_codec;

pub use validating_engine::{EngineResponse, RawResolution, ValidatingEngine};
pub use wire_codec::WireCodec;
