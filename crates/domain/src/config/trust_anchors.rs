use serde::{Deserialize, Serialize};

/// Root zone KSK-2017, key tag 20326.
pub const ROOT_KSK_2017: &str = concat!(
    ". DNSKEY 257 3 8 ",
    "AwEAAaz/tAm8yTn4Mfeh5eyI96WSVexTBAvkMgJzkKTOiW1vkIbzxeF3 ",
    "+/4RgWOq7HrxRixHlFlExOLAJr5emLvN7SWXgnLh4+B5xQlNVz8Og8kv ",
    "ArMtNROxVQuCaSnIDdD5LKyWbRd2n9WGe2R8PzgCmr3EgVLrjyBxWezF ",
    "0jLHwVN8efS3rCj/EWgvIWgb9tarpVUDK/b58Da+sqqls3eNbuv7pr+e ",
    "oZG+SrDK6nWeL3c6H5Apxz7LjVc1uTIdsIXxuOLYA4/ilBmSVIzuDWfd ",
    "RUfhHdY6+cn8HFRm+2hM8AnXGXws9555KrUB5qihylGa8subX2Nn6UwN ",
    "R1AkUTV74bU="
);

/// Ordered list of DNSKEY trust anchors in presentation format.
///
/// Loaded once at startup and installed into the resolution context before
/// the first query; never modified afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrustAnchorConfig {
    #[serde(default = "default_anchors")]
    pub anchors: Vec<String>,
}

impl Default for TrustAnchorConfig {
    fn default() -> Self {
        Self {
            anchors: default_anchors(),
        }
    }
}

fn default_anchors() -> Vec<String> {
    vec![ROOT_KSK_2017.to_string()]
}
