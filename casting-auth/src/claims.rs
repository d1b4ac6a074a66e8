use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Verified payload of a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Token issuer (`iss`)
    #[serde(rename = "iss")]
    pub issuer: String,
    /// Intended audiences (`aud`), a single string or a list on the wire
    #[serde(rename = "aud", deserialize_with = "one_or_many")]
    pub audience: Vec<String>,
    /// Principal the token was issued to (`sub`)
    #[serde(rename = "sub", default)]
    pub subject: Option<String>,
    /// Expiry as seconds since the Unix epoch (`exp`)
    #[serde(rename = "exp")]
    pub expires_at: u64,
    /// Issue time as seconds since the Unix epoch (`iat`)
    #[serde(rename = "iat", default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<u64>,
    /// Granted permission scopes; `None` when the claim is absent
    #[serde(default)]
    pub permissions: Option<BTreeSet<String>>,
}

impl ClaimSet {
    /// Whether the exact permission string was granted
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|granted| granted.contains(permission))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}
