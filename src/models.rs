use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Integer that the upstream API sends either as a JSON number or as a
/// string of digits. Both encodings parse to the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LooseInt(pub i64);

impl LooseInt {
    pub fn value(self) -> i64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for LooseInt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LooseIntVisitor;

        impl<'de> Visitor<'de> for LooseIntVisitor {
            type Value = LooseInt;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer or a string containing an integer")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<LooseInt, E> {
                Ok(LooseInt(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<LooseInt, E> {
                i64::try_from(v)
                    .map(LooseInt)
                    .map_err(|_| E::custom(format!("integer {} out of range", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<LooseInt, E> {
                v.trim()
                    .parse::<i64>()
                    .map(LooseInt)
                    .map_err(|_| E::custom(format!("invalid integer string: {:?}", v)))
            }
        }

        deserializer.deserialize_any(LooseIntVisitor)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "event")]
    pub year: String,
    #[serde(default)]
    pub owner_id: Option<LooseInt>,
    #[serde(default)]
    pub members: BTreeMap<String, Member>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub id: Option<LooseInt>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub global_score: i64,
    #[serde(default)]
    pub local_score: i64,
    #[serde(default)]
    pub stars: i64,
    #[serde(default)]
    pub last_star_ts: LooseInt,
    /// day number -> part number -> completion
    #[serde(default, rename = "completion_day_level")]
    pub completion_day_levels: BTreeMap<u32, BTreeMap<u32, StarCompletion>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarCompletion {
    pub get_star_ts: LooseInt,
}

impl Event {
    pub fn from_json(body: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

impl Member {
    /// Falls back to the members map key when the payload omits `id`.
    pub fn resolve_id(&self, key: &str) -> Option<i64> {
        self.id
            .map(LooseInt::value)
            .or_else(|| key.trim().parse().ok())
    }

    pub fn display_name(&self, id: i64) -> String {
        if self.name.is_empty() {
            id.to_string()
        } else {
            self.name.clone()
        }
    }

    pub fn star_ts(&self, day: u32, part: u32) -> Option<i64> {
        self.completion_day_levels
            .get(&day)
            .and_then(|parts| parts.get(&part))
            .map(|c| c.get_star_ts.value())
    }
}
