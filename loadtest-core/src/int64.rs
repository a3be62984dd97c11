//! Serde helpers for protobuf int64 values
//!
//! The protobuf JSON mapping encodes 64-bit integers as strings. Readers accept
//! both strings and numbers, writers always emit strings.

use serde::Deserialize;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(i64),
    Text(String),
}

impl Repr {
    fn into_i64<E: de::Error>(self) -> Result<i64, E> {
        match self {
            Repr::Number(n) => Ok(n),
            Repr::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid int64 value: {:?}", s))),
        }
    }
}

pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Repr::deserialize(deserializer)?.into_i64()
}

/// `map<int64, int64>` fields, e.g. response code counters
pub mod map {
    use std::collections::BTreeMap;

    use serde::de::{Deserialize, Deserializer};
    use serde::ser::{SerializeMap, Serializer};

    use super::Repr;

    pub fn serialize<S: Serializer>(
        value: &BTreeMap<i64, i64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(value.len()))?;
        for (k, v) in value {
            map.serialize_entry(&k.to_string(), &v.to_string())?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<i64, i64>, D::Error> {
        let raw = BTreeMap::<String, Repr>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(k, v)| {
                let key = k.trim().parse::<i64>().map_err(|_| {
                    <D::Error as serde::de::Error>::custom(format!("invalid int64 map key: {:?}", k))
                })?;
                Ok((key, v.into_i64::<D::Error>()?))
            })
            .collect()
    }
}
