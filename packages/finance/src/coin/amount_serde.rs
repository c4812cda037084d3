use std::str::FromStr;

use serde::{de::Error as DeError, Deserialize, Deserializer, Serializer};

use super::Amount;

pub(super) fn serialize<S>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(amount)
}

pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer)
        .and_then(|value| Amount::from_str(&value).map_err(DeError::custom))
}
