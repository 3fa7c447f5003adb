use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Delay between two waiter polls. Written either as a number of seconds or as
/// a string with an `s` or `m` suffix (`"30s"`, `"2m"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollInterval(Duration);

impl PollInterval {
    pub fn from_secs(secs: u64) -> Self {
        PollInterval(Duration::from_secs(secs))
    }

    pub fn duration(&self) -> Duration {
        self.0
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        PollInterval::from_secs(30)
    }
}

impl FromStr for PollInterval {
    type Err = String;

    fn from_str(v: &str) -> Result<Self, Self::Err> {
        let v = v.trim();
        let Some(last_char) = v.chars().last() else {
            return Err("poll interval cannot be empty".to_string());
        };

        let (num_part, multiplier) = match last_char {
            's' | 'S' => (&v[..v.len() - 1], 1),
            'm' | 'M' => (&v[..v.len() - 1], 60),
            _ => (v, 1),
        };
        num_part
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(multiplier))
            .map(PollInterval::from_secs)
            .ok_or_else(|| format!("invalid poll interval: {}", v))
    }
}

impl<'de> Deserialize<'de> for PollInterval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(PollIntervalVisitor)
    }
}

struct PollIntervalVisitor;

impl<'de> de::Visitor<'de> for PollIntervalVisitor {
    type Value = PollInterval;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number of seconds or a string ending with 's' or 'm'")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if v < 0 {
            return Err(E::custom("poll interval cannot be negative"));
        }
        Ok(PollInterval::from_secs(v as u64))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(PollInterval::from_secs(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

impl Serialize for PollInterval {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let secs = self.0.as_secs();
        if secs != 0 && secs % 60 == 0 {
            serializer.serialize_str(&format!("{}m", secs / 60))
        } else {
            serializer.serialize_str(&format!("{}s", secs))
        }
    }
}
