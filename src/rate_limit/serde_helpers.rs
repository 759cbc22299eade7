//! Serde helpers for rate limit configuration.

use serde::{Deserializer, Serializer, de};

/// Serialize/deserialize a `Duration` as a number of seconds.
///
/// Whole and fractional seconds are both accepted when deserializing.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use serde::{Serialize, Deserialize};
/// use shop_api_client::rate_limit::serde_helpers::duration_secs;
///
/// #[derive(Serialize, Deserialize, Debug, PartialEq)]
/// struct Settings {
///     #[serde(with = "duration_secs")]
///     wait: Duration,
/// }
///
/// let settings: Settings = serde_json::from_str(r#"{"wait":2.5}"#).unwrap();
/// assert_eq!(settings.wait, Duration::from_millis(2500));
///
/// let json = serde_json::to_string(&Settings { wait: Duration::from_secs(5) }).unwrap();
/// assert_eq!(json, r#"{"wait":5}"#);
/// ```
pub mod duration_secs {
    use std::fmt;
    use std::time::Duration;

    use super::*;

    /// Serialize a Duration as seconds, using an integer when there is no fraction.
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_nanos() == 0 {
            serializer.serialize_u64(duration.as_secs())
        } else {
            serializer.serialize_f64(duration.as_secs_f64())
        }
    }

    /// Deserialize a non-negative number of seconds into a Duration.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SecondsVisitor)
    }

    struct SecondsVisitor;

    impl de::Visitor<'_> for SecondsVisitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a non-negative number of seconds")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u64::try_from(value)
                .map(Duration::from_secs)
                .map_err(|_| E::custom(format!("negative duration: {value}")))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Duration::try_from_secs_f64(value).map_err(E::custom)
        }
    }
}
