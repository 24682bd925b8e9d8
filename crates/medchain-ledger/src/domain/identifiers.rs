//! Patient and record identifier generation
//!
//! Identifiers mix wall-clock time with a random base36 tail. Uniqueness is
//! best effort: two ids minted in the same millisecond collide only if their
//! random tails collide too.

use crate::config::IdentifierConfig;
use chrono::{DateTime, Utc};
use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates human-traceable, likely-unique identifiers
#[derive(Clone, Debug, Default)]
pub struct IdentifierGenerator {
    config: IdentifierConfig,
}

impl IdentifierGenerator {
    /// Create a generator with the given limits
    pub fn new(config: IdentifierConfig) -> Self {
        Self { config }
    }

    /// `"{name prefix}_{millis base36}_{random}"`, truncated to the configured maximum
    pub fn patient_id(&self, patient_name: &str, now: DateTime<Utc>) -> String {
        self.patient_id_with_rng(patient_name, now, &mut rand::thread_rng())
    }

    /// `"rec_{millis}_{random}"`
    pub fn record_id(&self, now: DateTime<Utc>) -> String {
        self.record_id_with_rng(now, &mut rand::thread_rng())
    }

    /// [`patient_id`](Self::patient_id) with a caller-supplied random source
    pub fn patient_id_with_rng<R: Rng + ?Sized>(
        &self,
        patient_name: &str,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> String {
        let prefix: String = patient_name
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .take(self.config.name_prefix_len)
            .collect();

        let id = format!(
            "{}_{}_{}",
            prefix,
            to_base36(unix_millis(now)),
            random_base36(rng, self.config.random_len)
        );

        id.chars().take(self.config.patient_id_max_len).collect()
    }

    /// [`record_id`](Self::record_id) with a caller-supplied random source
    pub fn record_id_with_rng<R: Rng + ?Sized>(&self, now: DateTime<Utc>, rng: &mut R) -> String {
        format!(
            "rec_{}_{}",
            unix_millis(now),
            random_base36(rng, self.config.random_len)
        )
    }
}

fn unix_millis(now: DateTime<Utc>) -> u64 {
    u64::try_from(now.timestamp_millis()).unwrap_or(0)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

fn random_base36<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}
