//! Routing identifier generation.

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

/// Random alphanumeric token drawn from the OS CSPRNG.
///
/// 16 characters carry about 95 bits of entropy.
pub fn generate_id(len: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
