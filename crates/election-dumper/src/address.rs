use bech32::{ToBase32, Variant};

/// Human-readable part of chain account addresses.
const ACCOUNT_HRP: &str = "io";

/// Length of an account payload (hash of the public key).
const ACCOUNT_PAYLOAD_LEN: usize = 20;

/// Render raw voter bytes as an `io1…` account address.
///
/// `None` when the bytes are not an account payload.
pub fn io_address(voter: &[u8]) -> Option<String> {
    if voter.len() != ACCOUNT_PAYLOAD_LEN {
        return None;
    }
    bech32::encode(ACCOUNT_HRP, voter.to_base32(), Variant::Bech32).ok()
}
