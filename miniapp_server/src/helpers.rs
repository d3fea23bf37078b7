use rand::{thread_rng, RngCore};

/// Generates a fresh payment reference: 16 random bytes rendered as 32 lowercase hex characters, no
/// separators. References are single-use; each payment attempt gets a new one.
pub fn new_payment_reference() -> String {
    let mut bytes = [0u8; 16];
    thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
