//! Salted request signatures for credentialed form providers.

use sha2::{Digest, Sha256};

/// Hash used to sign a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignHash {
    Md5,
    Sha256,
}

/// Inputs of a salted signature.
#[derive(Debug, Clone)]
pub struct SignInput<'a> {
    pub app_id: &'a str,
    pub secret: &'a str,
    pub text: &'a str,
    pub salt: &'a str,
    /// Present for providers that sign `appId + input + salt + curtime + secret`.
    pub curtime: Option<&'a str>,
    /// Shorten long text to `first10 + length + last10` before hashing.
    pub truncate: bool,
}

/// Shortens `text` to its first 10 units, length, and last 10 units when it
/// is longer than 20 units.
///
/// Lengths and cut points are UTF-16 code units, the way the provider's
/// reference clients measure strings. Text outside the Basic Multilingual
/// Plane therefore counts twice per character.
pub fn truncate_input(text: &str) -> String {
    let units: Vec<u16> = text.encode_utf16().collect();
    let len = units.len();
    if len <= 20 {
        return text.to_string();
    }
    let head = String::from_utf16_lossy(&units[..10]);
    let tail = String::from_utf16_lossy(&units[len - 10..]);
    format!("{head}{len}{tail}")
}

/// Computes the lowercase hex signature for `input`.
pub fn sign(hash: SignHash, input: &SignInput<'_>) -> String {
    let text = if input.truncate {
        truncate_input(input.text)
    } else {
        input.text.to_string()
    };

    let mut payload = String::with_capacity(
        input.app_id.len() + text.len() + input.salt.len() + input.secret.len() + 16,
    );
    payload.push_str(input.app_id);
    payload.push_str(&text);
    payload.push_str(input.salt);
    if let Some(curtime) = input.curtime {
        payload.push_str(curtime);
    }
    payload.push_str(input.secret);

    match hash {
        SignHash::Md5 => format!("{:x}", md5::compute(payload.as_bytes())),
        SignHash::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(payload.as_bytes());
            hex::encode(hasher.finalize())
        }
    }
}
