//! Rotating seed token used by the credential-free default provider.
//!
//! The token is a deterministic function of the input text and a seed pair.
//! The seed pair is published in a remote script and rotates; [`TokenKeeper`]
//! caches it for an hour and falls back to a locally generated pair when the
//! script cannot be fetched.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Script that publishes the current seed pair.
pub const SEED_SCRIPT_URL: &str = "https://translate.googleapis.com/translate_a/element.js";

const SEED_TTL: Duration = Duration::from_secs(60 * 60);

/// Per-code-unit scramble pattern.
const ROUND_PATTERN: &[u8] = b"+-a^+6";
/// Final scramble pattern.
const FINAL_PATTERN: &[u8] = b"+-3^+b+-f";

/// The seed pair a token is computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    pub a: i64,
    pub b: i64,
}

impl Seed {
    pub const fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }

    fn random() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            a: rng.gen_range(400_000..500_000),
            b: i64::from(rng.r#gen::<u32>()),
        }
    }
}

/// Applies a rotation pattern to the accumulator.
///
/// Each 3-byte group is `[op, dir, amount]`: `dir == '+'` shifts right
/// (unsigned), otherwise left; `op == '+'` adds (wrapping to 32 bits),
/// otherwise xors. Amounts are single hex-like digits (`a` = 10).
fn scramble(mut acc: i64, pattern: &[u8]) -> i64 {
    for group in pattern.chunks_exact(3) {
        let amount = group[2];
        let shift = u32::from(if amount >= b'a' {
            amount - 87
        } else {
            amount - b'0'
        });

        let operand = if group[1] == b'+' {
            i64::from((acc as u32) >> shift)
        } else {
            i64::from((acc as i32).wrapping_shl(shift))
        };

        acc = if group[0] == b'+' {
            i64::from(acc.wrapping_add(operand) as i32)
        } else {
            i64::from((acc as i32) ^ (operand as i32))
        };
    }
    acc
}

/// Expands UTF-16 code units into the byte values the token folds over.
///
/// Surrogate pairs become 4-byte sequences; a lone surrogate is encoded as
/// a 3-byte sequence like any other unit >= 2048.
fn token_bytes(text: &str) -> Vec<i64> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let mut bytes = Vec::with_capacity(units.len() * 3);
    let mut i = 0;

    while i < units.len() {
        let mut c = i64::from(units[i]);
        if c < 128 {
            bytes.push(c);
        } else {
            if c < 2048 {
                bytes.push((c >> 6) | 192);
            } else {
                if (c & 0xFC00) == 0xD800
                    && i + 1 < units.len()
                    && (units[i + 1] & 0xFC00) == 0xDC00
                {
                    i += 1;
                    c = 0x10000 + ((c & 0x3FF) << 10) + i64::from(units[i] & 0x3FF);
                    bytes.push((c >> 18) | 240);
                    bytes.push(((c >> 12) & 63) | 128);
                } else {
                    bytes.push((c >> 12) | 224);
                }
                bytes.push(((c >> 6) & 63) | 128);
            }
            bytes.push((c & 63) | 128);
        }
        i += 1;
    }

    bytes
}

/// Computes the request token for `text` with `seed`.
pub fn compute_token(text: &str, seed: Seed) -> String {
    let mut acc = seed.a;
    for byte in token_bytes(text) {
        acc += byte;
        acc = scramble(acc, ROUND_PATTERN);
    }
    acc = scramble(acc, FINAL_PATTERN);
    acc = i64::from((acc as i32) ^ (seed.b as i32));
    if acc < 0 {
        acc = (acc & 0x7FFF_FFFF) + 0x8000_0000;
    }
    acc %= 1_000_000;
    format!("{acc}.{}", acc ^ seed.a)
}

/// Extracts the seed pair from the published script.
///
/// Understands the quoted form (`tkk:'427110.1469889687'`) and the older
/// expression form (`a\x3d202905874;var b\x3d544157181;return 419689+`).
pub fn parse_seed(script: &str) -> Option<Seed> {
    parse_quoted_seed(script).or_else(|| parse_expression_seed(script))
}

fn parse_quoted_seed(script: &str) -> Option<Seed> {
    let lower = script.to_ascii_lowercase();
    let start = lower.find("tkk")?;
    let rest = &script[start..];
    let quote = rest.find(['\'', '"'])?;
    let value = &rest[quote + 1..];
    let end = value.find(['\'', '"'])?;
    let (a, b) = value[..end].split_once('.')?;
    Some(Seed::new(a.parse().ok()?, b.parse().ok()?))
}

fn parse_expression_seed(script: &str) -> Option<Seed> {
    let a = number_after(script, "a\\x3d")?;
    let b = number_after(script, "b\\x3d")?;
    let head = number_after(script, "return ")?;
    Some(Seed::new(head, a + b))
}

fn number_after(haystack: &str, marker: &str) -> Option<i64> {
    let start = haystack.find(marker)? + marker.len();
    let digits: String = haystack[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    digits.parse().ok()
}

/// Where the seed pair comes from.
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn fetch_seed(&self) -> Result<Seed>;
}

/// Fetches the seed pair from the remote script.
pub struct RemoteSeedSource {
    client: Client,
    url: String,
}

impl RemoteSeedSource {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: SEED_SCRIPT_URL.to_string(),
        }
    }
}

#[async_trait]
impl SeedSource for RemoteSeedSource {
    async fn fetch_seed(&self) -> Result<Seed> {
        let script = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch seed script: {}", self.url))?
            .error_for_status()?
            .text()
            .await
            .context("Failed to read seed script")?;

        parse_seed(&script).context("Seed pair not found in script")
    }
}

/// A fixed seed pair, for offline use and tests.
pub struct StaticSeedSource(pub Seed);

#[async_trait]
impl SeedSource for StaticSeedSource {
    async fn fetch_seed(&self) -> Result<Seed> {
        Ok(self.0)
    }
}

struct SeedState {
    current: Option<Seed>,
    refreshed_at: Option<Instant>,
    fallback: Option<Seed>,
}

/// Caches the seed pair and computes tokens with it.
///
/// The source is asked at most once per refresh window, whether or not that
/// attempt succeeds. Until a fetch succeeds, a random pair generated on the
/// first failure is used.
pub struct TokenKeeper {
    source: Box<dyn SeedSource>,
    ttl: Duration,
    state: Mutex<SeedState>,
}

impl TokenKeeper {
    pub fn new(source: Box<dyn SeedSource>) -> Self {
        Self::with_ttl(source, SEED_TTL)
    }

    pub fn with_ttl(source: Box<dyn SeedSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            state: Mutex::new(SeedState {
                current: None,
                refreshed_at: None,
                fallback: None,
            }),
        }
    }

    /// Returns the seed pair, refreshing it if the window has passed.
    pub async fn seed(&self) -> Seed {
        let mut state = self.state.lock().await;

        let fresh = state
            .refreshed_at
            .is_some_and(|at| at.elapsed() < self.ttl);

        if !fresh {
            state.refreshed_at = Some(Instant::now());
            match self.source.fetch_seed().await {
                Ok(seed) => {
                    debug!(seed_a = seed.a, "refreshed token seed");
                    state.current = Some(seed);
                }
                Err(e) => {
                    warn!("token seed refresh failed, using fallback seed: {e:#}");
                    state.current = None;
                }
            }
        }

        if let Some(seed) = state.current {
            return seed;
        }
        *state.fallback.get_or_insert_with(Seed::random)
    }

    pub async fn token(&self, text: &str) -> String {
        compute_token(text, self.seed().await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const KNOWN_SEED: Seed = Seed::new(419_689, 202_905_874 + 544_157_181);

    #[test]
    fn test_token_known_vectors() {
        assert_eq!(compute_token("Translate", KNOWN_SEED), "34939.454418");
        assert_eq!(compute_token("Google translate", KNOWN_SEED), "671407.809414");
    }

    #[test]
    fn test_token_handles_surrogate_pairs() {
        assert_eq!(compute_token("你好😀", KNOWN_SEED), "861150.738487");
    }

    #[test]
    fn test_token_bytes_ranges() {
        assert_eq!(token_bytes("A"), vec![65]);
        assert_eq!(token_bytes("é"), vec![0xC3, 0xA9]);
        assert_eq!(token_bytes("你"), vec![0xE4, 0xBD, 0xA0]);
        assert_eq!(token_bytes("😀"), vec![0xF0, 0x9F, 0x98, 0x80]);
    }

    #[test]
    fn test_parse_quoted_seed() {
        let script = "var c=1;c._ctkk='427110.1469889687';function x(){}";
        assert_eq!(parse_seed(script), Some(Seed::new(427_110, 1_469_889_687)));
    }

    #[test]
    fn test_parse_expression_seed() {
        let script = r"TKK=eval('((function(){var a\x3d202905874;var b\x3d544157181;return 419689+\x27.\x27+(a+b)})())');";
        assert_eq!(parse_seed(script), Some(KNOWN_SEED));
    }

    #[test]
    fn test_parse_seed_missing() {
        assert_eq!(parse_seed("function nothing(){}"), None);
    }

    struct CountingSource {
        calls: Arc<AtomicUsize>,
        result: Option<Seed>,
    }

    #[async_trait]
    impl SeedSource for CountingSource {
        async fn fetch_seed(&self) -> Result<Seed> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.context("offline")
        }
    }

    #[tokio::test]
    async fn test_seed_is_cached_within_window() {
        let calls = Arc::new(AtomicUsize::new(0));
        let keeper = TokenKeeper::new(Box::new(CountingSource {
            calls: Arc::clone(&calls),
            result: Some(KNOWN_SEED),
        }));

        assert_eq!(keeper.token("Translate").await, "34939.454418");
        assert_eq!(keeper.token("Google translate").await, "671407.809414");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_seed_refreshes_after_window() {
        let calls = Arc::new(AtomicUsize::new(0));
        let keeper = TokenKeeper::with_ttl(
            Box::new(CountingSource {
                calls: Arc::clone(&calls),
                result: Some(KNOWN_SEED),
            }),
            Duration::ZERO,
        );

        keeper.seed().await;
        keeper.seed().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fallback_seed_is_generated_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let keeper = TokenKeeper::with_ttl(
            Box::new(CountingSource {
                calls: Arc::clone(&calls),
                result: None,
            }),
            Duration::ZERO,
        );

        let first = keeper.seed().await;
        let second = keeper.seed().await;
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_is_not_retried_within_window() {
        let calls = Arc::new(AtomicUsize::new(0));
        let keeper = TokenKeeper::new(Box::new(CountingSource {
            calls: Arc::clone(&calls),
            result: None,
        }));

        keeper.seed().await;
        keeper.seed().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
