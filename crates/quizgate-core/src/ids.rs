//! Identifier generation for candidates that arrive without an `id`.

use uuid::Uuid;

/// Source of fresh question identifiers.
///
/// The batch engine takes one of these so callers can substitute a
/// deterministic sequence in tests.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Default generator: `q_<unix millis>_<9 base-36 chars>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampIdGenerator;

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&mut self) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        format!("q_{millis}_{}", random_suffix())
    }
}

fn random_suffix() -> String {
    // The low bits of a v4 UUID are all random.
    let mut n = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        suffix.push(BASE36[(n % 36) as usize] as char);
        n /= 36;
    }
    suffix
}

/// Deterministic generator yielding `<prefix>1`, `<prefix>2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
