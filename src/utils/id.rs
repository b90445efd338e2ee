use chrono::Utc;
use rand::{distributions::Uniform, thread_rng, Rng};
use std::sync::atomic::{AtomicI64, Ordering};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

static LAST_TIMESTAMP: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp id. Strictly increasing within the process, so two
/// calls in the same millisecond still produce distinct ids.
pub fn timestamp_id() -> String {
    next_timestamp().to_string()
}

/// `{prefix}_{timestamp}_{9 random base-36 chars}`.
pub fn prefixed_id(prefix: &str) -> String {
    format!("{}_{}_{}", prefix, next_timestamp(), random_suffix(9))
}

fn next_timestamp() -> i64 {
    let mut last = LAST_TIMESTAMP.load(Ordering::Relaxed);
    loop {
        let now = Utc::now().timestamp_millis();
        let next = if now > last { now } else { last + 1 };
        match LAST_TIMESTAMP.compare_exchange_weak(last, next, Ordering::SeqCst, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

fn random_suffix(length: usize) -> String {
    let range = Uniform::from(0..BASE36.len());
    thread_rng()
        .sample_iter(range)
        .take(length)
        .map(|i| BASE36[i] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn back_to_back_ids_are_distinct() {
        let a = timestamp_id();
        let b = timestamp_id();
        assert_ne!(a, b);
        assert!(b.parse::<i64>().unwrap() > a.parse::<i64>().unwrap());
    }

    #[test]
    fn many_ids_never_repeat() {
        let ids: HashSet<String> = (0..1_000).map(|_| timestamp_id()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn prefixed_id_shape() {
        let id = prefixed_id("app");
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "app");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
