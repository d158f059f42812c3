//! Blank node label minting.
//!
//! One counter per process, shared by every thread and every store.

use crate::primitives::BNODE_PREFIX_LEN;
use parking_lot::Mutex;
use rand::Rng;
use std::sync::LazyLock;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

struct Minter {
    prefix: String,
    next: u64,
}

static MINTER: LazyLock<Mutex<Minter>> = LazyLock::new(|| {
    Mutex::new(Minter {
        prefix: random_prefix(),
        next: 0,
    })
});

fn random_prefix() -> String {
    let mut rng = rand::rng();
    (0..BNODE_PREFIX_LEN)
        .map(|_| LETTERS[rng.random_range(0..LETTERS.len())] as char)
        .collect()
}

/// Next label: `<prefix><counter>`.
pub(super) fn next_label() -> String {
    let mut minter = MINTER.lock();
    minter.next = minter.next.saturating_add(1);
    format!("{}{}", minter.prefix, minter.next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn labels_share_prefix_and_differ() {
        let a = next_label();
        let b = next_label();
        assert_ne!(a, b);
        assert_eq!(a[..BNODE_PREFIX_LEN], b[..BNODE_PREFIX_LEN]);
        assert!(a[..BNODE_PREFIX_LEN].bytes().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn distinct_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..250).map(|_| next_label()).collect::<Vec<_>>()))
            .collect();
        let labels: BTreeSet<String> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("join"))
            .collect();
        assert_eq!(labels.len(), 1000);
    }
}
