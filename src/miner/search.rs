// Nonce search: fix the template → hash nonce batches in parallel → take the
// lowest nonce under the ceiling.
//
// Batches are evaluated with `find_first`, so the answer is always the same
// nonce a one-by-one scan would reach.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::debug;

use crate::config::SearchConfig;
use crate::crypto::pow::{PowHasher, meets_target};
use crate::primitives::block::{Block, BlockHeader};
use crate::primitives::uint256::Uint256;

/// Zero is left for "not searched yet".
pub const FIRST_SEARCH_NONCE: u32 = 1;

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub nonce: u32,
    pub block: Block,
    pub pow_hash: Uint256,
    pub attempts: u64,
    pub elapsed: Duration,
}

impl SearchOutcome {
    pub fn hash_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 { 0.0 } else { self.attempts as f64 / secs }
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "nonce={} pow_hash={} attempts={} elapsed={:?}",
            self.nonce, self.pow_hash, self.attempts, self.elapsed
        )?;
        write!(f, "{}", self.block)
    }
}

#[derive(Debug, Clone)]
pub enum SearchResult {
    Found(SearchOutcome),
    Cancelled { attempts: u64 },
    /// Every nonce up to u32::MAX was tried under the fixed time and bits.
    Exhausted,
}

/// Finds the smallest nonce >= 1 whose proof-of-work hash is at or below
/// `ceiling`. Only the header nonce varies; the template's transactions and
/// merkle root are reused as-is.
pub fn search_nonce<H: PowHasher + ?Sized>(
    template: &Block,
    ceiling: &Uint256,
    hasher: &H,
    config: &SearchConfig,
    stop: &AtomicBool,
) -> SearchResult {
    let started = Instant::now();
    let header = template.header;
    let batch = config.batch_size.max(1);

    let mut next = FIRST_SEARCH_NONCE;
    let mut attempts: u64 = 0;
    let mut reported: u64 = 0;

    loop {
        if stop.load(Ordering::Relaxed) {
            return SearchResult::Cancelled { attempts };
        }

        let end = next.saturating_add(batch - 1);
        let found = (next..=end)
            .into_par_iter()
            .map(|nonce| {
                let candidate = BlockHeader { nonce, ..header };
                (nonce, candidate.pow_hash(hasher))
            })
            .find_first(|(_, pow_hash)| meets_target(pow_hash, ceiling));

        if let Some((nonce, pow_hash)) = found {
            attempts += u64::from(nonce - next) + 1;
            let block = Block {
                header: BlockHeader { nonce, ..header },
                transactions: template.transactions.clone(),
            };
            return SearchResult::Found(SearchOutcome {
                nonce,
                block,
                pow_hash,
                attempts,
                elapsed: started.elapsed(),
            });
        }

        attempts += u64::from(end - next) + 1;
        if end == u32::MAX {
            return SearchResult::Exhausted;
        }
        next = end + 1;

        if attempts - reported >= config.progress_interval {
            debug!(nonce = next, attempts, "genesis nonce search progress");
            reported = attempts;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::genesis::create_genesis_block;
    use crate::crypto::pow::Sha256dPow;
    use crate::primitives::transaction::COIN;

    fn template() -> Block {
        create_genesis_block(1721228774, 0, 0x200fffff, 1, 50 * COIN)
    }

    // First nonce >= 1 meeting the ceiling, the slow way
    fn sequential_scan(template: &Block, ceiling: &Uint256) -> u32 {
        let mut header = template.header;
        header.nonce = FIRST_SEARCH_NONCE;
        while !meets_target(&header.pow_hash(&Sha256dPow), ceiling) {
            header.nonce += 1;
        }
        header.nonce
    }

    #[test]
    fn test_finds_smallest_nonce() {
        let ceiling = Uint256::from_static_hex("0x03ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff");
        let block = template();
        let expected = sequential_scan(&block, &ceiling);

        // Batch sizes that split the range differently must agree
        for batch_size in [1, 7, 256] {
            let config = SearchConfig { batch_size, progress_interval: 16 };
            let stop = AtomicBool::new(false);
            match search_nonce(&block, &ceiling, &Sha256dPow, &config, &stop) {
                SearchResult::Found(outcome) => {
                    assert_eq!(outcome.nonce, expected, "batch size {batch_size}");
                    assert_eq!(outcome.attempts, u64::from(expected));
                    assert!(meets_target(&outcome.pow_hash, &ceiling));
                    assert_eq!(outcome.block.header.nonce, expected);
                    assert_eq!(outcome.block.transactions, block.transactions);
                }
                other => panic!("search did not finish: {other:?}"),
            }
        }
    }

    #[test]
    fn test_max_ceiling_accepts_first_nonce() {
        let stop = AtomicBool::new(false);
        let result = search_nonce(
            &template(),
            &Uint256([0xff; 32]),
            &Sha256dPow,
            &SearchConfig::default(),
            &stop,
        );
        match result {
            SearchResult::Found(outcome) => {
                assert_eq!(outcome.nonce, FIRST_SEARCH_NONCE);
                assert_eq!(outcome.attempts, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_stop_flag_cancels_before_hashing() {
        let stop = AtomicBool::new(true);
        let result = search_nonce(&template(), &Uint256::ZERO, &Sha256dPow, &SearchConfig::default(), &stop);
        assert!(matches!(result, SearchResult::Cancelled { attempts: 0 }));
    }

    #[test]
    fn test_stop_flag_is_polled_between_batches() {
        // A hasher that raises the stop flag once it has been called
        struct StopAfterFirst<'a>(&'a AtomicBool);
        impl PowHasher for StopAfterFirst<'_> {
            fn pow_hash(&self, header: &[u8; crate::primitives::block::BLOCK_HEADER_BYTES]) -> Uint256 {
                self.0.store(true, Ordering::Relaxed);
                Sha256dPow.pow_hash(header)
            }
        }

        let stop = AtomicBool::new(false);
        let config = SearchConfig { batch_size: 8, progress_interval: 1 };
        let result = search_nonce(&template(), &Uint256::ZERO, &StopAfterFirst(&stop), &config, &stop);
        assert!(matches!(result, SearchResult::Cancelled { attempts: 8 }));
    }

    #[test]
    fn test_hash_rate_handles_zero_elapsed() {
        let outcome = SearchOutcome {
            nonce: 1,
            block: template(),
            pow_hash: Uint256::ZERO,
            attempts: 10,
            elapsed: Duration::ZERO,
        };
        assert_eq!(outcome.hash_rate(), 0.0);
    }
}
