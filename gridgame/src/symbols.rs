use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::{Symbol, SymbolPoolExhausted};

/// The symbols handed out by [`SymbolPool::new()`]: the 26 lowercase letters.
pub const DEFAULT_SYMBOLS: &str = "abcdefghijklmnopqrstuvwxyz";

/// A set of distinct symbols that are handed out in random order.
///
/// A drawn symbol is removed for good, so no two draws from the same pool
/// ever return the same symbol. There is no way to put symbols back.
#[derive(Clone, Debug)]
pub struct SymbolPool {
    remaining: Vec<Symbol>,
    rng: StdRng,
}

impl SymbolPool {
    /// A pool of the lowercase letters.
    pub fn new(rng: StdRng) -> Self {
        Self::with_symbols(DEFAULT_SYMBOLS.chars().map(Symbol::new), rng)
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// A pool of custom symbols. Duplicates are dropped.
    pub fn with_symbols(symbols: impl IntoIterator<Item = Symbol>, rng: StdRng) -> Self {
        let mut remaining: Vec<Symbol> = Vec::new();
        for symbol in symbols {
            if !remaining.contains(&symbol) {
                remaining.push(symbol);
            }
        }
        Self { remaining, rng }
    }

    /// Removes a uniformly random symbol from the pool and returns it.
    pub fn draw(&mut self) -> Result<Symbol, SymbolPoolExhausted> {
        if self.remaining.is_empty() {
            return Err(SymbolPoolExhausted);
        }
        let idx = self.rng.gen_range(0..self.remaining.len());
        let symbol = self.remaining.remove(idx);
        trace!(%symbol, remaining = self.remaining.len(), "Drew symbol");
        Ok(symbol)
    }

    /// How many more draws will succeed.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use quickcheck::quickcheck;

    use super::*;

    quickcheck! {
        fn draws_are_distinct_until_exhausted(seed: u64) -> bool {
            let mut pool = SymbolPool::from_seed(seed);
            let mut drawn = BTreeSet::new();
            for _ in 0..26 {
                match pool.draw() {
                    Ok(symbol) => {
                        if !drawn.insert(symbol) {
                            return false;
                        }
                    }
                    Err(_) => return false,
                }
            }
            pool.draw() == Err(SymbolPoolExhausted) && pool.remaining() == 0
        }
    }

    #[test]
    fn draws_only_lowercase_letters() {
        let mut pool = SymbolPool::from_seed(7);
        let all: String = (0..26).map(|_| pool.draw().unwrap().as_char()).collect();
        let mut sorted: Vec<char> = all.chars().collect();
        sorted.sort();
        assert_eq!(String::from_iter(sorted), DEFAULT_SYMBOLS);
    }

    #[test]
    fn same_seed_same_order() {
        let mut a = SymbolPool::from_seed(42);
        let mut b = SymbolPool::from_seed(42);
        for _ in 0..26 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn custom_symbols_drop_duplicates() {
        let symbols = "xox".chars().map(Symbol::new);
        let mut pool = SymbolPool::with_symbols(symbols, StdRng::seed_from_u64(0));
        assert_eq!(pool.remaining(), 2);
        pool.draw().unwrap();
        pool.draw().unwrap();
        assert_eq!(pool.draw(), Err(SymbolPoolExhausted));
    }
}
