//! Coin-flip side widget

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinFace {
    Heads,
    Tails,
}

impl CoinFace {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoinFace::Heads => "Heads",
            CoinFace::Tails => "Tails",
        }
    }
}

/// A fair coin with a running tally
#[derive(Debug, Clone)]
pub struct CoinFlip {
    rng: Pcg32,
    pub heads: u32,
    pub tails: u32,
    pub last: Option<CoinFace>,
}

impl CoinFlip {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            heads: 0,
            tails: 0,
            last: None,
        }
    }

    pub fn flip(&mut self) -> CoinFace {
        let face = if self.rng.random::<bool>() {
            self.heads += 1;
            CoinFace::Heads
        } else {
            self.tails += 1;
            CoinFace::Tails
        };
        self.last = Some(face);
        face
    }

    pub fn total(&self) -> u32 {
        self.heads + self.tails
    }
}
