//! Seed-sequence spawning for independent random streams
//!
//! A root sequence is built from one optional seed. Every spawned child is
//! identified by its spawn-key path, and its generator is seeded from a hash
//! of the root entropy and that path, so sibling streams never share state
//! and the same path always reproduces the same stream.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use sha2::{Digest, Sha256};

/// Hierarchical source of independent random generators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSequence {
    entropy: [u8; 32],
    spawn_key: Vec<u32>,
    children_spawned: u32,
}

impl SeedSequence {
    /// Create a root sequence; `None` draws entropy from the OS
    pub fn new(seed: Option<u64>) -> Self {
        let entropy = match seed {
            Some(seed) => digest(&[b"seed-sequence".as_slice(), seed.to_le_bytes().as_slice()]),
            None => {
                let mut bytes = [0u8; 32];
                rand::thread_rng().fill_bytes(&mut bytes);
                bytes
            }
        };

        Self {
            entropy,
            spawn_key: Vec::new(),
            children_spawned: 0,
        }
    }

    /// Spawn `n` child sequences
    ///
    /// Repeated calls continue numbering where the previous call stopped,
    /// so no child is handed out twice.
    pub fn spawn(&mut self, n: usize) -> Vec<SeedSequence> {
        (0..n)
            .map(|_| {
                let mut spawn_key = self.spawn_key.clone();
                spawn_key.push(self.children_spawned);
                self.children_spawned += 1;

                SeedSequence {
                    entropy: self.entropy,
                    spawn_key,
                    children_spawned: 0,
                }
            })
            .collect()
    }

    /// Path of this sequence below the root
    pub fn spawn_key(&self) -> &[u32] {
        &self.spawn_key
    }

    /// Generator for this sequence's own stream
    pub fn rng(&self) -> StdRng {
        let key: Vec<u8> = self
            .spawn_key
            .iter()
            .flat_map(|k| k.to_le_bytes())
            .collect();
        let depth = (self.spawn_key.len() as u64).to_le_bytes();

        StdRng::from_seed(digest(&[
            self.entropy.as_slice(),
            depth.as_slice(),
            key.as_slice(),
        ]))
    }
}

fn digest(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }

    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}
