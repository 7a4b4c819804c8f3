//! BillHash, a small Merkle–Damgård hash for teaching.
//!
//! BillHash is NOT cryptographically secure. Its 64-bit output makes collisions
//! easy to find and its mixing has uneven distribution. It exists to show the
//! moving parts of a real hash construction without magic constants:
//!
//! ```text
//!   block1  block2   block3
//!     |       |       |
//!     +->     +->     +->
//!  IV --> c() --> c() --> c() --> finalize() --> hash
//! ```
//!
//! The input is zero-padded ("strengthened") to a whole number of 8-byte
//! blocks. Each block is folded into the running compress value by
//! [`compress`], which scrambles the bytes with [`twiddle`] 1,024 times. The
//! last compress value is complemented by [`finalize`].

use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Size of the blocks the compression function consumes.
pub const BLOCK_SIZE: usize = 8;

/// Compress value fed into the first block.
pub const INITIALIZATION_VECTOR: u64 = 0x0123_4567_89AB_CDEF;

/// Number of twiddle passes per block.
pub const TWIDDLE_ROUNDS: usize = 1024;

pub type Block = [u8; BLOCK_SIZE];

/// Pad `data` with zeros until its length is a non-zero multiple of [`BLOCK_SIZE`].
pub fn strengthen(mut data: Vec<u8>) -> Vec<u8> {
    let rem = data.len() % BLOCK_SIZE;
    if rem != 0 || data.is_empty() {
        data.resize(data.len() + BLOCK_SIZE - rem, 0);
    }
    data
}

/// Strengthen `data` and cut it into blocks.
pub fn split(data: &[u8]) -> Vec<Block> {
    strengthen(data.to_vec())
        .chunks_exact(BLOCK_SIZE)
        .map(|chunk| {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            block
        })
        .collect()
}

/// XOR every byte with shifted copies of the other seven bytes.
///
/// Neighbours one to four positions ahead are shifted left, the rest right,
/// by `(j + 8 - k) % 8` bits. Updates happen in place, so byte `j` sees the
/// already-twiddled values of bytes before it.
///
/// An all-zero block is a fixed point: once a block collapses to zeros it
/// stays there.
pub fn twiddle(arr: &mut Block) {
    for j in 0..BLOCK_SIZE {
        let mut mix = 0u8;
        for k in 1..BLOCK_SIZE {
            let neighbour = arr[(j + k) % BLOCK_SIZE];
            let shift = ((j + BLOCK_SIZE - k) % BLOCK_SIZE) as u32;
            mix ^= if k <= BLOCK_SIZE / 2 {
                neighbour << shift
            } else {
                neighbour >> shift
            };
        }
        arr[j] ^= mix;
    }
}

/// XOR `block` with the little-endian bytes of `cv`, twiddle it
/// [`TWIDDLE_ROUNDS`] times and read the result back as a little-endian u64.
pub fn transform(cv: u64, block: Block) -> u64 {
    let cv_bytes = cv.to_le_bytes();
    let mut state = [0u8; BLOCK_SIZE];
    for (j, byte) in state.iter_mut().enumerate() {
        *byte = block[j] ^ cv_bytes[j];
    }

    for _ in 0..TWIDDLE_ROUNDS {
        twiddle(&mut state);
    }

    u64::from_le_bytes(state)
}

/// Fold one block into the running compress value. The block's bytes are
/// taken last-to-first.
pub fn compress(cv: u64, block: Block) -> u64 {
    let mut reversed = block;
    reversed.reverse();
    transform(cv, reversed)
}

/// Bitwise complement of the last compress value.
pub fn finalize(cv: u64) -> u64 {
    !cv
}

/// BillHash of `data`.
pub fn bill_hash(data: impl AsRef<[u8]>) -> u64 {
    let mut hasher = BillHasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Incremental BillHash.
///
/// Feeding the input in any number of pieces gives the same value as
/// [`bill_hash`] on the concatenation.
#[derive(Debug, Clone)]
pub struct BillHasher {
    cv: u64,
    buffer: Vec<u8>,
    blocks: u64,
}

impl Default for BillHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl BillHasher {
    pub fn new() -> Self {
        Self {
            cv: INITIALIZATION_VECTOR,
            buffer: Vec::with_capacity(BLOCK_SIZE),
            blocks: 0,
        }
    }

    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        for &byte in data.as_ref() {
            self.buffer.push(byte);
            if self.buffer.len() == BLOCK_SIZE {
                self.flush_block();
            }
        }
    }

    fn flush_block(&mut self) {
        let mut block = [0u8; BLOCK_SIZE];
        block[..self.buffer.len()].copy_from_slice(&self.buffer);
        self.buffer.clear();
        self.cv = compress(self.cv, block);
        self.blocks += 1;
    }

    pub fn finalize(mut self) -> u64 {
        // Empty input still hashes one all-zero block
        if !self.buffer.is_empty() || self.blocks == 0 {
            self.flush_block();
        }
        tracing::trace!(blocks = self.blocks, "billhash finalized");
        finalize(self.cv)
    }
}

/// Hash functions selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Bill,
    Sha256,
}

impl HashAlgorithm {
    /// Digest of `data` rendered for display.
    pub fn digest_hex(&self, data: &[u8]) -> String {
        match self {
            HashAlgorithm::Bill => format!("{:#018x}", bill_hash(data)),
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Bill => write!(f, "bill"),
            HashAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bill" | "billhash" => Ok(HashAlgorithm::Bill),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            other => Err(format!("unknown hash algorithm: {}", other)),
        }
    }
}
