//! Signature hash for 3 byte prefixes.
//!
//! Each of the three bytes selects an entry from its own 256 entry lane of a table that is
//! filled by a linear congruential generator, and the three entries are xor'd together.
//! The generator constants are fixed, changing them changes which matches are found first
//! and therefore the compressed output.

use crate::HASH_SIZE;

const SEED: u32 = 0x2a19_0348;
const MULTIPLIER: u32 = 0x41C6_4E6D;
const INCREMENT: u32 = 12345;
const SHIFT: u32 = 16;

/// number of bytes covered by a signature
pub const HASH_BYTES: usize = 3;

const fn build_table() -> [u16;256*HASH_BYTES] {
    let mut table = [0u16;256*HASH_BYTES];
    let mut state = SEED;
    let mut i = 0;
    while i < table.len() {
        state = state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        table[i] = ((state >> SHIFT) as usize % HASH_SIZE) as u16;
        i += 1;
    }
    table
}

static TABLE: [u16;256*HASH_BYTES] = build_table();

/// Signature of the 3 bytes starting at `pos`, always below `HASH_SIZE`.
/// Caller guarantees `pos + 3 <= data.len()`.
#[inline]
pub fn hash(data: &[u8],pos: usize) -> usize {
    let lane = &data[pos..pos+HASH_BYTES];
    (TABLE[lane[0] as usize] ^ TABLE[0x100 + lane[1] as usize] ^ TABLE[0x200 + lane[2] as usize]) as usize
}

#[test]
fn table_starts_with_generator_output() {
    let first = SEED.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
    assert_eq!(TABLE[0] as u32,(first >> 16) & 0x7fff);
    let second = first.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
    assert_eq!(TABLE[1] as u32,(second >> 16) & 0x7fff);
}

#[test]
fn in_range_and_deterministic() {
    let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    for pos in 0..data.len()-2 {
        let h = hash(&data,pos);
        assert!(h < HASH_SIZE);
        assert_eq!(h,hash(&data,pos));
    }
    // same bytes at different positions give the same signature
    assert_eq!(hash(&data,3),hash(&data,259));
}

#[test]
fn lanes_are_distinct() {
    // swapping bytes normally moves a prefix to another bucket
    let a = hash(b"abc",0);
    let b = hash(b"cba",0);
    assert_ne!(a,b);
}
