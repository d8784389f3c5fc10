//! Match length probe, the inner loop of every search.

const WORD: usize = std::mem::size_of::<u64>();

#[inline]
fn load(data: &[u8],pos: usize) -> u64 {
    let mut word = [0u8;WORD];
    word.copy_from_slice(&data[pos..pos+WORD]);
    u64::from_le_bytes(word)
}

/// Length of the common prefix of the runs at `a` and `b`, where `a < b`,
/// counting only bytes with `b + i < limit`.  Runs may overlap.
/// Whole words are compared first, the tail byte by byte.
pub fn match_length(data: &[u8],a: usize,b: usize,limit: usize) -> usize {
    debug_assert!(a < b && b <= limit && limit <= data.len());
    let max = limit - b;
    let mut n = 0;
    while n + WORD <= max {
        let diff = load(data,a+n) ^ load(data,b+n);
        if diff != 0 {
            // little endian load, so the lowest set bit marks the first differing byte
            return n + (diff.trailing_zeros() / 8) as usize;
        }
        n += WORD;
    }
    while n < max && data[a+n] == data[b+n] {
        n += 1;
    }
    n
}

#[cfg(test)]
fn naive(data: &[u8],a: usize,b: usize,limit: usize) -> usize {
    let mut n = 0;
    while b + n < limit && data[a+n] == data[b+n] {
        n += 1;
    }
    n
}

#[test]
fn simple_runs() {
    let data = b"abcabcabcX";
    assert_eq!(match_length(data,0,3,data.len()),6);
    assert_eq!(match_length(data,0,1,data.len()),0);
    assert_eq!(match_length(data,0,3,5),2);
    assert_eq!(match_length(data,0,3,3),0);
}

#[test]
fn word_boundaries_agree_with_bytewise() {
    // mismatch planted at every offset across a few words, plus limits cutting words short
    for miss in 0..40 {
        let mut data: Vec<u8> = b"0123456789".iter().cycle().take(100).copied().collect();
        data[50+miss] = b'#';
        for limit in 50..data.len() {
            assert_eq!(match_length(&data,0,50,limit),naive(&data,0,50,limit),"miss {} limit {}",miss,limit);
            assert_eq!(match_length(&data,40,50,limit),naive(&data,40,50,limit));
        }
    }
}

#[test]
fn overlapping_run() {
    let data = vec![7u8;300];
    assert_eq!(match_length(&data,0,1,258),257);
    assert_eq!(match_length(&data,10,11,data.len()),289);
}
