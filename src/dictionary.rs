//! Hash Chain Dictionary
//!
//! This is the match finder of an LZX style compressor.  It keeps two tables:
//! * `head` maps the signature of a 3 byte prefix to the newest position having it
//! * `chain` maps each position to the position that was `head` of its bucket before it
//!
//! Together they thread a newest-first list through every bucket.  Nothing is ever deleted,
//! entries simply fall out of reach once they are further back than the encoder can address
//! (the window size plus 3).
//!
//! The buffer is borrowed for the life of the dictionary, and positions are offsets into it,
//! so nothing stored here can dangle.

use crate::tools::{lcg,probe,slot_table::SlotTable};
use crate::{Error,Options,DISTANCE_SLACK,HASH_SIZE,MAX_MATCH};

/// marks an empty bucket or the end of a chain
const NIL: u32 = u32::MAX;
/// positions this close to the end of the buffer are never indexed
const TAIL: usize = 3;

/// Result of a search.  A length of 1 means nothing usable was found.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct Match {
    pub length: usize,
    /// distance back from the search position, only meaningful if `length > 1`
    pub offset: usize
}

impl Match {
    pub const NONE: Match = Match { length: 1, offset: 0 };
    pub fn is_match(&self) -> bool {
        self.length > 1
    }
}

/// Walks one bucket from newest to oldest, yielding candidates that are
/// before `pos` and no further back than `floor`.
pub struct Candidates<'d> {
    chain: &'d SlotTable<u32>,
    pos: usize,
    floor: usize,
    /// next position to visit, NIL when exhausted
    cur: u32,
    /// last position visited, links must go strictly below it
    last: usize
}

impl Iterator for Candidates<'_> {
    type Item = usize;
    fn next(&mut self) -> Option<usize> {
        loop {
            if self.cur == NIL {
                return None;
            }
            let x = self.cur as usize;
            // A link that does not go back in time was left by a newer position sharing the slot.
            if x >= self.last || x < self.floor {
                self.cur = NIL;
                return None;
            }
            self.last = x;
            self.cur = self.chain.get(x);
            if x < self.pos {
                return Some(x);
            }
        }
    }
}

pub struct Dictionary<'a> {
    data: &'a [u8],
    window_size: usize,
    max_probes: Option<usize>,
    head: SlotTable<u32>,
    chain: SlotTable<u32>,
    /// every position below this was either indexed or passed over
    frontier: usize
}

impl <'a> Dictionary<'a> {
    /// Create a dictionary over `data` with an unlimited chain walk.
    /// The window size must be a nonzero power of two.
    pub fn new(data: &'a [u8],window_size: usize) -> Result<Self,Error> {
        Self::create(data,&Options { window_size, ..crate::STD_OPTIONS })
    }
    /// Create a dictionary over `data` using the window size and probe limit in `opt`.
    pub fn create(data: &'a [u8],opt: &Options) -> Result<Self,Error> {
        let window_size = opt.window_size;
        if !window_size.is_power_of_two() {
            return Err(Error::InvalidWindowSize(window_size));
        }
        if data.len() >= NIL as usize {
            return Err(Error::BufferTooLarge(data.len()));
        }
        // The chain spans two windows, so a link is only overwritten by a position that is
        // already beyond reach of anything that could walk to it.
        let chain_len = window_size.checked_mul(2).ok_or(Error::Allocation { table: "chain", entries: usize::MAX })?;
        let head = SlotTable::create(NIL,HASH_SIZE,"hash")?;
        let chain = SlotTable::create(NIL,chain_len,"chain")?;
        log::debug!("dictionary over {} bytes, window {}, chain table {}",data.len(),window_size,chain.len());
        Ok(Self {
            data,
            window_size,
            max_probes: opt.max_probes,
            head,
            chain,
            frontier: 0
        })
    }
    pub fn window_size(&self) -> usize {
        self.window_size
    }
    /// Register the `len` positions starting at `start`.
    /// Positions within 3 bytes of the end of the buffer, or already registered, are skipped.
    pub fn add(&mut self,start: usize,len: usize) {
        let end = start.saturating_add(len).min(self.data.len().saturating_sub(TAIL));
        let from = start.max(self.frontier);
        for p in from..end {
            let h = lcg::hash(self.data,p);
            let prev = self.head.replace(h,p as u32);
            self.chain.set(p,prev);
        }
        if end > self.frontier {
            self.frontier = end;
        }
    }
    /// Earlier positions sharing the signature at `pos`, newest first, within encodable distance.
    pub fn candidates(&self,pos: usize) -> Candidates<'_> {
        let cur = match pos + lcg::HASH_BYTES <= self.data.len() {
            true => self.head.get(lcg::hash(self.data,pos)),
            false => NIL
        };
        Candidates {
            chain: &self.chain,
            pos,
            floor: pos.saturating_sub(self.window_size + DISTANCE_SLACK),
            cur,
            last: usize::MAX
        }
    }
    /// Find the longest earlier run matching the bytes at `pos`.
    /// On equal lengths the nearer candidate wins.
    pub fn find(&self,pos: usize) -> Match {
        let limit = self.data.len().min(pos.saturating_add(MAX_MATCH));
        if pos >= limit {
            return Match::NONE;
        }
        let best_possible = limit - pos;
        let mut best = Match::NONE;
        for x in self.candidates(pos).take(self.max_probes.unwrap_or(usize::MAX)) {
            let length = probe::match_length(self.data,x,pos,limit);
            if length > best.length {
                best = Match { length, offset: pos - x };
                if length == best_possible {
                    break;
                }
            }
        }
        log::trace!("find at {}: length {} offset {}",pos,best.length,best.offset);
        best
    }
}

// *************** TESTS *****************

#[cfg(test)]
fn pseudo_random(n: usize,alphabet: u8,mut seed: u32) -> Vec<u8> {
    let mut ans = Vec::with_capacity(n);
    for _i in 0..n {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        ans.push(b'a' + (seed % alphabet as u32) as u8);
    }
    ans
}

#[test]
fn rejects_bad_window() {
    let data = b"abcdef";
    assert!(matches!(Dictionary::new(data,0),Err(Error::InvalidWindowSize(0))));
    assert!(matches!(Dictionary::new(data,12),Err(Error::InvalidWindowSize(12))));
    assert!(matches!(Dictionary::new(data,(1 << 15) + 1),Err(Error::InvalidWindowSize(_))));
    assert!(Dictionary::new(data,1).is_ok());
    assert!(Dictionary::new(data,1 << 16).is_ok());
}

#[test]
fn repeated_triplet() {
    let data = b"abcabcabcX";
    let mut dict = Dictionary::new(data,16).expect("bad window");
    dict.add(0,3);
    let m = dict.find(3);
    assert!(m.length >= 3);
    assert_eq!(m.offset,3);
    assert_eq!(m,Match { length: 6, offset: 3 });
}

#[test]
fn find_after_add_skips_self() {
    let data = b"abcabcabcX";
    let mut dict = Dictionary::new(data,16).expect("bad window");
    dict.add(0,4);
    assert_eq!(dict.find(3),Match { length: 6, offset: 3 });
}

#[test]
fn no_repeats() {
    let data = b"abcdef";
    let mut dict = Dictionary::new(data,16).expect("bad window");
    for pos in 0..data.len() {
        assert_eq!(dict.find(pos),Match::NONE);
        dict.add(pos,1);
    }
}

#[test]
fn longest_wins_over_nearest() {
    let data = b"abcdefgh_abcz_abcdefgh";
    let mut dict = Dictionary::new(data,32).expect("bad window");
    dict.add(0,14);
    assert_eq!(dict.find(14),Match { length: 8, offset: 14 });
}

#[test]
fn probe_ceiling() {
    let data = b"abcdefgh_abcz_abcdefgh";
    let opt = Options { window_size: 32, max_probes: Some(1), ..crate::STD_OPTIONS };
    let mut dict = Dictionary::create(data,&opt).expect("bad window");
    dict.add(0,14);
    assert_eq!(dict.find(14),Match { length: 3, offset: 5 });
    let opt = Options { window_size: 32, max_probes: Some(0), ..crate::STD_OPTIONS };
    let mut dict = Dictionary::create(data,&opt).expect("bad window");
    dict.add(0,14);
    assert_eq!(dict.find(14),Match::NONE);
}

#[test]
fn distance_bound() {
    // window 4 reaches back 7 bytes
    let data = b"xyzQRSTxyz";
    let mut dict = Dictionary::new(data,4).expect("bad window");
    dict.add(0,7);
    assert_eq!(dict.find(7),Match { length: 3, offset: 7 });

    let data = b"xyzQRSTUxyz";
    let mut dict = Dictionary::new(data,4).expect("bad window");
    dict.add(0,8);
    assert_eq!(dict.find(8),Match::NONE);
}

#[test]
fn tail_handling() {
    let data = b"abcabc";
    let mut dict = Dictionary::new(data,16).expect("bad window");
    dict.add(0,data.len());
    assert_eq!(dict.find(3),Match { length: 3, offset: 3 });
    // too close to the end to compute a signature
    assert_eq!(dict.find(4),Match::NONE);
    assert_eq!(dict.find(5),Match::NONE);
    assert_eq!(dict.find(6),Match::NONE);
    // positions 3.. were never indexed
    assert_eq!(dict.candidates(6).count(),0);
    assert_eq!(dict.candidates(3).collect::<Vec<usize>>(),vec![0]);
}

#[test]
fn capped_at_max_match() {
    let data = vec![0u8;600];
    let mut dict = Dictionary::new(&data,1 << 10).expect("bad window");
    dict.add(0,1);
    assert_eq!(dict.find(1),Match { length: 257, offset: 1 });
    dict.add(1,400);
    // remaining bytes limit the match near the end, the newest indexed position is 400
    assert_eq!(dict.find(590),Match { length: 10, offset: 190 });
}

#[test]
fn idempotent_and_deterministic() {
    let data = pseudo_random(2000,4,0x1234_5678);
    let mut d1 = Dictionary::new(&data,64).expect("bad window");
    let mut d2 = Dictionary::new(&data,64).expect("bad window");
    for pos in 0..data.len() {
        let m = d1.find(pos);
        assert_eq!(m,d1.find(pos));
        assert_eq!(m,d2.find(pos));
        d1.add(pos,1);
        d2.add(pos,1);
    }
}

#[test]
fn chains_go_back_in_time() {
    let data = pseudo_random(5000,3,0xdead_beef);
    let mut dict = Dictionary::new(&data,8).expect("bad window");
    // add in uneven strides, with some overlap that must not be re-inserted
    let mut pos = 0;
    while pos < data.len() {
        dict.add(pos.saturating_sub(2),7);
        pos += 5;
        let cands: Vec<usize> = dict.candidates(pos).collect();
        for pair in cands.windows(2) {
            assert!(pair[0] > pair[1]);
        }
        for x in cands {
            assert!(x < pos && pos - x <= 8 + DISTANCE_SLACK);
        }
    }
}

#[test]
fn agrees_with_brute_force() {
    for (window,alphabet,seed) in [(4,2,7),(16,3,99),(64,2,12345),(32,5,4242)] {
        let data = pseudo_random(1500,alphabet,seed);
        let mut dict = Dictionary::new(&data,window).expect("bad window");
        for q in 0..data.len() {
            let m = dict.find(q);
            let limit = data.len().min(q + MAX_MATCH);
            assert!(m.length >= 1 && m.length <= 257);
            if q + 3 > data.len() {
                assert_eq!(m,Match::NONE);
            } else {
                // newest of the longest among indexed positions within reach
                let floor = q.saturating_sub(window + DISTANCE_SLACK);
                let mut expected = Match::NONE;
                for x in (floor..q.min(data.len() - TAIL)).rev() {
                    let length = probe::match_length(&data,x,q,limit);
                    if length > expected.length {
                        expected = Match { length, offset: q - x };
                    }
                }
                if expected.length >= 3 {
                    assert_eq!(m,expected,"window {} position {}",window,q);
                } else {
                    assert!(m.length <= 2);
                }
            }
            if m.is_match() {
                assert!(m.length <= limit - q);
                assert!(m.offset >= 1 && m.offset <= window + DISTANCE_SLACK);
                assert_eq!(data[q-m.offset..q-m.offset+m.length],data[q..q+m.length]);
            }
            dict.add(q,1);
        }
    }
}
