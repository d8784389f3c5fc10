//! # lzxdict
//!
//! Sliding window match finder for LZX style compressors.
//!
//! The heart of the crate is `dictionary::Dictionary`, a hash chain index over a borrowed
//! byte buffer.  An encoder calls `find` at the current position to get the longest earlier
//! occurrence of the upcoming bytes, then calls `add` to register whatever it consumed.
//! The `scan` module drives that protocol over a whole buffer, which is what the
//! command line tool uses.

mod tools;
pub mod dictionary;
pub mod scan;

pub use dictionary::{Dictionary, Match};

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// longest match the dictionary will report
pub const MAX_MATCH: usize = 257;
/// shortest run worth reporting as a match
pub const MIN_MATCH: usize = 2;
/// number of hash buckets, signatures are always below this
pub const HASH_SIZE: usize = 0x8000;
/// matches may reach this many bytes beyond the window size
pub const DISTANCE_SLACK: usize = 3;

/// Dictionary Errors
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("window size {0} is not a nonzero power of two")]
    InvalidWindowSize(usize),
    #[error("buffer of {0} bytes is too large to index")]
    BufferTooLarge(usize),
    #[error("could not allocate {entries} entries for the {table} table")]
    Allocation {
        table: &'static str,
        entries: usize
    }
}

/// Options controlling match finding
#[derive(Clone,Debug)]
pub struct Options {
    /// size of the sliding window, must be a power of two
    pub window_size: usize,
    /// maximum number of chain candidates compared per search, `None` walks the whole chain
    pub max_probes: Option<usize>,
    /// matches shorter than this are emitted as literals by the scan driver
    pub min_match: usize
}

pub const STD_OPTIONS: Options = Options {
    window_size: 1 << 15,
    max_probes: None,
    min_match: MIN_MATCH
};

#[test]
fn error_messages() {
    assert_eq!(Error::InvalidWindowSize(12).to_string(),"window size 12 is not a nonzero power of two");
    let e = Error::Allocation { table: "hash", entries: 4 };
    assert_eq!(e.to_string(),"could not allocate 4 entries for the hash table");
}
