//! Lockstep Scan
//!
//! Drives a `Dictionary` over a buffer the way an encoder would: search at the current
//! position, take the match if it is long enough or a literal otherwise, register the
//! consumed bytes, move on.  No bitstream is produced, the tokens are there to be counted,
//! checked, or listed.

use std::fmt;
use std::io::{Read,Write};
use crate::dictionary::Dictionary;
use crate::{Error,Options,DYNERR,STDRESULT};

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Token {
    Literal(u8),
    Match {
        length: usize,
        offset: usize
    }
}

impl Token {
    /// number of input bytes the token stands for
    pub fn span(&self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::Match { length, .. } => *length
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(c) => write!(f,"L {}",hex::encode([*c])),
            Token::Match { length, offset } => write!(f,"M {} {}",length,offset)
        }
    }
}

/// Summary of a token stream
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct Stats {
    pub total: usize,
    pub literals: usize,
    pub matches: usize,
    pub matched_bytes: usize,
    pub longest: usize
}

impl Stats {
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut ans = Self::default();
        for tok in tokens {
            ans.total += tok.span();
            match tok {
                Token::Literal(_) => ans.literals += 1,
                Token::Match { length, .. } => {
                    ans.matches += 1;
                    ans.matched_bytes += length;
                    ans.longest = ans.longest.max(*length);
                }
            }
        }
        ans
    }
}

impl fmt::Display for Stats {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f,"bytes:         {}",self.total)?;
        writeln!(f,"literals:      {}",self.literals)?;
        writeln!(f,"matches:       {}",self.matches)?;
        writeln!(f,"matched bytes: {}",self.matched_bytes)?;
        write!(f,"longest match: {}",self.longest)
    }
}

/// Tokenize `data` greedily, one search per token.
pub fn scan(data: &[u8],opt: &Options) -> Result<Vec<Token>,Error> {
    let mut dict = Dictionary::create(data,opt)?;
    let mut ans = Vec::new();
    let mut pos = 0;
    log::debug!("scanning {} bytes",data.len());
    while pos < data.len() {
        let m = dict.find(pos);
        let tok = match m.length >= opt.min_match.max(2) {
            true => Token::Match { length: m.length, offset: m.offset },
            false => Token::Literal(data[pos])
        };
        log::trace!("{}: {}",pos,tok);
        dict.add(pos,tok.span());
        pos += tok.span();
        ans.push(tok);
    }
    log::debug!("scan produced {} tokens",ans.len());
    Ok(ans)
}

/// Read everything from `input` and summarize its scan.
pub fn scan_reader<R: Read>(input: &mut R,opt: &Options) -> Result<Stats,DYNERR> {
    let mut data = Vec::new();
    input.read_to_end(&mut data)?;
    let tokens = scan(&data,opt)?;
    Ok(Stats::from_tokens(&tokens))
}

/// True if the tokens cover `data` exactly and every match copies bytes that really occur
/// `offset` bytes back.
pub fn check_tokens(data: &[u8],tokens: &[Token]) -> bool {
    let mut pos = 0;
    for tok in tokens {
        match *tok {
            Token::Literal(c) => {
                if data.get(pos) != Some(&c) {
                    log::error!("literal mismatch at {}",pos);
                    return false;
                }
            },
            Token::Match { length, offset } => {
                if offset == 0 || offset > pos || pos + length > data.len() {
                    log::error!("match out of range at {}",pos);
                    return false;
                }
                // byte by byte, since the source may overlap the destination
                for i in 0..length {
                    if data[pos - offset + i] != data[pos + i] {
                        log::error!("match mismatch at {}",pos + i);
                        return false;
                    }
                }
            }
        }
        pos += tok.span();
    }
    pos == data.len()
}

/// Write one token per line.
pub fn write_tokens<W: Write>(tokens: &[Token],out: &mut W) -> STDRESULT {
    for tok in tokens {
        writeln!(out,"{}",tok)?;
    }
    out.flush()?;
    Ok(())
}

#[test]
fn scan_works() {
    let data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let tokens = scan(data,&crate::STD_OPTIONS).expect("scan failed");
    assert!(check_tokens(data,&tokens));
    let stats = Stats::from_tokens(&tokens);
    assert_eq!(stats.total,data.len());
    assert!(stats.matches > 0);
    assert_eq!(stats.literals + stats.matched_bytes,data.len());
    // "Sam I am" appears three times, the last two can be copied
    assert!(stats.longest >= 8);
}

#[test]
fn repeated_pattern() {
    let data = "abcabcabcX".as_bytes();
    let tokens = scan(data,&crate::STD_OPTIONS).expect("scan failed");
    assert_eq!(tokens,vec![
        Token::Literal(b'a'),
        Token::Literal(b'b'),
        Token::Literal(b'c'),
        Token::Match { length: 6, offset: 3 },
        Token::Literal(b'X')
    ]);
}

#[test]
fn min_match_threshold() {
    let data = "abcabcabcX".as_bytes();
    let opt = Options { min_match: 7, ..crate::STD_OPTIONS };
    let tokens = scan(data,&opt).expect("scan failed");
    assert_eq!(tokens.len(),data.len());
    assert!(tokens.iter().all(|t| matches!(t,Token::Literal(_))));
}

#[test]
fn long_runs_split_at_max_match() {
    let data = vec![b'z';1000];
    let tokens = scan(&data,&crate::STD_OPTIONS).expect("scan failed");
    assert!(check_tokens(&data,&tokens));
    assert_eq!(tokens[0],Token::Literal(b'z'));
    assert_eq!(tokens[1],Token::Match { length: 257, offset: 1 });
    assert!(tokens.iter().all(|t| t.span() <= crate::MAX_MATCH));
}

#[test]
fn scan_is_deterministic() {
    let data: Vec<u8> = "the quick brown fox jumps over the lazy dog; ".repeat(40).into_bytes();
    let opt = Options { window_size: 64, ..crate::STD_OPTIONS };
    let t1 = scan(&data,&opt).expect("scan failed");
    let t2 = scan(&data,&opt).expect("scan failed");
    assert_eq!(t1,t2);
    assert!(check_tokens(&data,&t1));
    for tok in &t1 {
        if let Token::Match { offset, .. } = tok {
            assert!(*offset <= 64 + crate::DISTANCE_SLACK);
        }
    }
}

#[test]
fn bad_tokens_rejected() {
    let data = "abcabc".as_bytes();
    let good = vec![
        Token::Literal(b'a'),Token::Literal(b'b'),Token::Literal(b'c'),
        Token::Match { length: 3, offset: 3 }
    ];
    assert!(check_tokens(data,&good));
    assert!(!check_tokens(data,&good[0..3]));
    let bad = vec![Token::Literal(b'a'),Token::Match { length: 5, offset: 1 }];
    assert!(!check_tokens(data,&bad));
    let bad = vec![Token::Match { length: 2, offset: 1 }];
    assert!(!check_tokens(data,&bad));
}

#[test]
fn token_listing() {
    let tokens = vec![Token::Literal(b'a'),Token::Match { length: 6, offset: 3 }];
    let mut out: Vec<u8> = Vec::new();
    write_tokens(&tokens,&mut out).expect("write failed");
    assert_eq!(String::from_utf8(out).expect("not utf8"),"L 61\nM 6 3\n");
}

#[test]
fn bad_window_propagates() {
    let opt = Options { window_size: 1000, ..crate::STD_OPTIONS };
    assert!(matches!(scan(b"abc",&opt),Err(Error::InvalidWindowSize(1000))));
    let mut src = std::io::Cursor::new(b"abc".to_vec());
    assert!(scan_reader(&mut src,&opt).is_err());
}
