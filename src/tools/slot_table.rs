//! Fixed size tables addressed by stream position for LZ type windows
use num_traits::PrimInt;
use crate::Error;

/// Table of integer cells where a stream position maps to a cell by masking.
/// The length is always a power of two, so addressing never divides.
pub struct SlotTable<T: PrimInt> {
    buf: Vec<T>,
    mask: usize
}

impl <T: PrimInt> SlotTable<T> {
    /// Allocate `n` cells holding `fill`; `n` must be a power of two.
    /// `name` only serves to identify the table in an allocation error.
    pub fn create(fill: T,n: usize,name: &'static str) -> Result<Self,Error> {
        if !n.is_power_of_two() {
            return Err(Error::InvalidWindowSize(n));
        }
        let mut buf: Vec<T> = Vec::new();
        if buf.try_reserve_exact(n).is_err() {
            return Err(Error::Allocation { table: name, entries: n });
        }
        buf.resize(n,fill);
        Ok(Self {
            buf,
            mask: n - 1
        })
    }
    /// cell index for a stream position
    pub fn slot(&self,pos: usize) -> usize {
        pos & self.mask
    }
    /// get value stored for a position
    pub fn get(&self,pos: usize) -> T {
        self.buf[self.slot(pos)]
    }
    /// set value stored for a position
    pub fn set(&mut self,pos: usize,val: T) {
        let slot = self.slot(pos);
        self.buf[slot] = val;
    }
    /// store `val` for a position and hand back what it replaced
    pub fn replace(&mut self,pos: usize,val: T) -> T {
        let slot = self.slot(pos);
        std::mem::replace(&mut self.buf[slot],val)
    }
    pub fn len(&self) -> usize {
        self.buf.len()
    }
}

#[test]
fn wraps() {
    let mut table: SlotTable<u32> = SlotTable::create(0,4,"test").expect("alloc failed");
    assert_eq!(table.slot(5),1);
    assert_eq!(table.slot(4),0);
    assert_eq!(table.slot(3),3);
    table.set(6,99);
    assert_eq!(table.get(2),99);
    assert_eq!(table.get(10),99);
    assert_eq!(table.len(),4);
}

#[test]
fn replace_returns_old() {
    let mut table: SlotTable<u16> = SlotTable::create(7,8,"test").expect("alloc failed");
    assert_eq!(table.replace(9,1),7);
    assert_eq!(table.replace(1,2),1);
    assert_eq!(table.get(17),2);
}

#[test]
fn rejects_bad_length() {
    assert!(matches!(SlotTable::<u32>::create(0,0,"test"),Err(Error::InvalidWindowSize(0))));
    assert!(matches!(SlotTable::<u32>::create(0,12,"test"),Err(Error::InvalidWindowSize(12))));
}
