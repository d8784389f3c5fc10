pub mod lcg;
pub mod probe;
pub mod slot_table;
