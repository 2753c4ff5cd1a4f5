//! # statichuff
//!
//! Byte oriented static Huffman compression.  The whole input is scanned to
//! count byte frequencies, an optimal prefix code is derived from the counts,
//! and the bytes are packed MSB-first behind a header of 256 counters.
//! The decoder rebuilds the same tree from the counters, so the code table
//! itself is never stored.
//!
//! The main entry points are in the `huff` module.

mod tools;
pub mod huff;

type DYNERR = Box<dyn std::error::Error>;

/// Compression Errors
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("file format mismatch")]
    FileFormatMismatch,
    #[error("file too large")]
    FileTooLarge,
    #[error("bitstream ended before all symbols were decoded")]
    TruncatedBitstream,
    #[error("no code for byte {0}")]
    MissingCode(u8),
    #[error("symbol count does not fit the counter width")]
    CounterOverflow
}

/// Width in bytes of each frequency counter in the container header.
/// Counters are always little endian.
#[derive(Clone,Copy,Debug,PartialEq,num_derive::FromPrimitive)]
pub enum CounterWidth {
    U16 = 2,
    U32 = 4,
    U64 = 8
}

impl CounterWidth {
    pub fn bytes(&self) -> usize {
        *self as usize
    }
    /// largest count a counter of this width can hold
    pub fn max_count(&self) -> u64 {
        match self {
            Self::U16 => u16::MAX as u64,
            Self::U32 => u32::MAX as u64,
            Self::U64 => u64::MAX
        }
    }
}

/// Options controlling compression
#[derive(Clone)]
pub struct Options {
    /// width of the 256 frequency counters
    pub counter_width: CounterWidth,
    /// starting position in the input file
    pub in_offset: u64,
    /// starting position in the output file
    pub out_offset: u64,
    /// return error if file is larger
    pub max_file_size: u64
}

pub const STD_OPTIONS: Options = Options {
    counter_width: CounterWidth::U32,
    in_offset: 0,
    out_offset: 0,
    max_file_size: u32::MAX as u64
};

#[test]
fn counter_width_from_cli_value() {
    use num_traits::FromPrimitive;
    assert_eq!(CounterWidth::from_u64(2),Some(CounterWidth::U16));
    assert_eq!(CounterWidth::from_u64(4),Some(CounterWidth::U32));
    assert_eq!(CounterWidth::from_u64(8),Some(CounterWidth::U64));
    assert_eq!(CounterWidth::from_u64(3),None);
    assert_eq!(CounterWidth::U64.bytes(),8);
}
