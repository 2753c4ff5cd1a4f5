//! Static Huffman Compression
//!
//! The container is a header of 256 frequency counters, one per byte value in
//! ascending order, followed immediately by the packed codes.  There is no magic
//! number, length field, or checksum.  The number of bytes to expand is the sum
//! of the counters.
//!
//! * The whole input is read before anything is written
//! * Counters are little endian, width is set by `Options::counter_width`
//! * Output can be larger than input, the header alone is 512 to 2048 bytes

use std::io::{Cursor,Read,Write,Seek,SeekFrom,BufReader,BufWriter,ErrorKind};
use crate::tools::huff_tree::{HuffTree,code_string};
use crate::tools::bitstream;
use crate::{DYNERR,Options,CounterWidth,Error};

/// Occurrence count of every byte value.
#[derive(Clone,Debug,PartialEq)]
pub struct FrequencyTable {
    counts: [u64;256]
}

impl FrequencyTable {
    /// count the bytes in `dat`
    pub fn scan(dat: &[u8]) -> Self {
        let mut counts = [0;256];
        for b in dat {
            counts[*b as usize] += 1;
        }
        Self { counts }
    }
    pub fn count(&self,symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }
    /// Sum of all counts, this is the number of bytes the container expands to.
    /// None if a corrupt header makes the sum overflow.
    pub fn total(&self) -> Option<u64> {
        self.counts.iter().try_fold(0u64,|acc,c| acc.checked_add(*c))
    }
    /// number of symbols with nonzero count
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|c| **c > 0).count()
    }
    /// Serialize as 256 little endian counters of the given width.
    pub fn to_bytes(&self,width: CounterWidth) -> Result<Vec<u8>,Error> {
        let mut ans = Vec::with_capacity(256 * width.bytes());
        for c in self.counts.iter() {
            if *c > width.max_count() {
                log::error!("count {} exceeds {:?} counter",c,width);
                return Err(Error::CounterOverflow);
            }
            ans.extend_from_slice(&c.to_le_bytes()[0..width.bytes()]);
        }
        Ok(ans)
    }
    /// Deserialize from exactly 256 counters of the given width.
    pub fn from_bytes(header: &[u8],width: CounterWidth) -> Result<Self,Error> {
        let w = width.bytes();
        if header.len() != 256 * w {
            return Err(Error::FileFormatMismatch);
        }
        let mut counts = [0;256];
        for (i,chunk) in header.chunks_exact(w).enumerate() {
            let mut le: [u8;8] = [0;8];
            le[0..w].copy_from_slice(chunk);
            counts[i] = u64::from_le_bytes(le);
        }
        Ok(Self { counts })
    }
}

/// Main compression function.
/// `expanded_in` is an object with `Read` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `compressed_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.
pub fn compress<R,W>(expanded_in: &mut R, compressed_out: &mut W, opt: &Options) -> Result<(u64,u64),DYNERR>
where R: Read + Seek, W: Write + Seek {
    let mut reader = BufReader::new(expanded_in);
    let mut writer = BufWriter::new(compressed_out);
    let mut expanded_length = reader.seek(SeekFrom::End(0))?;
    if opt.in_offset > expanded_length {
        return Err(Box::new(Error::FileFormatMismatch));
    }
    expanded_length -= opt.in_offset;
    if expanded_length > opt.max_file_size {
        return Err(Box::new(Error::FileTooLarge));
    }
    reader.seek(SeekFrom::Start(opt.in_offset))?;
    let mut dat = Vec::with_capacity(expanded_length as usize);
    reader.read_to_end(&mut dat)?;

    log::debug!("scan {} bytes",dat.len());
    let freq = FrequencyTable::scan(&dat);
    writer.seek(SeekFrom::Start(opt.out_offset))?;
    writer.write_all(&freq.to_bytes(opt.counter_width)?)?;
    match HuffTree::build(&freq.counts) {
        None => log::debug!("empty input, header only"),
        Some(tree) => {
            let codes = tree.code_table();
            log::debug!("tree has {} nodes for {} codes",tree.node_count(),codes.len());
            let packed = bitstream::encode(&dat,&codes)?;
            writer.write_all(&packed)?;
        }
    }
    writer.flush()?;
    Ok((expanded_length,writer.stream_position()? - opt.out_offset))
}

/// Main decompression function.
/// `compressed_in` is an object with `Read` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `expanded_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.
pub fn expand<R,W>(compressed_in: &mut R, expanded_out: &mut W, opt: &Options) -> Result<(u64,u64),DYNERR>
where R: Read + Seek, W: Write + Seek {
    let mut reader = BufReader::new(compressed_in);
    let mut writer = BufWriter::new(expanded_out);
    let mut compressed_size = reader.seek(SeekFrom::End(0))?;
    if opt.in_offset > compressed_size {
        return Err(Box::new(Error::FileFormatMismatch));
    }
    compressed_size -= opt.in_offset;
    reader.seek(SeekFrom::Start(opt.in_offset))?;

    let mut header = vec![0;256 * opt.counter_width.bytes()];
    match reader.read_exact(&mut header) {
        Ok(()) => {},
        Err(e) if e.kind()==ErrorKind::UnexpectedEof => {
            log::error!("header needs {} bytes, found {}",header.len(),compressed_size);
            return Err(Box::new(Error::FileFormatMismatch));
        },
        Err(e) => return Err(Box::new(e))
    }
    let freq = FrequencyTable::from_bytes(&header,opt.counter_width)?;
    let total = match freq.total() {
        Some(t) => t,
        None => return Err(Box::new(Error::FileFormatMismatch))
    };
    if total > opt.max_file_size {
        return Err(Box::new(Error::FileTooLarge));
    }
    log::debug!("header announces {} bytes in {} symbols",total,freq.distinct());

    let mut packed = Vec::new();
    reader.read_to_end(&mut packed)?;
    writer.seek(SeekFrom::Start(opt.out_offset))?;
    match HuffTree::build(&freq.counts) {
        None => log::debug!("empty header, nothing to expand"),
        Some(tree) => {
            let dat = bitstream::decode(&packed,&tree,total)?;
            writer.write_all(&dat)?;
        }
    }
    writer.flush()?;
    Ok((compressed_size,writer.stream_position()? - opt.out_offset))
}

/// Convenience function, calls `compress` with a slice returning a Vec
pub fn compress_slice(slice: &[u8],opt: &Options) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    compress(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

/// Convenience function, calls `expand` with a slice returning a Vec
pub fn expand_slice(slice: &[u8],opt: &Options) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    expand(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

/// List (symbol,count,code) for every byte that occurs in `slice`,
/// with the code rendered as a string of 0 and 1.
pub fn code_listing(slice: &[u8]) -> Vec<(u8,u64,String)> {
    let freq = FrequencyTable::scan(slice);
    match HuffTree::build(&freq.counts) {
        None => Vec::new(),
        Some(tree) => {
            let codes = tree.code_table();
            codes.iter().map(|(s,code)| (s,freq.count(s),code_string(code))).collect()
        }
    }
}

// *************** TESTS *****************

#[cfg(test)]
fn header_hex(width: usize,entries: &[(u8,u64)]) -> String {
    let mut counts = [0u64;256];
    for (s,c) in entries {
        counts[*s as usize] = *c;
    }
    counts.iter().map(|c| hex::encode(&c.to_le_bytes()[0..width])).collect()
}

#[test]
fn compression_works() {
    // a=0, c=10, b=11, packed as 0001 1111 0000 0000
    let test_data = "aaabbc".as_bytes();
    let compressed = compress_slice(test_data,&crate::STD_OPTIONS).expect("compression failed");
    let expected = header_hex(4,&[(b'a',3),(b'b',2),(b'c',1)]) + "1f00";
    assert_eq!(compressed,hex::decode(expected).unwrap());
}

#[test]
fn compression_works_16() {
    let mut opt = crate::STD_OPTIONS;
    opt.counter_width = CounterWidth::U16;
    let test_data = "aaabbc".as_bytes();
    let compressed = compress_slice(test_data,&opt).expect("compression failed");
    let expected = header_hex(2,&[(b'a',3),(b'b',2),(b'c',1)]) + "1f00";
    assert_eq!(compressed.len(),514);
    assert_eq!(compressed,hex::decode(expected).unwrap());
}

#[test]
fn frequency_total_matches_length() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let freq = FrequencyTable::scan(test_data);
    assert_eq!(freq.total(),Some(test_data.len() as u64));
    assert_eq!(freq.count(b'S'),3);
    assert_eq!(freq.count(b'z'),0);
}

#[test]
fn invertibility() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let compressed = compress_slice(test_data,&crate::STD_OPTIONS).expect("compression failed");
    let expanded = expand_slice(&compressed,&crate::STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);

    let test_data = "aaabbc".as_bytes();
    let compressed = compress_slice(test_data,&crate::STD_OPTIONS).expect("compression failed");
    let expanded = expand_slice(&compressed,&crate::STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);
}

#[test]
fn invertibility_all_bytes() {
    let mut opt = crate::STD_OPTIONS;
    opt.counter_width = CounterWidth::U64;
    let mut test_data = Vec::new();
    for i in 0..4096usize {
        test_data.push(((i * i + 7 * i) % 251) as u8);
        test_data.push((i % 256) as u8);
    }
    let compressed = compress_slice(&test_data,&opt).expect("compression failed");
    let expanded = expand_slice(&compressed,&opt).expect("expansion failed");
    assert_eq!(test_data,expanded);
}

#[test]
fn empty_input() {
    let compressed = compress_slice(&[],&crate::STD_OPTIONS).expect("compression failed");
    assert_eq!(compressed,vec![0;1024]);
    let expanded = expand_slice(&compressed,&crate::STD_OPTIONS).expect("expansion failed");
    assert!(expanded.is_empty());
}

#[test]
fn single_symbol() {
    let test_data = [b'b';3];
    let compressed = compress_slice(&test_data,&crate::STD_OPTIONS).expect("compression failed");
    let expected = header_hex(4,&[(b'b',3)]) + "00";
    assert_eq!(compressed,hex::decode(expected).unwrap());
    let expanded = expand_slice(&compressed,&crate::STD_OPTIONS).expect("expansion failed");
    assert_eq!(expanded,test_data.to_vec());
}

#[test]
fn short_header() {
    let compressed = compress_slice("aaabbc".as_bytes(),&crate::STD_OPTIONS).expect("compression failed");
    let err = expand_slice(&compressed[0..1000],&crate::STD_OPTIONS).expect_err("short header accepted");
    assert!(matches!(err.downcast_ref::<Error>(),Some(Error::FileFormatMismatch)));
}

#[test]
fn missing_bitstream() {
    let compressed = compress_slice("aaabbc".as_bytes(),&crate::STD_OPTIONS).expect("compression failed");
    let err = expand_slice(&compressed[0..1024],&crate::STD_OPTIONS).expect_err("missing bits accepted");
    assert!(matches!(err.downcast_ref::<Error>(),Some(Error::TruncatedBitstream)));
}

#[test]
fn counter_overflow() {
    let mut opt = crate::STD_OPTIONS;
    opt.counter_width = CounterWidth::U16;
    let test_data = vec![0u8;70000];
    let err = compress_slice(&test_data,&opt).expect_err("overflow accepted");
    assert!(matches!(err.downcast_ref::<Error>(),Some(Error::CounterOverflow)));
}

#[test]
fn file_too_large() {
    let mut opt = crate::STD_OPTIONS;
    opt.max_file_size = 4;
    let err = compress_slice("aaabbc".as_bytes(),&opt).expect_err("large file accepted");
    assert!(matches!(err.downcast_ref::<Error>(),Some(Error::FileTooLarge)));
}

#[test]
fn offsets() {
    let mut opt = crate::STD_OPTIONS;
    opt.in_offset = 3;
    opt.out_offset = 2;
    let mut src = Cursor::new("XYZaaabbc".as_bytes());
    let mut dst: Cursor<Vec<u8>> = Cursor::new(vec![0xee,0xee]);
    let (in_size,out_size) = compress(&mut src,&mut dst,&opt).expect("compression failed");
    assert_eq!((in_size,out_size),(6,1026));
    let compressed = dst.into_inner();
    assert_eq!(compressed[0..2],[0xee,0xee]);
    opt.in_offset = 2;
    opt.out_offset = 0;
    let expanded = expand_slice(&compressed,&opt).expect("expansion failed");
    assert_eq!(expanded,"aaabbc".as_bytes().to_vec());
}

#[test]
fn listing() {
    let listing = code_listing("aaabbc".as_bytes());
    assert_eq!(listing,vec![
        (b'a',3,"0".to_string()),
        (b'b',2,"11".to_string()),
        (b'c',1,"10".to_string())
    ]);
    assert!(code_listing(&[]).is_empty());
}
