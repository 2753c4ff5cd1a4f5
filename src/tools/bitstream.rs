//! Pack codes into bytes and unpack them again.
//! Bits are stored MSB first, the last byte is padded with zeros.
//! There is no end marker, the decoder has to be told how many symbols to produce.

use bit_vec::BitVec;
use crate::tools::huff_tree::{HuffTree,CodeTable,Node};
use crate::Error;

/// Replace each byte of `dat` with its code and return the packed bytes.
pub fn encode(dat: &[u8],codes: &CodeTable) -> Result<Vec<u8>,Error> {
    let mut bits = BitVec::new();
    for b in dat {
        match codes.get(*b) {
            Some(code) => bits.extend(code.iter()),
            None => {
                log::error!("byte {} is missing from the code table",b);
                return Err(Error::MissingCode(*b));
            }
        }
    }
    log::debug!("encoded {} bytes into {} bits",dat.len(),bits.len());
    // `to_bytes` pads the final byte with zeros on the right
    Ok(bits.to_bytes())
}

/// Walk the tree using the bits in `packed`, producing exactly `count` symbols.
/// Bits left over after the last symbol are ignored.
pub fn decode(packed: &[u8],tree: &HuffTree,count: u64) -> Result<Vec<u8>,Error> {
    // each symbol needs at least one bit
    let mut ans = Vec::with_capacity(usize::min(count as usize,packed.len()*8));
    if count == 0 {
        return Ok(ans);
    }
    let bits = BitVec::from_bytes(packed);
    let mut curs = tree.root();
    log::trace!("decoding {} symbols, root weight {}",count,tree.node(curs).weight());
    for bit in bits.iter() {
        curs = match tree.node(curs) {
            Node::Internal { left, right, .. } => match bit {
                true => *right,
                false => *left
            },
            // cursor is reset to the root, which is always internal
            Node::Leaf { .. } => return Err(Error::FileFormatMismatch)
        };
        if let Node::Leaf { symbol, .. } = tree.node(curs) {
            ans.push(*symbol);
            if ans.len() as u64 == count {
                return Ok(ans);
            }
            curs = tree.root();
        }
    }
    log::error!("decoded {} of {} symbols before bits ran out",ans.len(),count);
    Err(Error::TruncatedBitstream)
}

#[cfg(test)]
fn tree_for(dat: &[u8]) -> HuffTree {
    let mut freq = [0;256];
    for b in dat {
        freq[*b as usize] += 1;
    }
    HuffTree::build(&freq).expect("no tree")
}

#[test]
fn packs_msb_first_with_padding() {
    // a=0, c=10, b=11
    let dat = "aaabbc".as_bytes();
    let tree = tree_for(dat);
    let packed = encode(dat,&tree.code_table()).expect("encoding failed");
    // 0 0 0 11 11 10 -> 0001 1111 0(000)
    assert_eq!(packed,vec![0x1f,0x00]);
}

#[test]
fn padding_is_not_decoded() {
    // 9 bits of code, so 7 zero bits of padding, and a zero bit decodes as 'a'
    let dat = "aaabbc".as_bytes();
    let tree = tree_for(dat);
    let packed = encode(dat,&tree.code_table()).expect("encoding failed");
    let decoded = decode(&packed,&tree,dat.len() as u64).expect("decoding failed");
    assert_eq!(decoded,dat.to_vec());
}

#[test]
fn single_symbol_stream() {
    let dat = [7u8;10];
    let tree = tree_for(&dat);
    let packed = encode(&dat,&tree.code_table()).expect("encoding failed");
    assert_eq!(packed,vec![0x00,0x00]);
    let decoded = decode(&packed,&tree,10).expect("decoding failed");
    assert_eq!(decoded,dat.to_vec());
}

#[test]
fn missing_code_is_an_error() {
    let tree = tree_for("abc".as_bytes());
    match encode("abd".as_bytes(),&tree.code_table()) {
        Err(Error::MissingCode(b'd')) => {},
        _ => panic!("expected missing code")
    }
}

#[test]
fn short_bitstream_is_an_error() {
    let dat = "I am Sam. Sam I am.".as_bytes();
    let tree = tree_for(dat);
    let packed = encode(dat,&tree.code_table()).expect("encoding failed");
    match decode(&packed[0..packed.len()-2],&tree,dat.len() as u64) {
        Err(Error::TruncatedBitstream) => {},
        _ => panic!("expected truncation error")
    }
}
