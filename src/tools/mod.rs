//! Building blocks for the static Huffman coder
pub mod min_heap;
pub mod huff_tree;
pub mod bitstream;
