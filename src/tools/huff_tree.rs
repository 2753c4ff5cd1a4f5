//! Static Huffman tree and code table.
//!
//! The tree is built once from a complete table of byte frequencies and then
//! never changes.  Nodes live in an arena and refer to their children by index.
//! Both the compressor and the expander build the tree from the same counts,
//! so they arrive at identical codes.

use bit_vec::BitVec;
use crate::tools::min_heap::MinHeap;

pub enum Node {
    Leaf {
        symbol: u8,
        weight: u64
    },
    /// internal nodes always have two children, left is reached by a 0 bit
    Internal {
        weight: u64,
        left: usize,
        right: usize
    }
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal { weight, .. } => *weight
        }
    }
}

pub struct HuffTree {
    nodes: Vec<Node>,
    root: usize
}

impl HuffTree {
    /// Build the tree from byte frequencies.  Symbols with count 0 do not become leaves.
    /// Returns None if every count is 0, since there is nothing to code.
    /// If there is only one symbol, the root is a synthetic internal node with the lone
    /// leaf in both child slots, so that every code is at least one bit long.
    pub fn build(freq: &[u64;256]) -> Option<Self> {
        let mut nodes: Vec<Node> = Vec::with_capacity(511);
        let mut queue: MinHeap<u64,usize> = MinHeap::with_capacity(256);
        for (symbol,count) in freq.iter().enumerate() {
            if *count > 0 {
                nodes.push(Node::Leaf { symbol: symbol as u8, weight: *count });
                queue.insert(*count,nodes.len()-1);
            }
        }
        log::debug!("building tree with {} leaves",queue.len());
        while queue.len() > 1 {
            // length was checked, so neither extraction can come back empty
            let (wl,left) = queue.extract_min()?;
            let (wr,right) = queue.extract_min()?;
            nodes.push(Node::Internal { weight: wl + wr, left, right });
            queue.insert(wl + wr,nodes.len()-1);
        }
        let (_,root) = queue.extract_min()?;
        if let Node::Leaf { symbol, weight } = nodes[root] {
            log::debug!("single symbol {}, using synthetic root",symbol);
            nodes.push(Node::Internal { weight, left: root, right: root });
            let root = nodes.len() - 1;
            return Some(Self { nodes, root });
        }
        Some(Self { nodes, root })
    }
    pub fn root(&self) -> usize {
        self.root
    }
    pub fn node(&self,idx: usize) -> &Node {
        &self.nodes[idx]
    }
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
    /// Walk the tree with an explicit stack, recording the path to each leaf.
    /// Left children are visited first, so the lone leaf of a single symbol
    /// tree receives the code `0`.
    pub fn code_table(&self) -> CodeTable {
        let mut codes: Vec<Option<BitVec>> = vec![None;256];
        let mut stack: Vec<(usize,BitVec)> = vec![(self.root,BitVec::new())];
        while let Some((idx,path)) = stack.pop() {
            match &self.nodes[idx] {
                Node::Leaf { symbol, .. } => {
                    let slot = &mut codes[*symbol as usize];
                    if slot.is_none() {
                        *slot = Some(path);
                    }
                },
                Node::Internal { left, right, .. } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((*right,right_path));
                    stack.push((*left,left_path));
                }
            }
        }
        CodeTable { codes }
    }
}

/// Map from byte value to its code, only bytes that occur have an entry.
pub struct CodeTable {
    codes: Vec<Option<BitVec>>
}

impl CodeTable {
    pub fn get(&self,symbol: u8) -> Option<&BitVec> {
        self.codes[symbol as usize].as_ref()
    }
    /// number of symbols with a code
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }
    /// iterate over (symbol,code) in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (u8,&BitVec)> {
        self.codes.iter().enumerate().filter_map(|(s,c)| c.as_ref().map(|code| (s as u8,code)))
    }
}

/// render a code as a string of 0 and 1
pub fn code_string(code: &BitVec) -> String {
    code.iter().map(|b| if b { '1' } else { '0' }).collect()
}

#[cfg(test)]
fn freq_of(dat: &[u8]) -> [u64;256] {
    let mut freq = [0;256];
    for b in dat {
        freq[*b as usize] += 1;
    }
    freq
}

#[cfg(test)]
fn is_prefix(a: &BitVec,b: &BitVec) -> bool {
    a.len() <= b.len() && a.iter().zip(b.iter()).all(|(x,y)| x==y)
}

#[test]
fn empty_input_has_no_tree() {
    assert!(HuffTree::build(&[0;256]).is_none());
}

#[test]
fn code_lengths_follow_frequency() {
    let tree = HuffTree::build(&freq_of("aaabbc".as_bytes())).expect("no tree");
    let codes = tree.code_table();
    assert_eq!(codes.len(),3);
    assert_eq!(codes.get(b'a').unwrap().len(),1);
    assert_eq!(codes.get(b'b').unwrap().len(),2);
    assert_eq!(codes.get(b'c').unwrap().len(),2);
    assert!(codes.get(b'd').is_none());
    // ties go to the earlier insertion, so these are exact
    assert_eq!(code_string(codes.get(b'a').unwrap()),"0");
    assert_eq!(code_string(codes.get(b'c').unwrap()),"10");
    assert_eq!(code_string(codes.get(b'b').unwrap()),"11");
}

#[test]
fn single_symbol_gets_one_bit() {
    let tree = HuffTree::build(&freq_of("zzzz".as_bytes())).expect("no tree");
    match tree.node(tree.root()) {
        Node::Internal { weight, left, right } => {
            assert_eq!(*weight,4);
            assert_eq!(left,right);
        },
        Node::Leaf { .. } => panic!("root should not be a leaf")
    }
    let codes = tree.code_table();
    assert_eq!(codes.len(),1);
    assert_eq!(code_string(codes.get(b'z').unwrap()),"0");
}

#[test]
fn tree_is_full_and_weights_add_up() {
    let dat = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let tree = HuffTree::build(&freq_of(dat)).expect("no tree");
    let mut leaves = 0;
    for i in 0..tree.node_count() {
        match tree.node(i) {
            Node::Leaf { .. } => leaves += 1,
            Node::Internal { weight, left, right } => {
                assert_ne!(left,right);
                assert_eq!(*weight,tree.node(*left).weight() + tree.node(*right).weight());
            }
        }
    }
    // a full binary tree with n leaves has n-1 internal nodes
    assert_eq!(tree.node_count(),2*leaves - 1);
    assert_eq!(tree.node(tree.root()).weight(),dat.len() as u64);
}

#[test]
fn codes_are_prefix_free() {
    let mut freq = [0;256];
    for i in 0..256 {
        freq[i] = (i as u64 % 17) * (i as u64 % 5) + 1;
    }
    let tree = HuffTree::build(&freq).expect("no tree");
    let codes = tree.code_table();
    assert_eq!(codes.len(),256);
    for (s1,c1) in codes.iter() {
        for (s2,c2) in codes.iter() {
            if s1 != s2 {
                assert!(!is_prefix(c1,c2),"code for {} is a prefix of code for {}",s1,s2);
            }
        }
    }
}

#[test]
fn unbalanced_tree_does_not_overflow() {
    // Fibonacci weights give the deepest possible tree
    let mut freq = [0;256];
    let (mut a,mut b) = (1u64,1u64);
    for i in 0..60 {
        freq[i] = a;
        let c = a + b;
        a = b;
        b = c;
    }
    let tree = HuffTree::build(&freq).expect("no tree");
    let codes = tree.code_table();
    assert_eq!(codes.len(),60);
    let longest = codes.iter().map(|(_,c)| c.len()).max().unwrap();
    assert_eq!(longest,59);
}
