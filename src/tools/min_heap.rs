//! Binary min-heap used to pick the lightest nodes during tree construction.
//! Entries carry a weight and an arbitrary payload (the Huffman builder uses
//! arena indices).  Equal weights come out in the order they went in.
use num_traits::PrimInt;

struct Entry<W: PrimInt,T> {
    weight: W,
    /// insertion sequence, breaks ties between equal weights
    seq: u64,
    item: T
}

impl <W: PrimInt,T> Entry<W,T> {
    fn precedes(&self,other: &Self) -> bool {
        (self.weight,self.seq) < (other.weight,other.seq)
    }
}

pub struct MinHeap<W: PrimInt,T> {
    heap: Vec<Entry<W,T>>,
    next_seq: u64
}

impl <W: PrimInt,T> MinHeap<W,T> {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            heap: Vec::with_capacity(n),
            next_seq: 0
        }
    }
    pub fn len(&self) -> usize {
        self.heap.len()
    }
    /// add an item, O(log n)
    pub fn insert(&mut self,weight: W,item: T) {
        self.heap.push(Entry { weight, seq: self.next_seq, item });
        self.next_seq += 1;
        self.sift_up(self.heap.len() - 1);
    }
    /// remove and return the lightest item with its weight, or None if empty
    pub fn extract_min(&mut self) -> Option<(W,T)> {
        if self.heap.is_empty() {
            return None;
        }
        let min = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((min.weight,min.item))
    }
    fn sift_up(&mut self,mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.heap[i].precedes(&self.heap[parent]) {
                break;
            }
            self.heap.swap(i,parent);
            i = parent;
        }
    }
    fn sift_down(&mut self,mut i: usize) {
        let n = self.heap.len();
        loop {
            let left = 2*i + 1;
            let right = 2*i + 2;
            let mut smallest = i;
            if left < n && self.heap[left].precedes(&self.heap[smallest]) {
                smallest = left;
            }
            if right < n && self.heap[right].precedes(&self.heap[smallest]) {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.heap.swap(i,smallest);
            i = smallest;
        }
    }
}

#[test]
fn extracts_in_weight_order() {
    let mut heap: MinHeap<u64,char> = MinHeap::with_capacity(8);
    for (w,c) in [(5,'e'),(1,'a'),(4,'d'),(2,'b'),(3,'c')] {
        heap.insert(w,c);
    }
    assert_eq!(heap.len(),5);
    let mut order = Vec::new();
    while let Some((_w,c)) = heap.extract_min() {
        order.push(c);
    }
    assert_eq!(order,vec!['a','b','c','d','e']);
    assert_eq!(heap.len(),0);
}

#[test]
fn ties_come_out_in_insertion_order() {
    let mut heap: MinHeap<u32,usize> = MinHeap::with_capacity(4);
    heap.insert(7,0);
    heap.insert(3,1);
    heap.insert(7,2);
    heap.insert(3,3);
    assert_eq!(heap.extract_min(),Some((3,1)));
    assert_eq!(heap.extract_min(),Some((3,3)));
    assert_eq!(heap.extract_min(),Some((7,0)));
    assert_eq!(heap.extract_min(),Some((7,2)));
    assert_eq!(heap.extract_min(),None);
}

#[test]
fn holds_full_alphabet() {
    let mut heap: MinHeap<u64,usize> = MinHeap::with_capacity(256);
    for i in 0..256 {
        heap.insert(((i * 37) % 256) as u64,i);
    }
    let mut last = 0;
    for _i in 0..256 {
        let (w,_) = heap.extract_min().expect("heap ran dry");
        assert!(w >= last);
        last = w;
    }
    assert!(heap.extract_min().is_none());
}
