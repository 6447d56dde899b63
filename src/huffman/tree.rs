use std::cmp::Ordering;
use std::collections::BinaryHeap;

use HuffmanTree::*;

/// Huffman tree over the byte alphabet. Leaves carry symbols, internal
/// nodes carry exactly two children; each child is owned by its parent.
#[derive(Debug, PartialEq, Eq)]
pub enum HuffmanTree {
    /// byte, count
    Leaf(u8, u64),
    /// summed count of both subtrees
    Node(u64, Box<HuffmanTree>, Box<HuffmanTree>),
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two minimum-weight nodes.
    ///
    /// Ties break on a total order (weight, then sequence number) so that
    /// identical histograms always produce identical trees. Leaves rank by
    /// their byte value; internal nodes rank after all leaves, in creation
    /// order. The first node popped becomes the left child.
    ///
    /// Returns `None` for an all-zero histogram: an empty alphabet has no
    /// tree and downstream stages treat it as the empty-stream case.
    pub fn from_histogram(histogram: &[u64; 256]) -> Option<Self> {
        let mut heap: BinaryHeap<_> = histogram
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(i, &count)| Ranked {
                seq: i as u16,
                tree: Leaf(u8::try_from(i).unwrap(), count),
            })
            .collect();

        let mut next_seq = 256u16;
        while heap.len() >= 2 {
            let left = heap.pop().unwrap();
            let right = heap.pop().unwrap();
            let weight = left.tree.weight() + right.tree.weight();
            heap.push(Ranked {
                seq: next_seq,
                tree: Node(weight, Box::new(left.tree), Box::new(right.tree)),
            });
            next_seq += 1;
        }

        heap.pop().map(|ranked| ranked.tree)
    }

    pub fn weight(&self) -> u64 {
        match self {
            Leaf(_, count) => *count,
            Node(count, ..) => *count,
        }
    }
}

/// Heap entry. Orders by (weight, seq), both inverted so the std max-heap
/// pops the minimum first.
struct Ranked {
    seq: u16,
    tree: HuffmanTree,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.tree.weight(), other.seq).cmp(&(self.tree.weight(), self.seq))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}
