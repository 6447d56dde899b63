use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use bitvec::prelude::*;

use crate::error::HuffmanError;
use crate::huffman::tree::HuffmanTree;

/// A symbol's code: its bits in emission order.
pub type Code = BitVec<u8, Msb0>;

/// Symbol to code mapping, direct-indexed by byte value for O(1) lookup.
///
/// Tables generated from a tree are prefix-free by construction: codes are
/// root-to-leaf paths and no leaf is an ancestor of another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Table with no entries, the shape the empty-alphabet case takes.
    pub fn new() -> Self {
        Self { codes: vec![None; 256] }
    }

    /// Walks the tree breadth-first; left appends 0, right appends 1, and
    /// a leaf stores the accumulated path as its code.
    ///
    /// A lone leaf (single-symbol alphabet) would get the empty path, which
    /// cannot frame a bitstream, so it takes the reserved 1-bit code `0`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = Self::new();

        if let HuffmanTree::Leaf(byte, _) = tree {
            table.codes[usize::from(*byte)] = Some(bitvec![u8, Msb0; 0]);
            return table;
        }

        let mut bfs = VecDeque::new();
        bfs.push_back((tree, Code::new()));

        while let Some((node, path)) = bfs.pop_front() {
            match node {
                HuffmanTree::Leaf(byte, _) => {
                    table.codes[usize::from(*byte)] = Some(path);
                }
                HuffmanTree::Node(_, left, right) => {
                    let mut zero = path.clone();
                    zero.push(false);
                    let mut one = path;
                    one.push(true);
                    bfs.push_back((left, zero));
                    bfs.push_back((right, one));
                }
            }
        }

        table
    }

    pub fn get(&self, byte: u8) -> Option<&BitSlice<u8, Msb0>> {
        self.codes[usize::from(byte)].as_deref()
    }

    /// Entries in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSlice<u8, Msb0>)> {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(i, code)| code.as_deref().map(|c| (i as u8, c)))
    }

    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(|code| code.is_none())
    }

    /// Average code length in bits per symbol under the given counts.
    /// For a generated table this is the Huffman optimum for that histogram.
    pub fn expected_code_length(&self, histogram: &[u64; 256]) -> f64 {
        let total: u64 = histogram.iter().sum();
        if total == 0 {
            return 0.0;
        }
        let weighted: f64 = self
            .iter()
            .map(|(byte, code)| histogram[usize::from(byte)] as f64 * code.len() as f64)
            .sum();
        weighted / total as f64
    }

    /// Writes the table as text records, one `"<symbol>, <code>"` per line.
    pub fn to_writer<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (byte, code) in self.iter() {
            let bits: String = code.iter().map(|bit| if *bit { '1' } else { '0' }).collect();
            writeln!(writer, "{}, {}", byte, bits)?;
        }
        Ok(())
    }

    /// Parses text records back into a table.
    ///
    /// Any malformed record rejects the whole table: a table missing one
    /// symbol decodes garbage, so partial application is never an option.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, HuffmanError> {
        let mut table = Self::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let no = i + 1;
            if line.trim().is_empty() {
                continue;
            }

            let (symbol_text, code_text) = line
                .split_once(',')
                .ok_or_else(|| HuffmanError::malformed(no, "missing ',' separator"))?;

            let byte: u8 = symbol_text.trim().parse().map_err(|_| {
                HuffmanError::malformed(no, format!("bad symbol {:?}", symbol_text.trim()))
            })?;

            let code_text = code_text.trim();
            if code_text.is_empty() {
                return Err(HuffmanError::malformed(no, "empty code"));
            }
            let mut code = Code::with_capacity(code_text.len());
            for ch in code_text.chars() {
                match ch {
                    '0' => code.push(false),
                    '1' => code.push(true),
                    _ => {
                        return Err(HuffmanError::malformed(
                            no,
                            format!("non-binary code character {:?}", ch),
                        ))
                    }
                }
            }

            let slot = &mut table.codes[usize::from(byte)];
            if slot.is_some() {
                return Err(HuffmanError::malformed(no, format!("duplicate symbol {}", byte)));
            }
            *slot = Some(code);
        }

        Ok(table)
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::histogram;

    fn table_for(input: &[u8]) -> CodeTable {
        let tree = HuffmanTree::from_histogram(&histogram(input)).unwrap();
        CodeTable::from_tree(&tree)
    }

    #[test]
    fn scenario_code_lengths() {
        let table = table_for(b"AAAAABBCD");
        assert_eq!(table.get(b'A').unwrap().len(), 1);
        assert_eq!(table.get(b'B').unwrap().len(), 2);
        assert_eq!(table.get(b'C').unwrap().len(), 3);
        assert_eq!(table.get(b'D').unwrap().len(), 3);
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(b'E'), None);
    }

    #[test]
    fn scenario_expected_code_length() {
        let table = table_for(b"AAAAABBCD");
        let hist = histogram(b"AAAAABBCD");
        // (5*1 + 2*2 + 1*3 + 1*3) / 9
        assert!((table.expected_code_length(&hist) - 15.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_four_symbols_get_two_bits_each() {
        let table = table_for(b"ABCD");
        for byte in *b"ABCD" {
            assert_eq!(table.get(byte).unwrap().len(), 2);
        }
        assert_eq!(table.expected_code_length(&histogram(b"ABCD")), 2.0);
    }

    #[test]
    fn lone_leaf_gets_reserved_one_bit_code() {
        let table = table_for(b"zzz");
        assert_eq!(table.get(b'z').unwrap(), bits![u8, Msb0; 0]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn generated_tables_are_prefix_free() {
        for input in [
            b"AAAAABBCD".as_slice(),
            b"mississippi river",
            b"\x00\x00\x01\xff\xff\xff",
            b"abcdefghijklmnopqrstuvwxyz",
        ] {
            let table = table_for(input);
            for (a, code_a) in table.iter() {
                for (b, code_b) in table.iter() {
                    if a != b {
                        assert!(
                            !code_b.starts_with(code_a),
                            "code of {a} is a prefix of code of {b}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn expected_length_sits_within_the_entropy_bound() {
        // Huffman optimum: H <= expected length < H + 1
        for input in [b"mississippi river".as_slice(), b"AAAAABBCD", b"abcdefgg"] {
            let hist = histogram(input);
            let table = table_for(input);
            let total: u64 = hist.iter().sum();
            let entropy: f64 = hist
                .iter()
                .filter(|&&c| c > 0)
                .map(|&c| {
                    let p = c as f64 / total as f64;
                    -p * p.log2()
                })
                .sum();
            let ecl = table.expected_code_length(&hist);
            assert!(ecl >= entropy - 1e-9, "{input:?}: {ecl} < H = {entropy}");
            assert!(ecl < entropy + 1.0, "{input:?}: {ecl} >= H + 1 = {}", entropy + 1.0);
        }
    }

    #[test]
    fn identical_histograms_give_identical_tables() {
        assert_eq!(table_for(b"mississippi river"), table_for(b"mississippi river"));
    }

    #[test]
    fn round_trips_through_text() {
        let table = table_for(b"AAAAABBCD");
        let mut buf = Vec::new();
        table.to_writer(&mut buf).unwrap();
        assert_eq!(CodeTable::from_reader(buf.as_slice()).unwrap(), table);
    }

    #[test]
    fn round_trips_symbol_zero_and_one_bit_codes() {
        // alphabet {0x00, 0x01}, both codes one bit long
        let table = table_for(b"\x00\x00\x00\x01");
        let mut buf = Vec::new();
        table.to_writer(&mut buf).unwrap();
        let parsed = CodeTable::from_reader(buf.as_slice()).unwrap();
        assert_eq!(parsed, table);
        assert_eq!(parsed.get(0x00).unwrap().len(), 1);
    }

    #[test]
    fn rejects_malformed_records() {
        let cases: [(&[u8], &str); 6] = [
            (b"q, 010", "bad symbol"),
            (b"300, 01", "bad symbol"),
            (b"65, 012", "non-binary"),
            (b"65, 0\n65, 1", "duplicate"),
            (b"65 010", "separator"),
            (b"65, ", "empty code"),
        ];
        for (text, why) in cases {
            let err = CodeTable::from_reader(text).unwrap_err();
            assert!(
                matches!(err, HuffmanError::MalformedTable { .. }),
                "{why}: unexpected {err:?}"
            );
        }
    }

    #[test]
    fn reports_the_offending_line() {
        let err = CodeTable::from_reader(b"65, 0\n66, 1\n66, 10".as_slice()).unwrap_err();
        let HuffmanError::MalformedTable { line, .. } = err else { panic!() };
        assert_eq!(line, 3);
    }
}
