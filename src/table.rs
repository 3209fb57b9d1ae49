//! The code table of an LZW encoder.
use crate::alloc::vec::Vec;
use crate::trie::{NodeId, Trie};
use crate::{Code, CLEAR_CODE, FIRST_CODE, MAX_CODESIZE, MAX_ENTRIES, MIN_CODESIZE};

#[cfg(feature = "std")]
use std::io;

/// The dictionary of one encoding session.
///
/// Bytes are fed with [`consume`] and grow the table exactly as a decoder grows its own while
/// replaying the codes of the encoder. A table is never shared between sessions. To start over
/// after a clear code, drop it and construct a fresh one.
///
/// By default the table keeps assigning codes for as long as it is fed, the code size stopping
/// at 12 bits. See [`with_max_entries`] for a table that stops growing instead.
///
/// [`consume`]: #method.consume
/// [`with_max_entries`]: #method.with_max_entries
pub struct CodeTable {
    /// The sequence tree, each node carrying the code of its sequence.
    tree: Trie,
    /// The byte range in `data` of each code. Reserved codes have an empty range.
    entries: Vec<Entry>,
    /// The bytes of all sequences, one copy per code.
    data: Vec<u8>,
    /// The node of the pending match, `None` while the match is empty.
    current: Option<NodeId>,
    /// The current code length.
    code_size: u8,
    /// The number of codes after which no more are assigned, if any.
    max_entries: Option<usize>,
}

#[derive(Clone, Copy, Default)]
struct Entry {
    start: usize,
    len: usize,
}

/// The effect of consuming a single byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The extended match was already known, under this code.
    Extended(Code),
    /// The extended match was new. The match restarts with the consumed byte.
    Resolved {
        /// The code of the longest known match before the byte. This is what an encoder emits.
        prefix: Code,
        /// The code assigned to the new sequence, `None` if the table is limited and full.
        assigned: Option<Code>,
    },
}

impl CodeTable {
    /// Create a table seeded with the 256 literal codes.
    pub fn new() -> Self {
        CodeTable::with_capacity(MAX_ENTRIES)
    }

    /// Create a table, reserving room for `hint` codes.
    ///
    /// The hint only affects allocation, never the codes assigned.
    pub fn with_capacity(hint: usize) -> Self {
        CodeTable::build(hint, None)
    }

    /// Create a table that stops assigning codes once it holds `max_entries` of them.
    ///
    /// This matches a decoder that stops growing its table when the maximum code size is
    /// reached, commonly with `MAX_ENTRIES`. A full table still resolves matches but learns no
    /// new sequences. The limit never drops below the literal and reserved codes.
    pub fn with_max_entries(max_entries: usize) -> Self {
        let max_entries = max_entries.max(FIRST_CODE as usize);
        CodeTable::build(max_entries, Some(max_entries))
    }

    fn build(hint: usize, max_entries: Option<usize>) -> Self {
        // Only a reservation, larger tables still grow on demand.
        let hint = hint.max(FIRST_CODE as usize).min(1 << 16);
        let mut table = CodeTable {
            tree: Trie::with_capacity(hint),
            entries: Vec::with_capacity(hint),
            data: Vec::with_capacity(4 * hint),
            current: None,
            code_size: MIN_CODESIZE,
            max_entries,
        };
        table.init();
        table
    }

    fn init(&mut self) {
        let root = self.tree.root();
        self.tree.make_full(root);
        for ch in 0u8..=255 {
            let node = self.tree.insert(root, ch);
            self.tree.set_code(node, Code::from(ch));
            self.entries.push(Entry {
                start: self.data.len(),
                len: 1,
            });
            self.data.push(ch);
        }

        // Keep the clear and end code unassigned.
        self.entries.resize(FIRST_CODE as usize, Entry::default());
    }

    /// Consume one byte of input.
    ///
    /// Extends the pending match if the extension is already known. Otherwise the extension is
    /// assigned the next code (unless a limited table is full) and the match restarts with `byte`.
    pub fn consume(&mut self, byte: u8) -> Step {
        let current = match self.current {
            Some(current) => current,
            None => {
                self.current = Some(self.literal(byte));
                return Step::Extended(Code::from(byte));
            }
        };

        if let Some(next) = self.tree.child(current, byte) {
            self.current = Some(next);
            return Step::Extended(self.code_at(next));
        }

        let prefix = self.code_at(current);
        let assigned = if self.is_full() {
            None
        } else {
            Some(self.append(current, prefix, byte))
        };

        self.current = Some(self.literal(byte));
        Step::Resolved { prefix, assigned }
    }

    /// Consume all of `inp` in order, as if by calling [`consume`] for each byte.
    ///
    /// [`consume`]: #method.consume
    pub fn consume_all(&mut self, inp: &[u8]) {
        for &byte in inp {
            self.consume(byte);
        }
    }

    /// The sequence of an assigned code.
    ///
    /// Returns `None` for codes that have not been assigned, including the reserved clear and
    /// end codes.
    pub fn lookup(&self, code: Code) -> Option<&[u8]> {
        let entry = self.entries.get(code as usize)?;
        if entry.len == 0 {
            return None;
        }

        Some(&self.data[entry.start..entry.start + entry.len])
    }

    /// The code of `seq`, if it is in the table.
    pub fn find(&self, seq: &[u8]) -> Option<Code> {
        let node = self.tree.walk(self.tree.root(), seq)?;
        self.tree.code(node)
    }

    /// The code and length of the longest known prefix of `seq`.
    ///
    /// Returns `None` only for an empty `seq`, every single byte being known.
    pub fn longest_match(&self, seq: &[u8]) -> Option<(Code, usize)> {
        let mut node = self.tree.root();
        let mut best = None;
        for (len, &ch) in (1..).zip(seq) {
            node = match self.tree.child(node, ch) {
                Some(next) => next,
                None => break,
            };
            if let Some(code) = self.tree.code(node) {
                best = Some((code, len));
            }
        }

        best
    }

    /// The code the next new sequence will be assigned.
    pub fn next_code(&self) -> Code {
        self.entries.len() as Code
    }

    /// The number of bits needed for every code assigned so far.
    ///
    /// This is 9 below 512 entries, then grows by one at 512, 1024 and 2048 entries. It stays at
    /// 12 however many codes follow.
    pub fn code_size(&self) -> u8 {
        self.code_size
    }

    /// If no further codes will be assigned. Only a table with a limit ever fills up.
    pub fn is_full(&self) -> bool {
        self.max_entries
            .map_or(false, |max_entries| self.entries.len() >= max_entries)
    }

    /// The limit set with [`with_max_entries`], if any.
    ///
    /// [`with_max_entries`]: #method.with_max_entries
    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    /// The number of assigned codes, literals included.
    pub fn len(&self) -> usize {
        self.entries.len() - (FIRST_CODE - CLEAR_CODE) as usize
    }

    /// Never true, the literals are always present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The pending, not yet resolved match.
    pub fn pending(&self) -> &[u8] {
        self.pending_code()
            .and_then(|code| self.lookup(code))
            .unwrap_or(&[])
    }

    /// The code of the pending match, `None` if it is empty.
    ///
    /// An encoder emits this code when the input ends.
    pub fn pending_code(&self) -> Option<Code> {
        self.current.map(|node| self.code_at(node))
    }

    /// Discard the pending match without forgetting any code.
    pub fn reset_match_buffer(&mut self) {
        self.current = None;
    }

    /// Read access to the sequence tree.
    pub fn trie(&self) -> &Trie {
        &self.tree
    }

    fn append(&mut self, parent: NodeId, prefix: Code, ch: u8) -> Code {
        assert!(
            self.entries.len() < Code::MAX as usize,
            "code space exhausted after {} entries",
            self.entries.len()
        );
        let code = self.next_code();
        let node = self.tree.insert(parent, ch);
        self.tree.set_code(node, code);

        let Entry { start, len } = self.entries[prefix as usize];
        let entry = Entry {
            start: self.data.len(),
            len: len + 1,
        };
        self.data.extend_from_within(start..start + len);
        self.data.push(ch);
        self.entries.push(entry);

        self.update_code_size();
        code
    }

    fn update_code_size(&mut self) {
        let size = code_size_for(self.next_code());
        if size != self.code_size {
            log::debug!(
                "code size {} -> {} at code {}",
                self.code_size,
                size,
                self.next_code()
            );
            self.code_size = size;
        }

        if self.is_full() {
            log::debug!("code table full with {} entries", self.entries.len());
        }
    }

    fn literal(&self, ch: u8) -> NodeId {
        self.tree
            .child(self.tree.root(), ch)
            .expect("literals are seeded on construction")
    }

    fn code_at(&self, node: NodeId) -> Code {
        self.tree
            .code(node)
            .expect("every node of the table carries a code")
    }
}

fn code_size_for(next_code: Code) -> u8 {
    let bits = (Code::BITS - next_code.leading_zeros()) as u8;
    bits.max(MIN_CODESIZE).min(MAX_CODESIZE)
}

impl Default for CodeTable {
    fn default() -> Self {
        CodeTable::new()
    }
}

#[cfg(feature = "std")]
impl io::Write for CodeTable {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.consume_all(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
