//! Immutable text snapshots and the change range between two of them.

use ember_common::ContentHash;

/// The minimal edit that turns one snapshot's text into another's.
///
/// Offsets are byte offsets into the old text and always fall on UTF-8 char
/// boundaries. The range is computed from the longest common prefix and suffix,
/// so `old[start..start + old_len]` is replaced by `new[start..start + new_len]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextChangeRange {
    /// Byte offset where the texts first differ.
    pub start: usize,
    /// Length in bytes of the replaced span in the old text.
    pub old_len: usize,
    /// Length in bytes of the replacement span in the new text.
    pub new_len: usize,
}

impl TextChangeRange {
    /// Returns `true` if the range describes no edit at all.
    pub fn is_empty(&self) -> bool {
        self.old_len == 0 && self.new_len == 0
    }
}

/// An immutable capture of one file's full text.
///
/// Snapshots are never mutated. The registry replaces a file's snapshot
/// wholesale when new content differs, and the superseded snapshot is dropped
/// at that point, freeing its text and line index.
#[derive(Debug)]
pub struct Snapshot {
    text: String,
    hash: ContentHash,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<usize>,
}

impl Snapshot {
    /// Creates a snapshot, precomputing its content hash and line index.
    pub fn new(text: String) -> Self {
        let hash = ContentHash::from_text(&text);
        let line_starts = compute_line_starts(&text);
        Self {
            text,
            hash,
            line_starts,
        }
    }

    /// Returns the full text of the snapshot.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the snapshot text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the content hash of the text.
    pub fn content_hash(&self) -> ContentHash {
        self.hash
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    pub fn line_col(&self, byte_offset: usize) -> (u32, u32) {
        let offset = byte_offset.min(self.text.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = line_idx as u32 + 1;
        let col = (offset - self.line_starts[line_idx]) as u32 + 1;
        (line, col)
    }

    /// Computes the change range from `old` to this snapshot.
    ///
    /// Returns `None` when the texts are identical.
    pub fn change_range(&self, old: &Snapshot) -> Option<TextChangeRange> {
        if self.hash == old.hash {
            return None;
        }

        let old_text = old.text.as_str();
        let new_text = self.text.as_str();

        let prefix = common_prefix_len(old_text, new_text);
        let max_suffix = old_text.len().min(new_text.len()) - prefix;
        let suffix = common_suffix_len(&old_text[prefix..], &new_text[prefix..], max_suffix);

        let range = TextChangeRange {
            start: prefix,
            old_len: old_text.len() - prefix - suffix,
            new_len: new_text.len() - prefix - suffix,
        };

        if range.is_empty() {
            None
        } else {
            Some(range)
        }
    }
}

fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum()
}

fn common_suffix_len(a: &str, b: &str, max: usize) -> usize {
    let mut len = 0;
    for (x, y) in a.chars().rev().zip(b.chars().rev()) {
        if x != y || len + x.len_utf8() > max {
            break;
        }
        len += x.len_utf8();
    }
    len
}
