use crate::WORD_BYTES;

/// OR `bytes` into `word`, most significant byte first, starting at byte
/// position `byte_offset` (position 0 is the most significant byte).
///
/// # Panics
/// Panics if `byte_offset + bytes.len() > 4`.
pub(crate) fn pack_partial_word(word: u32, byte_offset: usize, bytes: &[u8]) -> u32 {
    assert!(byte_offset + bytes.len() <= WORD_BYTES);
    bytes.iter().enumerate().fold(word, |acc, (i, &b)| {
        let shift = 8 * (WORD_BYTES - 1 - byte_offset - i);
        acc | (u32::from(b) << shift)
    })
}

/// Write `input` into the big-endian word buffer `words`, starting at byte
/// position `cursor`, and return the byte position just after the last
/// written byte.
///
/// Runs in three phases: a word left partially filled at `cursor` is
/// completed by ORing bytes into it (so its unused low bytes must be zero),
/// whole words are then stored four bytes at a time, and a final 1 to 3 bytes
/// are stored left-justified into a fresh word whose low bytes are zero.
///
/// Never compresses; the caller is responsible for that once a frame fills.
///
/// # Panics
/// Panics if `input` does not fit into `words` from `cursor` on.
pub(crate) fn append(words: &mut [u32], cursor: usize, input: &[u8]) -> usize {
    assert!(cursor + input.len() <= words.len() * WORD_BYTES);
    let mut word_index = cursor / WORD_BYTES;
    let byte_index = cursor % WORD_BYTES;
    let mut rest = input;

    if byte_index != 0 && !rest.is_empty() {
        let fill = core::cmp::min(WORD_BYTES - byte_index, rest.len());
        let (head, tail) = rest.split_at(fill);
        words[word_index] = pack_partial_word(words[word_index], byte_index, head);
        word_index += 1;
        rest = tail;
    }

    let mut chunks = rest.chunks_exact(WORD_BYTES);
    for chunk in &mut chunks {
        words[word_index] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        word_index += 1;
    }

    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        words[word_index] = pack_partial_word(0, 0, remainder);
    }

    cursor + input.len()
}

#[cfg(test)]
mod tests {
    use super::{append, pack_partial_word};

    #[test]
    fn partial_word_by_offset() {
        assert_eq!(pack_partial_word(0, 0, &[0xab]), 0xab00_0000);
        assert_eq!(pack_partial_word(0, 1, &[0xab]), 0x00ab_0000);
        assert_eq!(pack_partial_word(0, 2, &[0xab]), 0x0000_ab00);
        assert_eq!(pack_partial_word(0, 3, &[0xab]), 0x0000_00ab);
        assert_eq!(pack_partial_word(0x1100_0000, 1, &[0x22, 0x33]), 0x1122_3300);
        assert_eq!(pack_partial_word(0, 0, &[1, 2, 3, 4]), 0x0102_0304);
        assert_eq!(pack_partial_word(0xdead_beef, 0, &[]), 0xdead_beef);
    }

    #[test]
    #[should_panic]
    fn partial_word_overflow_panics() {
        pack_partial_word(0, 2, &[1, 2, 3]);
    }

    #[test]
    fn aligned_append() {
        let mut words = [0xffff_ffffu32; 4];
        let cursor = append(&mut words, 0, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(cursor, 6);
        // the trailing word is written fresh, not merged
        assert_eq!(words, [0x0102_0304, 0x0506_0000, 0xffff_ffff, 0xffff_ffff]);
    }

    #[test]
    fn mid_word_append_then_whole_words() {
        let mut words = [0u32; 4];
        let mut cursor = append(&mut words, 0, &[0x11]);
        cursor = append(&mut words, cursor, &[0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99]);
        assert_eq!(cursor, 9);
        assert_eq!(words, [0x1122_3344, 0x5566_7788, 0x9900_0000, 0]);
    }

    #[test]
    fn mid_word_append_exhausts_input() {
        let mut words = [0u32; 2];
        let cursor = append(&mut words, 1, &[0xaa]);
        assert_eq!(cursor, 2);
        assert_eq!(words, [0x00aa_0000, 0]);
    }

    #[test]
    fn append_fills_last_word_exactly() {
        let mut words = [0u32; 2];
        let cursor = append(&mut words, 5, &[1, 2, 3]);
        assert_eq!(cursor, 8);
        assert_eq!(words, [0, 0x0001_0203]);
    }

    #[test]
    fn empty_append_is_noop() {
        let mut words = [7u32; 2];
        assert_eq!(append(&mut words, 3, &[]), 3);
        assert_eq!(append(&mut words, 8, &[]), 8);
        assert_eq!(words, [7, 7]);
    }

    #[test]
    fn byte_at_a_time_matches_bulk() {
        let input: [u8; 23] = core::array::from_fn(|i| i as u8 * 7 + 1);
        let mut bulk = [0u32; 8];
        append(&mut bulk, 2, &input);
        let mut single = [0u32; 8];
        let mut cursor = 2;
        for b in input {
            cursor = append(&mut single, cursor, &[b]);
        }
        assert_eq!(bulk, single);
    }
}
