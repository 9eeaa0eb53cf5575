use crate::packing;
use crate::{DIGEST_BYTES, DIGEST_WORDS, FRAME_BYTES, FRAME_WORDS, WORD_BYTES};
use sha1::digest::consts::U64;
use sha1::digest::generic_array::GenericArray;
use zeroize::Zeroize;

/// SHA-1 initial hash value H(0), see FIPS 180-4, section 5.3.1.
const INITIAL_HASH: [u32; DIGEST_WORDS] =
    [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476, 0xC3D2E1F0];

/// The SHA-1 compression function, applied to a single 512 bit block given as
/// big-endian words.
fn sha1_compress(state: &mut [u32; DIGEST_WORDS], words: &[u32; FRAME_WORDS]) {
    let mut block = GenericArray::<u8, U64>::default();
    for (bytes, word) in block.chunks_exact_mut(WORD_BYTES).zip(words) {
        bytes.copy_from_slice(&word.to_be_bytes());
    }
    sha1::compress(state, core::slice::from_ref(&block));
    block.as_mut_slice().zeroize();
}

/// A 5 word SHA-1 chaining value.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Digest {
    words: [u32; DIGEST_WORDS],
}

impl Digest {
    /// The digest of the empty prefix, H(0).
    pub(crate) fn initial() -> Self {
        Self {
            words: INITIAL_HASH,
        }
    }

    /// Fold `frame` into this digest with one call of the compression
    /// function. Only the words of `frame` are used, not its cursor.
    pub(crate) fn compress(&mut self, frame: &SeedFrame) {
        sha1_compress(&mut self.words, &frame.words);
    }

    /// The digest as 20 bytes, each word big-endian.
    pub(crate) fn to_bytes(&self) -> [u8; DIGEST_BYTES] {
        let mut out = [0; DIGEST_BYTES];
        for (bytes, word) in out.chunks_exact_mut(WORD_BYTES).zip(&self.words) {
            bytes.copy_from_slice(&word.to_be_bytes());
        }
        out
    }

    #[cfg(test)]
    pub(crate) fn words(&self) -> &[u32; DIGEST_WORDS] {
        &self.words
    }
}

impl Zeroize for Digest {
    fn zeroize(&mut self) {
        self.words.zeroize();
    }
}

impl Drop for Digest {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl zeroize::ZeroizeOnDrop for Digest {}

/// One 512 bit SHA-1 block, held as 16 big-endian words, together with the
/// number of bytes written to it so far.
///
/// Bytes past `used` within the word containing `used` are always zero, so
/// appending at a mid-word cursor can OR into that word. Words after it may
/// hold stale data from an earlier block; [`Self::clear_unused`] wipes them.
#[derive(Clone)]
pub(crate) struct SeedFrame {
    words: [u32; FRAME_WORDS],
    used: usize,
}

impl SeedFrame {
    /// A zeroed, empty frame.
    pub(crate) fn new() -> Self {
        Self {
            words: [0; FRAME_WORDS],
            used: 0,
        }
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }

    /// Number of bytes that still fit before the frame is full.
    pub(crate) fn room(&self) -> usize {
        FRAME_BYTES - self.used
    }

    pub(crate) fn is_full(&self) -> bool {
        self.used == FRAME_BYTES
    }

    /// Append `bytes` at the cursor.
    ///
    /// # Panics
    /// Panics if `bytes.len() > self.room()`.
    pub(crate) fn append(&mut self, bytes: &[u8]) {
        self.used = packing::append(&mut self.words, self.used, bytes);
    }

    /// Zero every byte after the cursor.
    pub(crate) fn clear_unused(&mut self) {
        let word_index = self.used / WORD_BYTES;
        let byte_index = self.used % WORD_BYTES;
        let first_clear = if byte_index == 0 {
            word_index
        } else {
            self.words[word_index] &= u32::MAX << (8 * (WORD_BYTES - byte_index));
            word_index + 1
        };
        self.words[first_clear..].zeroize();
    }

    /// Store a message length in bits into the last two words, high half
    /// first, as the SHA-1 padding requires.
    pub(crate) fn set_bit_length(&mut self, bits: u64) {
        #[allow(clippy::cast_possible_truncation)]
        let (high, low) = ((bits >> 32) as u32, bits as u32);
        self.words[FRAME_WORDS - 2] = high;
        self.words[FRAME_WORDS - 1] = low;
    }

    fn reset_cursor(&mut self) {
        self.used = 0;
    }

    #[cfg(test)]
    pub(crate) fn words(&self) -> &[u32; FRAME_WORDS] {
        &self.words
    }
}

impl Zeroize for SeedFrame {
    fn zeroize(&mut self) {
        self.words.zeroize();
        self.used.zeroize();
    }
}

impl Drop for SeedFrame {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl zeroize::ZeroizeOnDrop for SeedFrame {}

/// The seed accumulator: a SHA-1 computation over all seed bytes absorbed so
/// far, stopped before padding.
///
/// `digest` covers every completed block, `frame` holds the bytes of the
/// block in progress and `length` counts all bytes ever absorbed.
pub(crate) struct SeedState {
    frame: SeedFrame,
    digest: Digest,
    length: u64,
}

impl SeedState {
    /// Create a new state with no seed bytes absorbed.
    pub(crate) fn new() -> Self {
        Self {
            frame: SeedFrame::new(),
            digest: Digest::initial(),
            length: 0,
        }
    }

    /// Absorb `bytes` into the state, compressing every block that fills up.
    pub(crate) fn absorb(&mut self, mut bytes: &[u8]) {
        self.length = self.length.wrapping_add(bytes.len() as u64);
        while !bytes.is_empty() {
            let take = core::cmp::min(self.frame.room(), bytes.len());
            let (now, later) = bytes.split_at(take);
            self.frame.append(now);
            if self.frame.is_full() {
                self.digest.compress(&self.frame);
                self.frame.reset_cursor();
            }
            bytes = later;
        }
    }

    /// Digest over all completed blocks.
    pub(crate) fn digest(&self) -> &Digest {
        &self.digest
    }

    /// The block in progress. Its cursor is always below 64.
    pub(crate) fn frame(&self) -> &SeedFrame {
        &self.frame
    }

    /// Total number of seed bytes absorbed, modulo 2^64.
    pub(crate) fn length(&self) -> u64 {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use super::{Digest, SeedFrame, SeedState, INITIAL_HASH};
    use alloc::vec::Vec;
    use sha1::digest::generic_array::GenericArray;
    use sha1::{Digest as _, Sha1};

    fn message(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 + 7) as u8).collect()
    }

    /// Running digest after the full blocks of `bytes`, computed on bytes
    /// rather than packed words.
    fn reference_digest(bytes: &[u8]) -> [u32; 5] {
        let mut state = INITIAL_HASH;
        for block in bytes.chunks_exact(64) {
            let block = GenericArray::clone_from_slice(block);
            sha1::compress(&mut state, core::slice::from_ref(&block));
        }
        state
    }

    /// Standard SHA-1 padding for a message of `len` bytes.
    fn padding(len: usize) -> Vec<u8> {
        let mut pad = Vec::from([0x80u8]);
        while (len + pad.len()) % 64 != 56 {
            pad.push(0);
        }
        pad.extend_from_slice(&((len as u64) * 8).to_be_bytes());
        pad
    }

    #[test]
    fn block_boundaries() {
        for len in [0, 1, 63, 64, 65, 127, 128, 129, 300] {
            let msg = message(len);
            let mut state = SeedState::new();
            state.absorb(&msg);
            assert_eq!(state.digest().words(), &reference_digest(&msg), "len {len}");
            assert_eq!(state.frame().used(), len % 64, "len {len}");
            assert_eq!(state.length(), len as u64);
        }
    }

    #[test]
    fn partial_frame_holds_pending_bytes() {
        let msg = message(63);
        let mut state = SeedState::new();
        state.absorb(&msg);
        let words = state.frame().words();
        assert_eq!(words[0], u32::from_be_bytes([msg[0], msg[1], msg[2], msg[3]]));
        assert_eq!(words[15], u32::from_be_bytes([msg[60], msg[61], msg[62], 0]));
        assert_eq!(state.digest().words(), &INITIAL_HASH);
    }

    #[test]
    fn split_absorb_matches_single_absorb() {
        let msg = message(200);
        let mut whole = SeedState::new();
        whole.absorb(&msg);
        for split in [1, 3, 61, 63, 64, 65, 130] {
            let mut parts = SeedState::new();
            let (a, b) = msg.split_at(split);
            parts.absorb(a);
            parts.absorb(&[]);
            parts.absorb(b);
            assert!(parts.digest() == whole.digest(), "split {split}");
            assert_eq!(parts.frame().words(), whole.frame().words());
            assert_eq!(parts.length(), whole.length());
        }
    }

    #[test]
    fn absorbing_padding_yields_sha1() {
        for len in [0, 3, 55, 56, 63, 64, 65, 119, 120, 250] {
            let msg = message(len);
            let mut state = SeedState::new();
            state.absorb(&msg);
            state.absorb(&padding(len));
            assert_eq!(state.frame().used(), 0);
            assert_eq!(&state.digest().to_bytes()[..], &Sha1::digest(&msg)[..], "len {len}");
        }
    }

    #[test]
    fn clear_unused_wipes_stale_words() {
        let mut state = SeedState::new();
        state.absorb(&[0xff; 70]);
        let mut frame = state.frame().clone();
        assert_eq!(frame.used(), 6);
        // words 2.. still hold bytes of the previous block
        assert_eq!(frame.words()[5], u32::MAX);
        frame.clear_unused();
        assert_eq!(frame.words()[0], u32::MAX);
        assert_eq!(frame.words()[1], 0xffff_0000);
        assert!(frame.words()[2..].iter().all(|&w| w == 0));
    }

    #[test]
    fn bit_length_words() {
        let mut frame = SeedFrame::new();
        frame.set_bit_length(0x0123_4567_89ab_cdef);
        assert_eq!(frame.words()[14], 0x0123_4567);
        assert_eq!(frame.words()[15], 0x89ab_cdef);
        assert_eq!(frame.used(), 0);
    }

    #[test]
    fn digest_bytes_are_big_endian() {
        let bytes = Digest::initial().to_bytes();
        assert_eq!(&bytes[..4], &[0x67, 0x45, 0x23, 0x01]);
        assert_eq!(&bytes[16..], &[0xc3, 0xd2, 0xe1, 0xf0]);
    }
}
