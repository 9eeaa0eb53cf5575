use crate::internal_state::{Digest, SeedFrame, SeedState};
use crate::{COUNTER_BYTES, DIGEST_BYTES, PADDING_FLAG, SINGLE_BLOCK_LIMIT};
use zeroize::Zeroize;

/// Bytes appended to the seed frame in every round: the counter followed by
/// the padding flag.
const TAIL_BYTES: usize = COUNTER_BYTES + 1;

/// Where the padded message ends relative to the seed frame.
#[derive(Clone)]
pub(crate) enum PaddingLayout {
    /// Counter, padding flag and length trailer all fit in the seed frame.
    SingleBlock,
    /// The length trailer (and possibly the end of the counter and the
    /// padding flag) spill into a second frame.
    TwoBlock { second_frame: SeedFrame },
}

/// A finalized seed, ready to be expanded.
///
/// Holds a copy of the seed digest and the pending partial frame, taken when
/// output was first requested after (re)seeding. The copy is never modified by
/// the rounds; each round works on scratch copies of the frames.
pub(crate) struct Expansion {
    digest: Digest,
    frame: SeedFrame,
    layout: PaddingLayout,
}

impl Expansion {
    /// Finalize `seed`: snapshot it and lay out the SHA-1 padding around the
    /// counter bytes that every round appends.
    pub(crate) fn begin(seed: &SeedState) -> Self {
        let digest = seed.digest().clone();
        let mut frame = seed.frame().clone();
        frame.clear_unused();

        // the hashed message is the seed followed by the 64 bit counter
        let bits = seed
            .length()
            .wrapping_mul(8)
            .wrapping_add(8 * COUNTER_BYTES as u64);

        let layout = if frame.used() < SINGLE_BLOCK_LIMIT {
            frame.set_bit_length(bits);
            PaddingLayout::SingleBlock
        } else {
            let mut second_frame = SeedFrame::new();
            second_frame.set_bit_length(bits);
            PaddingLayout::TwoBlock { second_frame }
        };

        log::trace!(
            "finalized seed: {} bytes pending in frame, {} block padding",
            frame.used(),
            if matches!(layout, PaddingLayout::SingleBlock) { "one" } else { "two" },
        );

        Self {
            digest,
            frame,
            layout,
        }
    }

    #[cfg(test)]
    pub(crate) fn layout(&self) -> &PaddingLayout {
        &self.layout
    }

    /// Compute the 20 output bytes for `counter`. This is the SHA-1 digest of
    /// all seed bytes followed by `counter` in big-endian.
    pub(crate) fn round(&self, counter: u64) -> [u8; DIGEST_BYTES] {
        let mut tail = [0u8; TAIL_BYTES];
        tail[..COUNTER_BYTES].copy_from_slice(&counter.to_be_bytes());
        tail[COUNTER_BYTES] = PADDING_FLAG;

        let mut digest = self.digest.clone();
        let mut frame = self.frame.clone();
        match &self.layout {
            PaddingLayout::SingleBlock => {
                frame.append(&tail);
                digest.compress(&frame);
            }
            PaddingLayout::TwoBlock { second_frame } => {
                let (head, spill) = tail.split_at(core::cmp::min(frame.room(), TAIL_BYTES));
                frame.append(head);
                let mut second_frame = second_frame.clone();
                second_frame.append(spill);
                digest.compress(&frame);
                digest.compress(&second_frame);
            }
        }
        tail.zeroize();
        digest.to_bytes()
    }
}

/// Output of the most recent round that was not handed out yet.
pub(crate) struct OutputCarry {
    bytes: [u8; DIGEST_BYTES],
    consumed: usize,
}

impl OutputCarry {
    /// A carry with nothing left to deliver.
    pub(crate) fn empty() -> Self {
        Self {
            bytes: [0; DIGEST_BYTES],
            consumed: DIGEST_BYTES,
        }
    }

    /// Replace the carry with a fresh round of output.
    pub(crate) fn refill(&mut self, bytes: [u8; DIGEST_BYTES]) {
        self.bytes = bytes;
        self.consumed = 0;
    }

    /// Drop any undelivered bytes.
    pub(crate) fn discard(&mut self) {
        self.zeroize();
    }

    /// Copy as many undelivered bytes as fit to the front of `dest` and return
    /// how many were copied.
    pub(crate) fn take_into(&mut self, dest: &mut [u8]) -> usize {
        let available = &self.bytes[self.consumed..];
        let n = core::cmp::min(available.len(), dest.len());
        dest[..n].copy_from_slice(&available[..n]);
        self.consumed += n;
        n
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self) -> usize {
        DIGEST_BYTES - self.consumed
    }
}

impl Zeroize for OutputCarry {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
        self.consumed = DIGEST_BYTES;
    }
}

impl Drop for OutputCarry {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl zeroize::ZeroizeOnDrop for OutputCarry {}
