//! RF pulse-train encoder.
//!
//! Pure function of (code, unit length) to a sequence of line levels and
//! durations; the busy-wait playback lives in
//! [`drivers::rf_tx`](crate::drivers::rf_tx).
//!
//! Frame: 24 code bits MSB first, then a sync pulse.  Each bit is a
//! high/low pair: `1` = 3 units high, 1 low; `0` = 1 high, 3 low.
//! Sync = 1 high, 31 low.  The frame is sent 15 times.

/// Frames per transmission.
pub const REPEATS: usize = 15;
/// Code bits per frame.
pub const CODE_BITS: usize = 24;

const PAIRS_PER_FRAME: usize = CODE_BITS + 1;

/// One level held for `duration_us`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub high: bool,
    pub duration_us: u32,
}

/// Iterator over every pulse of one transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulseTrain {
    code: u32,
    unit_us: u32,
    /// Index of the next pulse, 0..total.
    pos: usize,
}

impl PulseTrain {
    pub fn new(code: u32, unit_us: u16) -> Self {
        Self {
            code,
            unit_us: u32::from(unit_us),
            pos: 0,
        }
    }

    pub const fn total_pulses() -> usize {
        REPEATS * PAIRS_PER_FRAME * 2
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    /// (high units, low units) of pair `pair` within a frame.
    fn pair_units(&self, pair: usize) -> (u32, u32) {
        if pair == CODE_BITS {
            return (1, 31);
        }
        let bit = (self.code >> (CODE_BITS - 1 - pair)) & 1;
        if bit == 1 { (3, 1) } else { (1, 3) }
    }
}

impl Iterator for PulseTrain {
    type Item = Pulse;

    fn next(&mut self) -> Option<Pulse> {
        if self.pos >= Self::total_pulses() {
            return None;
        }
        let pair = (self.pos / 2) % PAIRS_PER_FRAME;
        let high = self.pos % 2 == 0;
        let (h, l) = self.pair_units(pair);
        self.pos += 1;
        Some(Pulse {
            high,
            duration_us: self.unit_us * if high { h } else { l },
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = Self::total_pulses().saturating_sub(self.pos);
        (left, Some(left))
    }
}

impl ExactSizeIterator for PulseTrain {}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(train: PulseTrain, unit: u32) -> Vec<(bool, u32)> {
        train.map(|p| (p.high, p.duration_us / unit)).collect()
    }

    #[test]
    fn length_is_fifteen_frames() {
        let t = PulseTrain::new(0xABCDEF, 100);
        assert_eq!(t.len(), 750);
        assert_eq!(t.count(), 750);
    }

    #[test]
    fn first_frame_bit_shapes() {
        // 0x800001: first bit 1, last code bit 1, everything between 0.
        let p = units(PulseTrain::new(0x80_0001, 10), 10);
        assert_eq!(&p[0..4], &[(true, 3), (false, 1), (true, 1), (false, 3)]);
        assert_eq!(&p[46..48], &[(true, 3), (false, 1)]);
        // Sync closes the frame.
        assert_eq!(&p[48..50], &[(true, 1), (false, 31)]);
        // Second frame restarts with the MSB.
        assert_eq!(&p[50..52], &[(true, 3), (false, 1)]);
    }

    #[test]
    fn levels_alternate_and_scale_with_unit() {
        let t: Vec<Pulse> = PulseTrain::new(0x123456, 350).collect();
        for (i, p) in t.iter().enumerate() {
            assert_eq!(p.high, i % 2 == 0);
            assert_eq!(p.duration_us % 350, 0);
        }
        // Every pair spans 4 units except sync (32).
        let frame_us: u32 = t[..50].iter().map(|p| p.duration_us).sum();
        assert_eq!(frame_us, 350 * (24 * 4 + 32));
    }

    #[test]
    fn bits_above_24_are_ignored() {
        let a: Vec<_> = PulseTrain::new(0xFF12_3456, 10).collect();
        let b: Vec<_> = PulseTrain::new(0x0012_3456, 10).collect();
        assert_eq!(a, b);
    }
}
