//! Live commanded on/off state, one bit per station.

/// In-memory station bitmask, one byte per board.
///
/// Only the controller mutates it; everything else reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationBits {
    boards: Vec<u8>,
}

impl StationBits {
    pub fn new(boards: usize) -> Self {
        Self {
            boards: vec![0; boards],
        }
    }

    pub fn get(&self, sid: usize) -> bool {
        self.boards
            .get(sid >> 3)
            .is_some_and(|b| (b >> (sid & 7)) & 1 != 0)
    }

    /// Returns `false` if `sid` is out of range.
    pub(crate) fn set(&mut self, sid: usize, on: bool) -> bool {
        let Some(byte) = self.boards.get_mut(sid >> 3) else {
            return false;
        };
        let mask = 1u8 << (sid & 7);
        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        true
    }

    pub(crate) fn clear(&mut self) {
        self.boards.fill(0);
    }

    /// Byte for board `bid`; 0 past the end.
    pub fn board(&self, bid: usize) -> u8 {
        self.boards.get(bid).copied().unwrap_or(0)
    }

    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    pub fn any(&self) -> bool {
        self.boards.iter().any(|&b| b != 0)
    }

    /// Station indices whose bit is set, ascending.
    pub fn active(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.boards.len() * 8).filter(|&sid| self.get(sid))
    }
}
