//! Legacy per-board attribute bitmasks.
//!
//! One byte per board per attribute kind, bit `s` for station `board*8 + s`.
//! The cache is a packed view of the station records and never the source
//! of truth: [`AttribCache::rebuild`] and [`AttribCache::flatten`] convert
//! between the two and are mutual inverses.

use crate::app::ports::StoragePort;
use crate::error::Error;

use super::{StationAttrib, StationStore, StationType};

/// Attribute kinds mirrored by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttribKind {
    Mas,
    Igs,
    Mas2,
    Igs2,
    Igrd,
    Dis,
    Seq,
    /// Non-standard station type.
    Spe,
}

impl AttribKind {
    pub const ALL: [AttribKind; 8] = [
        AttribKind::Mas,
        AttribKind::Igs,
        AttribKind::Mas2,
        AttribKind::Igs2,
        AttribKind::Igrd,
        AttribKind::Dis,
        AttribKind::Seq,
        AttribKind::Spe,
    ];
}

/// Attribute bits of one station plus its "special" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StationFlags {
    pub attrib: StationAttrib,
    pub special: bool,
}

impl StationFlags {
    fn bit(&self, kind: AttribKind) -> bool {
        let a = &self.attrib;
        match kind {
            AttribKind::Mas => a.mas,
            AttribKind::Igs => a.igs,
            AttribKind::Mas2 => a.mas2,
            AttribKind::Igs2 => a.igs2,
            AttribKind::Igrd => a.igrd,
            AttribKind::Dis => a.dis,
            AttribKind::Seq => a.seq,
            AttribKind::Spe => self.special,
        }
    }

    fn set_bit(&mut self, kind: AttribKind, on: bool) {
        let a = &mut self.attrib;
        match kind {
            AttribKind::Mas => a.mas = on,
            AttribKind::Igs => a.igs = on,
            AttribKind::Mas2 => a.mas2 = on,
            AttribKind::Igs2 => a.igs2 = on,
            AttribKind::Igrd => a.igrd = on,
            AttribKind::Dis => a.dis = on,
            AttribKind::Seq => a.seq = on,
            AttribKind::Spe => self.special = on,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttribCache {
    stations: usize,
    masks: [Vec<u8>; 8],
}

impl AttribCache {
    /// All-zero cache sized for `stations`.
    pub fn new(stations: usize) -> Self {
        let boards = stations.div_ceil(8);
        Self {
            stations,
            masks: core::array::from_fn(|_| vec![0u8; boards]),
        }
    }

    /// Pack per-station flags into per-board masks.
    pub fn rebuild(flags: &[StationFlags]) -> Self {
        let mut cache = Self::new(flags.len());
        for (sid, f) in flags.iter().enumerate() {
            for (k, kind) in AttribKind::ALL.iter().enumerate() {
                if f.bit(*kind) {
                    cache.masks[k][sid >> 3] |= 1 << (sid & 7);
                }
            }
        }
        cache
    }

    /// Unpack the masks back into per-station flags.
    pub fn flatten(&self) -> Vec<StationFlags> {
        (0..self.stations)
            .map(|sid| {
                let mut f = StationFlags::default();
                for (k, kind) in AttribKind::ALL.iter().enumerate() {
                    f.set_bit(*kind, (self.masks[k][sid >> 3] >> (sid & 7)) & 1 != 0);
                }
                f
            })
            .collect()
    }

    /// Per-board mask for one attribute kind.
    pub fn mask(&self, kind: AttribKind) -> &[u8] {
        &self.masks[kind as usize]
    }

    pub fn get(&self, kind: AttribKind, sid: usize) -> bool {
        self.masks[kind as usize]
            .get(sid >> 3)
            .is_some_and(|b| (b >> (sid & 7)) & 1 != 0)
    }

    /// Rebuild from every station record in the store.
    pub fn load(store: &impl StoragePort, stations: &StationStore) -> Result<Self, Error> {
        let flags = (0..stations.capacity())
            .map(|sid| {
                Ok(StationFlags {
                    attrib: stations.attrib(store, sid)?,
                    special: stations.station_type(store, sid)?.is_special(),
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Self::rebuild(&flags))
    }

    /// Write every station's attribute byte back; stations whose special
    /// bit is clear are also forced to the standard type.
    pub fn save(&self, store: &mut impl StoragePort, stations: &StationStore) -> Result<(), Error> {
        for (sid, f) in self.flatten().iter().enumerate().take(stations.capacity()) {
            let attrib = StationAttrib { gid: false, ..f.attrib };
            stations.set_attrib(store, sid, attrib)?;
            if !f.special {
                stations.set_type(store, sid, StationType::Standard)?;
            }
        }
        Ok(())
    }
}
