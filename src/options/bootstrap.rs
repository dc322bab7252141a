//! First-boot / reset decision and the two bootstrap paths.
//!
//! A full reset runs when any of these hold, checked in order:
//! 1. the stored firmware-version byte is below [`FW_VERSION`]
//! 2. the completion marker [`DONE_FILE`] is missing
//! 3. the stored `reset` option equals [`RESET_REQUEST`]
//!
//! Otherwise the persisted state is loaded.

use log::{info, warn};

use crate::app::ports::StoragePort;
use crate::error::{Error, StorageError};
use crate::stations::attribs::AttribCache;
use crate::stations::{StationRecord, StationStore};

use super::int_opts::IntOpt;
use super::{
    string_opts, NvData, OptionRegistry, RebootCause, DONE_FILE, FW_VERSION, IOPTS_FILE,
    PROG_FILE, RESET_REQUEST,
};

/// What bootstrap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootReport {
    /// `true` when the factory-reset path ran.
    pub reset: bool,
    /// Reboot cause recorded before this boot.
    pub previous_cause: RebootCause,
}

/// Persisted state that bootstrap fills in.
pub struct BootTargets<'a> {
    pub options: &'a mut OptionRegistry,
    pub stations: &'a StationStore,
    pub attribs: &'a mut AttribCache,
    pub nvdata: &'a mut NvData,
}

/// Missing option block reads as 0 so a blank store takes the reset path.
fn iopt_byte(store: &impl StoragePort, opt: IntOpt) -> Result<u8, StorageError> {
    match store.read_byte(IOPTS_FILE, opt.index() as u32) {
        Err(StorageError::NotFound) => Ok(0),
        other => other,
    }
}

pub fn needs_reset(store: &impl StoragePort) -> Result<bool, StorageError> {
    let fw = iopt_byte(store, IntOpt::FwVersion)?;
    if fw < FW_VERSION {
        info!("Bootstrap: stored firmware {} below {}", fw, FW_VERSION);
        return Ok(true);
    }
    if !store.exists(DONE_FILE) {
        info!("Bootstrap: completion marker missing");
        return Ok(true);
    }
    if iopt_byte(store, IntOpt::Reset)? == RESET_REQUEST {
        info!("Bootstrap: reset requested");
        return Ok(true);
    }
    Ok(false)
}

/// Run the reset or load path.  Any store failure aborts bootstrap.
pub fn run(store: &mut impl StoragePort, t: BootTargets<'_>) -> Result<BootReport, Error> {
    if needs_reset(&*store)? {
        factory_reset(store, t)
    } else {
        load(store, t)
    }
}

fn factory_reset(store: &mut impl StoragePort, t: BootTargets<'_>) -> Result<BootReport, Error> {
    warn!("Bootstrap: resetting all options to factory defaults");
    store.remove(DONE_FILE)?;

    t.options.reset_to_defaults();
    t.options.save(store)?;
    string_opts::reset_all(store)?;

    for sid in 0..t.stations.capacity() {
        t.stations.write(store, sid, &StationRecord::factory(sid))?;
    }
    *t.attribs = AttribCache::load(&*store, t.stations)?;

    *t.nvdata = NvData {
        reboot_cause: RebootCause::Reset,
        ..NvData::default()
    };
    t.nvdata.save(store)?;

    store.write_byte(PROG_FILE, 0, 0)?;
    store.write_byte(DONE_FILE, 0, 1)?;

    info!(
        "Bootstrap: reset complete ({} station records)",
        t.stations.capacity()
    );
    Ok(BootReport {
        reset: true,
        previous_cause: RebootCause::Reset,
    })
}

fn load(store: &mut impl StoragePort, t: BootTargets<'_>) -> Result<BootReport, Error> {
    t.options.load(&*store)?;
    *t.nvdata = NvData::load(&*store)?;
    let previous_cause = t.nvdata.reboot_cause;
    t.nvdata.reboot_cause = RebootCause::PowerOn;
    t.nvdata.save(store)?;
    *t.attribs = AttribCache::load(&*store, t.stations)?;

    info!(
        "Bootstrap: loaded options ({} stations, previous reboot cause {:?})",
        t.options.nstations(),
        previous_cause
    );
    Ok(BootReport {
        reset: false,
        previous_cause,
    })
}
