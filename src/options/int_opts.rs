//! Integer option table.
//!
//! Each option is one persisted byte, indexed by ordinal, with a fixed
//! 5-character JSON name, a factory default and an upper bound.

/// Firmware version persisted in `fwv`; stored copies below this force a reset.
pub const FW_VERSION: u8 = 219;
/// Firmware minor version persisted in `fwm`.
pub const FW_MINOR: u8 = 9;
/// Hardware version reported in `hwv` (OSPi base revision).
pub const HW_VERSION: u8 = 0x40;
/// Wi-Fi mode default (access point).
pub const WIFI_MODE_AP: u8 = 0xA9;
/// Value of `reset` that requests a full factory reset at next boot.
pub const RESET_REQUEST: u8 = 0xAA;

/// Number of integer options.
pub const NUM_IOPTS: usize = 64;

/// Upper bound of an integer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// No bound enforced (version fields and other special values).
    Unbounded,
    Max(u8),
    /// Bounded by the build's extension-board count.
    ExtBoards,
    /// Bounded by the build's station capacity.
    Stations,
}

/// Static description of one integer option.
#[derive(Debug, Clone, Copy)]
pub struct IntOptSpec {
    pub name: &'static str,
    pub default: u8,
    pub bound: Bound,
}

macro_rules! int_options {
    ($($variant:ident = $name:literal, $default:expr, $bound:expr;)*) => {
        /// Integer option ordinals.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum IntOpt {
            $($variant,)*
        }

        impl IntOpt {
            pub const ALL: [IntOpt; NUM_IOPTS] = [$(IntOpt::$variant,)*];
        }

        pub(crate) const TABLE: [IntOptSpec; NUM_IOPTS] = [
            $(IntOptSpec { name: $name, default: $default, bound: $bound },)*
        ];
    };
}

use Bound::{ExtBoards, Max, Stations, Unbounded};

int_options! {
    FwVersion       = "fwv",   FW_VERSION, Unbounded;
    TimeZone        = "tz",    28,  Max(108);
    UseNtp          = "ntp",   1,   Max(1);
    UseDhcp         = "dhcp",  1,   Max(1);
    StaticIp1       = "ip1",   0,   Max(255);
    StaticIp2       = "ip2",   0,   Max(255);
    StaticIp3       = "ip3",   0,   Max(255);
    StaticIp4       = "ip4",   0,   Max(255);
    Gateway1        = "gw1",   0,   Max(255);
    Gateway2        = "gw2",   0,   Max(255);
    Gateway3        = "gw3",   0,   Max(255);
    Gateway4        = "gw4",   0,   Max(255);
    HttpPort0       = "hp0",   144, Max(255);
    HttpPort1       = "hp1",   31,  Max(255);
    HwVersion       = "hwv",   HW_VERSION, Unbounded;
    ExtBoardCount   = "ext",   0,   ExtBoards;
    Sequential      = "seq",   1,   Max(1);
    StationDelay    = "sdt",   120, Max(255);
    MasterStation   = "mas",   0,   Stations;
    MasterOnAdj     = "mton",  120, Max(255);
    MasterOffAdj    = "mtof",  120, Max(255);
    UseRainSensor   = "urs",   0,   Max(255);
    RainSensorOpen  = "rso",   0,   Max(1);
    WaterPercentage = "wl",    100, Max(250);
    DeviceEnable    = "den",   1,   Max(1);
    IgnorePassword  = "ipas",  0,   Max(1);
    DeviceId        = "devid", 0,   Max(255);
    LcdContrast     = "con",   150, Max(255);
    LcdBacklight    = "lit",   100, Max(255);
    LcdDimming      = "dim",   50,  Max(255);
    BoostTime       = "bst",   80,  Max(250);
    WeatherMethod   = "uwt",   0,   Max(255);
    NtpIp1          = "ntp1",  0,   Max(255);
    NtpIp2          = "ntp2",  0,   Max(255);
    NtpIp3          = "ntp3",  0,   Max(255);
    NtpIp4          = "ntp4",  0,   Max(255);
    EnableLogging   = "lg",    1,   Max(1);
    MasterStation2  = "mas2",  0,   Stations;
    MasterOnAdj2    = "mton2", 120, Max(255);
    MasterOffAdj2   = "mtof2", 120, Max(255);
    FwMinor         = "fwm",   FW_MINOR, Unbounded;
    PulseRate0      = "fpr0",  100, Max(255);
    PulseRate1      = "fpr1",  0,   Max(255);
    RemoteExtMode   = "re",    0,   Max(1);
    DnsIp1          = "dns1",  8,   Max(255);
    DnsIp2          = "dns2",  8,   Max(255);
    DnsIp3          = "dns3",  8,   Max(255);
    DnsIp4          = "dns4",  8,   Max(255);
    SpeAutoRefresh  = "sar",   0,   Max(1);
    IftttEnable     = "ife",   0,   Max(255);
    Sensor1Type     = "sn1t",  0,   Max(255);
    Sensor1Option   = "sn1o",  1,   Max(1);
    Sensor2Type     = "sn2t",  0,   Max(255);
    Sensor2Option   = "sn2o",  1,   Max(1);
    Sensor1OnDelay  = "sn1on", 0,   Max(255);
    Sensor1OffDelay = "sn1of", 0,   Max(255);
    Sensor2OnDelay  = "sn2on", 0,   Max(255);
    Sensor2OffDelay = "sn2of", 0,   Max(255);
    SubnetMask1     = "subn1", 255, Max(255);
    SubnetMask2     = "subn2", 255, Max(255);
    SubnetMask3     = "subn3", 255, Max(255);
    SubnetMask4     = "subn4", 0,   Max(255);
    WifiMode        = "wimod", WIFI_MODE_AP, Max(255);
    Reset           = "reset", 0,   Max(1);
}

impl IntOpt {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static IntOptSpec {
        &TABLE[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn default_value(self) -> u8 {
        self.spec().default
    }

    /// Look up an option by its JSON name (`"sn1on"`, `"ext"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|o| o.name() == name)
    }

    /// `true` for options whose change must reset sensor timing state.
    pub fn affects_sensors(self) -> bool {
        matches!(
            self,
            Self::Sensor1Type
                | Self::Sensor1Option
                | Self::Sensor2Type
                | Self::Sensor2Option
                | Self::Sensor1OnDelay
                | Self::Sensor1OffDelay
                | Self::Sensor2OnDelay
                | Self::Sensor2OffDelay
        )
    }
}

/// Factory defaults for every integer option, by ordinal.
pub fn defaults() -> [u8; NUM_IOPTS] {
    let mut out = [0u8; NUM_IOPTS];
    for (slot, spec) in out.iter_mut().zip(TABLE.iter()) {
        *slot = spec.default;
    }
    out
}
