//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements     | Connects to                     |
//! |---------------|----------------|---------------------------------|
//! | `store`       | StoragePort    | In-memory map / data directory  |
//! | `hardware`    | ActuatorPort   | Shift register, RF line, GPIO   |
//! |               | SensorPort     | Sensor input lines              |
//! | `http_client` | NetworkPort    | TCP peers (remote / HTTP)       |
//! | `log_sink`    | EventSink      | `log` facade                    |
//! | `influx`      | EventSink      | InfluxDB line protocol over TCP |
//! | `time`        | —              | System wall clock               |

pub mod hardware;
pub mod http_client;
pub mod influx;
pub mod log_sink;
pub mod store;
pub mod time;
