//! InfluxDB telemetry sink.
//!
//! Turns valve transitions into line protocol and POSTs each point to
//! `/write?db=<database>` through the shared request primitive:
//!
//! | event                   | point                  |
//! |-------------------------|------------------------|
//! | `StationSwitched`       | `valveNN value=0\|1`   |
//! | `ActiveStation(Some)`   | `valves value=<sid+1>` |
//! | `ActiveStation(None)`   | `valves value=0`       |
//!
//! Station numbers are 1-based on the wire.  Delivery is best effort:
//! a failed post is logged and dropped.

use std::time::Duration;

use log::{debug, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, NetworkPort};
use crate::config::InfluxConfig;
use crate::net::{Deadline, Endpoint, Host};

/// Per-post deadline.
pub const POST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct InfluxSink<N: NetworkPort> {
    net: N,
    endpoint: Endpoint,
    database: String,
}

impl<N: NetworkPort> InfluxSink<N> {
    pub fn new(net: N, config: &InfluxConfig) -> Self {
        Self {
            net,
            endpoint: Endpoint::new(Host::parse(&config.host), config.port),
            database: config.database.clone(),
        }
    }

    pub fn network(&self) -> &N {
        &self.net
    }

    /// Line-protocol point for `event`, if it is one we record.
    pub fn point(event: &AppEvent) -> Option<String> {
        match event {
            AppEvent::StationSwitched { sid, on } => {
                Some(format!("valve{:02} value={}", sid + 1, u8::from(*on)))
            }
            AppEvent::ActiveStation(sid) => {
                Some(format!("valves value={}", sid.map_or(0, |s| s + 1)))
            }
            _ => None,
        }
    }

    fn request(&self, point: &str) -> String {
        format!(
            "POST /write?db={} HTTP/1.0\r\n\
             Host: {}\r\n\
             Accept: */*\r\n\
             Content-Length: {}\r\n\
             Content-Type: application/json\r\n\
             \r\n{}",
            self.database,
            self.endpoint.host,
            point.len(),
            point
        )
    }
}

impl<N: NetworkPort> EventSink for InfluxSink<N> {
    fn emit(&mut self, event: &AppEvent) {
        let Some(point) = Self::point(event) else {
            return;
        };
        let request = self.request(&point);
        let outcome = self.net.send_request(
            &self.endpoint,
            request.as_bytes(),
            Deadline::after(POST_TIMEOUT),
            &mut |_| {},
        );
        if outcome.is_success() {
            debug!("influx: {}", point);
        } else {
            warn!("influx: {} dropped ({:?})", point, outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::RequestOutcome;

    #[derive(Default)]
    struct Recorder(Vec<(Endpoint, String)>);

    impl NetworkPort for Recorder {
        fn send_request(
            &mut self,
            endpoint: &Endpoint,
            request: &[u8],
            _deadline: Deadline,
            _on_response: &mut dyn FnMut(&[u8]),
        ) -> RequestOutcome {
            self.0
                .push((endpoint.clone(), String::from_utf8_lossy(request).into_owned()));
            RequestOutcome::EmptyResponse
        }
    }

    #[test]
    fn points_are_one_based() {
        let p = |e| InfluxSink::<Recorder>::point(&e);
        assert_eq!(p(AppEvent::StationSwitched { sid: 2, on: true }).as_deref(), Some("valve03 value=1"));
        assert_eq!(p(AppEvent::ActiveStation(Some(0))).as_deref(), Some("valves value=1"));
        assert_eq!(p(AppEvent::ActiveStation(None)).as_deref(), Some("valves value=0"));
    }

    #[test]
    fn posts_to_configured_database() {
        let cfg = InfluxConfig {
            host: "10.0.0.5".into(),
            port: 8086,
            database: "ospi".into(),
        };
        let mut sink = InfluxSink::new(Recorder::default(), &cfg);
        sink.emit(&AppEvent::StationSwitched { sid: 10, on: false });
        sink.emit(&AppEvent::ProgramSwitchPressed(crate::sensors::SensorChannel::One));
        let sent = &sink.network().0;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.to_string(), "10.0.0.5:8086");
        let req = &sent[0].1;
        assert!(req.starts_with("POST /write?db=ospi HTTP/1.0\r\n"));
        assert!(req.contains("Host: 10.0.0.5\r\n"));
        assert!(req.contains("Content-Length: 15\r\n"));
        assert!(req.ends_with("\r\n\r\nvalve11 value=0"));
    }
}
