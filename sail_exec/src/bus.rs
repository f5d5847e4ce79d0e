//! # Sailing bus
//!
//! Holds the sockets of every topic the sailing executable reads or writes.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::warn;
use serde::de::DeserializeOwned;

use comms_if::{
    eqpt::{
        act::ActuatorControls,
        sens::{Attitude, GlobalPosition, GpsRaw, WindSailing, WxAttitude},
    },
    guidance::GuidanceDebug,
    net::{self, zmq, NetError, NetParams, Publisher, SocketOptions, Subscriber},
    tc::Tc,
    tm::LogNotice,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Sockets of the sailing executable.
pub struct SailBus {
    pub gps_raw: Subscriber<GpsRaw>,
    pub gps_filtered: Subscriber<GlobalPosition>,
    pub wind_sailing: Subscriber<WindSailing>,
    pub attitude: Subscriber<Attitude>,
    pub wx_attitude: Subscriber<WxAttitude>,
    pub tc: Subscriber<Tc>,

    pub actuators: Publisher<ActuatorControls>,
    pub guidance_dbg: Publisher<GuidanceDebug>,
    pub gnd_log: Publisher<LogNotice>,
}

/// Which subscribers had data waiting after a poll.
#[derive(Debug, Default, Copy, Clone)]
pub struct Readable {
    pub gps_raw: bool,
    pub gps_filtered: bool,
    pub wind_sailing: bool,
    pub attitude: bool,
    pub wx_attitude: bool,
    pub tc: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Readable {
    pub fn any(&self) -> bool {
        self.gps_raw
            || self.gps_filtered
            || self.wind_sailing
            || self.attitude
            || self.wx_attitude
            || self.tc
    }
}

impl SailBus {
    /// Open all sockets.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, NetError> {
        let opts = SocketOptions::default;

        Ok(Self {
            gps_raw: Subscriber::new(ctx, &params.gps_raw_endpoint, opts())?,
            gps_filtered: Subscriber::new(ctx, &params.gps_filtered_endpoint, opts())?,
            wind_sailing: Subscriber::new(ctx, &params.wind_sailing_endpoint, opts())?,
            attitude: Subscriber::new(ctx, &params.attitude_endpoint, opts())?,
            wx_attitude: Subscriber::new(ctx, &params.wx_attitude_endpoint, opts())?,
            tc: Subscriber::new(ctx, &params.tc_endpoint, opts())?,
            actuators: Publisher::new(ctx, &params.actuators_endpoint, opts())?,
            guidance_dbg: Publisher::new(ctx, &params.guidance_dbg_endpoint, opts())?,
            gnd_log: Publisher::new(ctx, &params.gnd_log_endpoint, opts())?,
        })
    }

    /// Wait for at most `timeout_ms` for data on any of the subscribers.
    pub fn poll(&self, timeout_ms: i64) -> Result<Readable, NetError> {
        let mut items = [
            self.gps_raw.as_poll_item(),
            self.gps_filtered.as_poll_item(),
            self.wind_sailing.as_poll_item(),
            self.attitude.as_poll_item(),
            self.wx_attitude.as_poll_item(),
            self.tc.as_poll_item(),
        ];

        net::poll(&mut items, timeout_ms)?;

        Ok(Readable {
            gps_raw: items[0].is_readable(),
            gps_filtered: items[1].is_readable(),
            wind_sailing: items[2].is_readable(),
            attitude: items[3].is_readable(),
            wx_attitude: items[4].is_readable(),
            tc: items[5].is_readable(),
        })
    }

    /// Send a one line notice to the ground.
    pub fn notify_ground(&self, text: &str) {
        if let Err(e) = self.gnd_log.send(&LogNotice::new(text)) {
            warn!("Could not send notice \"{}\" to the ground: {}", text, e);
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Get the most recent message waiting on a subscriber, logging any error.
pub fn latest<T>(sub: &Subscriber<T>) -> Option<T>
where
    T: DeserializeOwned,
{
    match sub.recv_latest() {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Could not receive from {}: {}", sub.endpoint(), e);
            None
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
