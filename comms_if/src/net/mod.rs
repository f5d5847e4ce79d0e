//! # Network Module
//!
//! This module provides networking abstractions over ZMQ, the networking library chosen for the
//! software. Every topic is carried by its own PUB/SUB socket pair, with messages serialised as
//! JSON strings.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;
use zmq::{Context, PollItem, Socket, SocketType};

// Export zmq
pub use zmq;

// ------------------------------------------------------------------------------------------------
// MACROS
// ------------------------------------------------------------------------------------------------

macro_rules! set_sockopts {
    ($socket:expr, $(($opt:ident, $val:expr)),+) => {
        $(
            $socket.$opt($val)
                .map_err(|e| NetError::SocketOptionError(stringify!($opt).into(), e))?;
        )+
    };
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Endpoints of every topic used by the executable.
#[derive(Debug, Clone, Deserialize)]
pub struct NetParams {
    pub gps_raw_endpoint: String,
    pub gps_filtered_endpoint: String,
    pub wind_sailing_endpoint: String,
    pub attitude_endpoint: String,
    pub wx_attitude_endpoint: String,
    pub tc_endpoint: String,

    pub actuators_endpoint: String,
    pub guidance_dbg_endpoint: String,
    pub gnd_log_endpoint: String,
}

/// Represents options which can be set on a socket.
///
/// Most options here correspond to those found in the
/// [`zmq_setsockopt`](http://api.zeromq.org/4-2:zmq-setsockopt) documentation.
pub struct SocketOptions {
    /// Indicates if the socket should bind itself to the endpoint. Publishers bind, subscribers
    /// connect.
    pub bind: bool,

    /// `ZMQ_LINGER`: Set linger period for socket shutdown, in milliseconds. Messages still queued
    /// when the socket is closed are discarded once this period has elapsed.
    pub linger: i32,

    /// `ZMQ_RCVTIMEO`: Maximum time before a recv operation returns with `EAGAIN`
    pub recv_timeout: i32,

    /// `ZMQ_SNDTIMEO`: Maximum time before a send operation returns with `EAGAIN`
    pub send_timeout: i32,
}

/// A subscriber receiving messages of type `T` from a single topic.
pub struct Subscriber<T> {
    socket: Socket,
    endpoint: String,
    _msg: PhantomData<T>,
}

/// A publisher sending messages of type `T` on a single topic.
pub struct Publisher<T> {
    socket: Socket,
    endpoint: String,
    _msg: PhantomData<T>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum NetError {
    #[error("Error creating the socket: {0}")]
    CreateSocketError(zmq::Error),

    #[error("Could not connect the socket to {0}: {1}")]
    CouldNotConnect(String, zmq::Error),

    #[error("Could not set the {0} socket option: {1}")]
    SocketOptionError(String, zmq::Error),

    #[error("Could not receive a message: {0}")]
    RecvError(zmq::Error),

    #[error("Could not send a message: {0}")]
    SendError(zmq::Error),

    #[error("Received a message which is not valid UTF-8")]
    NonUtf8Message,

    #[error("Could not serialise the message: {0}")]
    SerialiseError(serde_json::Error),

    #[error("Could not deserialise the message: {0}")]
    DeserialiseError(serde_json::Error),

    #[error("Error polling the sockets: {0}")]
    PollError(zmq::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SocketOptions {
    /// Set these options on the given socket.
    pub fn set(&self, socket: &Socket) -> Result<(), NetError> {
        set_sockopts!(
            socket,
            (set_linger, self.linger),
            (set_rcvtimeo, self.recv_timeout),
            (set_sndtimeo, self.send_timeout)
        );

        Ok(())
    }
}

impl Default for SocketOptions {
    fn default() -> Self {
        // Defaults for sockopts taken from http://api.zeromq.org/4-2:zmq-setsockopt, except for
        // linger
        Self {
            bind: false,
            linger: 30_000,
            recv_timeout: -1,
            send_timeout: 0,
        }
    }
}

impl<T> Subscriber<T>
where
    T: DeserializeOwned,
{
    /// Create a new subscriber connected to the given endpoint.
    pub fn new(ctx: &Context, endpoint: &str, options: SocketOptions) -> Result<Self, NetError> {
        let socket = create_socket(ctx, zmq::SUB, &options, endpoint)?;

        socket
            .set_subscribe(b"")
            .map_err(|e| NetError::SocketOptionError("set_subscribe".into(), e))?;

        Ok(Self {
            socket,
            endpoint: endpoint.into(),
            _msg: PhantomData,
        })
    }

    /// Get a poll item which is readable when a message is waiting on this subscriber.
    pub fn as_poll_item(&self) -> PollItem {
        self.socket.as_poll_item(zmq::POLLIN)
    }

    /// Receive a single message without blocking.
    ///
    /// Returns `Ok(None)` if no message is waiting.
    pub fn recv(&self) -> Result<Option<T>, NetError> {
        match self.socket.recv_string(zmq::DONTWAIT) {
            Ok(Ok(s)) => serde_json::from_str(&s)
                .map(Some)
                .map_err(NetError::DeserialiseError),
            Ok(Err(_)) => Err(NetError::NonUtf8Message),
            Err(zmq::Error::EAGAIN) => Ok(None),
            Err(e) => Err(NetError::RecvError(e)),
        }
    }

    /// Receive all waiting messages, returning the most recent valid one.
    ///
    /// Invalid messages are skipped, the last error is returned only if no valid message was
    /// received.
    pub fn recv_latest(&self) -> Result<Option<T>, NetError> {
        let mut latest = None;
        let mut last_err = None;

        loop {
            match self.recv() {
                Ok(Some(msg)) => latest = Some(msg),
                Ok(None) => break,
                Err(NetError::RecvError(e)) => return Err(NetError::RecvError(e)),
                Err(e) => last_err = Some(e),
            }
        }

        match (latest, last_err) {
            (None, Some(e)) => Err(e),
            (latest, _) => Ok(latest),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl<T> Publisher<T>
where
    T: Serialize,
{
    /// Create a new publisher bound to the given endpoint.
    pub fn new(ctx: &Context, endpoint: &str, options: SocketOptions) -> Result<Self, NetError> {
        let options = SocketOptions {
            bind: true,
            ..options
        };

        Ok(Self {
            socket: create_socket(ctx, zmq::PUB, &options, endpoint)?,
            endpoint: endpoint.into(),
            _msg: PhantomData,
        })
    }

    /// Publish a message.
    pub fn send(&self, msg: &T) -> Result<(), NetError> {
        let s = serde_json::to_string(msg).map_err(NetError::SerialiseError)?;

        self.socket.send(&s, 0).map_err(NetError::SendError)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Wait for at most `timeout_ms` milliseconds for any of the items to become readable.
///
/// Returns the number of readable items, zero on timeout.
pub fn poll(items: &mut [PollItem], timeout_ms: i64) -> Result<i32, NetError> {
    zmq::poll(items, timeout_ms).map_err(NetError::PollError)
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn create_socket(
    ctx: &Context,
    socket_type: SocketType,
    options: &SocketOptions,
    endpoint: &str,
) -> Result<Socket, NetError> {
    let socket = ctx.socket(socket_type).map_err(NetError::CreateSocketError)?;

    options.set(&socket)?;

    match options.bind {
        false => socket.connect(endpoint),
        true => socket.bind(endpoint),
    }
    .map_err(|e| NetError::CouldNotConnect(endpoint.into(), e))?;

    debug!(
        "{} {:?} socket on {}",
        if options.bind { "Bound" } else { "Connected" },
        socket_type,
        endpoint
    );

    Ok(socket)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::eqpt::act::ActuatorControls;
    use std::{thread, time::Duration};

    #[test]
    fn test_pub_sub_inproc() {
        let ctx = zmq::Context::new();
        let endpoint = "inproc://test_pub_sub";

        let publisher: Publisher<ActuatorControls> =
            Publisher::new(&ctx, endpoint, SocketOptions::default()).unwrap();
        let subscriber: Subscriber<ActuatorControls> =
            Subscriber::new(&ctx, endpoint, SocketOptions::default()).unwrap();

        assert!(subscriber.recv().unwrap().is_none());

        // Give the subscription time to propagate, PUB drops messages until it has
        thread::sleep(Duration::from_millis(100));

        publisher.send(&ActuatorControls::new(0.1, 0.2)).unwrap();
        publisher.send(&ActuatorControls::new(0.3, 0.4)).unwrap();

        let mut items = [subscriber.as_poll_item()];
        assert_eq!(poll(&mut items, 1000).unwrap(), 1);
        assert!(items[0].is_readable());

        assert_eq!(
            subscriber.recv_latest().unwrap(),
            Some(ActuatorControls::new(0.3, 0.4))
        );
        assert!(subscriber.recv().unwrap().is_none());
    }

    #[test]
    fn test_publisher_lingers_on_close() {
        let ctx = zmq::Context::new();

        let publisher: Publisher<ActuatorControls> =
            Publisher::new(&ctx, "inproc://test_linger", SocketOptions::default()).unwrap();

        // Closing must not discard a demand which is still queued
        assert_eq!(publisher.socket.get_linger().unwrap(), 30_000);

        let options = SocketOptions {
            linger: 500,
            ..SocketOptions::default()
        };
        let publisher: Publisher<ActuatorControls> =
            Publisher::new(&ctx, "inproc://test_linger_custom", options).unwrap();
        assert_eq!(publisher.socket.get_linger().unwrap(), 500);
    }
}
