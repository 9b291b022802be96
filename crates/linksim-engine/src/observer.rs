//! # linksim-engine::observer
//!
//! The observer tap: a synchronous callback through which external code
//! (CLI, visual front-ends, tests) watches the core. Only two moments are
//! externally observable: a frame entering the channel and a packet being
//! taken into delivery. The callback runs inside event handling; any
//! cross-thread hand-off is the observer's own responsibility.

use linksim_types::{
    frame::{Frame, Packet},
    id::EndpointId,
    time::SimTime,
};

/// An externally observable core event.
#[derive(Clone, Debug)]
pub enum TapEvent {
    /// The channel accepted a frame for transmission. `duration` is the
    /// channel's transmission delay.
    PacketSent {
        frame: Frame,
        from: EndpointId,
        to: EndpointId,
        duration: SimTime,
    },
    /// The network layer took inbound delivery of a packet.
    PacketDelivered {
        packet: Packet,
        endpoint: EndpointId,
    },
}

/// The observer callback type registered through the façade.
pub type ObserverFn = Box<dyn FnMut(&TapEvent)>;
