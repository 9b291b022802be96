//! # linksim-proto::registry
//!
//! Maps a `ProtocolKind` to a freshly constructed protocol instance. Both
//! the engine's endpoint registration and the CLI's protocol listing go
//! through this table.

use crate::api::Protocol;
use crate::protocols::{GoBackN, Par, SelectiveRepeat, SlidingWindow1Bit, StopAndWait, Utopia};
use linksim_types::config::ProtocolKind;

/// Builds a boxed protocol instance. `window_size` is consulted only by the
/// windowed protocols and is assumed validated by `LinkConfig::validate`.
pub fn build_protocol(kind: ProtocolKind, window_size: usize) -> Box<dyn Protocol> {
    match kind {
        ProtocolKind::Utopia => Box::new(Utopia::new()),
        ProtocolKind::StopAndWait => Box::new(StopAndWait::new()),
        ProtocolKind::Par => Box::new(Par::new()),
        ProtocolKind::SlidingWindow1Bit => Box::new(SlidingWindow1Bit::new()),
        ProtocolKind::GoBackN => Box::new(GoBackN::new(window_size)),
        ProtocolKind::SelectiveRepeat => Box::new(SelectiveRepeat::new(window_size)),
    }
}
