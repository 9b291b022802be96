//! # linksim-proto::protocols
//!
//! The six classical data-link protocols, from the unrestricted channel of
//! Utopia up to Selective Repeat with per-frame timers.

pub mod go_back_n;
pub mod par;
pub mod selective_repeat;
pub mod sliding_window;
pub mod stop_and_wait;
pub mod utopia;

pub use go_back_n::GoBackN;
pub use par::Par;
pub use selective_repeat::SelectiveRepeat;
pub use sliding_window::SlidingWindow1Bit;
pub use stop_and_wait::StopAndWait;
pub use utopia::Utopia;
