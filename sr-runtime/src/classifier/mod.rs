//! # What are they for?
//!
//! Classifiers look at each frame by reference and are not able to modify it. They return a
//! class, generally an enum, which the router matches on to pick the processor that handles the
//! frame. Classification is pure inspection; there are no side effects.
mod ether_type;
pub use self::ether_type::*;

/// Used by the router to determine the kind of frame we have. Classifier::Class is then consumed
/// by the router's dispatch to send the frame down the appropriate path.
pub trait Classifier {
    type Packet: ?Sized;
    type Class: Sized;

    fn classify(&self, packet: &Self::Packet) -> Self::Class;
}
