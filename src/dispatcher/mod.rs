// Event dispatcher
//
// A single task owns the room registry outright. Connection tasks hand it
// inbound client events over a channel; it mutates the registry and pushes
// the resulting frames out through the connection manager. Each event is
// handled to completion before the next one is received, so the registry
// needs no locking.

// Public API
pub use dispatcher::{Dispatcher, DispatcherHandle};
pub use events::ClientEvent;

// Internal modules
#[allow(clippy::module_inception)]
mod dispatcher;
mod events;
