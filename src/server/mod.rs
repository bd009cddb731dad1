// Server module entry point
// Listener creation and the connection accept loop for the demo server

pub mod connection;
pub mod listener;

pub use connection::serve;
pub use listener::create_reusable_listener;
