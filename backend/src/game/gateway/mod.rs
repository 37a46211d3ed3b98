mod state;
mod ws;
mod ws_handler;

pub use state::GatewayState;
pub use ws_handler::handle_connection;
