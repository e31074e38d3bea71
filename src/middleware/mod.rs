pub mod auth;
pub mod edge_gate;

pub use auth::session_auth;
pub use edge_gate::edge_gate;
