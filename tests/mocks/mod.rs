//! Shared collaborators and servers for integration tests

pub mod collaborators;
pub mod test_server;

#[allow(unused_imports)]
pub use collaborators::Collaborators;
#[allow(unused_imports)]
pub use test_server::TestServer;
