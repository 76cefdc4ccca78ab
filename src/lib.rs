// Library exports for ProfileMaker
// This allows integration tests and the binary to share the modules

pub mod config;
pub mod error;
pub mod markdown;
pub mod profile;
pub mod routes;
pub mod share;
pub mod state;
pub mod storage;
