//! Ambient plumbing shared by the auxpow binaries.

pub mod logging;
