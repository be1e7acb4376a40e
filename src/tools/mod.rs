//! One module per binary. Each exposes the pure classification or workflow
//! logic generic over [`History`](crate::git::History), plus an `entry()`
//! used by the binary's `main`.

pub mod blocking;
pub mod reword;
pub mod skip_ci;
pub mod strip;
