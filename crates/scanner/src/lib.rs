//! Wallet history scanner for the SORA and Ethereum main nets.
//!
//! The pipeline: an event source yields pages of raw on-chain events,
//! the normalizer flattens each event into report rows (resolving asset
//! metadata through the registry), and the report module persists the
//! ordered rows as CSV.

pub mod amount;
pub mod assets;
pub mod consts;
pub mod logging;
pub mod normalize;
pub mod report;
pub mod scan;
pub mod sources;
pub mod ss58;
pub mod types;
