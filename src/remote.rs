//! Access to the remote translation store.

mod config;
mod loco;
mod store;

pub use config::RemoteConfig;
pub use loco::{
    DEFAULT_ASSET_VALUE,
    LocoClient,
};
pub use store::{
    RemoteError,
    RemoteStore,
};
