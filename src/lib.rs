mod ioutil;
mod error;
mod config;
mod source;
mod reshape;
mod merge;
mod rate;
mod snapshot;
mod codes;
mod pipeline;
mod export;

pub use ioutil::{magic_open, open_endpoint};
pub use error::*;
pub use config::*;
pub use source::*;
pub use reshape::*;
pub use merge::*;
pub use rate::*;
pub use snapshot::*;
pub use codes::*;
pub use pipeline::*;
pub use export::*;
