#![no_std]

#[macro_use]
pub extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod builder;
pub mod config;
pub mod encoder;
pub mod error;
pub mod receipt;
pub mod resolver;
pub mod signer;

pub use builder::*;
pub use config::*;
pub use encoder::*;
pub use error::*;
pub use receipt::*;
pub use resolver::*;
pub use signer::*;

pub(crate) type SecpCtx = bitcoin::secp256k1::Secp256k1<bitcoin::secp256k1::All>;
