//! The interchange model of the analysis toolkit, as found in ORT result documents, and the
//! interfaces the toolkit uses to access storages and plugins provided by the server.

mod identifier;
mod model;
mod spi;

pub use identifier::*;
pub use model::*;
pub use spi::*;
