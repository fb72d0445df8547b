//! Tembang Core - Entity Types
//!
//! Ids, catalog entities, enums and the error taxonomy shared by every other
//! crate in the workspace. No I/O lives here.

pub mod entities;
pub mod enums;
pub mod error;
pub mod health;
pub mod identity;

pub use entities::*;
pub use enums::*;
pub use error::*;
pub use health::*;
pub use identity::*;
