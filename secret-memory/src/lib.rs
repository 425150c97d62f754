pub mod debug;

mod public;
pub use crate::public::Public;

mod secret;
pub use crate::secret::Secret;
