mod system;

pub use system::{handle_panic, health, root};
