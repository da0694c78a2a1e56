#[cfg(feature = "vfs012")] mod vfs012; #[cfg(feature = "vfs012")] pub use self::vfs012::*;

mod directories;
mod handle;         pub use handle::*;
