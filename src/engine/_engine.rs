mod archive_engine; pub use archive_engine::*;
mod pending;        pub(crate) use pending::*;
mod zip_engine;     pub use zip_engine::*;
