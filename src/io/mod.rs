//! Loading task records off the UI thread.

pub mod async_loader;

pub use async_loader::{AsyncLoader, LoadOrigin, LoadResult};
