#[macro_use]
extern crate serde;
#[macro_use]
extern crate serde_json;
#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate lazy_static;

pub mod catalog;
pub mod error;
pub mod extractor;
pub mod source;
pub mod types;
pub mod util;
pub mod viewer;

#[cfg(feature = "cli")]
pub mod app;
#[cfg(feature = "cli")]
pub mod config;

pub use catalog::{Catalog, CatalogItem};
pub use error::{Error, LibraryError, Result};
pub use extractor::Extractor;
pub use source::{RpcTxSource, TxSource};
pub use types::{FileType, Transaction, TxOutput};
pub use viewer::{FileExporter, Presenter, TextViewer};

#[cfg(feature = "cli")]
pub use app::App;
#[cfg(feature = "cli")]
pub use config::Config;
