mod schema;
mod settings;
mod storage;

use std::path::PathBuf;
use std::{env, io};

pub use schema::SchemaManager;
pub use settings::{Database, Gemini, History, Irrigation, Logger, Server, Settings};
pub use storage::Storage;

pub(crate) fn normalize_path(path: &str) -> io::Result<PathBuf> {
    let path_buf = PathBuf::from(path);

    Ok(if path_buf.is_absolute() {
        path_buf
    } else {
        env::current_dir()?.as_path().join(&path_buf)
    })
}
