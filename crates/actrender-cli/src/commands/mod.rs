pub mod activities;
pub mod inspect;
pub mod report;

use actrender_core::SampleFile;

/// Load a sample document or exit with a message.
pub fn load_or_exit(path: &str) -> SampleFile {
    match SampleFile::load(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            std::process::exit(1);
        }
    }
}
