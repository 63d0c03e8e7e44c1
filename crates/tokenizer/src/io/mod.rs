//! Serialization and deserialization for BPE models.
//!
//! Models persist as a pair of text files: a reloadable `.model` file and
//! a human-readable `.vocab` file.

pub mod format;
pub mod load;
pub mod save;

pub use self::format::{ModelFile, MODEL_VERSION};
pub use self::load::ModelLoader;
pub use self::save::ModelSaver;
