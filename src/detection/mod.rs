pub mod hints;

pub use hints::{EnvHintSource, VersionHintSource, WELL_KNOWN_VERSION_VARIABLES};
