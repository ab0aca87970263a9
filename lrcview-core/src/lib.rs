pub mod config;
pub mod error;
pub mod lrc;
pub mod paths;
pub mod search;
pub mod sync;
pub mod time;
pub mod tracker;

pub use config::{LrcViewConfig, ParserConfig, TrackerConfig, TrimConfig, CONFIG_TEMPLATE};

/// Re-export toml error type for config parsing error handling
pub use toml::de::Error as TomlParseError;
pub use error::CoreError;
pub use lrc::{LrcDocument, LrcLine, LrcMetadata, LrcWord, WordTags};
pub use paths::{config_dir, config_path, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
pub use search::{search_time_before, Timed};
pub use sync::{HighlightChannel, HighlightEvent};
pub use time::format_timestamp;
pub use tracker::{ActivePosition, HighlightSink, HighlightState, Marker, SeekSink, Tracker};
