//! Extract normalized recipe records from schema.org JSON-LD embedded in
//! HTML pages.
//!
//! ```no_run
//! let html = std::fs::read_to_string("page.html").unwrap();
//! let recipe = ladle_core::extract_recipe(&html).unwrap();
//! println!("{} ({} steps)", recipe.name, recipe.instructions.len());
//! ```

pub mod config;
pub mod duration;
pub mod error;
pub mod extract;
pub mod locate;
pub mod normalize;
pub mod types;

pub use config::ExtractConfig;
pub use duration::{duration_to_text, parse_iso_duration, IsoDuration};
pub use error::{ConfigError, ExtractError};
pub use extract::{extract_recipe, extract_recipe_with};
pub use locate::{locate, PageDocument};
pub use normalize::{find_recipe_node, normalize, normalize_node, normalize_with};
pub use types::{PageMeta, Recipe, VideoInfo};
