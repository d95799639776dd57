pub mod loader;
pub mod resolver;

pub use resolver::{ConfigError, Resolver, Source, typed_value};

/// Well-known configuration keys and their defaults.
pub mod keys {
    pub const KEYWORD: &str = "keyword";
    pub const DATA_PATH: &str = "data_path";
    pub const OUTPUT_PATH: &str = "output_path";
    pub const CHART_WIDTH: &str = "chart_width";

    pub const DEFAULT_DATA_PATH: &str = "issues.json";
    pub const DEFAULT_OUTPUT_PATH: &str = "keyword_results.txt";
    pub const DEFAULT_CHART_WIDTH: usize = 40;
}
