pub mod session;
pub mod settings;

pub use session::{validate_production_config, SessionConfig};
pub use settings::Settings;
