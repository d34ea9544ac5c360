pub mod environment;
pub mod logging;
pub mod paths;
pub mod terminal;

pub use environment::{Environment, SystemEnvironment};
pub use logging::init_logging;
pub use paths::{expand_tilde, locate_history_file};
pub use terminal::sanitize_for_display;
