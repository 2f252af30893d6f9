pub mod account;
pub mod activity;
pub mod password;
pub mod profile;
pub mod settings;

// Re-export handler functions for use in routing
pub use account::delete_account;
pub use activity::activity;
pub use password::change_password;
pub use profile::{get_profile, update_profile};
pub use settings::{get_settings, update_settings};
