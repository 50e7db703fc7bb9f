pub mod keyboard;
pub mod notes;
pub mod settings;
