pub mod executable_utils;
pub mod import_model;
pub mod loader;
