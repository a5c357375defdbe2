pub mod manifest;
pub mod profile;
