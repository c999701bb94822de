pub mod plugins;
pub mod character;
pub mod config;
pub mod frame;
pub mod audio;
pub mod global_asset;
