//! Platform directories for data, config and state.

pub mod xdg_root;

pub use xdg_root::{config_home, data_home, global_config_path, store_dir};
