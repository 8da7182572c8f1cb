pub mod toml_loader;

pub use toml_loader::{default_work_list, load_work_list, parse_work_list, DEFAULT_NOTEBOOKS};
