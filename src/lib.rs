// Library exports for keepnotes

pub mod config;
pub mod identity;
pub mod logging;
pub mod note;
pub mod richtext;
pub mod search;
pub mod store;
pub mod view;
