//! Destination naming: sanitized path components, titles and genres

pub mod genre;
pub mod sanitize;

pub use genre::select_tags;
pub use sanitize::{clean_title, render_template, sanitize, sniff_disc_subtitle, sniff_title};
