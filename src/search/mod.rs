// Search: query matching, highlighting and filtering

pub mod debounce;
pub mod filter;
pub mod highlight;
pub mod markup;
pub mod normalize;

pub use debounce::SearchDebouncer;
pub use filter::filter_notes;
pub use highlight::{highlight_markup, highlight_plain_text};
pub use markup::escape_html;
pub use normalize::Matcher;
