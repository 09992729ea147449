//! Client-side search over a translation dataset.

mod filter;
mod locales;

pub use filter::{
    matches,
    search,
};
pub use locales::available_locales;
