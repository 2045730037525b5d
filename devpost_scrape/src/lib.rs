mod detail;
mod dom;
mod errors;
mod gallery;
mod sanitize;
mod selectors;
pub mod types;
pub use self::detail::extract_detail;
pub use self::errors::Error;
pub use self::gallery::{dedupe_by_detail_url, extract_gallery, select_winners};
pub use self::selectors::{
    class_inventory, DetailSelectors, GallerySelectors, SelectorChain, Selectors,
};
