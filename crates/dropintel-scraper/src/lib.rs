pub mod error;
pub mod extract;
pub mod normalize;
pub mod selectors;
pub mod session;

pub use error::PortalError;
pub use extract::extract_products;
pub use normalize::clean_price;
pub use selectors::SelectorProfile;
pub use session::PortalSession;
