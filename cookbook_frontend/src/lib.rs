pub mod api;
pub mod browser;
pub mod components;

pub use api::ApiClient;
pub use browser::RecipeBrowser;
pub use components::{BrowserController, RecipeBrowserPage};
