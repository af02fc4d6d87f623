//! Terminal user interface components.

pub mod app;
pub mod error;
pub mod layout;
pub mod record_page;
pub mod spinner;
pub mod toast;
pub mod upload_page;

pub use app::App;
pub use error::ErrorScreen;
pub use layout::Page;
pub use record_page::RecordPage;
