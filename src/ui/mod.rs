pub mod error_modal;
pub mod form_modal;
pub mod help;
pub mod layout;
pub mod pages;
pub mod record_table;
pub mod status;
pub mod theme;

pub use error_modal::{render_alert, render_error_modal};
pub use form_modal::{FormRenderContext, render_form_modal};
pub use help::render_help_overlay;
pub use layout::{centered_rect, create_main_layout};
pub use pages::{render_about, render_home, render_tabs};
pub use record_table::render_record_table;
pub use status::{render_flash_messages, render_keyboard_hints};
pub use theme::{BuiltInTheme, Theme, ThemeError};
