//! # TUI Components
//!
//! Every component here is stateless: it borrows the piece of core state it
//! draws and is rebuilt each frame.
//!
//! - `TitleBar`: app name, section tabs and the status message
//! - `CatalogPanel`: one catalog section (loading, error, empty, grid, strip)
//! - `ItemCard`: a single course or mentor card, used by `CatalogPanel`
//! - `InquiryFormOverlay`: the open inquiry or contact form
//!
//! ## Props-Based Data Flow
//!
//! Components receive what they draw as constructor arguments, never by
//! reaching into `App`. This keeps them testable against a `TestBackend`
//! with hand-built state:
//!
//! ```rust,ignore
//! CatalogPanel::new(view, spinner_frame).render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── title_bar.rs      (Top status bar)
//! ├── catalog_panel.rs  (Section body)
//! ├── item_card.rs      (Card widget)
//! └── inquiry_form.rs   (Form overlay)
//! ```

mod catalog_panel;
mod inquiry_form;
mod item_card;
mod title_bar;

pub use catalog_panel::CatalogPanel;
pub use inquiry_form::InquiryFormOverlay;
pub use item_card::{CARD_HEIGHT, ItemCard, rating_stars};
pub use title_bar::TitleBar;
