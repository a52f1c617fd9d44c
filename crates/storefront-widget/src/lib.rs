//! Purchase-widget state: the rendered surfaces, the address bar, and the
//! controller that keeps them in sync with the shopper's option selection.

pub mod history;
pub mod selector;
pub mod surface;
pub mod sync;

pub use history::{AddressBar, MemoryHistory};
pub use selector::VariantSelector;
pub use surface::{LoadingSpinner, OptionButton, SubmitControl, Surface, SurfaceState};
pub use sync::PresentationSync;
