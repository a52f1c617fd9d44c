//! The cart-preview collaborator refreshed after a successful cart add.

use crate::types::SectionsPayload;

/// Renders updated cart contents (a sidebar, drawer or header badge).
pub trait CartPreview: Send + Sync {
    /// Replaces the preview's contents with the re-rendered `payload` sections.
    fn render_contents(&self, payload: &SectionsPayload);
}
