pub mod resume;
pub mod template;
pub mod tracking;
pub mod variant;
