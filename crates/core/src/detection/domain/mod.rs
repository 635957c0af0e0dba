pub mod face_locator;
pub mod largest_face;
