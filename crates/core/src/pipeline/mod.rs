pub mod follow_face_use_case;
pub mod pipeline_logger;
