pub const SEETA_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";
pub const SEETA_MODEL_URL: &str =
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin";

/// Fixed resolution the detection/tracking pipeline operates at. Captured
/// frames are rescaled to this size before any processing.
pub const PROCESSING_WIDTH: u32 = 1280;
pub const PROCESSING_HEIGHT: u32 = 720;

/// Resolution annotated frames are rescaled to for presentation. Kept
/// separate from the processing size even though the defaults coincide.
pub const DISPLAY_WIDTH: u32 = 1280;
pub const DISPLAY_HEIGHT: u32 = 720;
