use crate::shared::rect::Rect;

/// Band edges for the normalized target centre, shared by both axes. The
/// far bands overlap the near bands; evaluation order gives them priority.
const FAR_LOW: f64 = 0.25;
const NEAR_LOW: f64 = 0.40;
const NEAR_HIGH: f64 = 0.60;
const FAR_HIGH: f64 = 0.75;

/// Horizontal placement of the target, from the camera's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalBand {
    FarLeft,
    Left,
    Centered,
    Right,
    FarRight,
}

impl HorizontalBand {
    /// Operator-facing steering label for this band.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FarLeft => "far left, correct right",
            Self::Left => "left, ease right",
            Self::Centered => "X good",
            Self::Right => "right, ease left",
            Self::FarRight => "far right, correct left",
        }
    }

    /// True when no horizontal correction is needed.
    pub fn is_good(&self) -> bool {
        matches!(self, Self::Centered)
    }
}

/// Vertical placement of the target, from the camera's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalBand {
    FarAbove,
    Above,
    Centered,
    Below,
    FarBelow,
}

impl VerticalBand {
    /// Operator-facing steering label for this band.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FarAbove => "far above, correct down",
            Self::Above => "above, ease down",
            Self::Centered => "Y good",
            Self::Below => "below, ease up",
            Self::FarBelow => "far below, correct up",
        }
    }

    /// True when no vertical correction is needed.
    pub fn is_good(&self) -> bool {
        matches!(self, Self::Centered)
    }
}

/// One steering correction per axis for the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Directive {
    pub horizontal: HorizontalBand,
    pub vertical: VerticalBand,
}

/// Position of a normalized coordinate along one axis. Shared by both
/// axes so the band policy is written down exactly once.
#[derive(Clone, Copy)]
enum Zone {
    FarLow,
    Low,
    Center,
    High,
    FarHigh,
}

/// First match wins: the strict comparisons put the boundary values
/// themselves in the milder band.
fn zone(n: f64) -> Zone {
    if n < FAR_LOW {
        Zone::FarLow
    } else if n < NEAR_LOW {
        Zone::Low
    } else if n > FAR_HIGH {
        Zone::FarHigh
    } else if n > NEAR_HIGH {
        Zone::High
    } else {
        Zone::Center
    }
}

/// Classify a tracked rectangle into steering directives.
///
/// Pure: the same rectangle and frame dimensions always yield the same
/// directive. The rectangle's centre is normalized against the frame the
/// tracker operates in, so the bands hold at any processing resolution.
pub fn classify(rect: Rect, frame_width: u32, frame_height: u32) -> Directive {
    let (cx, cy) = rect.center();
    let nx = cx / frame_width as f64;
    let ny = cy / frame_height as f64;

    let horizontal = match zone(nx) {
        Zone::FarLow => HorizontalBand::FarLeft,
        Zone::Low => HorizontalBand::Left,
        Zone::Center => HorizontalBand::Centered,
        Zone::High => HorizontalBand::Right,
        Zone::FarHigh => HorizontalBand::FarRight,
    };
    let vertical = match zone(ny) {
        Zone::FarLow => VerticalBand::FarAbove,
        Zone::Low => VerticalBand::Above,
        Zone::Center => VerticalBand::Centered,
        Zone::High => VerticalBand::Below,
        Zone::FarHigh => VerticalBand::FarBelow,
    };

    Directive {
        horizontal,
        vertical,
    }
}
