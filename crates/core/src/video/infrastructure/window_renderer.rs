use crate::shared::frame::Frame;
use crate::shared::rect::Rect;
use crate::steering::directive::Directive;
use crate::video::domain::renderer::Renderer;
use crate::video::infrastructure::overlay;
use minifb::{Key, Window, WindowOptions};
use thiserror::Error;

/// Fixed screen position of the preview window.
const WINDOW_X: isize = 400;
const WINDOW_Y: isize = 100;

const TARGET_FPS: usize = 60;

/// Annotation layout: labels sit to the right of the tracked box, one
/// row per axis.
const LABEL_MARGIN_X: i32 = 10;
const LABEL_ROW_HORIZONTAL: i32 = 30;
const LABEL_ROW_VERTICAL: i32 = 60;
const LABEL_SCALE: i32 = 2;
const RECT_THICKNESS: i32 = 2;
const CENTER_MARK_RADIUS: i32 = 5;

#[derive(Debug, Error)]
pub enum WindowRendererError {
    #[error("failed to create display window: {source}")]
    Create { source: minifb::Error },
    #[error("failed to present frame: {source}")]
    Present { source: minifb::Error },
}

/// Shows annotated frames in a minifb window.
///
/// Each presented frame is annotated at processing resolution, rescaled
/// to the display resolution, packed into the window's 0RGB buffer and
/// flushed. The window doubles as the quit control: closing it or
/// holding Q or Escape sets `quit_requested`.
pub struct MinifbWindowRenderer {
    window: Option<Window>,
    buffer: Vec<u32>,
    display_width: u32,
    display_height: u32,
}

impl MinifbWindowRenderer {
    pub fn new(
        title: &str,
        display_width: u32,
        display_height: u32,
    ) -> Result<Self, WindowRendererError> {
        let mut window = Window::new(
            title,
            display_width as usize,
            display_height as usize,
            WindowOptions::default(),
        )
        .map_err(|source| WindowRendererError::Create { source })?;
        window.set_position(WINDOW_X, WINDOW_Y);
        window.set_target_fps(TARGET_FPS);

        Ok(Self {
            window: Some(window),
            buffer: vec![0; (display_width * display_height) as usize],
            display_width,
            display_height,
        })
    }
}

impl Renderer for MinifbWindowRenderer {
    fn present(
        &mut self,
        frame: &Frame,
        target: Option<Rect>,
        directive: Option<Directive>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let window = self.window.as_mut().ok_or("Renderer already closed")?;

        let mut annotated = frame.clone();
        annotate(&mut annotated, target, directive);
        let display = annotated.resized(self.display_width, self.display_height);
        pack_0rgb(display.data(), &mut self.buffer);

        window
            .update_with_buffer(
                &self.buffer,
                self.display_width as usize,
                self.display_height as usize,
            )
            .map_err(|source| WindowRendererError::Present { source })?;
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        match &self.window {
            Some(window) => {
                !window.is_open()
                    || window.is_key_down(Key::Q)
                    || window.is_key_down(Key::Escape)
            }
            None => true,
        }
    }

    fn close(&mut self) {
        self.window = None;
    }
}

/// Paints the tracked rectangle, its centre mark, and the steering labels
/// onto the frame. Labels go green on an axis that needs no correction,
/// red otherwise.
fn annotate(frame: &mut Frame, target: Option<Rect>, directive: Option<Directive>) {
    let Some(rect) = target else {
        return;
    };
    overlay::draw_rect_outline(frame, rect, overlay::RED, RECT_THICKNESS);

    let (cx, cy) = rect.center();
    overlay::draw_circle_outline(frame, cx as i32, cy as i32, CENTER_MARK_RADIUS, overlay::BLUE);

    let Some(directive) = directive else {
        return;
    };
    let label_x = rect.right() + LABEL_MARGIN_X;
    let horizontal_color = if directive.horizontal.is_good() {
        overlay::GREEN
    } else {
        overlay::RED
    };
    let vertical_color = if directive.vertical.is_good() {
        overlay::GREEN
    } else {
        overlay::RED
    };
    overlay::draw_text(
        frame,
        directive.horizontal.label(),
        label_x,
        rect.y + LABEL_ROW_HORIZONTAL,
        horizontal_color,
        LABEL_SCALE,
    );
    overlay::draw_text(
        frame,
        directive.vertical.label(),
        label_x,
        rect.y + LABEL_ROW_VERTICAL,
        vertical_color,
        LABEL_SCALE,
    );
}

/// Packs interleaved RGB8 into minifb's 0RGB u32 layout.
fn pack_0rgb(rgb: &[u8], buffer: &mut Vec<u32>) {
    buffer.clear();
    buffer.extend(rgb.chunks_exact(3).map(|px| {
        let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
        (r << 16) | (g << 8) | b
    }));
}
