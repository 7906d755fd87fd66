use serde::Deserialize;
use serde::Serialize;

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle (origin + size).
///
/// The accessibility layer reports frames in an absolute coordinate space.
/// Overlay rendering needs the same frame expressed relative to the captured
/// window and then in image pixels, where the vertical axis points the other
/// way. [`Rect::window_relative`] and [`Rect::image_local`] perform those two
/// conversions; each must be applied exactly once per overlay.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point, used as the default click target for an element.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Express this absolute-frame rectangle relative to `window`'s origin.
    pub fn window_relative(&self, window: &Rect) -> Rect {
        Rect::new(self.x - window.x, self.y - window.y, self.width, self.height)
    }

    /// Convert a window-relative rectangle whose origin is bottom-left into
    /// an image-local rectangle whose origin is top-left.
    pub fn image_local(&self, image_height: f64) -> Rect {
        Rect::new(
            self.x,
            image_height - self.y - self.height,
            self.width,
            self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_relative_subtracts_origin() {
        let frame = Rect::new(150.0, 250.0, 80.0, 40.0);
        let window = Rect::new(100.0, 200.0, 800.0, 600.0);

        let relative = frame.window_relative(&window);
        assert_eq!(relative, Rect::new(50.0, 50.0, 80.0, 40.0));
    }

    #[test]
    fn test_image_local_flips_vertical_axis() {
        let relative = Rect::new(50.0, 50.0, 80.0, 40.0);

        let local = relative.image_local(600.0);
        assert_eq!(local.y, 510.0);
        assert_eq!(local.x, 50.0);
        assert_eq!(local.width, 80.0);
        assert_eq!(local.height, 40.0);
    }

    #[test]
    fn test_image_local_roundtrip() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        let flipped = rect.image_local(500.0);
        assert_eq!(flipped.image_local(500.0), rect);
    }

    #[test]
    fn test_center() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        let center = rect.center();
        assert_eq!(center, Point::new(60.0, 45.0));
    }

    #[test]
    fn test_contains_boundaries() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(9.9, 9.9)));
        assert!(!rect.contains(Point::new(10.0, 5.0)));
        assert!(!rect.contains(Point::new(-0.1, 5.0)));
    }
}
