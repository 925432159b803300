// Math utilities, rectangles and unit conversion

use glam::Vec2;

/// Display pixels per simulation metre
pub const DISPLAY_UNITS_PER_SIM_UNIT: f32 = 24.0;

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centred on a point
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x * 0.5,
            center.y - size.y * 0.5,
            size.x,
            size.y,
        )
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.min() + self.size() * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
    /// Grow the rectangle on every side

    #[cfg(test)]
    pub fn inflate(&self, horizontal: f32, vertical: f32) -> Self {
        Self::new(
            self.x - horizontal,
            self.y - vertical,
            self.width + horizontal * 2.0,
            self.height + vertical * 2.0,
        )
    }
}

/// Conversion between display units (pixels) and simulation units (metres)
pub struct ConvertUnits;

impl ConvertUnits {
    #[cfg(test)]
    pub fn to_sim(display: f32) -> f32 {
        display / DISPLAY_UNITS_PER_SIM_UNIT
    }

    #[cfg(test)]
    pub fn to_display(sim: f32) -> f32 {
        sim * DISPLAY_UNITS_PER_SIM_UNIT
    }

    #[cfg(test)]
    pub fn vec_to_sim(display: Vec2) -> Vec2 {
        display / DISPLAY_UNITS_PER_SIM_UNIT
    }

    pub fn vec_to_display(sim: Vec2) -> Vec2 {
        sim * DISPLAY_UNITS_PER_SIM_UNIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(rect.contains(Vec2::new(10.0, 20.0)));
        assert!(rect.contains(Vec2::new(39.9, 59.9)));
        assert!(!rect.contains(Vec2::new(40.0, 30.0)));
        assert!(!rect.contains(Vec2::new(15.0, 60.0)));
    }

    #[test]
    fn test_rect_center_and_inflate() {
        let rect = Rect::from_center(Vec2::new(100.0, 50.0), Vec2::new(20.0, 10.0));
        assert_eq!(rect.min(), Vec2::new(90.0, 45.0));
        assert_eq!(rect.center(), Vec2::new(100.0, 50.0));

        let padded = rect.inflate(32.0, 16.0);
        assert_eq!(padded.size(), Vec2::new(84.0, 42.0));
        assert_eq!(padded.center(), rect.center());
    }

    #[test]
    fn test_unit_conversion_round_trip() {
        assert_eq!(ConvertUnits::to_sim(48.0), 2.0);
        assert_eq!(ConvertUnits::to_display(13.0), 312.0);
        let v = Vec2::new(24.0, -72.0);
        assert_eq!(ConvertUnits::vec_to_sim(v), Vec2::new(1.0, -3.0));
        assert_eq!(ConvertUnits::vec_to_display(ConvertUnits::vec_to_sim(v)), v);
    }
}
