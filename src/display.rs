//! Color and contrast settings of displayed sources.
use num_traits::AsPrimitive;
use rgb::RGBA8;
use serde::{Deserialize, Serialize};

/// Maps voxel values to colors: values are normalised over a display range
/// and used to scale the RGB components of a base color.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorConverter {
    #[serde(with = "argb")]
    color: RGBA8,
    min: f64,
    max: f64,
}

impl Default for ColorConverter {
    fn default() -> Self {
        ColorConverter::new(RGBA8::new(255, 255, 255, 255), 0., 255.)
    }
}

impl ColorConverter {
    /// Create a converter with a base color and a display range.
    pub fn new(color: RGBA8, min: f64, max: f64) -> Self {
        ColorConverter { color, min, max }
    }

    /// The base color.
    pub fn color(&self) -> RGBA8 {
        self.color
    }

    /// Replace the base color.
    pub fn set_color(&mut self, color: RGBA8) {
        self.color = color;
    }

    /// Lower bound of the display range.
    pub fn display_range_min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the display range.
    pub fn display_range_max(&self) -> f64 {
        self.max
    }

    /// Replace the display range.
    pub fn set_display_range(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
    }

    /// Position of `value` within the display range, clamped to `[0, 1]`.
    /// An empty range maps everything to 0.
    pub fn normalize<T>(&self, value: T) -> f64
    where
        T: AsPrimitive<f64>,
    {
        let width = self.max - self.min;
        if width == 0. {
            return 0.;
        }
        ((value.as_() - self.min) / width).clamp(0., 1.)
    }

    /// Convert a voxel value to a display color. Alpha is left untouched.
    ///
    /// # Example
    ///
    /// ```
    /// # use rgb::RGBA8;
    /// # use spimview::ColorConverter;
    /// let converter = ColorConverter::new(RGBA8::new(0, 255, 0, 255), 0., 1000.);
    /// assert_eq!(converter.convert(500_u16), RGBA8::new(0, 128, 0, 255));
    /// assert_eq!(converter.convert(4000_u16), RGBA8::new(0, 255, 0, 255));
    /// ```
    pub fn convert<T>(&self, value: T) -> RGBA8
    where
        T: AsPrimitive<f64>,
    {
        let w = self.normalize(value);
        let scale = |c: u8| (f64::from(c) * w).round() as u8;
        RGBA8::new(
            scale(self.color.r),
            scale(self.color.g),
            scale(self.color.b),
            self.color.a,
        )
    }
}

/// Pack a color as a `0xAARRGGBB` integer.
pub fn to_argb(color: RGBA8) -> i32 {
    (u32::from(color.a) << 24
        | u32::from(color.r) << 16
        | u32::from(color.g) << 8
        | u32::from(color.b)) as i32
}

/// Unpack a `0xAARRGGBB` integer into a color.
pub fn from_argb(argb: i32) -> RGBA8 {
    let v = argb as u32;
    RGBA8::new((v >> 16) as u8, (v >> 8) as u8, v as u8, (v >> 24) as u8)
}

/// Serde adapter storing colors as packed ARGB integers.
pub(crate) mod argb {
    use rgb::RGBA8;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &RGBA8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(super::to_argb(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RGBA8, D::Error> {
        i32::deserialize(deserializer).map(super::from_argb)
    }
}
