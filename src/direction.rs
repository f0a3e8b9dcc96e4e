//! 8-point compass direction classification

use crate::math::wrap_to_0_360;

/// One of the 8 principal compass points
///
/// Produced by [`CompassDirection::from_azimuth`], which is total over
/// normalized headings: every azimuth in [0, 360) maps to exactly one
/// label, never to an "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompassDirection {
    /// [337.5, 360) ∪ [0, 22.5)
    North,
    /// [22.5, 67.5)
    NorthEast,
    /// [67.5, 112.5)
    East,
    /// [112.5, 157.5)
    SouthEast,
    /// [157.5, 202.5)
    South,
    /// [202.5, 247.5)
    SouthWest,
    /// [247.5, 292.5)
    West,
    /// [292.5, 337.5)
    NorthWest,
}

impl CompassDirection {
    /// Classify a heading into its 45°-wide compass sector
    ///
    /// The sectors are half-open (lower bound inclusive, upper bound
    /// exclusive), so exact multiples of 22.5° belong to exactly one
    /// sector: 22.5° is NorthEast, 337.5° is North. Closed-interval range
    /// checks would cover those boundaries twice.
    ///
    /// Inputs outside [0, 360) are wrapped first, making the function
    /// total over all finite headings.
    ///
    /// # Example
    /// ```
    /// use tilt_compass::CompassDirection;
    ///
    /// assert_eq!(CompassDirection::from_azimuth(0.0), CompassDirection::North);
    /// assert_eq!(CompassDirection::from_azimuth(22.5), CompassDirection::NorthEast);
    /// assert_eq!(CompassDirection::from_azimuth(359.9), CompassDirection::North);
    /// ```
    pub fn from_azimuth(azimuth_deg: f32) -> Self {
        debug_assert!(azimuth_deg.is_finite());
        let azimuth = wrap_to_0_360(azimuth_deg);

        match azimuth {
            a if a < 22.5 => Self::North,
            a if a < 67.5 => Self::NorthEast,
            a if a < 112.5 => Self::East,
            a if a < 157.5 => Self::SouthEast,
            a if a < 202.5 => Self::South,
            a if a < 247.5 => Self::SouthWest,
            a if a < 292.5 => Self::West,
            a if a < 337.5 => Self::NorthWest,
            _ => Self::North,
        }
    }

    /// Short label for display ("N", "NE", ...)
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
        }
    }

    /// Heading of the sector center in degrees
    pub fn center_deg(&self) -> f32 {
        match self {
            Self::North => 0.0,
            Self::NorthEast => 45.0,
            Self::East => 90.0,
            Self::SouthEast => 135.0,
            Self::South => 180.0,
            Self::SouthWest => 225.0,
            Self::West => 270.0,
            Self::NorthWest => 315.0,
        }
    }
}

impl core::fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.abbreviation())
    }
}
