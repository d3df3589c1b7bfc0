use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees.
///
/// Field order follows the map convention (latitude first). Use the `From`
/// conversions to move between this type and `geo::Point<f64>`, which stores
/// longitude as `x` and latitude as `y`.
///
/// # Examples
///
/// ```
/// use geocluster_types::point::Coordinate;
///
/// let point = Coordinate::new(42.0, -83.0);
/// assert!(point.is_finite());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (typically -90 to 90)
    pub lat: f64,
    /// Longitude in degrees (typically -180 to 180)
    pub lon: f64,
}

impl Coordinate {
    /// Create a new coordinate from latitude and longitude.
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true if both components are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// The coordinate as a `[lat, lon]` array, the layout used for R*-tree indexing.
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

impl From<geo::Point<f64>> for Coordinate {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(coord: Coordinate) -> Self {
        geo::Point::new(coord.lon, coord.lat)
    }
}

impl From<(f64, f64)> for Coordinate {
    /// Interprets the tuple as `(lat, lon)`.
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

/// A point in screen space, in pixels, relative to the viewport's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const ORIGIN: ScreenPoint = ScreenPoint { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Anything that exposes a latitude/longitude pair can be clustered.
///
/// Identity and equality stay with the implementing type; the clustering
/// pipeline only reads coordinates.
///
/// # Examples
///
/// ```
/// use geocluster_types::point::{Clusterable, Coordinate};
///
/// struct Store {
///     name: &'static str,
///     location: Coordinate,
/// }
///
/// impl Clusterable for Store {
///     fn coordinate(&self) -> Coordinate {
///         self.location
///     }
/// }
///
/// let store = Store { name: "downtown", location: Coordinate::new(42.33, -83.05) };
/// assert_eq!(store.coordinate().lon, -83.05);
/// ```
pub trait Clusterable {
    fn coordinate(&self) -> Coordinate;
}

impl Clusterable for Coordinate {
    #[inline]
    fn coordinate(&self) -> Coordinate {
        *self
    }
}

impl Clusterable for geo::Point<f64> {
    #[inline]
    fn coordinate(&self) -> Coordinate {
        Coordinate::from(*self)
    }
}

impl<T: Clusterable + ?Sized> Clusterable for &T {
    #[inline]
    fn coordinate(&self) -> Coordinate {
        (**self).coordinate()
    }
}

impl<T: Clusterable + ?Sized> Clusterable for std::sync::Arc<T> {
    #[inline]
    fn coordinate(&self) -> Coordinate {
        (**self).coordinate()
    }
}
