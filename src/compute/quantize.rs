//! Fixed-precision coordinate keys.
//!
//! Cluster engines hand back coordinate values, not input positions. Values can
//! come back with different bits than they went in with, so lookups go through
//! a rounded integer key instead of the raw floats.

use geocluster_types::point::{Clusterable, Coordinate};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Positions of every item that rounds to one key. Almost always a single entry.
pub type Positions = SmallVec<[usize; 1]>;

/// Latitude and longitude scaled by a precision factor and rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey {
    pub lat: i64,
    pub lon: i64,
}

impl PointKey {
    /// Derive the key for `coord` at `precision` (e.g. `1e6` for microdegrees).
    ///
    /// Non-finite components saturate the way `as i64` casts do, so NaN maps to
    /// zero; callers that care must reject such coordinates earlier.
    #[inline]
    pub fn new(coord: &Coordinate, precision: f64) -> Self {
        Self {
            lat: (coord.lat * precision).round() as i64,
            lon: (coord.lon * precision).round() as i64,
        }
    }
}

/// Output of quantization: the engine's input points plus the reverse lookup.
#[derive(Debug, Clone)]
pub struct QuantizedPoints {
    /// Point `i` is the coordinate of item `i`.
    points: Vec<Coordinate>,
    index: FxHashMap<PointKey, Positions>,
    precision: f64,
}

impl QuantizedPoints {
    /// Quantize every item. Nothing is dropped, duplicates share a bucket.
    pub fn build<T: Clusterable>(items: &[T], precision: f64) -> Self {
        let mut points = Vec::with_capacity(items.len());
        let mut index: FxHashMap<PointKey, Positions> = FxHashMap::default();
        index.reserve(items.len());

        for (position, item) in items.iter().enumerate() {
            let coord = item.coordinate();
            index
                .entry(PointKey::new(&coord, precision))
                .or_default()
                .push(position);
            points.push(coord);
        }

        Self {
            points,
            index,
            precision,
        }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.index.len()
    }

    /// Key for `coord` at this set's precision.
    #[inline]
    pub fn key_for(&self, coord: &Coordinate) -> PointKey {
        PointKey::new(coord, self.precision)
    }

    /// Positions of the items whose key equals the key of `coord`.
    pub fn lookup(&self, coord: &Coordinate) -> Option<&Positions> {
        self.index.get(&self.key_for(coord))
    }

    pub fn get(&self, key: &PointKey) -> Option<&Positions> {
        self.index.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_rounds_to_precision() {
        let key = PointKey::new(&Coordinate::new(42.0000004, -83.0000006), 1e6);
        assert_eq!(key, PointKey { lat: 42_000_000, lon: -83_000_001 });
    }

    #[test]
    fn test_nearby_floats_share_key() {
        let a = Coordinate::new(42.123456, -83.654321);
        let b = Coordinate::new(42.123456 + 1e-12, -83.654321 - 1e-12);
        assert_ne!(a, b);
        assert_eq!(PointKey::new(&a, 1e6), PointKey::new(&b, 1e6));
    }

    #[test]
    fn test_build_keeps_duplicates() {
        let items = vec![
            Coordinate::new(10.0, 20.0),
            Coordinate::new(11.0, 21.0),
            Coordinate::new(10.0, 20.0),
        ];
        let quantized = QuantizedPoints::build(&items, 1e6);

        assert_eq!(quantized.len(), 3);
        assert_eq!(quantized.key_count(), 2);
        assert_eq!(quantized.points(), items.as_slice());

        let bucket = quantized.lookup(&Coordinate::new(10.0, 20.0)).unwrap();
        assert_eq!(bucket.as_slice(), &[0, 2]);
    }

    #[test]
    fn test_lookup_miss() {
        let quantized = QuantizedPoints::build(&[Coordinate::new(1.0, 1.0)], 1e6);
        assert!(quantized.lookup(&Coordinate::new(1.000001, 1.0)).is_none());
        assert!(quantized.lookup(&Coordinate::new(1.0000001, 1.0)).is_some());
    }

    #[test]
    fn test_empty_input() {
        let quantized = QuantizedPoints::build::<Coordinate>(&[], 1e6);
        assert!(quantized.is_empty());
        assert_eq!(quantized.key_count(), 0);
    }
}
