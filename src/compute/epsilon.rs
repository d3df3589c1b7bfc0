//! Clustering radius from on-screen marker spacing.

use crate::error::{ClusterError, Result};
use geocluster_types::point::{Coordinate, ScreenPoint};

/// Screen-to-geographic conversion under the current zoom, pan and projection.
///
/// Supplied by the rendering layer. Returns `None` while the map cannot answer,
/// e.g. before its first layout pass.
pub trait Viewport {
    fn to_geographic(&self, point: ScreenPoint) -> Option<Coordinate>;
}

impl<F> Viewport for F
where
    F: Fn(ScreenPoint) -> Option<Coordinate>,
{
    #[inline]
    fn to_geographic(&self, point: ScreenPoint) -> Option<Coordinate> {
        self(point)
    }
}

/// Convert a horizontal pixel distance into a radius in degrees.
///
/// Samples the screen origin and a point `pixels` to its right and returns the
/// absolute longitude difference. Latitude distortion and vertical spacing are
/// ignored; the result is a single scalar usable directly as a cluster engine
/// epsilon.
///
/// # Examples
///
/// ```
/// use geocluster::compute::epsilon::derive_epsilon;
/// use geocluster::{Coordinate, ScreenPoint};
///
/// // 0.001 degrees of longitude per pixel
/// let viewport = |p: ScreenPoint| Some(Coordinate::new(42.0 - p.y * 0.001, -83.0 + p.x * 0.001));
/// let epsilon = derive_epsilon(&viewport, 10.0).unwrap();
/// assert!((epsilon - 0.01).abs() < 1e-12);
/// ```
pub fn derive_epsilon<V: Viewport + ?Sized>(viewport: &V, pixels: f64) -> Result<f64> {
    if !pixels.is_finite() || pixels <= 0.0 {
        return Err(ClusterError::InvalidInput(format!(
            "pixel spacing must be a positive finite number, got {}",
            pixels
        )));
    }

    let origin = viewport
        .to_geographic(ScreenPoint::ORIGIN)
        .ok_or(ClusterError::EpsilonUnavailable)?;
    let offset = viewport
        .to_geographic(ScreenPoint::new(pixels, 0.0))
        .ok_or(ClusterError::EpsilonUnavailable)?;

    let epsilon = (offset.lon - origin.lon).abs();
    if !epsilon.is_finite() {
        return Err(ClusterError::EpsilonUnavailable);
    }

    Ok(epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LinearViewport {
        degrees_per_pixel: f64,
    }

    impl Viewport for LinearViewport {
        fn to_geographic(&self, point: ScreenPoint) -> Option<Coordinate> {
            Some(Coordinate::new(
                10.0 - point.y * self.degrees_per_pixel,
                20.0 + point.x * self.degrees_per_pixel,
            ))
        }
    }

    #[test]
    fn test_epsilon_scales_with_zoom() {
        let zoomed_out = LinearViewport {
            degrees_per_pixel: 0.01,
        };
        let zoomed_in = LinearViewport {
            degrees_per_pixel: 0.0001,
        };

        let wide = derive_epsilon(&zoomed_out, 40.0).unwrap();
        let narrow = derive_epsilon(&zoomed_in, 40.0).unwrap();
        assert!((wide - 0.4).abs() < 1e-12);
        assert!((narrow - 0.004).abs() < 1e-12);
    }

    #[test]
    fn test_epsilon_is_absolute() {
        // Longitude decreasing to the right (mirrored projection).
        let mirrored = |p: ScreenPoint| Some(Coordinate::new(0.0, 5.0 - p.x * 0.5));
        assert_eq!(derive_epsilon(&mirrored, 2.0).unwrap(), 1.0);
    }

    #[test]
    fn test_unavailable_viewport() {
        let not_laid_out = |_: ScreenPoint| -> Option<Coordinate> { None };
        assert!(matches!(
            derive_epsilon(&not_laid_out, 30.0),
            Err(ClusterError::EpsilonUnavailable)
        ));

        // Origin resolves but the offset point does not.
        let partial = |p: ScreenPoint| (p.x == 0.0).then(|| Coordinate::new(0.0, 0.0));
        assert!(matches!(
            derive_epsilon(&partial, 30.0),
            Err(ClusterError::EpsilonUnavailable)
        ));
    }

    #[test]
    fn test_invalid_pixel_spacing() {
        let viewport = LinearViewport {
            degrees_per_pixel: 0.01,
        };
        for pixels in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                derive_epsilon(&viewport, pixels),
                Err(ClusterError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_non_finite_projection() {
        let broken = |p: ScreenPoint| {
            let lon = if p.x == 0.0 { 0.0 } else { f64::NAN };
            Some(Coordinate::new(0.0, lon))
        };
        assert!(matches!(
            derive_epsilon(&broken, 10.0),
            Err(ClusterError::EpsilonUnavailable)
        ));
    }
}
