//! An axis-aligned bounding box.
use num::traits::Num;

use crate::errors::*;
use crate::*;

/// An axis-aligned bounding box is specified by the minimum corner and a width/height vector.
///
/// Boxes can never be a single point or line.
#[derive(Debug, Copy, Clone, Eq, Ord, PartialEq, PartialOrd)]
pub struct Aabb<T> {
    p1: V2<T>,
    /// width-height
    wh: V2<T>,
}

impl<T: Num + Copy> Aabb<T> {
    pub fn get_p1(&self) -> V2<T> {
        self.p1
    }

    pub fn get_p2(&self) -> V2<T> {
        self.p1 + self.wh
    }

    pub fn get_width(&self) -> T {
        self.wh.x
    }

    pub fn get_height(&self) -> T {
        self.wh.y
    }
}

impl<T: Num + Copy + std::cmp::PartialOrd> Aabb<T> {
    pub fn from_points(p1: V2<T>, p2: V2<T>) -> Result<Aabb<T>> {
        // Written so that NaN fails the check.
        if !(p1.x < p2.x && p1.y < p2.y) {
            return Err(AabbError::AabbInvalidDims);
        }

        let wh = p2 - p1;
        Ok(Aabb { p1, wh })
    }

    /// The overlapping region of two boxes, if it has any area.
    pub fn intersection(&self, other: &Aabb<T>) -> Option<Aabb<T>> {
        let p1 = self.p1.max(other.p1);
        let p2 = self.get_p2().min(other.get_p2());
        Self::from_points(p1, p2).ok()
    }
}

impl<T: Num + Copy> Aabb<T>
where
    f64: From<T>,
{
    pub fn get_half_width(&self) -> f64 {
        f64::from(self.get_width()) / 2.0
    }

    pub fn get_half_height(&self) -> f64 {
        f64::from(self.get_height()) / 2.0
    }

    pub fn get_center(&self) -> V2<f64> {
        V2 {
            x: f64::from(self.p1.x) + self.get_half_width(),
            y: f64::from(self.p1.y) + self.get_half_height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_basic() -> crate::Result<()> {
        let b = Aabb::from_points(V2::new(1.0, 1.0), V2::new(3.0, 5.0))?;
        approx::assert_relative_eq!(b.get_width(), 2.0);
        approx::assert_relative_eq!(b.get_height(), 4.0);
        approx::assert_relative_eq!(b.get_half_width(), 1.0);
        approx::assert_relative_eq!(b.get_half_height(), 2.0);
        approx::assert_relative_eq!(b.get_center().y, 3.0);
        Ok(())
    }

    #[test]
    fn test_degenerate() {
        assert!(matches!(
            Aabb::from_points(V2::new(1.0, 1.0), V2::new(1.0, 5.0)),
            Err(AabbError::AabbInvalidDims)
        ));
        assert!(matches!(
            Aabb::from_points(V2::new(f64::NAN, 1.0), V2::new(2.0, 5.0)),
            Err(AabbError::AabbInvalidDims)
        ));
    }

    #[test]
    fn test_intersection() -> crate::Result<()> {
        let a = Aabb::from_points(V2::new(0.0, 0.0), V2::new(10.0, 10.0))?;
        let b = Aabb::from_points(V2::new(5.0, -5.0), V2::new(20.0, 5.0))?;
        let i = a.intersection(&b).expect("boxes overlap");
        assert_eq!(i.get_p1(), V2::new(5.0, 0.0));
        assert_eq!(i.get_p2(), V2::new(10.0, 5.0));

        let c = Aabb::from_points(V2::new(10.0, 0.0), V2::new(11.0, 1.0))?;
        assert!(a.intersection(&c).is_none(), "touching edges have no area");
        Ok(())
    }

    proptest! {
        #[test]
        fn test_intersection_symmetric(
            ax in -1000i32..1000,
            ay in -1000i32..1000,
            aw in 1i32..500,
            ah in 1i32..500,
            bx in -1000i32..1000,
            by in -1000i32..1000,
            bw in 1i32..500,
            bh in 1i32..500,
        ) {
            let a = Aabb::from_points(V2::new(ax, ay), V2::new(ax + aw, ay + ah)).unwrap();
            let b = Aabb::from_points(V2::new(bx, by), V2::new(bx + bw, by + bh)).unwrap();
            let i = a.intersection(&b);
            prop_assert_eq!(i, b.intersection(&a));
            if let Some(i) = i {
                prop_assert!(i.get_width() <= aw.min(bw));
                prop_assert_eq!(a.intersection(&i), Some(i));
            }
        }
    }
}
