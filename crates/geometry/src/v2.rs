//! A 2-dimensional vector/point.
use num::Num;

#[derive(Debug, Copy, Clone, Eq, Ord, PartialEq, PartialOrd, Hash, Default)]
pub struct V2<T> {
    pub x: T,
    pub y: T,
}

impl<T: Num> V2<T> {
    pub fn new(x: T, y: T) -> Self {
        V2 { x, y }
    }
}

impl<T: Num + Copy + PartialOrd> V2<T> {
    /// Component-wise minimum.
    pub fn min(self, other: V2<T>) -> V2<T> {
        V2 {
            x: if other.x < self.x { other.x } else { self.x },
            y: if other.y < self.y { other.y } else { self.y },
        }
    }

    /// Component-wise maximum.
    pub fn max(self, other: V2<T>) -> V2<T> {
        V2 {
            x: if other.x > self.x { other.x } else { self.x },
            y: if other.y > self.y { other.y } else { self.y },
        }
    }
}

impl V2<f64> {
    #[must_use = "This function doesn't modify the vector in place"]
    pub fn floor(self) -> V2<f64> {
        V2 {
            x: self.x.floor(),
            y: self.y.floor(),
        }
    }
}

impl<T: Num> std::ops::Add for V2<T> {
    type Output = V2<T>;

    fn add(self, rhs: V2<T>) -> V2<T> {
        V2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T: Copy> std::ops::Mul<f64> for V2<T>
where
    f64: From<T>,
{
    type Output = V2<f64>;

    fn mul(self, rhs: f64) -> Self::Output {
        V2 {
            x: f64::from(self.x) * rhs,
            y: f64::from(self.y) * rhs,
        }
    }
}

impl<T: Num> std::ops::Sub for V2<T> {
    type Output = V2<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        V2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}
