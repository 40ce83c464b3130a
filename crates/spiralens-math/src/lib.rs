use core::ops::Mul;

pub mod plane;
pub use plane::*;
pub mod random;
pub mod ray;
pub use ray::*;
pub mod sampling;
pub use sampling::*;

pub fn sqr<T: Mul<Output = T> + Clone + Copy>(x: T) -> T {
    x * x
}

pub fn safe_div(x: f32, y: f32) -> f32 {
    if y == 0.0 {
        0.0
    } else {
        x / y
    }
}

pub fn safe_sqrt(x: f32) -> f32 {
    x.max(0.0).sqrt()
}
