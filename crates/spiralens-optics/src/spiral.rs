//! Winding-number resolution and analytic phase gradients for the three spiral families.
//!
//! Each family defines an implicit curve `r = S(phi)` over the unwrapped angle
//! `phi = psi + 2*pi*n`. Resolving the integer winding number `n` picks the spiral arm passing
//! through a point, and the transverse phase gradient is the extra transverse ray-direction
//! component imparted there. The gradient closed forms originate from symbolic differentiation
//! of scalar phase profiles (quoted on each form); they are exact local slopes, not finite
//! differences.

use glam::Vec2;
use std::f32::consts::TAU;

use spiralens_math::sqr;

/// Radii below this (squared) are treated as the spiral-centre singularity.
const R2_MIN: f32 = 1e-12;
/// Denominator magnitudes below this reject the interaction instead of dividing.
const DENOM_MIN: f32 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpiralType {
    /// `r = exp(b * phi)`
    #[default]
    Logarithmic,
    /// `r = b * phi`
    Archimedean,
    /// `r = -1 / (b * phi)`; winding resolution degrades for small `b`
    Hyperbolic,
}

impl SpiralType {
    /// Radius of the spiral at unwrapped angle `phi`.
    pub fn radius_at(self, phi: f32, b: f32) -> Option<f32> {
        match self {
            Self::Logarithmic => Some((b * phi).exp()),
            Self::Archimedean => Some(b * phi),
            Self::Hyperbolic => {
                let denom = b * phi;
                (denom.abs() >= DENOM_MIN).then(|| -1.0 / denom)
            }
        }
    }

    /// Unwrapped angle `S^-1(r)` of the spiral arm at radius `r > 0`.
    pub fn unwrapped_angle(self, r: f32, b: f32) -> f32 {
        match self {
            Self::Logarithmic => r.ln() / b,
            Self::Archimedean => r / b,
            Self::Hyperbolic => -1.0 / (b * r),
        }
    }

    /// Winding number of the arm through `(r, psi)`: the integer `n` minimising
    /// `|S^-1(r) - (psi + 2*pi*n)|`, so the unwrapped angle stays continuous as a point
    /// crosses between adjacent windings.
    pub fn winding_number(self, r: f32, psi: f32, b: f32) -> f32 {
        ((self.unwrapped_angle(r, b) - psi) / TAU).round()
    }
}

/// Per-component focusing mode of the spiral profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusingMode {
    /// Constant surface slope across windings.
    #[default]
    Plain,
    /// "Alvarez" winding focusing: constant effective local focal power across windings.
    WindingCompensated,
    /// Component separation derived from the rotation angle; the surface profile itself is
    /// plain. Only meaningful for the logarithmic family with non-negative rotation.
    SeparationBased,
}

impl FocusingMode {
    /// Whether the winding-compensated gradient forms apply. The hyperbolic family has no
    /// compensated variant and falls back to the plain forms.
    pub fn winding_compensated(self, spiral_type: SpiralType) -> bool {
        self == Self::WindingCompensated && spiral_type != SpiralType::Hyperbolic
    }
}

/// Everything the gradient closed forms need about the local spiral geometry.
#[derive(Debug, Clone, Copy)]
pub struct ArmPoint {
    pub r: f32,
    pub r2: f32,
    /// Unwrapped angle `psi + 2*pi*n` of the arm through the point.
    pub phi: f32,
    /// Arm radius `S(phi)` at that angle.
    pub r_n: f32,
}

impl ArmPoint {
    /// Resolve the winding of the arm through `p`. `None` at the spiral-centre singularity or
    /// where the family's formulas degenerate.
    pub fn resolve(spiral_type: SpiralType, p: Vec2, b: f32) -> Option<Self> {
        if b.abs() < DENOM_MIN {
            return None;
        }
        let r2 = p.length_squared();
        if r2 < R2_MIN {
            return None;
        }
        let r = r2.sqrt();
        let psi = p.y.atan2(p.x);
        let n = spiral_type.winding_number(r, psi, b);
        let phi = psi + TAU * n;
        let r_n = spiral_type.radius_at(phi, b)?;
        Some(Self { r, r2, phi, r_n })
    }
}

/// Transverse phase gradient `(dPhi/dx, dPhi/dy)` of a spiral component at local point `p`,
/// already scaled by `1/f1`. `None` rejects the interaction near a numeric degeneracy; the
/// caller passes the ray through undeflected.
pub fn phase_gradient(
    spiral_type: SpiralType,
    mode: FocusingMode,
    p: Vec2,
    b: f32,
    f1: f32,
    azimuthal_correction: bool,
) -> Option<Vec2> {
    if f1.abs() < DENOM_MIN {
        return None;
    }
    let arm = ArmPoint::resolve(spiral_type, p, b)?;

    let mut gradient = if mode.winding_compensated(spiral_type) {
        match spiral_type {
            SpiralType::Logarithmic => logarithmic_compensated(p, &arm, b, f1)?,
            SpiralType::Archimedean => archimedean_compensated(p, &arm, b, f1),
            SpiralType::Hyperbolic => unreachable!(),
        }
    } else {
        match spiral_type {
            SpiralType::Logarithmic => logarithmic_plain(p, &arm, b, f1),
            SpiralType::Archimedean => archimedean_plain(p, &arm, b, f1),
            SpiralType::Hyperbolic => hyperbolic_plain(p, &arm, b, f1),
        }
    };

    if azimuthal_correction {
        gradient += azimuthal_correction_term(spiral_type, p, &arm, b, f1);
    }

    gradient.is_finite().then_some(gradient)
}

/// Plain logarithmic gradient; local focal length is the constant `f1`.
fn logarithmic_plain(p: Vec2, arm: &ArmPoint, b: f32, f1: f32) -> Vec2 {
    let delta = arm.r - arm.r_n;
    Vec2::new(
        -((b * arm.r_n * p.y) / arm.r2 + p.x / arm.r) * delta / f1,
        -((-b * arm.r_n * p.x) / arm.r2 + p.y / arm.r) * delta / f1,
    )
}

/// Winding-compensated logarithmic gradient, from the Mathematica derivation of the phase
/// profile `-(r - r_n)^2 (r + 2 r_n) / (6 f1 r_n)`.
fn logarithmic_compensated(p: Vec2, arm: &ArmPoint, b: f32, f1: f32) -> Option<Vec2> {
    let (r, r2, r_n) = (arm.r, arm.r2, arm.r_n);
    if (r_n * r2).abs() < DENOM_MIN {
        return None;
    }
    let r_n2 = sqr(r_n);
    let r_n3 = r_n2 * r_n;
    Some(Vec2::new(
        (-r * r2 * (3.0 * p.x + b * p.y) + 3.0 * r * r_n2 * (p.x - b * p.y)
            + 4.0 * b * p.y * r_n3)
            / (6.0 * r_n * f1 * r2),
        (r * r2 * (b * p.x - 3.0 * p.y)
            + 3.0 * r * r_n2 * (b * p.x + p.y)
            - 4.0 * b * p.x * r_n3)
            / (6.0 * f1 * r2 * r_n),
    ))
}

/// Plain Archimedean gradient; the local focal length is `f1 / r_n` (referenced at `r = 1`).
fn archimedean_plain(p: Vec2, arm: &ArmPoint, b: f32, f1: f32) -> Vec2 {
    let delta = arm.r - arm.r_n;
    Vec2::new(
        -(p.x / arm.r + b * p.y / arm.r2) * delta * arm.r_n / f1,
        -(p.y / arm.r - b * p.x / arm.r2) * delta * arm.r_n / f1,
    )
}

/// Winding-compensated Archimedean gradient, from the phase profile
/// `-(r - r_n)^2 (2 r + r_n) / (6 f1)`.
fn archimedean_compensated(p: Vec2, arm: &ArmPoint, b: f32, f1: f32) -> Vec2 {
    let (r, r2, r_n) = (arm.r, arm.r2, arm.r_n);
    Vec2::new(
        (r_n - r) * (2.0 * r2 * p.x + b * (r_n + r) * p.y) / (2.0 * f1 * r2),
        (r_n - r) * (2.0 * r2 * p.y - b * (r_n + r) * p.x) / (2.0 * f1 * r2),
    )
}

/// Hyperbolic gradient; the local focal length is `f1 / phi` (referenced at `phi = 1`). Exact
/// gradient of the phase profile `-(r - r_n)^2 phi / (2 f1)`.
fn hyperbolic_plain(p: Vec2, arm: &ArmPoint, b: f32, f1: f32) -> Vec2 {
    let (r, r2, phi, r_n) = (arm.r, arm.r2, arm.phi, arm.r_n);
    let delta = r - r_n;
    let r_n2 = sqr(r_n);
    Vec2::new(
        (p.y * sqr(delta) / (2.0 * r2) - phi * delta * (p.x / r + b * p.y * r_n2 / r2)) / f1,
        -(p.x * sqr(delta) / (2.0 * r2) + phi * delta * (p.y / r - b * p.x * r_n2 / r2)) / f1,
    )
}

/// Counter-term cancelling the first-order azimuthal component of the plain gradient, the
/// residual azimuthal phase error introduced by truncating the spiral at finite `b`.
fn azimuthal_correction_term(
    spiral_type: SpiralType,
    p: Vec2,
    arm: &ArmPoint,
    b: f32,
    f1: f32,
) -> Vec2 {
    let (r, r2, r_n) = (arm.r, arm.r2, arm.r_n);
    let delta = r - r_n;
    match spiral_type {
        // cancels the b-proportional cross term; the deflection becomes purely radial
        SpiralType::Logarithmic | SpiralType::Archimedean => Vec2::new(
            b * r_n * p.y * delta / (f1 * r2),
            -b * r_n * p.x * delta / (f1 * r2),
        ),
        SpiralType::Hyperbolic => {
            let phi = arm.phi;
            let r_n2 = sqr(r_n);
            Vec2::new(
                (-p.y * sqr(delta) / (2.0 * r2) + phi * delta * b * p.y * r_n2 / r2) / f1,
                (p.x * sqr(delta) / (2.0 * r2) - phi * delta * b * p.x * r_n2 / r2) / f1,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    const FAMILIES: [SpiralType; 3] = [
        SpiralType::Logarithmic,
        SpiralType::Archimedean,
        SpiralType::Hyperbolic,
    ];

    fn winding_residual(ty: SpiralType, r: f32, psi: f32, b: f32, n: f32) -> f32 {
        (ty.unwrapped_angle(r, b) - (psi + TAU * n)).abs()
    }

    #[test]
    fn winding_number_minimises_residual() {
        let b = 0.02;
        for ty in FAMILIES {
            for r in [0.05_f32, 0.3, 1.0, 2.5, 4.9] {
                for k in 0..16 {
                    let psi = -std::f32::consts::PI + (k as f32 + 0.5) * TAU / 16.0;
                    let n = ty.winding_number(r, psi, b);
                    let best = winding_residual(ty, r, psi, b, n);
                    assert!(
                        best <= winding_residual(ty, r, psi, b, n - 1.0) + 1e-3,
                        "{ty:?} r={r} psi={psi}: n-1 beats n"
                    );
                    assert!(
                        best <= winding_residual(ty, r, psi, b, n + 1.0) + 1e-3,
                        "{ty:?} r={r} psi={psi}: n+1 beats n"
                    );
                }
            }
        }
    }

    #[test]
    fn unwrapped_angle_lies_on_arm() {
        let b = 0.05;
        for ty in FAMILIES {
            for r in [0.2_f32, 0.9, 3.0] {
                let phi = ty.unwrapped_angle(r, b);
                let back = ty.radius_at(phi, b).unwrap();
                assert!((back - r).abs() < 1e-4 * r.max(1.0), "{ty:?}: {back} vs {r}");
            }
        }
    }

    fn arm_f64(ty: SpiralType, p: DVec2, b: f64) -> (f64, f64) {
        let r = p.length();
        let psi = p.y.atan2(p.x);
        let unwrapped = match ty {
            SpiralType::Logarithmic => r.ln() / b,
            SpiralType::Archimedean => r / b,
            SpiralType::Hyperbolic => -1.0 / (b * r),
        };
        let phi = psi + std::f64::consts::TAU * ((unwrapped - psi) / std::f64::consts::TAU).round();
        let r_n = match ty {
            SpiralType::Logarithmic => (b * phi).exp(),
            SpiralType::Archimedean => b * phi,
            SpiralType::Hyperbolic => -1.0 / (b * phi),
        };
        (phi, r_n)
    }

    /// Scalar phase whose exact gradient the closed forms implement, in f64 so the centred
    /// difference resolves well below the assertion tolerance. The plain Archimedean slope
    /// field is not conservative (its `f1 / r_n` local focal length is treated as locally
    /// constant), so its profile takes the slope factor frozen at `r_n_ref`.
    fn phase_profile_f64(
        ty: SpiralType,
        mode: FocusingMode,
        p: DVec2,
        b: f64,
        f1: f64,
        r_n_ref: f64,
    ) -> f64 {
        let r = p.length();
        let (phi, r_n) = arm_f64(ty, p, b);
        let delta = r - r_n;
        if mode.winding_compensated(ty) {
            match ty {
                SpiralType::Logarithmic => -delta * delta * (r + 2.0 * r_n) / (6.0 * f1 * r_n),
                SpiralType::Archimedean => -delta * delta * (2.0 * r + r_n) / (6.0 * f1),
                SpiralType::Hyperbolic => unreachable!(),
            }
        } else {
            match ty {
                SpiralType::Logarithmic => -delta * delta / (2.0 * f1),
                SpiralType::Archimedean => -delta * delta * r_n_ref / (2.0 * f1),
                SpiralType::Hyperbolic => -delta * delta * phi / (2.0 * f1),
            }
        }
    }

    /// Centred finite difference of the scalar phase profile, slope factor frozen at `p`.
    fn fd_gradient(ty: SpiralType, mode: FocusingMode, p: Vec2, b: f32, f1: f32) -> DVec2 {
        let p = DVec2::new(p.x as f64, p.y as f64);
        let (b, f1) = (b as f64, f1 as f64);
        let (_, r_n_ref) = arm_f64(ty, p, b);
        let h = 1e-6;
        let phase = |q: DVec2| phase_profile_f64(ty, mode, q, b, f1, r_n_ref);
        DVec2::new(
            (phase(p + DVec2::new(h, 0.0)) - phase(p - DVec2::new(h, 0.0))) / (2.0 * h),
            (phase(p + DVec2::new(0.0, h)) - phase(p - DVec2::new(0.0, h))) / (2.0 * h),
        )
    }

    #[test]
    fn analytic_gradient_matches_finite_difference() {
        let b = 0.05;
        let f1 = 0.25;
        // points chosen away from arm boundaries and the centre singularity
        let points = [
            Vec2::new(0.83, 0.41),
            Vec2::new(-0.57, 0.92),
            Vec2::new(1.31, -0.22),
            Vec2::new(-0.33, -1.05),
        ];
        for ty in FAMILIES {
            for mode in [FocusingMode::Plain, FocusingMode::WindingCompensated] {
                for p in points {
                    let g = phase_gradient(ty, mode, p, b, f1, false).unwrap();
                    let analytic = DVec2::new(g.x as f64, g.y as f64);
                    let numeric = fd_gradient(ty, mode, p, b, f1);
                    let scale = analytic.length().max(1e-3);
                    assert!(
                        (analytic - numeric).length() / scale < 1e-4,
                        "{ty:?} {mode:?} at {p}: analytic {analytic} vs fd {numeric}"
                    );
                }
            }
        }
    }

    #[test]
    fn azimuthal_correction_leaves_radial_deflection() {
        let b = 0.03;
        let f1 = 0.5;
        for ty in [SpiralType::Logarithmic, SpiralType::Archimedean] {
            for p in [Vec2::new(0.9, 0.35), Vec2::new(-1.2, 0.8)] {
                let g = phase_gradient(ty, FocusingMode::Plain, p, b, f1, true).unwrap();
                let azimuthal = Vec2::new(-p.y, p.x).normalize();
                assert!(
                    g.dot(azimuthal).abs() < 1e-5 * g.length().max(1e-3),
                    "{ty:?} at {p}: residual azimuthal deflection {g:?}"
                );
            }
        }
    }

    #[test]
    fn centre_singularity_is_rejected() {
        for ty in FAMILIES {
            assert!(phase_gradient(ty, FocusingMode::Plain, Vec2::ZERO, 0.02, 0.1, false)
                .is_none());
        }
        // zero winding parameter and zero focal scale are degenerate, not panics
        assert!(phase_gradient(
            SpiralType::Logarithmic,
            FocusingMode::Plain,
            Vec2::ONE,
            0.0,
            0.1,
            false
        )
        .is_none());
        assert!(phase_gradient(
            SpiralType::Logarithmic,
            FocusingMode::Plain,
            Vec2::ONE,
            0.02,
            0.0,
            false
        )
        .is_none());
    }

    #[test]
    fn gradient_is_continuous_across_winding_boundary() {
        // crossing psi = pi flips the principal angle; the resolved arm must not jump
        let b = 0.02;
        let f1 = 0.2;
        let r = 1.4;
        let below = Vec2::from_angle(std::f32::consts::PI - 1e-3) * r;
        let above = Vec2::from_angle(-std::f32::consts::PI + 1e-3) * r;
        for ty in FAMILIES {
            let g0 = phase_gradient(ty, FocusingMode::Plain, below, b, f1, false).unwrap();
            let g1 = phase_gradient(ty, FocusingMode::Plain, above, b, f1, false).unwrap();
            assert!(
                (g0 - g1).length() < 1e-2 * g0.length().max(1e-3),
                "{ty:?}: gradient jump across the branch cut: {g0} vs {g1}"
            );
        }
    }
}
