//! Scalar statistical primitives.
//!
//! The rest of the engine only needs two tail probabilities: the standard
//! normal (for z-tests on pooled and loop estimates) and the chi-square
//! (for the global inconsistency test). The normal CDF goes through
//! `libm::erf`; the chi-square survival function goes through the
//! regularized incomplete gamma, evaluated by series expansion or
//! continued fraction depending on the argument region.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Two-sided 95% critical value of the standard normal.
pub const Z_CRITICAL_95: f64 = 1.96;

/// Standard normal CDF: Φ(x) = (1 + erf(x/√2)) / 2.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x * FRAC_1_SQRT_2))
}

/// Two-tailed p-value for a z statistic.
pub fn two_tailed_p_value(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0)
}

/// Chi-square survival function: P(X ≥ x) for X ~ χ²(df).
///
/// `df = 0` has no distribution to test against; by convention the
/// survival probability is 1 (nothing can be rejected).
pub fn chi_square_survival(x: f64, df: usize) -> f64 {
    if df == 0 || x <= 0.0 {
        return 1.0;
    }
    regularized_gamma_q(df as f64 / 2.0, x / 2.0).clamp(0.0, 1.0)
}

/// ln(Γ(x)) via recurrence shift into the region where the Stirling
/// series converges quickly.
fn ln_gamma(x: f64) -> f64 {
    if x <= 0.0 {
        return f64::INFINITY;
    }

    let mut x = x;
    let mut result = 0.0;
    while x < 10.0 {
        result -= x.ln();
        x += 1.0;
    }

    let inv_x = 1.0 / x;
    let inv_x2 = inv_x * inv_x;
    let correction = inv_x * (1.0 / 12.0 - inv_x2 * (1.0 / 360.0 - inv_x2 / 1260.0));

    result + (x - 0.5) * x.ln() - x + 0.5 * (2.0 * PI).ln() + correction
}

const GAMMA_EPS: f64 = 1e-14;
const GAMMA_MAX_ITER: usize = 500;

/// Regularized upper incomplete gamma Q(a, x) = Γ(a, x)/Γ(a).
fn regularized_gamma_q(a: f64, x: f64) -> f64 {
    if x < a + 1.0 {
        1.0 - gamma_p_series(a, x)
    } else {
        gamma_q_continued_fraction(a, x)
    }
}

/// Series expansion for P(a, x), convergent for x < a + 1.
fn gamma_p_series(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let mut term = 1.0 / a;
    let mut sum = term;
    let mut denom = a;
    for _ in 0..GAMMA_MAX_ITER {
        denom += 1.0;
        term *= x / denom;
        sum += term;
        if term.abs() < sum.abs() * GAMMA_EPS {
            break;
        }
    }
    sum * (-x + a * x.ln() - ln_gamma(a)).exp()
}

/// Modified Lentz continued fraction for Q(a, x), convergent for
/// x ≥ a + 1.
fn gamma_q_continued_fraction(a: f64, x: f64) -> f64 {
    const TINY: f64 = 1e-300;

    let mut b = x + 1.0 - a;
    let mut c = 1.0 / TINY;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=GAMMA_MAX_ITER {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < TINY {
            d = TINY;
        }
        c = b + an / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < GAMMA_EPS {
            break;
        }
    }
    h * (-x + a * x.ln() - ln_gamma(a)).exp()
}
