//! Statistical tests used by the built-in comparator.
//!
//! Both tests return `(statistic, p_value)`. Inputs are assumed non-empty
//! and finite; the comparator checks that before calling in.

use std::collections::{BTreeMap, HashMap};

const MAX_ITERATIONS: usize = 200;
const EPSILON: f64 = 3.0e-12;
const FP_MIN: f64 = 1.0e-300;

/// Two-sample Kolmogorov-Smirnov test.
///
/// The statistic is the largest distance between the two empirical CDFs;
/// the p-value uses the asymptotic Kolmogorov distribution with the
/// Stephens small-sample correction.
pub fn ks_two_sample(sample: &[f64], reference: &[f64]) -> (f64, f64) {
    let mut a = sample.to_vec();
    let mut b = reference.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let (n, m) = (a.len(), b.len());
    let (mut i, mut j) = (0, 0);
    let mut d: f64 = 0.0;
    while i < n && j < m {
        let x = a[i].min(b[j]);
        while i < n && a[i] <= x {
            i += 1;
        }
        while j < m && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n as f64 - j as f64 / m as f64).abs());
    }

    let en = ((n * m) as f64 / (n + m) as f64).sqrt();
    let lambda = (en + 0.12 + 0.11 / en) * d;
    (d, kolmogorov_survival(lambda))
}

/// `Q_KS(lambda) = 2 * sum_{j>=1} (-1)^(j-1) exp(-2 j^2 lambda^2)`.
fn kolmogorov_survival(lambda: f64) -> f64 {
    let a2 = -2.0 * lambda * lambda;
    let mut fac = 2.0;
    let mut sum = 0.0;
    let mut previous = 0.0;

    for j in 1..=100 {
        let j = j as f64;
        let term = fac * (a2 * j * j).exp();
        sum += term;
        if term.abs() <= 0.001 * previous || term.abs() <= 1.0e-8 * sum {
            return sum.clamp(0.0, 1.0);
        }
        fac = -fac;
        previous = term.abs();
    }

    // The series only fails to converge for lambda near zero.
    1.0
}

/// Pearson chi-square goodness-of-fit test of observed labels against
/// reference frequencies.
///
/// Observed labels absent from the reference (or with zero reference
/// frequency) make the statistic infinite and the p-value zero.
pub fn chi_square_goodness_of_fit(
    observed: &[String],
    reference: &BTreeMap<String, f64>,
) -> (f64, f64) {
    let mut counts: HashMap<&str, f64> = HashMap::new();
    for label in observed {
        *counts.entry(label.as_str()).or_insert(0.0) += 1.0;
    }

    let total_reference: f64 = reference.values().sum();
    let n = observed.len() as f64;

    for label in counts.keys() {
        if reference.get(*label).map_or(true, |freq| *freq <= 0.0) {
            return (f64::INFINITY, 0.0);
        }
    }

    let mut statistic = 0.0;
    let mut categories = 0usize;
    for (label, freq) in reference {
        if *freq <= 0.0 {
            continue;
        }
        let expected = freq / total_reference * n;
        let actual = counts.get(label.as_str()).copied().unwrap_or(0.0);
        statistic += (actual - expected).powi(2) / expected;
        categories += 1;
    }

    if categories <= 1 {
        return (statistic, 1.0);
    }
    let degrees_of_freedom = (categories - 1) as f64;
    (
        statistic,
        regularized_gamma_q(degrees_of_freedom / 2.0, statistic / 2.0),
    )
}

/// Natural log of the gamma function (Lanczos approximation).
fn ln_gamma(x: f64) -> f64 {
    const COEFFICIENTS: [f64; 6] = [
        76.180_091_729_471_46,
        -86.505_320_329_416_77,
        24.014_098_240_830_91,
        -1.231_739_572_450_155,
        0.001_208_650_973_866_179,
        -0.000_005_395_239_384_953,
    ];

    let mut y = x;
    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut series = 1.000_000_000_190_015;
    for c in COEFFICIENTS {
        y += 1.0;
        series += c / y;
    }
    -tmp + (2.506_628_274_631_000_5 * series / x).ln()
}

/// Regularized upper incomplete gamma function `Q(a, x)`.
fn regularized_gamma_q(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    if x < a + 1.0 {
        (1.0 - gamma_p_series(a, x)).clamp(0.0, 1.0)
    } else {
        gamma_q_continued_fraction(a, x).clamp(0.0, 1.0)
    }
}

fn gamma_p_series(a: f64, x: f64) -> f64 {
    let mut ap = a;
    let mut sum = 1.0 / a;
    let mut delta = sum;
    for _ in 0..MAX_ITERATIONS {
        ap += 1.0;
        delta *= x / ap;
        sum += delta;
        if delta.abs() < sum.abs() * EPSILON {
            break;
        }
    }
    sum * (-x + a * x.ln() - ln_gamma(a)).exp()
}

fn gamma_q_continued_fraction(a: f64, x: f64) -> f64 {
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / FP_MIN;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=MAX_ITERATIONS {
        let i = i as f64;
        let an = -i * (i - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < FP_MIN {
            d = FP_MIN;
        }
        c = b + an / c;
        if c.abs() < FP_MIN {
            c = FP_MIN;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }
    (-x + a * x.ln() - ln_gamma(a)).exp() * h
}
