//! Real polynomials in `s` with ascending coefficients (`coeffs[i]` multiplies `s^i`)

/// Coefficients at or below this fraction of the largest magnitude are treated as zero
const NEGLIGIBLE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    pub fn new(coeffs: Vec<f64>) -> Self {
        let mut poly = Self { coeffs };
        poly.trim();
        poly
    }

    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Degree of the polynomial (0 for the zero polynomial)
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Coefficient of `s^power`, zero beyond the degree
    pub fn coeff(&self, power: usize) -> f64 {
        self.coeffs.get(power).copied().unwrap_or(0.0)
    }

    pub fn add(&self, other: &Self) -> Self {
        let len = self.coeffs.len().max(other.coeffs.len());
        Self::new((0..len).map(|i| self.coeff(i) + other.coeff(i)).collect())
    }

    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut out = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Self::new(out)
    }

    /// Multiply by `s^power`
    pub fn shift(&self, power: usize) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let mut out = vec![0.0; power];
        out.extend_from_slice(&self.coeffs);
        Self { coeffs: out }
    }

    pub fn eval(&self, s: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * s + c)
    }

    /// Cancel factors of `s` shared by a numerator and denominator.
    ///
    /// A zero numerator is returned untouched together with its denominator.
    pub fn cancel_common_zero_roots(num: Self, den: Self) -> (Self, Self) {
        if num.is_zero() {
            return (num, den);
        }
        let strip = num
            .coeffs
            .iter()
            .zip(&den.coeffs)
            .take_while(|(n, d)| **n == 0.0 && **d == 0.0)
            .count();
        if strip == 0 {
            return (num, den);
        }
        (
            Self::new(num.coeffs[strip..].to_vec()),
            Self::new(den.coeffs[strip..].to_vec()),
        )
    }

    fn trim(&mut self) {
        let scale = self.coeffs.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
        let threshold = scale * NEGLIGIBLE;
        for c in self.coeffs.iter_mut() {
            if c.abs() <= threshold {
                *c = 0.0;
            }
        }
        while self.coeffs.last() == Some(&0.0) {
            self.coeffs.pop();
        }
    }
}
