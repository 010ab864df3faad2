//! Continuous-time Linear Systems
//!
//! Single-input single-output state-space plants and their forced response.
//!
//! ```text
//! x' = A x + B u
//! y  = C x + D u
//! ```
//!
//! # Features
//!
//! - Exact discretisation through the matrix exponential
//! - Zero-order hold (piecewise constant) and first-order hold (linear
//!   interpolation) input models
//! - Initial-state override
//! - Transfer function extraction and controllable canonical realisation
//!
//! # Example
//!
//! ```rust
//! use pursuit_library::algorithms::linear_system::{LinearSystem, SampleWindow};
//!
//! let plant = LinearSystem::double_integrator();
//! let window = SampleWindow::new(1.0, 0.01).unwrap();
//!
//! // Unit acceleration for one second: y(t) = t^2 / 2
//! let y = plant.simulate(&window.held(1.0), &window.times()).unwrap();
//! ```

mod polynomial;

pub use polynomial::Polynomial;

use crate::error::{PursuitError, PursuitResult};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Relative tolerance on the spacing of a uniform time grid
const GRID_TOLERANCE: f64 = 1e-6;

/// How the input behaves between two grid points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputHold {
    /// Input held constant until the next sample
    #[default]
    ZeroOrder,
    /// Input interpolated linearly towards the next sample
    FirstOrder,
}

/// Raw plant matrices, the serialized form of [`LinearSystem`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantMatrices {
    pub a: Vec<Vec<f64>>,
    pub b: Vec<f64>,
    pub c: Vec<f64>,
    pub d: f64,
}

/// Single-input single-output linear time-invariant plant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlantMatrices", into = "PlantMatrices")]
pub struct LinearSystem {
    a: DMatrix<f64>,
    b: DVector<f64>,
    // Output row stored as a column so it dots directly with the state
    c: DVector<f64>,
    d: f64,
}

/// One-step transition of a discretised system
struct Discretized {
    phi: DMatrix<f64>,
    gamma: DVector<f64>,
    ramp: Option<DVector<f64>>,
}

impl LinearSystem {
    /// Create a plant from row-major matrices
    ///
    /// # Arguments
    /// * `a` - State matrix (n rows of n entries)
    /// * `b` - Input column (n entries)
    /// * `c` - Output row (n entries)
    /// * `d` - Feed-through
    pub fn new(a: Vec<Vec<f64>>, b: Vec<f64>, c: Vec<f64>, d: f64) -> PursuitResult<Self> {
        let n = a.len();
        if n == 0 {
            return Err(PursuitError::DimensionMismatch {
                what: "state dimension",
                expected: 1,
                found: 0,
            });
        }
        for row in &a {
            if row.len() != n {
                return Err(PursuitError::DimensionMismatch {
                    what: "state matrix A columns",
                    expected: n,
                    found: row.len(),
                });
            }
        }
        let a = DMatrix::from_row_iterator(n, n, a.into_iter().flatten());
        Self::from_matrices(a, DVector::from_vec(b), DVector::from_vec(c), d)
    }

    /// Create a plant from nalgebra matrices
    pub fn from_matrices(
        a: DMatrix<f64>,
        b: DVector<f64>,
        c: DVector<f64>,
        d: f64,
    ) -> PursuitResult<Self> {
        let n = a.nrows();
        if n == 0 {
            return Err(PursuitError::DimensionMismatch {
                what: "state dimension",
                expected: 1,
                found: 0,
            });
        }
        if a.ncols() != n {
            return Err(PursuitError::DimensionMismatch {
                what: "state matrix A columns",
                expected: n,
                found: a.ncols(),
            });
        }
        if b.len() != n {
            return Err(PursuitError::DimensionMismatch {
                what: "input matrix B rows",
                expected: n,
                found: b.len(),
            });
        }
        if c.len() != n {
            return Err(PursuitError::DimensionMismatch {
                what: "output matrix C columns",
                expected: n,
                found: c.len(),
            });
        }
        if a.iter().any(|v| !v.is_finite()) {
            return Err(PursuitError::NonFiniteMatrix("A"));
        }
        if b.iter().any(|v| !v.is_finite()) {
            return Err(PursuitError::NonFiniteMatrix("B"));
        }
        if c.iter().any(|v| !v.is_finite()) {
            return Err(PursuitError::NonFiniteMatrix("C"));
        }
        if !d.is_finite() {
            return Err(PursuitError::NonFiniteMatrix("D"));
        }
        Ok(Self { a, b, c, d })
    }

    /// Double integrator: acceleration in, position out
    pub fn double_integrator() -> Self {
        Self {
            a: DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 0.0, 0.0]),
            b: DVector::from_vec(vec![0.0, 1.0]),
            c: DVector::from_vec(vec![1.0, 0.0]),
            d: 0.0,
        }
    }

    /// Realise `num(s) / den(s)` in controllable canonical form
    ///
    /// The realisation needs at least one state, so `den` must have degree
    /// one or more and must not be exceeded by the degree of `num`.
    pub fn from_transfer_function(num: &Polynomial, den: &Polynomial) -> PursuitResult<Self> {
        let m = den.degree();
        if den.is_zero() || m == 0 || (!num.is_zero() && num.degree() > m) {
            return Err(PursuitError::ImproperLoop {
                numerator: num.degree(),
                denominator: m,
            });
        }

        let lead = den.coeff(m);
        let feedthrough = num.coeff(m) / lead;

        let mut a = DMatrix::zeros(m, m);
        for i in 0..m - 1 {
            a[(i, i + 1)] = 1.0;
        }
        for j in 0..m {
            a[(m - 1, j)] = -den.coeff(j) / lead;
        }

        let mut b = DVector::zeros(m);
        b[m - 1] = 1.0;

        let c = DVector::from_iterator(
            m,
            (0..m).map(|j| num.coeff(j) / lead - feedthrough * den.coeff(j) / lead),
        );

        Self::from_matrices(a, b, c, feedthrough)
    }

    /// Number of states
    pub fn order(&self) -> usize {
        self.a.nrows()
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    /// Output row, returned as a column vector
    pub fn c(&self) -> &DVector<f64> {
        &self.c
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    /// Transfer function `C (sI - A)^-1 B + D` as (numerator, denominator)
    ///
    /// Uses the Faddeev-LeVerrier recursion; the denominator is the monic
    /// characteristic polynomial of `A`.
    pub fn transfer_function(&self) -> (Polynomial, Polynomial) {
        let n = self.order();
        let identity = DMatrix::<f64>::identity(n, n);

        let mut characteristic = vec![0.0; n + 1];
        characteristic[n] = 1.0;
        let mut numerator = vec![0.0; n + 1];

        // adj(sI - A) = sum over k of M_k s^(n-k)
        let mut m = DMatrix::<f64>::zeros(n, n);
        for k in 1..=n {
            m = &self.a * &m + &identity * characteristic[n - k + 1];
            numerator[n - k] = self.c.dot(&(&m * &self.b));
            characteristic[n - k] = -(&self.a * &m).trace() / k as f64;
        }

        for (coeff, ch) in numerator.iter_mut().zip(&characteristic) {
            *coeff += self.d * ch;
        }

        (Polynomial::new(numerator), Polynomial::new(characteristic))
    }

    /// Forced response from zero state with piecewise constant input
    pub fn simulate(&self, inputs: &[f64], time: &[f64]) -> PursuitResult<Vec<f64>> {
        self.simulate_with(None, inputs, time, InputHold::ZeroOrder)
    }

    /// Response from an initial state with piecewise constant input
    pub fn simulate_from(
        &self,
        initial_state: &[f64],
        inputs: &[f64],
        time: &[f64],
    ) -> PursuitResult<Vec<f64>> {
        self.simulate_with(Some(initial_state), inputs, time, InputHold::ZeroOrder)
    }

    /// Simulate the output at every point of a uniform time grid
    ///
    /// # Arguments
    /// * `initial_state` - Starting state, zero when `None`
    /// * `inputs` - One input sample per grid point
    /// * `time` - Strictly increasing, uniformly spaced grid
    /// * `hold` - Input behaviour between samples
    pub fn simulate_with(
        &self,
        initial_state: Option<&[f64]>,
        inputs: &[f64],
        time: &[f64],
        hold: InputHold,
    ) -> PursuitResult<Vec<f64>> {
        let n = self.order();
        if inputs.len() != time.len() {
            return Err(PursuitError::DimensionMismatch {
                what: "input sequence",
                expected: time.len(),
                found: inputs.len(),
            });
        }
        let mut state = match initial_state {
            Some(x0) if x0.len() != n => {
                return Err(PursuitError::DimensionMismatch {
                    what: "initial state",
                    expected: n,
                    found: x0.len(),
                });
            }
            Some(x0) => DVector::from_column_slice(x0),
            None => DVector::zeros(n),
        };

        let Some(step) = grid_step(time)? else {
            return Ok(inputs
                .iter()
                .map(|u| self.c.dot(&state) + self.d * u)
                .collect());
        };
        let discrete = self.discretize(step, hold);

        let mut outputs = Vec::with_capacity(time.len());
        for (k, &u) in inputs.iter().enumerate() {
            outputs.push(self.c.dot(&state) + self.d * u);

            if let Some(&next) = inputs.get(k + 1) {
                let mut advanced = &discrete.phi * &state + &discrete.gamma * u;
                if let Some(ramp) = &discrete.ramp {
                    advanced += ramp * (next - u);
                }
                state = advanced;
            }
        }

        Ok(outputs)
    }

    fn discretize(&self, step: f64, hold: InputHold) -> Discretized {
        let n = self.order();
        let size = match hold {
            InputHold::ZeroOrder => n + 1,
            InputHold::FirstOrder => n + 2,
        };

        let mut augmented = DMatrix::<f64>::zeros(size, size);
        augmented
            .view_mut((0, 0), (n, n))
            .copy_from(&(&self.a * step));
        augmented
            .view_mut((0, n), (n, 1))
            .copy_from(&(&self.b * step));
        if hold == InputHold::FirstOrder {
            augmented[(n, n + 1)] = 1.0;
        }

        let exponential = augmented.exp();
        Discretized {
            phi: exponential.view((0, 0), (n, n)).into_owned(),
            gamma: exponential.column(n).rows(0, n).into_owned(),
            ramp: (hold == InputHold::FirstOrder)
                .then(|| exponential.column(n + 1).rows(0, n).into_owned()),
        }
    }
}

impl Default for LinearSystem {
    fn default() -> Self {
        Self::double_integrator()
    }
}

impl TryFrom<PlantMatrices> for LinearSystem {
    type Error = PursuitError;

    fn try_from(m: PlantMatrices) -> Result<Self, Self::Error> {
        Self::new(m.a, m.b, m.c, m.d)
    }
}

impl From<LinearSystem> for PlantMatrices {
    fn from(sys: LinearSystem) -> Self {
        Self {
            a: sys
                .a
                .row_iter()
                .map(|row| row.iter().copied().collect())
                .collect(),
            b: sys.b.iter().copied().collect(),
            c: sys.c.iter().copied().collect(),
            d: sys.d,
        }
    }
}

/// Spacing of a uniform grid, `None` when it has fewer than two points
fn grid_step(time: &[f64]) -> PursuitResult<Option<f64>> {
    if time.iter().any(|t| !t.is_finite()) {
        return Err(PursuitError::InvalidTimeGrid(
            "time grid contains non-finite values".to_string(),
        ));
    }
    if time.len() < 2 {
        return Ok(None);
    }

    let step = time[1] - time[0];
    if step <= 0.0 {
        return Err(PursuitError::InvalidTimeGrid(
            "time grid must be strictly increasing".to_string(),
        ));
    }
    for (k, pair) in time.windows(2).enumerate() {
        let spacing = pair[1] - pair[0];
        if (spacing - step).abs() > GRID_TOLERANCE * step {
            return Err(PursuitError::InvalidTimeGrid(format!(
                "spacing {spacing} at index {k} differs from step {step}"
            )));
        }
    }

    Ok(Some(step))
}

/// Uniform grid `[0, duration)` with a fixed step
///
/// Holds `ceil(duration / step)` points `k * step`, the same points
/// `numpy.arange(0, duration, step)` produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleWindow {
    step: f64,
    len: usize,
}

impl SampleWindow {
    pub fn new(duration: f64, step: f64) -> PursuitResult<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(PursuitError::InvalidTimeGrid(format!(
                "window step must be positive, got {step}"
            )));
        }
        if !(duration.is_finite() && duration > 0.0) {
            return Err(PursuitError::InvalidTimeGrid(format!(
                "window duration must be positive, got {duration}"
            )));
        }
        let len = (duration / step).ceil() as usize;
        Ok(Self { step, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn times(&self) -> Vec<f64> {
        (0..self.len).map(|k| k as f64 * self.step).collect()
    }

    /// Input sequence holding `level` over the whole window
    pub fn held(&self, level: f64) -> Vec<f64> {
        vec![level; self.len]
    }
}
