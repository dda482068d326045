use fexcess_core::{FexError, FexResult, ReducedUnits};
use ndarray::{Array3, ArrayViewMut1, Axis};
use quantity::Length;
use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

/// Orthorhombic periodic simulation cell with a regular real-space mesh.
///
/// The grid owns the 1D Fourier transforms used along each axis and
/// provides the four transforms used to move fields between real and
/// reciprocal space together with their adjoints:
///
/// | operator | map | definition |
/// |---|---|---|
/// | `J`  | real → reciprocal | $\frac{1}{S}\sum_r f(r)e^{-iGr}$ |
/// | `I`  | reciprocal → real | $\sum_G f(G)e^{iGr}$ |
/// | `I†` | real → reciprocal | $\sum_r f(r)e^{-iGr}$ |
/// | `J†` | reciprocal → real | $\frac{1}{S}\sum_G f(G)e^{iGr}$ |
/// | `O`  | reciprocal → reciprocal | multiplication with the cell volume |
///
/// With these conventions `I J = 1` and the reciprocal space inner product
/// of `J f` and `O J g` equals the real space integral of `f g`.
pub struct PeriodicGrid {
    points: [usize; 3],
    lengths: [f64; 3],
    /// absolute values of the wave vectors in FFT ordering
    k_abs: Array3<f64>,
    forward_transforms: Vec<Arc<dyn Fft<f64>>>,
    inverse_transforms: Vec<Arc<dyn Fft<f64>>>,
}

impl PeriodicGrid {
    /// Create a new grid from the box lengths and the number of grid points per axis.
    pub fn new(lengths: [Length; 3], points: [usize; 3]) -> FexResult<Arc<Self>> {
        Self::new_reduced(lengths.map(|l| l.to_reduced()), points)
    }

    /// Create a cubic grid.
    pub fn new_cubic(length: Length, points: usize) -> FexResult<Arc<Self>> {
        Self::new([length; 3], [points; 3])
    }

    /// Create a new grid from box lengths in units of Angstrom.
    pub fn new_reduced(lengths: [f64; 3], points: [usize; 3]) -> FexResult<Arc<Self>> {
        for (i, (&l, &n)) in lengths.iter().zip(points.iter()).enumerate() {
            if !(l.is_finite() && l > 0.0) {
                return Err(FexError::invalid_parameter(format!("box length {i}"), l));
            }
            if n == 0 {
                return Err(FexError::invalid_parameter(
                    format!("grid points {i}"),
                    n as f64,
                ));
            }
        }

        // initialize the Fourier transforms
        let mut planner = FftPlanner::new();
        let forward_transforms = points.iter().map(|&n| planner.plan_fft_forward(n)).collect();
        let inverse_transforms = points.iter().map(|&n| planner.plan_fft_inverse(n)).collect();

        // wave vectors along each axis
        let k_vec: Vec<Vec<f64>> = points
            .iter()
            .zip(lengths.iter())
            .map(|(&n, &l)| {
                let (min, max) = (-(n as isize / 2), (n as isize - 1) / 2);
                (0..=max)
                    .chain(min..0)
                    .map(|i| 2.0 * PI * i as f64 / l)
                    .collect()
            })
            .collect();
        let k_abs = Array3::from_shape_fn(points, |(i, j, k)| {
            (k_vec[0][i].powi(2) + k_vec[1][j].powi(2) + k_vec[2][k].powi(2)).sqrt()
        });

        Ok(Arc::new(Self {
            points,
            lengths,
            k_abs,
            forward_transforms,
            inverse_transforms,
        }))
    }

    /// Number of grid points along each axis.
    pub fn points(&self) -> [usize; 3] {
        self.points
    }

    /// Total number of grid points.
    pub fn size(&self) -> usize {
        self.points.iter().product()
    }

    /// Box lengths in Angstrom.
    pub fn lengths(&self) -> [f64; 3] {
        self.lengths
    }

    /// Volume of the simulation cell.
    pub fn volume(&self) -> f64 {
        self.lengths.iter().product()
    }

    /// Volume associated with a single grid point.
    pub fn cell_volume(&self) -> f64 {
        self.volume() / self.size() as f64
    }

    /// Absolute values of the wave vectors.
    pub fn k_abs(&self) -> &Array3<f64> {
        &self.k_abs
    }

    /// Cartesian position of the grid point with the given index.
    pub fn position(&self, index: (usize, usize, usize)) -> [f64; 3] {
        let (i, j, k) = index;
        [
            i as f64 * self.lengths[0] / self.points[0] as f64,
            j as f64 * self.lengths[1] / self.points[1] as f64,
            k as f64 * self.lengths[2] / self.points[2] as f64,
        ]
    }

    /// Index of the wave vector with the same absolute value in the first octant.
    pub(crate) fn octant_index(&self, index: (usize, usize, usize)) -> (usize, usize, usize) {
        let fold = |i: usize, n: usize| i.min(n - i);
        let [n0, n1, n2] = self.points;
        (fold(index.0, n0), fold(index.1, n1), fold(index.2, n2))
    }

    /// Whether two grids describe the same mesh.
    pub fn is_compatible(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || (self.points == other.points && self.lengths == other.lengths)
    }

    /// Unnormalized forward transform along all three axes.
    pub(crate) fn fft_forward(&self, f: &mut Array3<Complex64>) {
        Self::transform_lanes(&self.forward_transforms, f)
    }

    /// Unnormalized inverse transform along all three axes.
    pub(crate) fn fft_inverse(&self, f: &mut Array3<Complex64>) {
        Self::transform_lanes(&self.inverse_transforms, f)
    }

    fn transform_lanes(transforms: &[Arc<dyn Fft<f64>>], f: &mut Array3<Complex64>) {
        for (i, transform) in transforms.iter().enumerate() {
            for lane in f.lanes_mut(Axis(i)).into_iter() {
                Self::transform(transform, lane);
            }
        }
    }

    fn transform(transform: &Arc<dyn Fft<f64>>, mut f: ArrayViewMut1<Complex64>) {
        if let Some(f) = f.as_slice_mut() {
            transform.process(f);
        } else {
            let mut f_cont = f.to_vec();
            transform.process(&mut f_cont);
            f.iter_mut().zip(f_cont).for_each(|(f, c)| *f = c);
        }
    }
}

impl fmt::Display for PeriodicGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [n0, n1, n2] = self.points;
        let [l0, l1, l2] = self.lengths;
        write!(f, "PeriodicGrid({n0}x{n1}x{n2}, {l0} Å x {l1} Å x {l2} Å)")
    }
}

impl fmt::Debug for PeriodicGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeriodicGrid")
            .field("points", &self.points)
            .field("lengths", &self.lengths)
            .finish()
    }
}
