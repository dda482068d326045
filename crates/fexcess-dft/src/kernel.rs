use crate::grid::PeriodicGrid;
use fexcess_core::{FexError, FexResult};
use gauss_quad::GaussLegendre;
use ndarray::{Array3, Zip};
use num_dual::DualNum;
use std::f64::consts::{PI, SQRT_2};
use std::sync::Arc;

/// Nodes per panel of the radial quadrature.
const QUADRATURE_POINTS: usize = 16;

/// Radial shapes of convolution kernels.
///
/// Each shape is defined in real space and transformed analytically or
/// numerically to reciprocal space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KernelShape {
    /// Normalized Gaussian with standard deviation `width`.
    Gaussian { width: f64 },
    /// Attractive part of the Lennard-Jones potential with size parameter
    /// `sigma`, following the WCA split: constant -1 inside the potential
    /// minimum $r_m=2^{1/6}\sigma$ and $4[(\sigma/r)^{12}-(\sigma/r)^6]$ outside.
    LennardJonesAttraction { sigma: f64 },
}

impl KernelShape {
    fn validate(&self) -> FexResult<()> {
        let (name, value) = match *self {
            Self::Gaussian { width } => ("kernel width", width),
            Self::LennardJonesAttraction { sigma } => ("kernel radius", sigma),
        };
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(FexError::invalid_parameter(name, value))
        }
    }

    /// Value of the kernel at distance `r`.
    pub fn real_space(&self, r: f64) -> f64 {
        match *self {
            Self::Gaussian { width } => {
                (-0.5 * (r / width).powi(2)).exp() / ((2.0 * PI).powf(1.5) * width.powi(3))
            }
            Self::LennardJonesAttraction { sigma } => {
                if r < 2.0f64.powf(1.0 / 6.0) * sigma {
                    -1.0
                } else {
                    let x = (sigma / r).powi(6);
                    4.0 * (x * x - x)
                }
            }
        }
    }

    /// Integral of the kernel over all space.
    pub fn integral(&self) -> f64 {
        match *self {
            Self::Gaussian { .. } => 1.0,
            Self::LennardJonesAttraction { sigma } => -32.0 * SQRT_2 * PI / 9.0 * sigma.powi(3),
        }
    }

    /// Three-dimensional Fourier transform at wave vector magnitude `k`.
    pub fn fourier_transform(&self, k: f64) -> f64 {
        match *self {
            Self::Gaussian { width } => (-0.5 * (k * width).powi(2)).exp(),
            Self::LennardJonesAttraction { sigma } => lennard_jones_attraction_transform(k, sigma),
        }
    }
}

/// Smooth reference function $-4\sigma^6/(r^2+\sigma^2)^3$ with the
/// same long-range tail as the attraction.
fn smooth_tail(r: f64, sigma: f64) -> f64 {
    -4.0 * sigma.powi(6) / (r * r + sigma * sigma).powi(3)
}

/// Composite Gauss-Legendre rule on equally sized panels.
struct PanelQuadrature {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl PanelQuadrature {
    fn new(points: usize) -> Self {
        let (nodes, weights) = GaussLegendre::nodes_and_weights(points);
        Self { nodes, weights }
    }

    fn integrate<F: Fn(f64) -> f64>(&self, f: F, a: f64, b: f64, panels: usize) -> f64 {
        let h = 0.5 * (b - a) / panels as f64;
        (0..panels)
            .map(|p| {
                let center = a + (2 * p + 1) as f64 * h;
                self.nodes
                    .iter()
                    .zip(&self.weights)
                    .map(|(x, w)| w * f(center + h * x))
                    .sum::<f64>()
                    * h
            })
            .sum()
    }
}

/// The smooth tail is transformed analytically, the (short ranged)
/// remainder numerically up to 50 sigma.
fn lennard_jones_attraction_transform(k: f64, sigma: f64) -> f64 {
    let shape = KernelShape::LennardJonesAttraction { sigma };
    let r_min = 2.0f64.powf(1.0 / 6.0) * sigma;
    let r_mid = 3.0 * sigma;
    let r_max = 50.0 * sigma;
    let integrand = |r: f64| {
        4.0 * PI * r * r * (shape.real_space(r) - smooth_tail(r, sigma)) * (k * r).sph_j0()
    };

    let analytic = -PI * PI * sigma.powi(3) * (-k * sigma).exp() * (1.0 + k * sigma);
    let quadrature = PanelQuadrature::new(QUADRATURE_POINTS);
    let core = quadrature.integrate(integrand, 0.0, r_min, 4);
    let shell = quadrature.integrate(integrand, r_min, r_mid, 8);
    // at most half a period of the Bessel function per panel
    let panels = 32.max(((r_max - r_mid) * k / PI).ceil() as usize);
    let tail = quadrature.integrate(integrand, r_mid, r_max, panels);
    analytic + core + shell + tail
}

/// Radially symmetric convolution kernel tabulated on the wave vectors of a grid.
///
/// Kernels are built once and are read-only afterwards, so that they can be
/// shared between functional evaluations.
#[derive(Clone, Debug)]
pub struct Kernel {
    shape: KernelShape,
    amplitude: f64,
    grid: Arc<PeriodicGrid>,
    data: Array3<f64>,
}

impl Kernel {
    /// Tabulate `amplitude` times the transform of `shape` on all wave vectors of the grid.
    pub fn new(grid: &Arc<PeriodicGrid>, shape: KernelShape, amplitude: f64) -> FexResult<Self> {
        shape.validate()?;
        if !amplitude.is_finite() {
            return Err(FexError::invalid_parameter("kernel amplitude", amplitude));
        }

        // evaluate once per distinct |k| in the first octant
        let [n0, n1, n2] = grid.points();
        let mut octant = Array3::zeros((n0 / 2 + 1, n1 / 2 + 1, n2 / 2 + 1));
        let k_abs = grid.k_abs();
        let f = |(i, j, k): (usize, usize, usize), w: &mut f64| {
            *w = amplitude * shape.fourier_transform(k_abs[[i, j, k]])
        };
        #[cfg(feature = "rayon")]
        Zip::indexed(&mut octant).par_for_each(f);
        #[cfg(not(feature = "rayon"))]
        Zip::indexed(&mut octant).for_each(f);

        let data = Array3::from_shape_fn(grid.points(), |idx| {
            let (i, j, k) = grid.octant_index(idx);
            octant[[i, j, k]]
        });
        Ok(Self {
            shape,
            amplitude,
            grid: grid.clone(),
            data,
        })
    }

    /// Gaussian charge smearing kernel.
    pub fn charge(grid: &Arc<PeriodicGrid>, width: f64) -> FexResult<Self> {
        Self::new(grid, KernelShape::Gaussian { width }, 1.0)
    }

    /// Lennard-Jones attraction kernel with size parameter `radius`.
    pub fn attraction(grid: &Arc<PeriodicGrid>, amplitude: f64, radius: f64) -> FexResult<Self> {
        Self::new(
            grid,
            KernelShape::LennardJonesAttraction { sigma: radius },
            amplitude,
        )
    }

    pub fn shape(&self) -> KernelShape {
        self.shape
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn grid(&self) -> &Arc<PeriodicGrid> {
        &self.grid
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    /// Value at `k = 0`.
    pub fn at_origin(&self) -> f64 {
        self.data[[0, 0, 0]]
    }

    /// Real-space integral of the scaled kernel.
    pub fn integral(&self) -> f64 {
        self.amplitude * self.shape.integral()
    }

    /// Self-convolution of the kernel (its square in reciprocal space).
    pub fn self_convolution(&self) -> Array3<f64> {
        self.data.mapv(|k| k * k)
    }
}
