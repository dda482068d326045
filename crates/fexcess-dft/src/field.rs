use crate::grid::PeriodicGrid;
use crate::kernel::Kernel;
use fexcess_core::{FexError, FexResult};
use ndarray::{Array3, Zip};
use rustfft::num_complex::Complex64;
use std::ops::Mul;
use std::sync::Arc;

fn check_grids(a: &PeriodicGrid, b: &PeriodicGrid) -> FexResult<()> {
    if a.is_compatible(b) {
        Ok(())
    } else {
        Err(FexError::GridMismatch(format!("{a} and {b}")))
    }
}

/// Real-valued scalar field sampled on the points of a periodic grid.
#[derive(Clone, Debug)]
pub struct ScalarField {
    grid: Arc<PeriodicGrid>,
    data: Array3<f64>,
}

/// Scalar field in reciprocal space.
///
/// All wave vectors are stored, so fields obtained from real fields
/// keep their Hermitian symmetry.
#[derive(Clone, Debug)]
pub struct ScalarFieldTilde {
    grid: Arc<PeriodicGrid>,
    data: Array3<Complex64>,
}

impl ScalarField {
    pub fn new(grid: &Arc<PeriodicGrid>, data: Array3<f64>) -> FexResult<Self> {
        if data.shape() != grid.points().as_slice() {
            return Err(FexError::GridMismatch(format!(
                "data of shape {:?} on {grid}",
                data.shape()
            )));
        }
        Ok(Self {
            grid: grid.clone(),
            data,
        })
    }

    pub fn zeros(grid: &Arc<PeriodicGrid>) -> Self {
        Self::constant(grid, 0.0)
    }

    pub fn constant(grid: &Arc<PeriodicGrid>, value: f64) -> Self {
        Self {
            grid: grid.clone(),
            data: Array3::from_elem(grid.points(), value),
        }
    }

    /// Sample a function of the Cartesian position on every grid point.
    pub fn from_fn<F: Fn([f64; 3]) -> f64>(grid: &Arc<PeriodicGrid>, f: F) -> Self {
        Self {
            grid: grid.clone(),
            data: Array3::from_shape_fn(grid.points(), |idx| f(grid.position(idx))),
        }
    }

    pub fn grid(&self) -> &Arc<PeriodicGrid> {
        &self.grid
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array3<f64> {
        &mut self.data
    }

    pub fn into_data(self) -> Array3<f64> {
        self.data
    }

    /// Forward transform `J`.
    pub fn forward(&self) -> ScalarFieldTilde {
        let mut data = self.data.mapv(Complex64::from);
        self.grid.fft_forward(&mut data);
        let points = self.grid.size() as f64;
        data.mapv_inplace(|x| x / points);
        ScalarFieldTilde {
            grid: self.grid.clone(),
            data,
        }
    }

    /// Adjoint of the inverse transform, `I†`.
    pub fn inverse_adjoint(&self) -> ScalarFieldTilde {
        let mut data = self.data.mapv(Complex64::from);
        self.grid.fft_forward(&mut data);
        ScalarFieldTilde {
            grid: self.grid.clone(),
            data,
        }
    }

    /// Sum over all grid points.
    pub fn sum(&self) -> f64 {
        self.data.sum()
    }

    /// Integral over the simulation cell.
    pub fn integral(&self) -> f64 {
        self.sum() * self.grid.cell_volume()
    }

    /// Euclidean inner product of the grid values.
    pub fn dot(&self, other: &Self) -> FexResult<f64> {
        check_grids(&self.grid, &other.grid)?;
        Ok(Zip::from(&self.data)
            .and(&other.data)
            .fold(0.0, |acc, &a, &b| acc + a * b))
    }

    /// Pointwise product of two fields.
    pub fn product(&self, other: &Self) -> FexResult<Self> {
        check_grids(&self.grid, &other.grid)?;
        Ok(Self {
            grid: self.grid.clone(),
            data: &self.data * &other.data,
        })
    }

    pub fn mapv<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self {
            grid: self.grid.clone(),
            data: self.data.mapv(f),
        }
    }
}

impl ScalarFieldTilde {
    pub fn new(grid: &Arc<PeriodicGrid>, data: Array3<Complex64>) -> FexResult<Self> {
        if data.shape() != grid.points().as_slice() {
            return Err(FexError::GridMismatch(format!(
                "data of shape {:?} on {grid}",
                data.shape()
            )));
        }
        Ok(Self {
            grid: grid.clone(),
            data,
        })
    }

    pub fn zeros(grid: &Arc<PeriodicGrid>) -> Self {
        Self {
            grid: grid.clone(),
            data: Array3::zeros(grid.points()),
        }
    }

    pub fn grid(&self) -> &Arc<PeriodicGrid> {
        &self.grid
    }

    pub fn data(&self) -> &Array3<Complex64> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array3<Complex64> {
        &mut self.data
    }

    /// Value of the field at `G = 0`.
    pub fn at_origin(&self) -> Complex64 {
        self.data[[0, 0, 0]]
    }

    /// Inverse transform `I`.
    pub fn inverse(&self) -> ScalarField {
        let mut data = self.data.clone();
        self.grid.fft_inverse(&mut data);
        ScalarField {
            grid: self.grid.clone(),
            data: data.mapv(|x| x.re),
        }
    }

    /// Adjoint of the forward transform, `J†`.
    pub fn forward_adjoint(&self) -> ScalarField {
        let mut data = self.data.clone();
        self.grid.fft_inverse(&mut data);
        let points = self.grid.size() as f64;
        ScalarField {
            grid: self.grid.clone(),
            data: data.mapv(|x| x.re / points),
        }
    }

    /// Overlap operator `O`.
    pub fn overlap(&self) -> Self {
        self * self.grid.volume()
    }

    /// Multiplication with a radial kernel (convolution in real space).
    pub fn convolve(&self, kernel: &Kernel) -> FexResult<Self> {
        check_grids(&self.grid, kernel.grid())?;
        Ok(Self {
            grid: self.grid.clone(),
            data: &self.data * &kernel.data().mapv(Complex64::from),
        })
    }

    /// `self += alpha * other`
    pub fn scaled_add(&mut self, alpha: f64, other: &Self) -> FexResult<()> {
        check_grids(&self.grid, &other.grid)?;
        self.data.scaled_add(Complex64::from(alpha), &other.data);
        Ok(())
    }

    /// Real part of the Hermitian inner product, `Re Σ conj(a) b`.
    pub fn dot(&self, other: &Self) -> FexResult<f64> {
        check_grids(&self.grid, &other.grid)?;
        Ok(Zip::from(&self.data)
            .and(&other.data)
            .fold(0.0, |acc, a, b| acc + (a.conj() * b).re))
    }

    /// Largest absolute difference to another field.
    pub fn max_abs_diff(&self, other: &Self) -> FexResult<f64> {
        check_grids(&self.grid, &other.grid)?;
        Ok(Zip::from(&self.data)
            .and(&other.data)
            .fold(0.0, |acc: f64, a, b| acc.max((a - b).norm())))
    }
}

impl Mul<f64> for &ScalarFieldTilde {
    type Output = ScalarFieldTilde;

    fn mul(self, rhs: f64) -> ScalarFieldTilde {
        ScalarFieldTilde {
            grid: self.grid.clone(),
            data: self.data.mapv(|x| x * rhs),
        }
    }
}

impl Mul<f64> for &ScalarField {
    type Output = ScalarField;

    fn mul(self, rhs: f64) -> ScalarField {
        self.mapv(|x| x * rhs)
    }
}
