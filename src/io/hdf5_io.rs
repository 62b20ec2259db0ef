//! HDF5 adapters for field input and result output.
//!
//! One file per field component or result slice. The file and its single
//! dataset share a base name: field `U.V1r` lives in `in/U.V1r.h5` as
//! dataset `U.V1r`, and the third-order longitudinal tensor is written to
//! `out/SF_Grid_pll3.h5` as dataset `SF_Grid_pll3`.
//!
//! The `hdf5` dependency is optional; without the `hdf5` cargo feature
//! every adapter returns [`Hdf5Error::FeatureDisabled`] and TEST-mode
//! runs verify in memory instead of via the file round trip.

use std::path::{Path, PathBuf};

use ndarray::{Array2, Array3};
use thiserror::Error;

/// Error type for HDF5 adapter operations.
#[derive(Debug, Error)]
pub enum Hdf5Error {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HDF5 library error
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    /// Input file not found
    #[error("desired file does not exist: {0}")]
    MissingFile(PathBuf),

    /// File exists but holds no dataset of the expected name
    #[error("dataset '{name}' not found in {path}")]
    MissingDataset { path: PathBuf, name: String },

    /// Dataset rank does not match the run mode
    #[error("incompatible dimension data: expected rank {expected}, found {found}")]
    IncompatibleRank { expected: usize, found: usize },

    /// Dataset shape does not match the configured grid
    #[error("incompatible grid size: expected {expected:?}, found {found:?}")]
    IncompatibleShape {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Crate built without the `hdf5` feature
    #[error("HDF5 feature not enabled")]
    FeatureDisabled,
}

impl Hdf5Error {
    /// Whether this error should be accompanied by the input checklist.
    pub fn wants_checklist(&self) -> bool {
        matches!(
            self,
            Self::MissingFile(_)
                | Self::MissingDataset { .. }
                | Self::IncompatibleRank { .. }
                | Self::IncompatibleShape { .. }
        )
    }
}

/// Requirements recap printed alongside input-file diagnostics.
pub const INPUT_CHECKLIST: &str = "\
Error: Please check the following

a. the input folder contains the field files
b. input files are named after their dataset base:
\tCase Vector:
\t\tCase 2D: U.V1r.h5, U.V3r.h5
\t\tCase 3D: U.V1r.h5, U.V2r.h5, U.V3r.h5
\tCase Scalar: T.Fr.h5
c. each file holds exactly one dataset
d. the dataset name equals the file name without the extension
e. the dataset rank is 2 in 2D mode and 3 in 3D mode
f. the dataset shape matches the configured grid (Nx, Nz or Nx, Ny, Nz)
g. values are stored as double precision reals
";

/// True when the crate was built with the `hdf5` feature.
pub const fn hdf5_enabled() -> bool {
    cfg!(feature = "hdf5")
}

#[cfg(feature = "hdf5")]
mod imp {
    use super::*;
    use ndarray::{ArrayView2, ArrayView3};
    use std::fs;

    fn open_dataset(
        dir: &Path,
        base: &str,
        expected_shape: &[usize],
    ) -> Result<(hdf5::Dataset, Vec<usize>), Hdf5Error> {
        let path = dir.join(format!("{base}.h5"));
        if !path.is_file() {
            return Err(Hdf5Error::MissingFile(path));
        }
        let file = hdf5::File::open(&path)?;
        let dataset = file.dataset(base).map_err(|_| Hdf5Error::MissingDataset {
            path: path.clone(),
            name: base.to_string(),
        })?;
        let found = dataset.shape();
        if found.len() != expected_shape.len() {
            return Err(Hdf5Error::IncompatibleRank {
                expected: expected_shape.len(),
                found: found.len(),
            });
        }
        if found != expected_shape {
            return Err(Hdf5Error::IncompatibleShape {
                expected: expected_shape.to_vec(),
                found,
            });
        }
        Ok((dataset, found))
    }

    /// Read a 2D field component of shape `(Nx, Nz)`.
    pub fn read_field_2d(
        dir: &Path,
        base: &str,
        nx: usize,
        nz: usize,
    ) -> Result<Array2<f64>, Hdf5Error> {
        let (dataset, shape) = open_dataset(dir, base, &[nx, nz])?;
        let raw = dataset.read_raw::<f64>()?;
        Array2::from_shape_vec((shape[0], shape[1]), raw).map_err(|_| {
            Hdf5Error::IncompatibleShape {
                expected: vec![nx, nz],
                found: shape,
            }
        })
    }

    /// Read a 3D field component of shape `(Nx, Ny, Nz)`.
    pub fn read_field_3d(
        dir: &Path,
        base: &str,
        nx: usize,
        ny: usize,
        nz: usize,
    ) -> Result<Array3<f64>, Hdf5Error> {
        let (dataset, shape) = open_dataset(dir, base, &[nx, ny, nz])?;
        let raw = dataset.read_raw::<f64>()?;
        Array3::from_shape_vec((shape[0], shape[1], shape[2]), raw).map_err(|_| {
            Hdf5Error::IncompatibleShape {
                expected: vec![nx, ny, nz],
                found: shape,
            }
        })
    }

    /// Write one 2D result slice as `<dir>/<name>.h5`, dataset `<name>`.
    pub fn write_tensor_2d(
        dir: &Path,
        name: &str,
        data: ArrayView2<f64>,
    ) -> Result<(), Hdf5Error> {
        fs::create_dir_all(dir)?;
        let file = hdf5::File::create(dir.join(format!("{name}.h5")))?;
        let dataset = file.new_dataset::<f64>().shape(data.dim()).create(name)?;
        dataset.write(data)?;
        Ok(())
    }

    /// Write one 3D result slice as `<dir>/<name>.h5`, dataset `<name>`.
    pub fn write_tensor_3d(
        dir: &Path,
        name: &str,
        data: ArrayView3<f64>,
    ) -> Result<(), Hdf5Error> {
        fs::create_dir_all(dir)?;
        let file = hdf5::File::create(dir.join(format!("{name}.h5")))?;
        let dataset = file.new_dataset::<f64>().shape(data.dim()).create(name)?;
        dataset.write(data)?;
        Ok(())
    }
}

#[cfg(not(feature = "hdf5"))]
mod imp {
    use super::*;
    use ndarray::{ArrayView2, ArrayView3};

    pub fn read_field_2d(
        _dir: &Path,
        _base: &str,
        _nx: usize,
        _nz: usize,
    ) -> Result<Array2<f64>, Hdf5Error> {
        Err(Hdf5Error::FeatureDisabled)
    }

    pub fn read_field_3d(
        _dir: &Path,
        _base: &str,
        _nx: usize,
        _ny: usize,
        _nz: usize,
    ) -> Result<Array3<f64>, Hdf5Error> {
        Err(Hdf5Error::FeatureDisabled)
    }

    pub fn write_tensor_2d(
        _dir: &Path,
        _name: &str,
        _data: ArrayView2<f64>,
    ) -> Result<(), Hdf5Error> {
        Err(Hdf5Error::FeatureDisabled)
    }

    pub fn write_tensor_3d(
        _dir: &Path,
        _name: &str,
        _data: ArrayView3<f64>,
    ) -> Result<(), Hdf5Error> {
        Err(Hdf5Error::FeatureDisabled)
    }
}

pub use imp::{read_field_2d, read_field_3d, write_tensor_2d, write_tensor_3d};
