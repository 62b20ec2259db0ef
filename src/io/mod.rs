//! I/O adapters for field input and result output.
//!
//! Field components and result tensors travel as HDF5 files whose single
//! dataset is named after the file (see [`hdf5_io`]). The native-format
//! dependency sits behind the `hdf5` cargo feature so the compute core
//! builds everywhere.

mod hdf5_io;

pub use hdf5_io::{
    hdf5_enabled, read_field_2d, read_field_3d, write_tensor_2d, write_tensor_3d, Hdf5Error,
    INPUT_CHECKLIST,
};
