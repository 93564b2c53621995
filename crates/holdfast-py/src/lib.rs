//! # Holdfast Python Bindings
//!
//! PyO3 bindings exposing the trunk packing engine to Python.
//!
//! ## Usage
//!
//! ```python
//! import _holdfast
//!
//! with open("trunk.stl", "rb") as f:
//!     trunk = _holdfast.PyTrunk.from_stl_bytes(f.read())
//!
//! report = trunk.pack([
//!     ("Soft Rolling Bag", "MEDIUM"),
//!     ("Backpack Bag", "SMALL"),
//!     ("Custom", 40.0, 30.0, 20.0),
//! ])
//! print(report.placed_count, report.volume_utilization)
//!
//! with open("packed.stl", "wb") as f:
//!     f.write(trunk.scene_stl_bytes(report))
//! ```

use glam::DVec3;
use numpy::{PyArray1, ToPyArray};
use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyDict};

use holdfast_core::{
    pack, pack_with_progress, scene_mesh, BagFactory, BagKind, BagSize, BagSpec, PackReport,
    SearchProfile, Trunk,
};
use hull::{write_stl_bytes, TriMesh};

/// Accept a bag either as a catalog `(type, size)` pair or as a
/// `("Custom", length, breadth, thickness)` quadruple in centimeters,
/// matching the booking payload shape.
#[derive(FromPyObject)]
enum BagArg {
    Custom(String, f64, f64, f64),
    Catalog(String, String),
}

impl BagArg {
    fn into_spec(self) -> PyResult<BagSpec> {
        match self {
            BagArg::Custom(tag, length_cm, breadth_cm, thickness_cm) => {
                if tag != "Custom" {
                    return Err(PyValueError::new_err(format!(
                        "four-element bags must be tagged 'Custom', got '{tag}'"
                    )));
                }
                for dim in [length_cm, breadth_cm, thickness_cm] {
                    if !dim.is_finite() || dim <= 0.0 {
                        return Err(PyValueError::new_err(format!(
                            "custom bag dimensions must be positive, got {dim}"
                        )));
                    }
                }
                Ok(BagSpec::custom(length_cm, breadth_cm, thickness_cm))
            }
            BagArg::Catalog(kind, size) => {
                let kind = BagKind::from_label(&kind)
                    .ok_or_else(|| PyValueError::new_err(format!("unknown bag type '{kind}'")))?;
                let size = BagSize::from_label(&size)
                    .ok_or_else(|| PyValueError::new_err(format!("unknown bag size '{size}'")))?;
                Ok(BagSpec::catalog(kind, size))
            }
        }
    }
}

/// Trunk geometry wrapper for Python.
#[pyclass(frozen)]
pub struct PyTrunk {
    inner: Trunk,
}

#[pymethods]
impl PyTrunk {
    /// Load and normalize a trunk from STL file bytes.
    ///
    /// The mesh is rescaled to meters if it appears to be in millimeters,
    /// centered, floored at z = 0, and stood upright.
    #[staticmethod]
    fn from_stl_bytes(bytes: &[u8]) -> PyResult<Self> {
        let inner = Trunk::from_stl_bytes(bytes)
            .map_err(|error| PyValueError::new_err(error.to_string()))?;
        Ok(Self { inner })
    }

    /// Whether the normalized mesh is watertight.
    #[getter]
    fn is_watertight(&self) -> bool {
        self.inner.is_watertight()
    }

    /// Trunk extents in meters as an (x, y, z) tuple.
    #[getter]
    fn extents(&self) -> (f64, f64, f64) {
        let size = self.inner.bounds().size();
        (size.x, size.y, size.z)
    }

    /// Capacity estimate in cubic meters.
    #[getter]
    fn capacity_volume(&self) -> f64 {
        self.inner.capacity_volume()
    }

    /// The normalized trunk mesh as binary STL bytes.
    fn to_stl_bytes<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyBytes>> {
        let bytes = write_stl_bytes(self.inner.mesh())
            .map_err(|error| PyValueError::new_err(error.to_string()))?;
        Ok(PyBytes::new(py, &bytes))
    }

    /// Pack a booking into this trunk.
    ///
    /// Releases the GIL during computation when no progress callback is
    /// given; with a callback, each milestone is delivered as
    /// `progress_callback(fraction, phase)`.
    #[pyo3(signature = (bags, grid_step=None, candidate_ceiling=None, progress_callback=None))]
    fn pack(
        &self,
        py: Python<'_>,
        bags: Vec<BagArg>,
        grid_step: Option<f64>,
        candidate_ceiling: Option<usize>,
        progress_callback: Option<PyObject>,
    ) -> PyResult<PyPackReport> {
        let requests: Vec<BagSpec> = bags
            .into_iter()
            .map(BagArg::into_spec)
            .collect::<PyResult<_>>()?;

        let mut profile = SearchProfile::default();
        if let Some(step) = grid_step {
            if !step.is_finite() || step <= 0.0 {
                return Err(PyValueError::new_err(format!(
                    "grid_step must be positive, got {step}"
                )));
            }
            profile.grid_step = step;
        }
        if let Some(ceiling) = candidate_ceiling {
            profile.candidate_ceiling = ceiling;
        }

        let report = match progress_callback {
            Some(callback) => {
                let mut failure: Option<PyErr> = None;
                let report = pack_with_progress(&self.inner, &requests, &profile, |info| {
                    if failure.is_none() {
                        if let Err(error) = callback.call1(py, (info.fraction, info.phase)) {
                            failure = Some(error);
                        }
                    }
                });
                if let Some(error) = failure {
                    return Err(error);
                }
                report
            }
            None => py.allow_threads(|| pack(&self.inner, &requests, &profile)),
        };
        Ok(PyPackReport { inner: report })
    }

    /// Trunk plus every placed bag as one binary STL, for download.
    fn scene_stl_bytes<'py>(
        &self,
        py: Python<'py>,
        report: &PyPackReport,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let scene = scene_mesh(&self.inner, &report.inner.placed);
        let bytes =
            write_stl_bytes(&scene).map_err(|error| PyValueError::new_err(error.to_string()))?;
        Ok(PyBytes::new(py, &bytes))
    }

    fn __repr__(&self) -> String {
        let size = self.inner.bounds().size();
        format!(
            "Trunk({:.2}m x {:.2}m x {:.2}m, watertight={})",
            size.x,
            size.y,
            size.z,
            self.inner.is_watertight()
        )
    }
}

/// Packing run report wrapper for Python.
#[pyclass(frozen)]
pub struct PyPackReport {
    inner: PackReport,
}

#[pymethods]
impl PyPackReport {
    /// Number of bags that found a position.
    #[getter]
    fn placed_count(&self) -> usize {
        self.inner.placed.len()
    }

    /// Number of bags that did not fit.
    #[getter]
    fn unplaced_count(&self) -> usize {
        self.inner.unplaced.len()
    }

    /// Wall-clock duration of the run, in seconds.
    #[getter]
    fn processing_time_seconds(&self) -> f64 {
        self.inner.processing_time_seconds
    }

    /// Placed volume over trunk capacity, in percent.
    #[getter]
    fn volume_utilization(&self) -> f64 {
        self.inner.utilization.volume_utilization
    }

    /// Placement envelope over the trunk's bounding box, in percent.
    #[getter]
    fn space_utilization_bbox(&self) -> f64 {
        self.inner.utilization.space_utilization_bbox
    }

    /// Placed volume over the placement envelope, in percent.
    #[getter]
    fn packing_efficiency_bbox(&self) -> f64 {
        self.inner.utilization.packing_efficiency_bbox
    }

    /// Placed bags as dicts with `id`, `type`, `size`, `min`, and `max`.
    ///
    /// Bounds are in meters, in final settle order.
    fn placed<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyDict>>> {
        self.inner
            .placed
            .iter()
            .map(|bag| {
                let dict = PyDict::new(py);
                dict.set_item("id", bag.original_idx)?;
                dict.set_item("type", &bag.kind)?;
                dict.set_item("size", &bag.size)?;
                dict.set_item("min", (bag.bounds.min.x, bag.bounds.min.y, bag.bounds.min.z))?;
                dict.set_item("max", (bag.bounds.max.x, bag.bounds.max.y, bag.bounds.max.z))?;
                Ok(dict)
            })
            .collect()
    }

    /// Unplaced bags as dicts with `id`, `label`, `dimensions_cm`, and
    /// `reason`.
    fn unplaced<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyDict>>> {
        self.inner
            .unplaced
            .iter()
            .map(|bag| {
                let dict = PyDict::new(py);
                dict.set_item("id", bag.original_idx)?;
                dict.set_item("label", &bag.label)?;
                dict.set_item("dimensions_cm", &bag.dimensions_cm)?;
                dict.set_item("reason", &bag.reason)?;
                Ok(dict)
            })
            .collect()
    }

    /// Placement bounds as a flat float64 array, six values per bag:
    /// min x, min y, min z, max x, max y, max z.
    fn bounds_flat<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        let flat: Vec<f64> = self
            .inner
            .placed
            .iter()
            .flat_map(|bag| {
                [
                    bag.bounds.min.x,
                    bag.bounds.min.y,
                    bag.bounds.min.z,
                    bag.bounds.max.x,
                    bag.bounds.max.y,
                    bag.bounds.max.z,
                ]
            })
            .collect();
        flat.to_pyarray(py)
    }

    /// One placed bag's box as binary STL bytes.
    fn bag_stl_bytes<'py>(&self, py: Python<'py>, index: usize) -> PyResult<Bound<'py, PyBytes>> {
        let bag = self.inner.placed.get(index).ok_or_else(|| {
            PyIndexError::new_err(format!(
                "bag index {index} out of range for {} placed bags",
                self.inner.placed.len()
            ))
        })?;
        let bytes = write_stl_bytes(&TriMesh::cuboid(bag.bounds))
            .map_err(|error| PyValueError::new_err(error.to_string()))?;
        Ok(PyBytes::new(py, &bytes))
    }

    /// The full report serialized as a JSON string.
    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner).map_err(|error| PyValueError::new_err(error.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "PackReport(placed={}, unplaced={}, volume_utilization={:.1}%)",
            self.inner.placed.len(),
            self.inner.unplaced.len(),
            self.inner.utilization.volume_utilization
        )
    }
}

/// Published catalog dimensions in centimeters.
///
/// Returns `{type_label: {size_label: (length, breadth, thickness)}}`,
/// the shape the booking frontend renders as a picker.
#[pyfunction]
fn catalog_dimensions_cm(py: Python<'_>) -> PyResult<Bound<'_, PyDict>> {
    let mut factory = BagFactory::new();
    let catalog = PyDict::new(py);
    for kind in BagKind::ALL {
        let sizes = PyDict::new(py);
        for size in BagSize::ALL {
            let extents: DVec3 = factory.extents_m(&BagSpec::catalog(kind, size)) * 100.0;
            sizes.set_item(size.label(), (extents.x, extents.y, extents.z))?;
        }
        catalog.set_item(kind.label(), sizes)?;
    }
    Ok(catalog)
}

/// Python module definition.
#[pymodule]
fn _holdfast(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTrunk>()?;
    m.add_class::<PyPackReport>()?;
    m.add_function(wrap_pyfunction!(catalog_dimensions_cm, m)?)?;
    m.add("WALL_MARGIN", holdfast_core::WALL_MARGIN)?;
    Ok(())
}
