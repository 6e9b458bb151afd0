//! Frequent itemset mining with FP-Growth.
//!
//! Transactions are compressed into an [`fp::FPTree`], a prefix tree whose
//! nodes are additionally threaded per item. [`fp::fp_search`] walks those
//! item threads, keeps every item whose support reaches the threshold, and
//! descends into the conditional tree built by [`fp::project`] for it.
//!
//! ```
//! use fpgrowth::fp::{mine, sort_itemsets};
//!
//! let transactions = vec![vec![1, 2, 3], vec![1, 2], vec![1, 3], vec![2, 3], vec![1, 2, 3, 4]];
//! let mut itemsets = mine(&transactions, 3.0).unwrap();
//! sort_itemsets(&mut itemsets);
//!
//! assert_eq!(itemsets.len(), 6);
//! assert_eq!(itemsets[3].items, vec![1, 2]);
//! assert_eq!(itemsets[3].support, 3);
//! ```
//!
//! With the `python` feature the crate also builds as a Python extension
//! module exposing the same miner over numpy matrices.

pub mod fp;

#[cfg(feature = "python")]
#[allow(unsafe_code)]
mod bindings {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use numpy::ndarray::{Array1, Array2};
    use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray2};
    use once_cell::sync::Lazy;
    use pyo3::exceptions::{PyIOError, PyRecursionError, PyRuntimeError, PyValueError};
    use pyo3::prelude::*;

    use crate::fp::{
        FpError, FrequentLevel, StreamingState, build_pass, count_pass, finalize_building,
        finalize_counts, fp_growth_algorithm, matrix_to_transactions, mine_patterns,
    };

    type LevelArrays<'py> = Vec<(Bound<'py, PyArray2<usize>>, Bound<'py, PyArray1<usize>>)>;

    // Global storage for phased processors
    static PROCESSORS: Lazy<Mutex<HashMap<usize, StreamingState>>> =
        Lazy::new(|| Mutex::new(HashMap::new()));
    static NEXT_PID: Lazy<Mutex<usize>> = Lazy::new(|| Mutex::new(0));

    impl From<FpError> for PyErr {
        fn from(err: FpError) -> PyErr {
            let message = err.to_string();
            match err {
                FpError::InvalidThreshold(_) | FpError::InvalidSupport(_) | FpError::Parse { .. } => {
                    PyValueError::new_err(message)
                }
                FpError::DepthExceeded { .. } => PyRecursionError::new_err(message),
                FpError::Io(_) => PyIOError::new_err(message),
                FpError::EmptyProjection | FpError::MixedSeed { .. } | FpError::Phase { .. } => {
                    PyRuntimeError::new_err(message)
                }
            }
        }
    }

    fn lock_error<E: std::fmt::Display>(e: E) -> PyErr {
        PyRuntimeError::new_err(format!("Lock error: {}", e))
    }

    fn with_state<T>(
        pid: usize,
        f: impl FnOnce(&mut StreamingState) -> Result<T, FpError>,
    ) -> PyResult<T> {
        let mut processors = PROCESSORS.lock().map_err(lock_error)?;
        let state = processors
            .get_mut(&pid)
            .ok_or_else(|| PyValueError::new_err("Invalid processor ID"))?;
        Ok(f(state)?)
    }

    /// One `(itemsets, supports)` pair per non-empty level.
    fn levels_to_arrays(py: Python<'_>, levels: Vec<FrequentLevel>) -> PyResult<LevelArrays<'_>> {
        let mut result = Vec::new();

        for level in levels {
            if level.is_empty() {
                continue;
            }

            let itemset_size = level.itemset_size;
            let num_itemsets = level.len();
            let mut data = vec![0usize; num_itemsets * itemset_size];

            for (i, itemset) in level.iter_itemsets().enumerate() {
                for (j, &item) in itemset.iter().enumerate() {
                    data[i * itemset_size + j] = item;
                }
            }

            let itemsets = Array2::from_shape_vec((num_itemsets, itemset_size), data)
                .map_err(|_| PyValueError::new_err("Failed to create array"))?;
            let supports = Array1::from_vec(level.storage.supports);

            result.push((itemsets.into_pyarray(py), supports.into_pyarray(py)));
        }

        Ok(result)
    }

    #[pyfunction]
    #[pyo3(name = "fp_growth")]
    fn fp_growth_py<'py>(
        py: Python<'py>,
        transactions: PyReadonlyArray2<'py, i32>,
        min_support: f64,
    ) -> PyResult<LevelArrays<'py>> {
        let levels = fp_growth_algorithm(transactions.as_array(), min_support)?;
        levels_to_arrays(py, levels)
    }

    #[pyfunction]
    #[pyo3(name = "create_lazy_fp_growth")]
    fn create_lazy_fp_growth_py() -> PyResult<usize> {
        let mut pid_lock = NEXT_PID.lock().map_err(lock_error)?;
        let pid = *pid_lock;
        *pid_lock += 1;
        drop(pid_lock);

        let mut processors = PROCESSORS.lock().map_err(lock_error)?;
        processors.insert(pid, StreamingState::new());

        Ok(pid)
    }

    #[pyfunction]
    #[pyo3(name = "lazy_count_pass")]
    fn lazy_count_pass_py(pid: usize, transactions: PyReadonlyArray2<i32>) -> PyResult<()> {
        let batch = matrix_to_transactions(transactions.as_array());
        with_state(pid, |state| count_pass(state, &batch))
    }

    #[pyfunction]
    #[pyo3(name = "lazy_finalize_counts")]
    fn lazy_finalize_counts_py(pid: usize, min_support: f64) -> PyResult<()> {
        with_state(pid, |state| finalize_counts(state, min_support))
    }

    #[pyfunction]
    #[pyo3(name = "lazy_build_pass")]
    fn lazy_build_pass_py(pid: usize, transactions: PyReadonlyArray2<i32>) -> PyResult<()> {
        let batch = matrix_to_transactions(transactions.as_array());
        with_state(pid, |state| build_pass(state, &batch))
    }

    #[pyfunction]
    #[pyo3(name = "lazy_finalize_building")]
    fn lazy_finalize_building_py(pid: usize) -> PyResult<()> {
        with_state(pid, finalize_building)
    }

    #[pyfunction]
    #[pyo3(name = "lazy_mine_patterns", signature = (pid, max_depth=None))]
    fn lazy_mine_patterns_py(
        py: Python<'_>,
        pid: usize,
        max_depth: Option<usize>,
    ) -> PyResult<LevelArrays<'_>> {
        let levels = with_state(pid, |state| mine_patterns(state, max_depth))?;
        levels_to_arrays(py, levels)
    }

    #[pyfunction]
    #[pyo3(name = "lazy_cleanup")]
    fn lazy_cleanup_py(pid: usize) -> PyResult<()> {
        let mut processors = PROCESSORS.lock().map_err(lock_error)?;

        processors
            .remove(&pid)
            .ok_or_else(|| PyValueError::new_err("Invalid processor ID"))?;

        Ok(())
    }

    #[pymodule]
    fn fpgrowth(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(fp_growth_py, m)?)?;
        m.add_function(wrap_pyfunction!(create_lazy_fp_growth_py, m)?)?;
        m.add_function(wrap_pyfunction!(lazy_count_pass_py, m)?)?;
        m.add_function(wrap_pyfunction!(lazy_finalize_counts_py, m)?)?;
        m.add_function(wrap_pyfunction!(lazy_build_pass_py, m)?)?;
        m.add_function(wrap_pyfunction!(lazy_finalize_building_py, m)?)?;
        m.add_function(wrap_pyfunction!(lazy_mine_patterns_py, m)?)?;
        m.add_function(wrap_pyfunction!(lazy_cleanup_py, m)?)?;
        Ok(())
    }
}
