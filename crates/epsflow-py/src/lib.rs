use epsflow_core::{SimpleMinCostFlow, SolverOptions, Status};
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;
use pyo3::types::PyDict;

#[allow(clippy::too_many_arguments)]
fn build_solver(
    n: usize,
    tail: PyReadonlyArray1<'_, i64>,
    head: PyReadonlyArray1<'_, i64>,
    capacity: PyReadonlyArray1<'_, i64>,
    cost: PyReadonlyArray1<'_, i64>,
    supply: PyReadonlyArray1<'_, i64>,
    options: SolverOptions,
) -> PyResult<SimpleMinCostFlow> {
    let tail_slice = tail.as_slice()?;
    let head_slice = head.as_slice()?;
    let capacity_slice = capacity.as_slice()?;
    let cost_slice = cost.as_slice()?;
    if head_slice.len() != tail_slice.len()
        || capacity_slice.len() != tail_slice.len()
        || cost_slice.len() != tail_slice.len()
    {
        return Err(pyo3::exceptions::PyValueError::new_err(
            "arc arrays must match tail length",
        ));
    }
    let supply_slice = supply.as_slice()?;
    if supply_slice.len() != n {
        return Err(pyo3::exceptions::PyValueError::new_err(
            "supply length does not match n",
        ));
    }

    let mut solver = SimpleMinCostFlow::with_options(options);
    for (((&t, &h), &cap), &c) in tail_slice
        .iter()
        .zip(head_slice.iter())
        .zip(capacity_slice.iter())
        .zip(cost_slice.iter())
    {
        let tail_index = usize::try_from(t)
            .map_err(|_| pyo3::exceptions::PyValueError::new_err("tail index out of range"))?;
        let head_index = usize::try_from(h)
            .map_err(|_| pyo3::exceptions::PyValueError::new_err("head index out of range"))?;
        if tail_index >= n || head_index >= n {
            return Err(pyo3::exceptions::PyValueError::new_err(
                "arc endpoint outside node range",
            ));
        }
        if cap < 0 {
            return Err(pyo3::exceptions::PyValueError::new_err(
                "capacity must be non-negative",
            ));
        }
        solver.add_arc_with_capacity_and_unit_cost(tail_index, head_index, cap, c);
    }
    for (node, &value) in supply_slice.iter().enumerate() {
        solver.set_node_supply(node, value);
    }
    Ok(solver)
}

fn build_options(
    alpha: Option<i64>,
    use_price_update: Option<bool>,
    check_feasibility: Option<bool>,
) -> PyResult<SolverOptions> {
    let mut options = SolverOptions::default();
    if let Some(value) = alpha {
        if value < 2 {
            return Err(pyo3::exceptions::PyValueError::new_err(
                "alpha must be at least 2",
            ));
        }
        options.alpha = value;
    }
    if let Some(value) = use_price_update {
        options.use_price_update = value;
    }
    if let Some(value) = check_feasibility {
        options.check_feasibility = value;
    }
    Ok(options)
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::NotSolved => "not_solved",
        Status::Optimal => "optimal",
        Status::Feasible => "feasible",
        Status::Infeasible => "infeasible",
        Status::Unbalanced => "unbalanced",
        Status::BadResult => "bad_result",
        Status::BadCostRange => "bad_cost_range",
    }
}

/// Solves a min-cost flow instance given as parallel edge arrays. Returns
/// `(flow, cost, status)`; the flow array is all zeros unless the status is
/// "optimal".
#[allow(clippy::too_many_arguments)]
#[pyfunction]
#[pyo3(signature = (
    n,
    tail,
    head,
    capacity,
    cost,
    supply,
    *,
    alpha = None,
    use_price_update = None,
    check_feasibility = None
))]
fn min_cost_flow_edges(
    py: Python<'_>,
    n: usize,
    tail: PyReadonlyArray1<'_, i64>,
    head: PyReadonlyArray1<'_, i64>,
    capacity: PyReadonlyArray1<'_, i64>,
    cost: PyReadonlyArray1<'_, i64>,
    supply: PyReadonlyArray1<'_, i64>,
    alpha: Option<i64>,
    use_price_update: Option<bool>,
    check_feasibility: Option<bool>,
) -> PyResult<(Py<PyArray1<i64>>, i64, String)> {
    let options = build_options(alpha, use_price_update, check_feasibility)?;
    let mut solver = build_solver(n, tail, head, capacity, cost, supply, options)?;
    let status = solver.solve();
    let flows: Vec<i64> = (0..solver.num_arcs()).map(|arc| solver.flow(arc)).collect();
    Ok((
        PyArray1::from_vec_bound(py, flows).unbind(),
        solver.optimal_cost(),
        status_label(status).to_string(),
    ))
}

/// Like `min_cost_flow_edges`, but also returns the feasible supplies the
/// max-flow check recorded, keyed by node index.
#[allow(clippy::too_many_arguments)]
#[pyfunction]
#[pyo3(signature = (
    n,
    tail,
    head,
    capacity,
    cost,
    supply,
    *,
    alpha = None,
    use_price_update = None,
    check_feasibility = None
))]
fn min_cost_flow_edges_with_diagnostics(
    py: Python<'_>,
    n: usize,
    tail: PyReadonlyArray1<'_, i64>,
    head: PyReadonlyArray1<'_, i64>,
    capacity: PyReadonlyArray1<'_, i64>,
    cost: PyReadonlyArray1<'_, i64>,
    supply: PyReadonlyArray1<'_, i64>,
    alpha: Option<i64>,
    use_price_update: Option<bool>,
    check_feasibility: Option<bool>,
) -> PyResult<(Py<PyArray1<i64>>, i64, String, PyObject)> {
    let options = build_options(alpha, use_price_update, check_feasibility)?;
    let mut solver = build_solver(n, tail, head, capacity, cost, supply, options)?;
    let status = solver.solve();
    let flows: Vec<i64> = (0..solver.num_arcs()).map(|arc| solver.flow(arc)).collect();
    let feasible: Vec<i64> = (0..n).map(|node| solver.feasible_supply(node)).collect();

    let diagnostics = PyDict::new_bound(py);
    diagnostics.set_item("feasible_supply", PyArray1::from_vec_bound(py, feasible))?;
    Ok((
        PyArray1::from_vec_bound(py, flows).unbind(),
        solver.optimal_cost(),
        status_label(status).to_string(),
        diagnostics.to_object(py),
    ))
}

#[pymodule]
fn _core(_py: Python<'_>, module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add("__version__", env!("CARGO_PKG_VERSION"))?;
    module.add_function(wrap_pyfunction!(min_cost_flow_edges, module)?)?;
    module.add_function(wrap_pyfunction!(min_cost_flow_edges_with_diagnostics, module)?)?;
    module.add("__doc__", "Rust core bindings for epsflow")?;
    module.add(
        "__all__",
        vec![
            "min_cost_flow_edges",
            "min_cost_flow_edges_with_diagnostics",
            "__version__",
        ],
    )?;
    Ok(())
}
