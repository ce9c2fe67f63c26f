/// Dense candidate sets over pattern indices
pub mod bitset;
/// Solver view of the adjacency index with per-direction compatibility
pub mod catalog;
/// Rendering of solved grids back into pixels
pub mod compositor;
/// Retrying synthesis driver tying extraction, solving and compositing together
pub mod executor;
/// Constraint propagation after each collapse
pub mod propagation;
/// Cell ordering and weighted pattern sampling
pub mod selection;
/// Collapse-and-propagate solver
pub mod solver;
