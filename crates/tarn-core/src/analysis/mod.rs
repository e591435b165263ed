/*! Control-flow queries and IR verification.
 *
 * Lowering removes unreachable blocks and checks every function before it reaches the code
 * generator. Both rely on the successor edges recorded in block terminators.
 */

pub mod cfg;
pub mod verify;

pub use cfg::ControlFlowGraph;
pub use verify::verify_function;
