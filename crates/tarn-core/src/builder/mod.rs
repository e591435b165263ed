/*! Fluent API for constructing IR programmatically.
 *
 * A `FunctionBuilder` owns the function under construction together with its insertion point,
 * so a caller lowering nested functions keeps one builder per function and never has to save or
 * restore a shared cursor. Value numbering and alloca placement are handled here.
 */

pub mod function_builder;
pub mod inst_builder;

pub use function_builder::FunctionBuilder;
pub use inst_builder::FunctionInstBuilder;
