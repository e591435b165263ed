/*! Front half of the tarn compiler: the syntax tree, the type resolver and the lowering engine.
 *
 * A parsed program arrives as an [`ast::Block`]. [`type_check`] validates it against the
 * language's numeric-promotion and scoping rules; [`lower_program`] turns an accepted tree into a
 * [`tarn_core::Module`] whose functions are already verified.
 */

pub mod ast;
pub mod ast_to_ir;

pub use ast_to_ir::{
    lower_program, transform_ast_to_ir, type_check, Diagnostic, TransformError, TransformResult,
};
