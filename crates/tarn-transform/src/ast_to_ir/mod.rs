/*! Type-check a program and lower it to tarn IR.
 *
 * Checking is a gate: lowering only ever sees a tree the resolver accepted, and it reuses the
 * resolver's typing rules rather than re-deriving types from the IR it emits. Both passes walk the
 * same kind of scope chain, so a name means the same thing to each of them.
 */

mod context;
mod control_flow_builder;
mod errors;
mod expression_transformer;
mod registry;
mod scope;
mod structural_transformer;
mod type_resolver;

pub use context::{EmissionContext, FrameGuard, FunctionFrame, Storage, Typed};
pub use control_flow_builder::{ELSE, IF_CONT, LOOP_BODY, LOOP_COND, LOOP_EXIT, THEN};
pub use errors::{Diagnostic, TransformError, TransformResult};
pub use registry::{FunctionRegistry, ENTRY_FUNCTION};
pub use scope::{ScopeChain, ScopeGuard, SymbolTable};
pub use structural_transformer::AFTER_RETURN;
pub use type_resolver::{binary_type, coercible, unary_type, Callee, TypeResolver};

use crate::ast::{Block, Type};
use tarn_core::Module;
use tracing::debug;

/// Checks a whole program and reports every failure found.
pub fn type_check(program: &Block) -> Result<(), Vec<Diagnostic>> {
    let registry = FunctionRegistry::collect(program)?;
    let mut scopes = ScopeChain::new(Type::Int32);
    let mut resolver = TypeResolver::new(&registry);
    resolver.check_program(program, &mut scopes);

    let diagnostics = resolver.into_diagnostics();
    debug!(
        functions = registry.len(),
        errors = diagnostics.len(),
        "type check finished"
    );

    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

/// Lowers a program that already passed [`type_check`]. The first failure
/// aborts lowering.
pub fn lower_program(program: &Block, module_name: &str) -> Result<Module, Diagnostic> {
    let registry = FunctionRegistry::collect(program).map_err(|diagnostics| {
        diagnostics.into_iter().next().unwrap_or_else(|| {
            Diagnostic::new(
                ENTRY_FUNCTION,
                "",
                TransformError::EmissionError("function registry rejected the program".into()),
            )
        })
    })?;

    let mut ctx = EmissionContext::new(module_name, &registry);
    ctx.lower_entry(program)?;
    let module = ctx.into_module();

    debug!(
        module = %module.name,
        functions = module.functions.len(),
        strings = module.strings.len(),
        "program lowered"
    );
    Ok(module)
}

/// Type-checks, then lowers.
pub fn transform_ast_to_ir(program: &Block, module_name: &str) -> Result<Module, Vec<Diagnostic>> {
    type_check(program)?;
    lower_program(program, module_name).map_err(|diagnostic| vec![diagnostic])
}

#[cfg(test)]
mod tests;
