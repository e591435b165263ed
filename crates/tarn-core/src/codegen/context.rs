use cranelift_codegen::ir::{self as clif_ir, AbiParam};
use cranelift_codegen::isa::OwnedTargetIsa;
use cranelift_codegen::settings::{self, Configurable};
use cranelift_module::Module as ClifModule;
use serde::{Deserialize, Serialize};

use crate::{types::Type, IrError, Result};

/// Knobs shared by object emission and JIT execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodegenOptions {
    pub optimize: bool,
    /// Keep the textual Cranelift IR of every defined function.
    pub print_clif: bool,
}

pub struct CodegenContext {
    pointer_type: clif_ir::Type,
}

impl CodegenContext {
    pub fn new(pointer_type: clif_ir::Type) -> Self {
        Self { pointer_type }
    }

    pub fn for_module<M: ClifModule>(module: &M) -> Self {
        Self::new(module.target_config().pointer_type())
    }

    pub fn pointer_type(&self) -> clif_ir::Type {
        self.pointer_type
    }

    pub fn get_clif_type(&self, ty: &Type) -> Result<clif_ir::Type> {
        ty.to_cranelift(self.pointer_type)
            .ok_or_else(|| IrError::TypeError(format!("{} has no machine representation", ty)))
    }

    /// Variadic callees receive their trailing arguments as a pointer to
    /// 8-byte cells followed by the cell count.
    pub fn signature<M: ClifModule>(
        &self,
        module: &M,
        params: &[Type],
        returns: Type,
        variadic: bool,
    ) -> Result<clif_ir::Signature> {
        let mut sig = module.make_signature();
        for param in params {
            sig.params.push(AbiParam::new(self.get_clif_type(param)?));
        }
        if variadic {
            sig.params.push(AbiParam::new(self.pointer_type));
            sig.params.push(AbiParam::new(clif_ir::types::I32));
        }
        if !returns.is_void() {
            sig.returns.push(AbiParam::new(self.get_clif_type(&returns)?));
        }
        Ok(sig)
    }
}

pub fn build_native_isa(options: &CodegenOptions, is_pic: bool) -> Result<OwnedTargetIsa> {
    let mut flags = settings::builder();
    flags
        .set("use_colocated_libcalls", "false")
        .map_err(setting_error)?;
    flags
        .set("is_pic", if is_pic { "true" } else { "false" })
        .map_err(setting_error)?;
    flags
        .set("opt_level", if options.optimize { "speed" } else { "none" })
        .map_err(setting_error)?;

    let isa_builder = cranelift_native::builder().map_err(|msg| {
        IrError::CraneliftError(format!("host machine is not supported by Cranelift: {}", msg))
    })?;

    isa_builder
        .finish(settings::Flags::new(flags))
        .map_err(module_error)
}

pub(crate) fn module_error(err: impl std::fmt::Display) -> IrError {
    IrError::CraneliftError(err.to_string())
}

fn setting_error(err: settings::SetError) -> IrError {
    IrError::CraneliftError(format!("failed to set Cranelift flag: {}", err))
}
