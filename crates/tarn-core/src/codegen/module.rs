use cranelift_frontend::{FunctionBuilder, FunctionBuilderContext};
use cranelift_module::{DataDescription, FuncId, Linkage, Module as ClifModule};
use cranelift_object::{ObjectBuilder, ObjectModule};
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::{
    codegen::context::{build_native_isa, module_error, CodegenContext, CodegenOptions},
    codegen::lowering::{Declarations, FunctionLowering},
    module::Module,
    IrError, Result,
};

/// Ids of everything defined in a Cranelift module, plus the textual
/// Cranelift IR when it was requested.
pub struct CompiledModule {
    pub functions: HashMap<String, FuncId>,
    pub clif: Vec<String>,
}

/// Declares and defines every function of `ir` inside `target`. Works for
/// both the object and the JIT backends.
pub fn compile_into_module<M: ClifModule>(
    target: &mut M,
    ir: &Module,
    options: &CodegenOptions,
) -> Result<CompiledModule> {
    let ctx = CodegenContext::for_module(&*target);
    let mut functions = HashMap::new();

    for (name, external) in &ir.externals {
        let sig = ctx.signature(
            &*target,
            &external.params,
            external.returns,
            external.is_variadic,
        )?;
        let func_id = target
            .declare_function(name, Linkage::Import, &sig)
            .map_err(module_error)?;
        functions.insert(name.clone(), func_id);
    }

    for (name, function) in &ir.functions {
        let sig = ctx.signature(
            &*target,
            &function.signature.param_types(),
            function.signature.returns,
            false,
        )?;
        let func_id = target
            .declare_function(name, Linkage::Export, &sig)
            .map_err(module_error)?;
        functions.insert(name.clone(), func_id);
    }

    let mut strings = HashMap::new();
    for (id, text) in ir.strings() {
        let mut data = DataDescription::new();
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        data.define(bytes.into_boxed_slice());

        let data_id = target
            .declare_data(&id.symbol(), Linkage::Local, false, false)
            .map_err(module_error)?;
        target.define_data(data_id, &data).map_err(module_error)?;
        strings.insert(id, data_id);
    }

    let decls = Declarations {
        functions,
        externals: ir
            .externals
            .iter()
            .map(|(name, ext)| (name.clone(), ext.clone()))
            .collect(),
        strings,
    };

    let mut clif = Vec::new();
    let mut builder_context = FunctionBuilderContext::new();

    for (name, function) in &ir.functions {
        let func_id = *decls
            .functions
            .get(name)
            .ok_or_else(|| IrError::UnknownFunction(name.clone()))?;

        let mut context = target.make_context();
        context.func.signature = target
            .declarations()
            .get_function_decl(func_id)
            .signature
            .clone();

        {
            let mut builder = FunctionBuilder::new(&mut context.func, &mut builder_context);
            FunctionLowering::new(target, &decls).lower_function(function, &mut builder)?;
            builder.finalize();
        }

        trace!(function = %name, "lowered to Cranelift IR");
        if options.print_clif {
            clif.push(context.func.display().to_string());
        }

        target
            .define_function(func_id, &mut context)
            .map_err(|e| {
                IrError::CraneliftError(format!("Failed to define function `{}`: {:?}", name, e))
            })?;
        target.clear_context(&mut context);
    }

    debug!(
        module = %ir.name,
        functions = ir.functions.len(),
        strings = ir.strings.len(),
        "module compiled"
    );

    Ok(CompiledModule {
        functions: decls.functions,
        clif,
    })
}

/// Output of object emission.
pub struct ObjectArtifact {
    pub bytes: Vec<u8>,
    pub clif: Vec<String>,
}

pub struct ModuleBuilder {
    module: ObjectModule,
    options: CodegenOptions,
}

impl ModuleBuilder {
    pub fn new(name: &str, options: CodegenOptions) -> Result<Self> {
        let isa = build_native_isa(&options, true)?;
        let object_builder =
            ObjectBuilder::new(isa, name, cranelift_module::default_libcall_names())
                .map_err(module_error)?;
        let module = ObjectModule::new(object_builder);

        Ok(Self { module, options })
    }

    pub fn compile_module(mut self, ir: &Module) -> Result<ObjectArtifact> {
        let compiled = compile_into_module(&mut self.module, ir, &self.options)?;

        let product = self.module.finish();
        let bytes = product
            .emit()
            .map_err(|e| IrError::CraneliftError(format!("Failed to emit object: {}", e)))?;

        Ok(ObjectArtifact {
            bytes,
            clif: compiled.clif,
        })
    }
}
