use super::errors::TransformError;
use super::registry::{FunctionRegistry, ENTRY_FUNCTION};
use super::scope::ScopeChain;
use crate::ast::{Param, Type};
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use tarn_core::{
    builder::{FunctionBuilder, FunctionInstBuilder},
    function::Parameter,
    values::{SlotId, Value},
    Module, Type as IrType,
};

/// A lowered expression: the IR value, its type in the source language, and
/// the IR type actually holding it. The last two differ for comparisons,
/// which are numeric in the source but `bool` in the IR.
#[derive(Debug, Clone, PartialEq)]
pub struct Typed {
    pub value: Value,
    pub ty: Type,
    pub repr: IrType,
}

impl Typed {
    pub fn new(value: Value, ty: Type) -> Self {
        Self {
            value,
            ty,
            repr: ty.to_ir(),
        }
    }

    pub fn boolean(value: Value, ty: Type) -> Self {
        Self {
            value,
            ty,
            repr: IrType::Bool,
        }
    }
}

/// The stack slot backing a named variable or parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Storage {
    pub slot: SlotId,
    pub ty: Type,
}

/// Everything owned by one function while it is being lowered, including
/// its own insertion point.
pub struct FunctionFrame {
    pub builder: FunctionBuilder,
    pub params: HashMap<String, Storage>,
    pub locals: HashMap<String, Storage>,
    pub returns: Type,
}

impl FunctionFrame {
    /// Locals shadow parameters.
    pub fn storage(&self, name: &str) -> Option<Storage> {
        self.locals
            .get(name)
            .or_else(|| self.params.get(name))
            .copied()
    }
}

/// State threaded through lowering: the module under construction, the
/// function registry, the scope chain and the stack of functions being built.
pub struct EmissionContext<'r> {
    pub(crate) module: Module,
    pub(crate) registry: &'r FunctionRegistry<'r>,
    pub(crate) scopes: ScopeChain,
    frames: Vec<FunctionFrame>,
}

impl<'r> EmissionContext<'r> {
    pub fn new(module_name: &str, registry: &'r FunctionRegistry<'r>) -> Self {
        Self {
            module: Module::with_runtime(module_name),
            registry,
            scopes: ScopeChain::new(Type::Int32),
            frames: Vec::new(),
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn into_module(self) -> Module {
        self.module
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn function_name(&self) -> &str {
        self.frames
            .last()
            .map(|frame| frame.builder.name())
            .unwrap_or(ENTRY_FUNCTION)
    }

    pub fn frame(&self) -> Result<&FunctionFrame, TransformError> {
        self.frames
            .last()
            .ok_or_else(|| TransformError::EmissionError("no function is being lowered".into()))
    }

    pub fn frame_mut(&mut self) -> Result<&mut FunctionFrame, TransformError> {
        self.frames
            .last_mut()
            .ok_or_else(|| TransformError::EmissionError("no function is being lowered".into()))
    }

    pub fn builder(&mut self) -> Result<&mut FunctionBuilder, TransformError> {
        Ok(&mut self.frame_mut()?.builder)
    }

    pub fn ins(&mut self) -> Result<FunctionInstBuilder<'_>, TransformError> {
        Ok(self.builder()?.ins()?)
    }

    /// Storage for `name` in the current function. A name bound only in an
    /// enclosing function has no storage here.
    pub fn storage(&self, name: &str) -> Result<Storage, TransformError> {
        if let Some(storage) = self.frame()?.storage(name) {
            return Ok(storage);
        }
        if self.scopes.lookup(name).is_some() {
            Err(TransformError::UnboundStorage(name.to_string()))
        } else {
            Err(TransformError::UnboundName(name.to_string()))
        }
    }

    /// Starts a new function: pushes its frame and its scope table, then
    /// copies every incoming argument into a slot of its own. Both are popped
    /// when the returned guard is dropped.
    pub fn enter_function(
        &mut self,
        name: &str,
        params: &[Param],
        returns: Type,
    ) -> Result<FrameGuard<'_, 'r>, TransformError> {
        let signature = params
            .iter()
            .map(|p| Parameter::new(p.name.clone(), p.ty.to_ir()))
            .collect();

        let depth = self.frames.len();
        let scope_depth = self.scopes.push(returns);
        self.frames.push(FunctionFrame {
            builder: FunctionBuilder::new(name, signature, returns.to_ir()),
            params: HashMap::new(),
            locals: HashMap::new(),
            returns,
        });
        let mut guard = FrameGuard {
            ctx: self,
            depth,
            scope_depth,
        };

        for (index, param) in params.iter().enumerate() {
            if param.ty == Type::Void {
                return Err(TransformError::VoidBinding(param.name.clone()));
            }
            let ty = param.ty.to_ir();
            let frame = guard.frame_mut()?;
            let slot = frame.builder.alloca(&param.name, ty)?;
            let incoming = frame.builder.get_param(index);
            frame.builder.ins()?.store(slot, incoming, ty);
            frame.params.insert(
                param.name.clone(),
                Storage {
                    slot,
                    ty: param.ty,
                },
            );
            guard.scopes.declare(param.name.clone(), param.ty);
        }

        Ok(guard)
    }
}

/// Keeps a function frame on the stack for as long as it is alive.
pub struct FrameGuard<'c, 'r> {
    ctx: &'c mut EmissionContext<'r>,
    depth: usize,
    scope_depth: usize,
}

impl FrameGuard<'_, '_> {
    /// Pops the frame so the finished function can be installed.
    pub fn finish(self) -> Result<FunctionFrame, TransformError> {
        self.ctx.frames.truncate(self.depth + 1);
        self.ctx
            .frames
            .pop()
            .ok_or_else(|| TransformError::EmissionError("function frame already popped".into()))
    }
}

impl<'r> Deref for FrameGuard<'_, 'r> {
    type Target = EmissionContext<'r>;

    fn deref(&self) -> &EmissionContext<'r> {
        self.ctx
    }
}

impl<'r> DerefMut for FrameGuard<'_, 'r> {
    fn deref_mut(&mut self) -> &mut EmissionContext<'r> {
        self.ctx
    }
}

impl Drop for FrameGuard<'_, '_> {
    fn drop(&mut self) {
        self.ctx.frames.truncate(self.depth);
        self.ctx.scopes.truncate(self.scope_depth);
    }
}
