use crate::config::EmitterConfig;
use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emitter, Palette};
use crate::ir_formatter_base::IRFormatterBase;
use std::collections::HashSet;
use std::io::Write;
use tarn_core::{
    analysis::ControlFlowGraph,
    block::BasicBlock,
    function::Function,
    instructions::Instruction,
    module::Module,
};

/// Writes a module as text: runtime declarations, the string table, then
/// every function block by block.
pub struct TarnEmitter {
    config: EmitterConfig,
}

impl TarnEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    fn emit_declarations<W: Write>(
        &self,
        module: &Module,
        writer: &mut W,
        context: &EmitContext,
    ) -> EmitResult {
        let called = called_functions(module);
        let all = self.config.verbosity.should_print_unused_externals();

        for external in module
            .externals
            .values()
            .filter(|ext| all || called.contains(ext.name.as_str()))
        {
            let line = format!(
                "{} {}{}",
                context.paint("declare", Palette::Keyword),
                context.paint(&format!("@{}", external.name), Palette::Symbol),
                IRFormatterBase::format_signature(
                    &external.params,
                    &external.returns,
                    external.is_variadic
                )
            );
            EmitHelper::write_line(writer, context, &line)?;
        }

        for (id, text) in module.strings() {
            let line = format!(
                "{} {} = {}",
                context.paint("data", Palette::Keyword),
                context.paint(&id.to_string(), Palette::Symbol),
                context.paint(&IRFormatterBase::format_string(text), Palette::Literal)
            );
            EmitHelper::write_line(writer, context, &line)?;
        }
        Ok(())
    }

    fn emit_function<W: Write>(
        &self,
        function: &Function,
        writer: &mut W,
        context: &EmitContext,
    ) -> EmitResult {
        let signature = &function.signature;
        let params = signature
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| format!("p{}: {}", i, p.param_type))
            .collect::<Vec<_>>()
            .join(", ");
        let header = format!(
            "{} {}({}) -> {} {{",
            context.paint("function", Palette::Keyword),
            context.paint(&format!("@{}", signature.name), Palette::Symbol),
            params,
            signature.returns
        );
        EmitHelper::write_line(writer, context, &header)?;

        let cfg = ControlFlowGraph::from_function(&function.body);
        let loop_headers = cfg.loop_headers();
        for block in function.body.blocks.values() {
            let comment = self.block_comment(block, &cfg, loop_headers.contains(&block.id));
            self.emit_block(block, comment, writer, context)?;
        }

        EmitHelper::write_line(writer, context, "}")
    }

    fn block_comment(
        &self,
        block: &BasicBlock,
        cfg: &ControlFlowGraph,
        is_loop_header: bool,
    ) -> Option<String> {
        let verbosity = self.config.verbosity;
        let mut parts = Vec::new();

        if verbosity.should_print_annotations() {
            parts.push(block.label.clone());
            if is_loop_header {
                parts.push("loop header".to_string());
            }
        }

        if verbosity.should_print_predecessors() {
            let preds = cfg.predecessors(block.id);
            if !preds.is_empty() {
                let mut preds: Vec<_> = preds.to_vec();
                preds.sort();
                let names: Vec<String> = preds.iter().map(ToString::to_string).collect();
                parts.push(format!("preds: {}", names.join(" ")));
            }
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    fn emit_block<W: Write>(
        &self,
        block: &BasicBlock,
        comment: Option<String>,
        writer: &mut W,
        context: &EmitContext,
    ) -> EmitResult {
        let label = context.paint(&format!("{}:", block.id), Palette::Label);
        EmitHelper::write_annotated(writer, context, &label, comment.as_deref())?;

        let body = context.nested();
        let verbosity = self.config.verbosity;
        for (position, inst) in block.instructions.iter().enumerate() {
            let mut text = IRFormatterBase::format_instruction(inst, self.config.include_types);
            if verbosity.should_print_positions() {
                text = format!("[{}] {}", position, text);
            }
            let comment = match inst {
                Instruction::Alloca { name, .. } if verbosity.should_print_annotations() => {
                    Some(name.as_str())
                }
                _ => None,
            };
            EmitHelper::write_annotated(writer, &body, &text, comment)?;
        }

        EmitHelper::write_line(
            writer,
            &body,
            &IRFormatterBase::format_terminator(&block.terminator),
        )
    }
}

impl Default for TarnEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl Emitter for TarnEmitter {
    type Item = Module;

    fn context(&self) -> EmitContext {
        EmitContext::from_config(&self.config)
    }

    fn emit<W: Write>(
        &self,
        module: &Module,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        EmitHelper::write_comment(writer, context, &format!("module {}", module.name))?;
        if self.config.verbosity.should_print_declarations() {
            self.emit_declarations(module, writer, context)?;
        }

        for function in module.functions.values() {
            writeln!(writer)?;
            self.emit_function(function, writer, context)?;
        }
        Ok(())
    }
}

fn called_functions(module: &Module) -> HashSet<&str> {
    module
        .functions
        .values()
        .flat_map(|function| function.body.blocks.values())
        .flat_map(|block| block.instructions.iter())
        .filter_map(|inst| match inst {
            Instruction::Call { callee, .. } => Some(callee.as_str()),
            _ => None,
        })
        .collect()
}
