use crate::config::EmitterConfig;
use anyhow::Result;
use colored::Colorize;
use std::io::Write;

pub type EmitResult = Result<()>;

/// Syntactic role of a piece of output, used to pick its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Keyword,
    Label,
    Comment,
    Literal,
    Symbol,
}

#[derive(Debug, Clone)]
pub struct EmitContext {
    pub indent_level: usize,
    pub indent_chars: String,
    pub use_colors: bool,
}

impl EmitContext {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            indent_chars: "    ".to_string(),
            use_colors: true,
        }
    }

    pub fn from_config(config: &EmitterConfig) -> Self {
        Self {
            indent_level: 0,
            indent_chars: config.indent_style.unit(),
            use_colors: config.use_colors,
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn get_indent(&self) -> String {
        self.indent_chars.repeat(self.indent_level)
    }

    pub fn nested(&self) -> Self {
        let mut ctx = self.clone();
        ctx.indent();
        ctx
    }

    pub fn paint(&self, text: &str, role: Palette) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        match role {
            Palette::Keyword => text.blue().bold().to_string(),
            Palette::Label => text.yellow().to_string(),
            Palette::Comment => text.green().to_string(),
            Palette::Literal => text.magenta().to_string(),
            Palette::Symbol => text.cyan().to_string(),
        }
    }
}

impl Default for EmitContext {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Emitter {
    type Item;

    fn emit<W: Write>(
        &self,
        item: &Self::Item,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult;

    /// Context a fresh emission starts from.
    fn context(&self) -> EmitContext {
        EmitContext::new()
    }

    fn emit_to_string(&self, item: &Self::Item) -> Result<String> {
        let mut buffer = Vec::new();
        let mut context = self.context();
        self.emit(item, &mut buffer, &mut context)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct EmitHelper;

impl EmitHelper {
    pub fn write_line<W: Write>(writer: &mut W, context: &EmitContext, text: &str) -> EmitResult {
        writeln!(writer, "{}{}", context.get_indent(), text)?;
        Ok(())
    }

    /// Writes `text` followed by a `;` comment when there is one.
    pub fn write_annotated<W: Write>(
        writer: &mut W,
        context: &EmitContext,
        text: &str,
        comment: Option<&str>,
    ) -> EmitResult {
        match comment {
            Some(comment) => {
                let comment = context.paint(&format!("; {}", comment), Palette::Comment);
                writeln!(writer, "{}{}  {}", context.get_indent(), text, comment)?;
            }
            None => Self::write_line(writer, context, text)?,
        }
        Ok(())
    }

    pub fn write_comment<W: Write>(
        writer: &mut W,
        context: &EmitContext,
        comment: &str,
    ) -> EmitResult {
        let text = context.paint(&format!("; {}", comment), Palette::Comment);
        Self::write_line(writer, context, &text)
    }

    pub fn write_block<W: Write, F>(
        writer: &mut W,
        context: &mut EmitContext,
        header: &str,
        body: F,
    ) -> EmitResult
    where
        F: FnOnce(&mut W, &mut EmitContext) -> EmitResult,
    {
        Self::write_line(writer, context, &format!("{} {{", header))?;
        context.indent();
        body(writer, context)?;
        context.dedent();
        Self::write_line(writer, context, "}")?;
        Ok(())
    }
}
