/*! Turn tarn IR back into readable text.
 *
 * This is what `emit-ir` prints: every function block by block, with the runtime functions it
 * calls and the string buffers it references. Verbosity controls how much annotation accompanies
 * the instructions, from bare listings up to predecessor lists and instruction positions.
 */

pub mod config;
pub mod emitter;
pub mod ir_formatter_base;
pub mod tarn_emitter;

pub use config::{EmitterConfig, IndentStyle, VerbosityLevel};
pub use emitter::{EmitContext, EmitHelper, EmitResult, Emitter, Palette};
pub use ir_formatter_base::IRFormatterBase;
pub use tarn_emitter::TarnEmitter;
