/*! Runtime library for programs compiled by tarn.
 *
 * Every function here uses the C calling convention so JIT-compiled code and linked object files
 * can call it directly. The JIT resolves the functions through [`symbols`]; ahead-of-time builds
 * link this crate as a static library instead.
 *
 * `print` and `println` are variadic in the source language. Their trailing arguments arrive as a
 * pointer to 8-byte cells plus a count: integers are sign-extended, booleans zero-extended,
 * doubles stored as their bits and strings as their address.
 */

pub mod format;
mod output;

pub use output::capture_output;

use std::ffi::{c_char, CStr, CString};
use std::io::{self, BufRead};
use tracing::warn;

#[no_mangle]
pub extern "C" fn printi(value: i32) -> i32 {
    output::write_output(format!("{}\n", value).as_bytes())
}

#[no_mangle]
pub extern "C" fn printd(value: f64) -> i32 {
    let line = format::render(b"%f\n", &[value.to_bits()], |_| Vec::new());
    output::write_output(&line)
}

/// Formatted print.
///
/// # Safety
/// `fmt` must be a NUL-terminated string and `args` must point to `nargs`
/// cells. Cells consumed by `%s` must hold NUL-terminated string addresses.
#[no_mangle]
pub unsafe extern "C" fn print(fmt: *const c_char, args: *const u64, nargs: i32) -> i32 {
    output::write_output(&render_call(fmt, args, nargs))
}

/// Formatted print followed by a newline.
///
/// # Safety
/// Same contract as [`print`].
#[no_mangle]
pub unsafe extern "C" fn println(fmt: *const c_char, args: *const u64, nargs: i32) -> i32 {
    let mut line = render_call(fmt, args, nargs);
    line.push(b'\n');
    output::write_output(&line)
}

unsafe fn render_call(fmt: *const c_char, args: *const u64, nargs: i32) -> Vec<u8> {
    if fmt.is_null() {
        return Vec::new();
    }
    let fmt = CStr::from_ptr(fmt).to_bytes();
    let cells = match usize::try_from(nargs) {
        Ok(count) if count > 0 && !args.is_null() => std::slice::from_raw_parts(args, count),
        _ => &[],
    };

    format::render(fmt, cells, |address| {
        if address == 0 {
            b"(null)".to_vec()
        } else {
            CStr::from_ptr(address as *const c_char).to_bytes().to_vec()
        }
    })
}

#[no_mangle]
pub extern "C" fn readi() -> i32 {
    parse_int(&read_stdin_line())
}

#[no_mangle]
pub extern "C" fn readd() -> f64 {
    parse_double(&read_stdin_line())
}

/// Reads one line from stdin without its line terminator. Strings have no
/// owner in the language, so the buffer is never freed.
#[no_mangle]
pub extern "C" fn readline() -> *const c_char {
    CString::new(read_stdin_line())
        .unwrap_or_default()
        .into_raw()
}

#[no_mangle]
pub extern "C" fn pi() -> f64 {
    std::f64::consts::PI
}

pub extern "C" fn fabs(x: f64) -> f64 {
    x.abs()
}

pub extern "C" fn pow(base: f64, exponent: f64) -> f64 {
    base.powf(exponent)
}

pub extern "C" fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

pub extern "C" fn sin(x: f64) -> f64 {
    x.sin()
}

pub extern "C" fn cos(x: f64) -> f64 {
    x.cos()
}

/// Leading integer of `line`, or 0 when there is none.
pub fn parse_int(line: &str) -> i32 {
    let trimmed = line.trim();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().unwrap_or(0)
}

pub fn parse_double(line: &str) -> f64 {
    line.trim().parse().unwrap_or(0.0)
}

fn read_stdin_line() -> String {
    let mut line = String::new();
    if let Err(e) = io::stdin().lock().read_line(&mut line) {
        warn!("failed to read from stdin: {}", e);
        return String::new();
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    line
}

/// Every runtime function with the name generated code calls it by.
pub fn symbols() -> Vec<(&'static str, *const u8)> {
    vec![
        ("printi", printi as *const u8),
        ("printd", printd as *const u8),
        ("print", print as *const u8),
        ("println", println as *const u8),
        ("readi", readi as *const u8),
        ("readd", readd as *const u8),
        ("readline", readline as *const u8),
        ("pi", pi as *const u8),
        ("fabs", fabs as *const u8),
        ("pow", pow as *const u8),
        ("sqrt", sqrt as *const u8),
        ("sin", sin as *const u8),
        ("cos", cos as *const u8),
    ]
}

#[cfg(test)]
mod tests;
