//! printf-style rendering over the argument cells of a variadic runtime call.
//!
//! Generated code cannot pass C varargs, so `print` and `println` receive their
//! trailing arguments as an array of 8-byte cells. A cell carries no type of its
//! own; the conversion that consumes it decides how its bits are read.

/// Renders `fmt` against `cells`. String conversions hand their cell to
/// `resolve_str`, which turns the stored address into bytes.
pub fn render(fmt: &[u8], cells: &[u64], resolve_str: impl Fn(u64) -> Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(fmt.len());
    let mut args = cells.iter().copied();
    let mut i = 0;

    while i < fmt.len() {
        if fmt[i] != b'%' {
            out.push(fmt[i]);
            i += 1;
            continue;
        }

        let start = i;
        i += 1;
        let mut spec = Spec::default();
        while let Some(&flag) = fmt.get(i) {
            match flag {
                b'-' => spec.left = true,
                b'0' => spec.zero = true,
                b'+' => spec.plus = true,
                b' ' => spec.space = true,
                _ => break,
            }
            i += 1;
        }
        spec.width = digits(fmt, &mut i);
        if fmt.get(i) == Some(&b'.') {
            i += 1;
            spec.precision = Some(digits(fmt, &mut i).unwrap_or(0));
        }
        while matches!(fmt.get(i), Some(b'l' | b'h' | b'z')) {
            i += 1;
        }

        let Some(&conversion) = fmt.get(i) else {
            out.extend_from_slice(&fmt[start..]);
            break;
        };
        i += 1;

        match conversion {
            b'%' => out.push(b'%'),
            b'd' | b'i' | b'u' | b'x' | b'X' => {
                if let Some(cell) = args.next() {
                    spec.render_int(&mut out, conversion, cell);
                }
            }
            b'f' | b'F' | b'e' | b'E' | b'g' | b'G' => {
                if let Some(cell) = args.next() {
                    spec.render_float(&mut out, conversion, f64::from_bits(cell));
                }
            }
            b's' => {
                if let Some(cell) = args.next() {
                    let mut text = resolve_str(cell);
                    if let Some(limit) = spec.precision {
                        text.truncate(limit);
                    }
                    spec.pad(&mut out, "", &text, false);
                }
            }
            b'c' => {
                if let Some(cell) = args.next() {
                    spec.pad(&mut out, "", &[cell as u8], false);
                }
            }
            _ => out.extend_from_slice(&fmt[start..i]),
        }
    }

    out
}

#[derive(Debug, Default)]
struct Spec {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

impl Spec {
    fn sign(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        }
    }

    fn render_int(&self, out: &mut Vec<u8>, conversion: u8, cell: u64) {
        let (sign, mut body) = match conversion {
            b'd' | b'i' => {
                let value = cell as i64;
                (self.sign(value < 0), value.unsigned_abs().to_string())
            }
            b'u' => ("", (cell as u32).to_string()),
            b'x' => ("", format!("{:x}", cell as u32)),
            _ => ("", format!("{:X}", cell as u32)),
        };

        if let Some(precision) = self.precision {
            if precision == 0 && body == "0" {
                body.clear();
            }
            if body.len() < precision {
                body = format!("{}{}", "0".repeat(precision - body.len()), body);
            }
        }

        self.pad(out, sign, body.as_bytes(), self.precision.is_none());
    }

    fn render_float(&self, out: &mut Vec<u8>, conversion: u8, value: f64) {
        let upper = conversion.is_ascii_uppercase();
        let sign = self.sign(value.is_sign_negative() && !value.is_nan());
        let magnitude = value.abs();

        if !value.is_finite() {
            let text = match (value.is_nan(), upper) {
                (true, false) => "nan",
                (true, true) => "NAN",
                (false, false) => "inf",
                (false, true) => "INF",
            };
            self.pad(out, sign, text.as_bytes(), false);
            return;
        }

        let precision = self.precision.unwrap_or(6);
        let body = match conversion.to_ascii_lowercase() {
            b'f' => format!("{:.*}", precision, magnitude),
            b'e' => exponent_form(magnitude, precision, upper),
            _ => general_form(magnitude, precision, upper),
        };

        self.pad(out, sign, body.as_bytes(), true);
    }

    fn pad(&self, out: &mut Vec<u8>, sign: &str, body: &[u8], numeric: bool) {
        let fill = self
            .width
            .unwrap_or(0)
            .saturating_sub(sign.len() + body.len());

        if self.left {
            out.extend_from_slice(sign.as_bytes());
            out.extend_from_slice(body);
            out.extend(std::iter::repeat(b' ').take(fill));
        } else if self.zero && numeric {
            out.extend_from_slice(sign.as_bytes());
            out.extend(std::iter::repeat(b'0').take(fill));
            out.extend_from_slice(body);
        } else {
            out.extend(std::iter::repeat(b' ').take(fill));
            out.extend_from_slice(sign.as_bytes());
            out.extend_from_slice(body);
        }
    }
}

fn digits(fmt: &[u8], i: &mut usize) -> Option<usize> {
    let start = *i;
    while fmt.get(*i).is_some_and(u8::is_ascii_digit) {
        *i += 1;
    }
    std::str::from_utf8(&fmt[start..*i]).ok()?.parse().ok()
}

/// `d.ddde+XX`: at least two exponent digits, always signed.
fn exponent_form(magnitude: f64, precision: usize, upper: bool) -> String {
    let rust = format!("{:.*e}", precision, magnitude);
    let (mantissa, exponent) = split_exponent(&rust);
    format!(
        "{}{}{}{:02}",
        mantissa,
        if upper { 'E' } else { 'e' },
        if exponent < 0 { '-' } else { '+' },
        exponent.unsigned_abs()
    )
}

fn general_form(magnitude: f64, precision: usize, upper: bool) -> String {
    let significant = precision.max(1);
    let exponent = if magnitude == 0.0 {
        0
    } else {
        split_exponent(&format!("{:.*e}", significant - 1, magnitude)).1
    };

    let rendered = if exponent >= -4 && exponent < significant as i32 {
        let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
        format!("{:.*}", decimals, magnitude)
    } else {
        exponent_form(magnitude, significant - 1, upper)
    };

    strip_trailing_zeros(&rendered)
}

fn split_exponent(rust: &str) -> (&str, i32) {
    match rust.rsplit_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse().unwrap_or(0)),
        None => (rust, 0),
    }
}

fn strip_trailing_zeros(rendered: &str) -> String {
    let (mantissa, suffix) = match rendered.find(['e', 'E']) {
        Some(pos) => rendered.split_at(pos),
        None => (rendered, ""),
    };
    if !mantissa.contains('.') {
        return rendered.to_string();
    }
    let trimmed = mantissa.trim_end_matches('0').trim_end_matches('.');
    format!("{}{}", trimmed, suffix)
}
