use crate::format::render;
use pretty_assertions::assert_eq;

fn fmt(spec: &str, cells: &[u64]) -> String {
    let bytes = render(spec.as_bytes(), cells, |address| {
        format!("<str@{}>", address).into_bytes()
    });
    String::from_utf8(bytes).unwrap()
}

fn int(value: i32) -> u64 {
    value as i64 as u64
}

fn float(value: f64) -> u64 {
    value.to_bits()
}

#[test]
fn test_integers() {
    assert_eq!(fmt("%d", &[int(42)]), "42");
    assert_eq!(fmt("%i|%d", &[int(-7), int(0)]), "-7|0");
    assert_eq!(fmt("%u", &[int(-1)]), "4294967295");
    assert_eq!(fmt("%x %X", &[int(255), int(255)]), "ff FF");
}

#[test]
fn test_integer_flags_and_width() {
    assert_eq!(fmt("[%5d]", &[int(42)]), "[   42]");
    assert_eq!(fmt("[%-5d]", &[int(42)]), "[42   ]");
    assert_eq!(fmt("[%05d]", &[int(-42)]), "[-0042]");
    assert_eq!(fmt("[%+d]", &[int(3)]), "[+3]");
    assert_eq!(fmt("[% d]", &[int(3)]), "[ 3]");
    assert_eq!(fmt("[%.3d]", &[int(7)]), "[007]");
    assert_eq!(fmt("[%08.3d]", &[int(7)]), "[     007]");
}

#[test]
fn test_fixed_floats() {
    assert_eq!(fmt("%f", &[float(3.5)]), "3.500000");
    assert_eq!(fmt("%.2f", &[float(2.0 / 3.0)]), "0.67");
    assert_eq!(fmt("%8.3f|", &[float(-1.25)]), "  -1.250|");
    assert_eq!(fmt("%+.1f", &[float(0.5)]), "+0.5");
    assert_eq!(fmt("%.0f", &[float(2.0)]), "2");
}

#[test]
fn test_exponent_floats() {
    assert_eq!(fmt("%e", &[float(1234.5)]), "1.234500e+03");
    assert_eq!(fmt("%.2E", &[float(0.00012)]), "1.20E-04");
}

#[test]
fn test_general_floats() {
    assert_eq!(fmt("%g", &[float(3.5)]), "3.5");
    assert_eq!(fmt("%g", &[float(100000.0)]), "100000");
    assert_eq!(fmt("%g", &[float(1000000.0)]), "1e+06");
    assert_eq!(fmt("%g", &[float(0.0001)]), "0.0001");
    assert_eq!(fmt("%G", &[float(0.00001)]), "1E-05");
    assert_eq!(fmt("%g", &[float(0.0)]), "0");
}

#[test]
fn test_non_finite_floats() {
    assert_eq!(fmt("%f", &[float(f64::INFINITY)]), "inf");
    assert_eq!(fmt("%F", &[float(f64::NEG_INFINITY)]), "-INF");
    assert_eq!(fmt("%f", &[float(f64::NAN)]), "nan");
}

#[test]
fn test_strings_and_chars() {
    assert_eq!(fmt("%s!", &[9]), "<str@9>!");
    assert_eq!(fmt("%.4s", &[9]), "<str");
    assert_eq!(fmt("[%8s]", &[1]), "[ <str@1>]");
    assert_eq!(fmt("%c%c", &[b'o' as u64, b'k' as u64]), "ok");
}

#[test]
fn test_percent_and_missing_arguments() {
    assert_eq!(fmt("100%%", &[]), "100%");
    assert_eq!(fmt("a=%d b=%d", &[int(1)]), "a=1 b=");
    assert_eq!(fmt("%q", &[]), "%q");
    assert_eq!(fmt("trailing %", &[]), "trailing %");
}
