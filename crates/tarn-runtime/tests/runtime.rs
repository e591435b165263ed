use pretty_assertions::assert_eq;
use std::ffi::CString;
use tarn_runtime::{capture_output, pi, print, printd, printi, println, symbols};

#[test]
fn test_printi_and_printd_lines() {
    let (_, output) = capture_output(|| {
        printi(-3);
        printd(1.5);
    });

    assert_eq!(output, "-3\n1.500000\n");
}

#[test]
fn test_variadic_print_reads_cells() {
    let fmt = CString::new("%d and %s, %.1f").unwrap();
    let word = CString::new("two").unwrap();
    let cells = [
        (-1i32) as i64 as u64,
        word.as_ptr() as u64,
        2.5f64.to_bits(),
    ];

    let (written, output) =
        capture_output(|| unsafe { print(fmt.as_ptr(), cells.as_ptr(), cells.len() as i32) });

    assert_eq!(output, "-1 and two, 2.5");
    assert_eq!(written, output.len() as i32);
}

#[test]
fn test_println_without_arguments() {
    let fmt = CString::new("hello").unwrap();

    let (_, output) = capture_output(|| unsafe { println(fmt.as_ptr(), std::ptr::null(), 0) });

    assert_eq!(output, "hello\n");
}

#[test]
fn test_math_constants() {
    assert_eq!(pi(), std::f64::consts::PI);
    assert_eq!(tarn_runtime::pow(2.0, 10.0), 1024.0);
    assert_eq!(tarn_runtime::fabs(-0.5), 0.5);
    assert_eq!(tarn_runtime::sqrt(9.0), 3.0);
}

#[test]
fn test_symbols_cover_runtime() {
    let names: Vec<&str> = symbols().iter().map(|(name, _)| *name).collect();

    for expected in ["printi", "printd", "print", "println", "readline", "pi", "cos"] {
        assert!(names.contains(&expected), "missing {}", expected);
    }
    assert!(symbols().iter().all(|(_, address)| !address.is_null()));
}
