use approx::assert_abs_diff_eq;
use cslc::core::kernel::{get_kernel, KernelParams, FULL_CONVOLUTION_PASSES};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_kernel_sums_to_one() {
    init_logging();

    for size in 1..=6 {
        for num_conv in 0..=7 {
            let kernel = get_kernel(size, num_conv).expect("Failed to build kernel");
            let total: f64 = kernel.iter().map(|&w| w as f64).sum();
            println!("size={} num_conv={} shape={:?} sum={:.7}", size, num_conv, kernel.dim(), total);
            assert_abs_diff_eq!(total, 1.0, epsilon = 1e-5);
            assert!(kernel.iter().all(|&w| w > 0.0), "Kernel weights must be positive");
        }
    }
}

#[test]
fn test_unconvolved_kernel_is_uniform_box() {
    for size in [1, 2, 5, 9] {
        let kernel = get_kernel(size, 0).expect("Failed to build kernel");
        assert_eq!(kernel.dim(), (size, size));

        let expected = 1.0 / (size * size) as f32;
        for &w in kernel.iter() {
            assert_abs_diff_eq!(w, expected, epsilon = 1e-7);
        }
    }
}

#[test]
fn test_kernel_growth_stops_after_full_passes() {
    let size = 5;
    for num_conv in 0..=FULL_CONVOLUTION_PASSES {
        let kernel = get_kernel(size, num_conv).expect("Failed to build kernel");
        let side = size + num_conv * (size - 1);
        assert_eq!(kernel.dim(), (side, side), "num_conv={}", num_conv);
    }

    let after_four = get_kernel(size, 4).expect("Failed to build kernel");
    let after_ten = get_kernel(size, 10).expect("Failed to build kernel");
    assert_eq!(after_four.dim(), after_ten.dim());
    assert_eq!(after_ten.dim(), (21, 21));
}

#[test]
fn test_same_mode_passes_change_weights() {
    // Shape is frozen after four passes but the weights keep changing
    let after_four = get_kernel(3, 4).expect("Failed to build kernel");
    let after_six = get_kernel(3, 6).expect("Failed to build kernel");

    assert_eq!(after_four.dim(), after_six.dim());
    let max_diff = after_four
        .iter()
        .zip(after_six.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);
    assert!(max_diff > 1e-6, "Same-mode passes left the kernel unchanged");
}

#[test]
fn test_kernel_is_symmetric_for_odd_size() {
    let kernel = get_kernel(3, 3).expect("Failed to build kernel");
    let (rows, cols) = kernel.dim();
    for i in 0..rows {
        for j in 0..cols {
            assert_abs_diff_eq!(kernel[[i, j]], kernel[[j, i]], epsilon = 1e-8);
            assert_abs_diff_eq!(kernel[[i, j]], kernel[[rows - 1 - i, cols - 1 - j]], epsilon = 1e-8);
        }
    }
}

#[test]
fn test_kernel_params_reject_non_integer_counts() {
    let params: KernelParams = serde_json::from_str(r#"{"size": 3, "num_conv": 2}"#)
        .expect("Failed to parse integer kernel parameters");
    assert_eq!(params, KernelParams { size: 3, num_conv: 2 });
    assert_eq!(params.build().expect("Failed to build kernel").dim(), (7, 7));

    let float_count = serde_json::from_str::<KernelParams>(r#"{"size": 3, "num_conv": 2.0}"#);
    assert!(float_count.is_err());

    let string_count = serde_json::from_str::<KernelParams>(r#"{"size": 3, "num_conv": "2"}"#);
    assert!(string_count.is_err());
}

#[test]
fn test_kernel_params_defaults_fill_missing_fields() {
    let params: KernelParams = serde_json::from_str(r#"{"num_conv": 1}"#)
        .expect("Failed to parse kernel parameters");
    assert_eq!(params.size, 5);
    assert_eq!(params.num_conv, 1);
}
