//! Build configuration label printed with every result.

use crate::utils::dot::KernelKind;

/// Compile-time override for the compiler part of the label, e.g. the
/// `RUSTFLAGS` a benchmark script built with.
const LABEL_OVERRIDE: Option<&str> = option_env!("ANNBENCH_BUILD_LABEL");

/// Describes how this binary was compiled and which kernel runs.
pub fn build_config_label(kernel: KernelKind) -> String {
    let compiler = match LABEL_OVERRIDE {
        Some(label) if !label.trim().is_empty() => label.trim().to_string(),
        _ => compiler_settings(),
    };
    format!("{} kernel={}", compiler, kernel)
}

fn compiler_settings() -> String {
    let profile = if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    };
    format!(
        "profile={} arch={} features={}",
        profile,
        std::env::consts::ARCH,
        static_target_features()
    )
}

/// SIMD features enabled at compile time (not the ones detected at runtime).
fn static_target_features() -> String {
    let features = [
        ("sse2", cfg!(target_feature = "sse2")),
        ("sse3", cfg!(target_feature = "sse3")),
        ("ssse3", cfg!(target_feature = "ssse3")),
        ("sse4.1", cfg!(target_feature = "sse4.1")),
        ("sse4.2", cfg!(target_feature = "sse4.2")),
        ("avx", cfg!(target_feature = "avx")),
        ("avx2", cfg!(target_feature = "avx2")),
        ("fma", cfg!(target_feature = "fma")),
        ("neon", cfg!(target_feature = "neon")),
    ];

    let enabled: Vec<&str> = features
        .iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(name, _)| *name)
        .collect();

    if enabled.is_empty() {
        "none".to_string()
    } else {
        enabled.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_names_the_kernel() {
        let label = build_config_label(KernelKind::SseDp);
        assert!(label.ends_with("kernel=sse-dp"), "{label}");
        assert!(!label.contains('"'));
    }
}
