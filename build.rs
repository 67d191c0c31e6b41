use std::cmp::Ordering;
use std::env;

// Lane-group backends the crate can compile against
#[derive(PartialEq, Eq, Debug)]
struct Backend {
    target_arch: &'static [&'static str],
    target_feature: &'static str,
    cfg_flag: &'static str,
    detected: bool,
}

impl Backend {
    // Lowest number == Highest Priority
    fn priority(&self) -> usize {
        match self.cfg_flag {
            "sse" => 0,
            "neon" => 1,
            _ => usize::MAX,
        }
    }

    fn backends() -> Vec<Backend> {
        vec![
            Backend {
                target_arch: &["x86", "x86_64"],
                target_feature: "sse2",
                cfg_flag: "sse",
                detected: false,
            },
            Backend {
                target_arch: &["aarch64"],
                target_feature: "neon",
                cfg_flag: "neon",
                detected: false,
            },
        ]
    }
}

impl Ord for Backend {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for Backend {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct TargetDetector {
    arch: String,
    features: Vec<String>,
}

impl TargetDetector {
    // Reads the target (not the host) description cargo hands to build scripts,
    // so cross builds pick the right backend.
    fn from_env() -> Self {
        let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
        let features = env::var("CARGO_CFG_TARGET_FEATURE")
            .unwrap_or_default()
            .split(',')
            .map(str::to_owned)
            .collect();
        Self { arch, features }
    }

    fn detect(&self, backends: &mut [Backend]) {
        for backend in backends.iter_mut() {
            backend.detected = backend.target_arch.contains(&self.arch.as_str())
                && self.features.iter().any(|f| f == backend.target_feature);
        }
    }
}

fn apply(backends: &mut [Backend], force_fallback: bool) {
    backends.sort();

    let cfg_flag = if force_fallback {
        "fallback"
    } else {
        backends
            .iter()
            .find(|backend| backend.detected)
            .map(|backend| backend.cfg_flag)
            .unwrap_or("fallback")
    };

    println!("cargo:rustc-cfg={cfg_flag}");

    println!("cargo::rustc-check-cfg=cfg(sse)");
    println!("cargo::rustc-check-cfg=cfg(neon)");
    println!("cargo::rustc-check-cfg=cfg(fallback)");
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SIMDLOC_FORCE_FALLBACK");

    let force_fallback = env::var("SIMDLOC_FORCE_FALLBACK")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let mut backends = Backend::backends();
    TargetDetector::from_env().detect(&mut backends);

    apply(&mut backends, force_fallback);
}
