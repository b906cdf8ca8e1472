// build.rs - generates `compile_time` limits from config/<profile>.toml
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Profile {
    grammar: GrammarLimits,
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct GrammarLimits {
    max_rules: usize,
    max_recursion_depth: usize,
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct LexicalLimits {
    max_token_count: usize,
    max_symbol_length: usize,
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct SyntaxLimits {
    max_error_history: usize,
    max_reported_steps: usize,
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    security_min_log_level: u8,
}

/// (name, value, lowest allowed, highest allowed)
type Bound = (&'static str, usize, usize, usize);

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=ABNF_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=ABNF_CONFIG_DIR");

    let profile_name =
        env::var("ABNF_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let path = profile_path(&profile_name);
    println!("cargo:rerun-if-changed={}", path.display());

    let text = fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "cannot read build profile '{}' at {}: {}",
            profile_name,
            path.display(),
            e
        )
    });
    let profile: Profile = toml::from_str(&text)
        .unwrap_or_else(|e| panic!("invalid build profile {}: {}", path.display(), e));

    check_bounds(&profile, &profile_name);

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    fs::write(
        Path::new(&out_dir).join("constants.rs"),
        render(&profile, &profile_name),
    )
    .expect("cannot write generated constants");
}

/// Profiles live in `<workspace root>/<ABNF_CONFIG_DIR or config>/`
fn profile_path(profile_name: &str) -> PathBuf {
    let config_dir = env::var("ABNF_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("crate directory has a parent");

    workspace_root
        .join(config_dir)
        .join(format!("{}.toml", profile_name))
}

fn check_bounds(profile: &Profile, profile_name: &str) {
    let production = profile_name == "production";
    let bounds: [Bound; 7] = [
        ("max_rules", profile.grammar.max_rules, 64, 10_000_000),
        (
            "max_recursion_depth",
            profile.grammar.max_recursion_depth,
            1,
            if production { 512 } else { 10_000 },
        ),
        (
            "max_token_count",
            profile.lexical.max_token_count,
            1,
            if production { 5_000_000 } else { 100_000_000 },
        ),
        ("max_symbol_length", profile.lexical.max_symbol_length, 1, 1 << 20),
        ("max_error_history", profile.syntax.max_error_history, 1, 10_000),
        ("log_buffer_size", profile.logging.log_buffer_size, 1, 1_000_000),
        (
            "security_min_log_level",
            usize::from(profile.logging.security_min_log_level),
            0,
            2,
        ),
    ];

    for (name, value, low, high) in bounds {
        if value < low || value > high {
            panic!(
                "SECURITY: {} = {} is outside {}..={} for profile '{}'",
                name, value, low, high, profile_name
            );
        }
    }
}

fn render(profile: &Profile, profile_name: &str) -> String {
    let sections: [(&str, Vec<(&str, &str, String)>); 4] = [
        (
            "grammar",
            vec![
                ("MAX_RULES", "usize", profile.grammar.max_rules.to_string()),
                (
                    "MAX_RECURSION_DEPTH",
                    "usize",
                    profile.grammar.max_recursion_depth.to_string(),
                ),
            ],
        ),
        (
            "lexical",
            vec![
                ("MAX_TOKEN_COUNT", "usize", profile.lexical.max_token_count.to_string()),
                ("MAX_SYMBOL_LENGTH", "usize", profile.lexical.max_symbol_length.to_string()),
            ],
        ),
        (
            "syntax",
            vec![
                ("MAX_ERROR_HISTORY", "usize", profile.syntax.max_error_history.to_string()),
                ("MAX_REPORTED_STEPS", "usize", profile.syntax.max_reported_steps.to_string()),
            ],
        ),
        (
            "logging",
            vec![
                ("LOG_BUFFER_SIZE", "usize", profile.logging.log_buffer_size.to_string()),
                (
                    "MAX_LOG_MESSAGE_LENGTH",
                    "usize",
                    profile.logging.max_log_message_length.to_string(),
                ),
                (
                    "SECURITY_MIN_LOG_LEVEL",
                    "u8",
                    profile.logging.security_min_log_level.to_string(),
                ),
            ],
        ),
    ];

    let mut code = format!(
        "// Generated by build.rs from build profile '{}'. Do not edit.\n\npub mod compile_time {{\n    pub const PROFILE: &str = {:?};\n",
        profile_name, profile_name
    );
    for (module, constants) in sections {
        let _ = writeln!(code, "\n    pub mod {} {{", module);
        for (name, ty, value) in constants {
            let _ = writeln!(code, "        pub const {}: {} = {};", name, ty, value);
        }
        code.push_str("    }\n");
    }
    code.push_str("}\n");
    code
}
