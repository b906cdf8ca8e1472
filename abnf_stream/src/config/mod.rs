//! Configuration module
//! Uses constants generated from the TOML build profile

// Generated by build.rs from config/<profile>.toml
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

// Reference values and runtime preferences
pub mod constants;
pub mod runtime;

/// Where the generated limits came from
pub mod build_info {
    /// Build profile name, `development` unless `ABNF_BUILD_PROFILE` was set
    pub fn profile() -> &'static str {
        super::compile_time::PROFILE
    }

    pub fn config_dir() -> &'static str {
        option_env!("ABNF_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}
