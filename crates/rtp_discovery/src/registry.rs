//! RTP install locations recorded in the Windows registry.
//!
//! Every RTP installer writes its install directory below
//! `Software\<company>\<product>`. The company differs between releases and
//! the value name differs in case between installer versions.

use camino::Utf8PathBuf;
use rtp_finder::EngineVersion;

/// One registry value that may hold an RTP directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryKey {
    pub company: &'static str,
    pub product: String,
    pub value: &'static str,
}

impl RegistryKey {
    fn new(company: &'static str, product: impl Into<String>, value: &'static str) -> Self {
        Self {
            company,
            product: product.into(),
            value,
        }
    }

    /// Key path below a hive.
    pub fn path(&self) -> String {
        format!("Software\\{}\\{}", self.company, self.product)
    }
}

/// Registry values to read for `engine`, in search order.
pub fn registry_keys(engine: EngineVersion) -> Vec<RegistryKey> {
    let product = format!("RPG{}", engine.as_str());
    let mut keys = Vec::new();

    if engine.is_rpg2k() {
        // Most 2000 games use the Japanese release
        keys.push(RegistryKey::new("ASCII", &product, "RuntimePackagePath"));
        keys.push(RegistryKey::new("KADOKAWA", &product, "RuntimePackagePath"));
    } else if engine.is_rpg2k3e() {
        keys.push(RegistryKey::new("KADOKAWA", &product, "RuntimePackagePath"));
        keys.push(RegistryKey::new("Enterbrain", &product, "RUNTIMEPACKAGEPATH"));
    } else {
        keys.push(RegistryKey::new("Enterbrain", &product, "RUNTIMEPACKAGEPATH"));
        keys.push(RegistryKey::new("KADOKAWA", &product, "RuntimePackagePath"));
    }

    keys.push(RegistryKey::new("EasyRPG", "RTP", "path"));
    keys
}

/// Directories recorded under `keys`, reading each from HKCU first and HKLM second.
pub fn registry_paths(keys: &[RegistryKey]) -> Vec<Utf8PathBuf> {
    let mut paths = Vec::new();
    for key in keys {
        for hive in ["HKCU", "HKLM"] {
            match read_string_value(hive, key) {
                Some(path) if !path.is_empty() => {
                    tracing::debug!("{}\\{}\\{}: {}", hive, key.path(), key.value, path);
                    paths.push(Utf8PathBuf::from(path));
                }
                _ => {}
            }
        }
    }
    paths
}

#[cfg(target_os = "windows")]
fn read_string_value(hive: &str, key: &RegistryKey) -> Option<String> {
    let full_path = format!("{}\\{}", hive, key.path());
    let output = std::process::Command::new("reg")
        .args([
            "query",
            full_path.as_str(),
            "/v",
            key.value,
            "/reg:32",
        ])
        .output()
        .ok()?;

    let stdout = String::from_utf8(output.stdout).ok()?;
    parse_reg_query(&stdout, key.value)
}

#[cfg(not(target_os = "windows"))]
fn read_string_value(_hive: &str, _key: &RegistryKey) -> Option<String> {
    None
}

/// Extract the data of a `REG_SZ` value from `reg query` output.
pub fn parse_reg_query(stdout: &str, value: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        let (name, data) = line.split_once("REG_SZ")?;
        if !name.trim().eq_ignore_ascii_case(value) {
            return None;
        }
        Some(data.trim().to_string())
    })
}
