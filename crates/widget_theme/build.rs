use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const THEME_FAMILIES: [&str; 5] = ["blue", "orange", "green", "purple", "red"];

#[derive(Debug, Deserialize)]
struct VariablesFile {
    schema_version: u32,
    tokens: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ThemeFile {
    schema_version: u32,
    name: String,
    display_name: String,
    light: BTreeMap<String, String>,
    dark: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct Catalog<'a> {
    variables: &'a BTreeMap<String, String>,
    themes: &'a [ThemeFile],
}

fn read(path: &Path) -> String {
    println!("cargo:rerun-if-changed={}", path.display());
    fs::read_to_string(path).unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()))
}

fn check_schema(path: &Path, version: u32) {
    if version != 1 {
        panic!(
            "theme schema mismatch in {}: expected 1 found {version}",
            path.display()
        );
    }
}

fn check_tokens(path: &Path, table: &str, tokens: &BTreeMap<String, String>) {
    if tokens.is_empty() {
        panic!("empty `{table}` token table in {}", path.display());
    }
    for (name, value) in tokens {
        if !name.starts_with("--") {
            panic!(
                "token `{name}` in {} [{table}] must start with `--`",
                path.display()
            );
        }
        if value.trim().is_empty() || value.contains(';') {
            panic!(
                "token `{name}` in {} [{table}] has an invalid value",
                path.display()
            );
        }
    }
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let themes_dir = crate_root.join("themes");

    let variables_path = themes_dir.join("variables.toml");
    let variables: VariablesFile = toml::from_str(&read(&variables_path))
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", variables_path.display()));
    check_schema(&variables_path, variables.schema_version);
    check_tokens(&variables_path, "tokens", &variables.tokens);

    let mut themes = Vec::<ThemeFile>::new();
    for family in THEME_FAMILIES {
        let path = themes_dir.join(format!("{family}.toml"));
        let theme: ThemeFile = toml::from_str(&read(&path))
            .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
        check_schema(&path, theme.schema_version);
        if theme.name != family {
            panic!(
                "theme name mismatch in {}: expected {family} found {}",
                path.display(),
                theme.name
            );
        }
        check_tokens(&path, "light", &theme.light);
        check_tokens(&path, "dark", &theme.dark);
        themes.push(theme);
    }

    let catalog = Catalog {
        variables: &variables.tokens,
        themes: &themes,
    };
    let json = serde_json::to_string_pretty(&catalog).expect("serialize theme catalog");
    let generated = format!(
        "/// Build-time generated theme catalog JSON.\n\
pub const THEME_CATALOG_JSON: &str = r##\"{}\"##;\n",
        json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("theme_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
