// 変換パラメータ設定 (settings.yaml) のテスト

use std::io::Write;

use pdf_darkmode::config::load_params_for_input;
use pdf_darkmode::config::settings::ConvertParams;
use pdf_darkmode::error::DarkModeError;

// ============================================================
// 1. YAML デシリアライズ
// ============================================================

#[test]
fn test_params_full_yaml() {
    let yaml = r#"
dpi_scale: 3.0
dark_rgb: [20, 24, 32]
threshold: 100
"#;
    let params = ConvertParams::from_yaml(yaml).expect("should parse full settings");
    assert_eq!(params.dpi_scale, 3.0);
    assert_eq!(params.dark_rgb, [20, 24, 32]);
    assert_eq!(params.threshold, 100);
}

#[test]
fn test_params_partial_yaml_keeps_defaults() {
    let params = ConvertParams::from_yaml("threshold: 200\n").unwrap();
    assert_eq!(params.threshold, 200);
    assert_eq!(params.dpi_scale, 2.0);
    assert_eq!(params.dark_rgb, [51, 51, 51]);
}

#[test]
fn test_params_empty_mapping_is_default() {
    let params = ConvertParams::from_yaml("{}").unwrap();
    assert_eq!(params, ConvertParams::default());
}

#[test]
fn test_params_integer_scale_is_accepted() {
    let params = ConvertParams::from_yaml("dpi_scale: 1\n").unwrap();
    assert_eq!(params.dpi_scale, 1.0);
}

#[test]
fn test_params_color_component_out_of_range() {
    let result = ConvertParams::from_yaml("dark_rgb: [0, 0, 300]\n");
    assert!(matches!(result, Err(DarkModeError::ConfigError(_))));
}

#[test]
fn test_params_color_wrong_length() {
    let result = ConvertParams::from_yaml("dark_rgb: [10, 10]\n");
    assert!(matches!(result, Err(DarkModeError::ConfigError(_))));
}

#[test]
fn test_params_threshold_out_of_range() {
    let result = ConvertParams::from_yaml("threshold: 256\n");
    assert!(matches!(result, Err(DarkModeError::ConfigError(_))));
}

#[test]
fn test_params_malformed_yaml() {
    let result = ConvertParams::from_yaml("dpi_scale: [unterminated\n");
    assert!(matches!(result, Err(DarkModeError::ConfigError(_))));
}

// ============================================================
// 2. 値の検証
// ============================================================

#[test]
fn test_params_zero_scale_rejected() {
    let result = ConvertParams::from_yaml("dpi_scale: 0\n");
    assert!(matches!(result, Err(DarkModeError::ConfigError(_))));
}

#[test]
fn test_params_negative_scale_rejected() {
    let result = ConvertParams::from_yaml("dpi_scale: -1.5\n");
    assert!(matches!(result, Err(DarkModeError::ConfigError(_))));
}

#[test]
fn test_params_scale_above_limit_rejected() {
    let result = ConvertParams::from_yaml("dpi_scale: 16.5\n");
    assert!(matches!(result, Err(DarkModeError::ConfigError(_))));
}

#[test]
fn test_params_scale_at_limit_accepted() {
    assert!(ConvertParams::from_yaml("dpi_scale: 16\n").is_ok());
}

// ============================================================
// 3. 入力PDFと同じディレクトリからの自動検出
// ============================================================

#[test]
fn test_load_params_without_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.pdf");

    let params = load_params_for_input(&input).unwrap();
    assert_eq!(params, ConvertParams::default());
}

#[test]
fn test_load_params_with_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut f = std::fs::File::create(dir.path().join("settings.yaml")).unwrap();
    writeln!(f, "dpi_scale: 1.5").unwrap();
    writeln!(f, "dark_rgb: [0, 0, 0]").unwrap();

    let params = load_params_for_input(&dir.path().join("doc.pdf")).unwrap();
    assert_eq!(params.dpi_scale, 1.5);
    assert_eq!(params.dark_rgb, [0, 0, 0]);
    assert_eq!(params.threshold, 128);
}

#[test]
fn test_load_params_with_invalid_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("settings.yaml"), "dpi_scale: 0\n").unwrap();

    let result = load_params_for_input(&dir.path().join("doc.pdf"));
    assert!(matches!(result, Err(DarkModeError::ConfigError(_))));
}

#[test]
fn test_from_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ConvertParams::from_file(&dir.path().join("missing.yaml"));
    assert!(matches!(result, Err(DarkModeError::IoError(_))));
}
