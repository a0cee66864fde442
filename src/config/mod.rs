pub mod settings;

use settings::ConvertParams;
use std::path::Path;

/// 入力PDFのパスからsettings.yamlを自動検出して読み込む。
///
/// 入力PDFと同じディレクトリに `settings.yaml` が存在すれば読み込み、
/// 存在しなければデフォルト設定を返す。
pub fn load_params_for_input(input_path: &Path) -> crate::error::Result<ConvertParams> {
    let dir = input_path
        .parent()
        .ok_or_else(|| crate::error::DarkModeError::config("Cannot determine input directory"))?;

    let settings_path = dir.join("settings.yaml");

    if settings_path.exists() {
        ConvertParams::from_file(&settings_path)
    } else {
        Ok(ConvertParams::default())
    }
}
