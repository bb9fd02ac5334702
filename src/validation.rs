use lazy_static::lazy_static;
use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

lazy_static! {
    /// Djangoのusernameバリデーション正規表現
    /// 半角英数字、@/./+/-/_ のみ許可
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[\w.@+-]+$").unwrap();

    /// カタログのコード (`QU-LI-001`, `BA-01` など)。大文字英数字とハイフン。
    static ref CODE_REGEX: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9_-]*$").unwrap();
}

/// validator のエラーを画面表示用の文に並べる
fn collect_messages(errors: ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let msg = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} no es válido", field));
            messages.push(msg);
        }
    }
    messages.sort();
    messages
}

/// ユーザー作成/編集フォームのバリデーション。
/// Djangoの `forms.ModelForm` + `clean_*` メソッドに相当。
#[derive(Debug, Validate)]
pub struct UserFormValidation {
    #[validate(
        length(min = 1, max = 80, message = "El usuario debe tener entre 1 y 80 caracteres"),
        custom(function = "validate_username_chars", message = "El usuario solo admite letras, números y @/./+/-/_")
    )]
    pub username: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub password: Option<String>,
}

/// ユーザー名の文字種バリデーション
fn validate_username_chars(username: &str) -> Result<(), ValidationError> {
    if USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username_chars"))
    }
}

impl UserFormValidation {
    /// フォームデータからバリデーション用構造体を作成。
    /// 空のパスワードは「変更なし」扱い。
    pub fn new(username: &str, password: Option<&str>) -> Self {
        Self {
            username: username.trim().to_string(),
            password: password.filter(|p| !p.is_empty()).map(|p| p.to_string()),
        }
    }

    /// バリデーションを実行し、エラーメッセージを返す
    pub fn validate_form(&self) -> Result<(), Vec<String>> {
        self.validate().map_err(collect_messages)
    }
}

/// カタログの主キー (コード) と名称
#[derive(Debug, Validate)]
pub struct CodeValidation {
    #[validate(
        length(min = 1, max = 50, message = "El código debe tener entre 1 y 50 caracteres"),
        custom(function = "validate_code_chars", message = "El código solo admite mayúsculas, números y guiones")
    )]
    pub code: String,
}

fn validate_code_chars(code: &str) -> Result<(), ValidationError> {
    if CODE_REGEX.is_match(code) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_code_chars"))
    }
}

impl CodeValidation {
    pub fn new(code: &str) -> Self {
        Self { code: code.trim().to_string() }
    }

    pub fn validate_form(&self) -> Result<(), Vec<String>> {
        self.validate().map_err(collect_messages)
    }
}

/// テンプレート名
#[derive(Debug, Validate)]
pub struct PlantillaNombreValidation {
    #[validate(length(min = 1, max = 100, message = "El nombre de la plantilla es obligatorio (máx. 100 caracteres)"))]
    pub nombre: String,
}

impl PlantillaNombreValidation {
    pub fn new(nombre: &str) -> Self {
        Self { nombre: nombre.trim().to_string() }
    }

    pub fn validate_form(&self) -> Result<(), Vec<String>> {
        self.validate().map_err(collect_messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_username() {
        let form = UserFormValidation::new("operativo_01", Some("secreto1"));
        assert!(form.validate_form().is_ok());
    }

    #[test]
    fn test_username_with_special_chars() {
        let form = UserFormValidation::new("ana.lopez@planta", Some("secreto1"));
        assert!(form.validate_form().is_ok());
        assert!(UserFormValidation::new("ana lopez", None).validate_form().is_err());
    }

    #[test]
    fn test_empty_username() {
        let form = UserFormValidation::new("   ", Some("secreto1"));
        assert!(form.validate_form().is_err());
    }

    #[test]
    fn test_username_too_long() {
        let long_username = "a".repeat(81);
        let form = UserFormValidation::new(&long_username, Some("secreto1"));
        assert!(form.validate_form().is_err());
    }

    #[test]
    fn test_password_too_short() {
        let errors = UserFormValidation::new("valido", Some("abc")).validate_form().unwrap_err();
        assert_eq!(errors, vec!["La contraseña debe tener al menos 6 caracteres".to_string()]);
    }

    #[test]
    fn test_password_optional_for_edit() {
        // 編集時はパスワード省略可能
        assert!(UserFormValidation::new("valido", None).validate_form().is_ok());
        assert!(UserFormValidation::new("valido", Some("")).validate_form().is_ok());
    }

    #[test]
    fn test_catalog_codes() {
        assert!(CodeValidation::new("QU-LI-001").validate_form().is_ok());
        assert!(CodeValidation::new(" BA-01 ").validate_form().is_ok());
        assert!(CodeValidation::new("qu-li-001").validate_form().is_err());
        assert!(CodeValidation::new("").validate_form().is_err());
    }

    #[test]
    fn test_plantilla_nombre() {
        assert!(PlantillaNombreValidation::new("Semana tipo A").validate_form().is_ok());
        assert!(PlantillaNombreValidation::new("  ").validate_form().is_err());
        assert!(PlantillaNombreValidation::new(&"x".repeat(101)).validate_form().is_err());
    }
}
