//! Static string table for the two supported UI languages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language used for prompts, model output and UI strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Id,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Id];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Id => "id",
        }
    }

    /// Name of the language as written into model prompts
    pub fn prompt_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Id => "Indonesia",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "id" => Ok(Language::Id),
            other => Err(format!("Unknown language '{}', expected 'en' or 'id'", other)),
        }
    }
}

/// Closed set of UI string keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    HeaderTitle,
    UploadHeader,
    ChatHeader,
    UploadPlaceholderTitle,
    UploadPlaceholderSubtitle,
    OrSeparator,
    UseCameraButton,
    ChangeImageButton,
    RetakeWithCameraButton,
    ChatPlaceholderTitle,
    ChatPlaceholderSubtitle,
    ChatInputPlaceholder,
    ToggleSearchTooltip,
    SourcesTitle,
    ErrorAnalyze,
    ErrorResponse,
}

impl TextKey {
    pub const ALL: [TextKey; 16] = [
        TextKey::HeaderTitle,
        TextKey::UploadHeader,
        TextKey::ChatHeader,
        TextKey::UploadPlaceholderTitle,
        TextKey::UploadPlaceholderSubtitle,
        TextKey::OrSeparator,
        TextKey::UseCameraButton,
        TextKey::ChangeImageButton,
        TextKey::RetakeWithCameraButton,
        TextKey::ChatPlaceholderTitle,
        TextKey::ChatPlaceholderSubtitle,
        TextKey::ChatInputPlaceholder,
        TextKey::ToggleSearchTooltip,
        TextKey::SourcesTitle,
        TextKey::ErrorAnalyze,
        TextKey::ErrorResponse,
    ];
}

/// Look up the display string for `key` in `language`
pub fn translate(key: TextKey, language: Language) -> &'static str {
    use Language::{En, Id};

    match (key, language) {
        (TextKey::HeaderTitle, _) => "AI Product Copywriter",
        (TextKey::UploadHeader, En) => "1. Upload Your Product",
        (TextKey::UploadHeader, Id) => "1. Unggah Produk Anda",
        (TextKey::ChatHeader, En) => "2. Chat to Refine Copy",
        (TextKey::ChatHeader, Id) => "2. Ngobrol untuk Menyempurnakan Copy",
        (TextKey::UploadPlaceholderTitle, En) => "Upload a product photo",
        (TextKey::UploadPlaceholderTitle, Id) => "Unggah foto produk",
        (TextKey::UploadPlaceholderSubtitle, En) => "Click here to select a file",
        (TextKey::UploadPlaceholderSubtitle, Id) => "Klik di sini untuk memilih file",
        (TextKey::OrSeparator, En) => "OR",
        (TextKey::OrSeparator, Id) => "ATAU",
        (TextKey::UseCameraButton, En) => "Use Camera",
        (TextKey::UseCameraButton, Id) => "Gunakan Kamera",
        (TextKey::ChangeImageButton, En) => "Change Image",
        (TextKey::ChangeImageButton, Id) => "Ubah Gambar",
        (TextKey::RetakeWithCameraButton, En) => "Retake with Camera",
        (TextKey::RetakeWithCameraButton, Id) => "Ambil Ulang dengan Kamera",
        (TextKey::ChatPlaceholderTitle, En) => "Your AI-powered copy is waiting",
        (TextKey::ChatPlaceholderTitle, Id) => "Copy bertenaga AI Anda telah menunggu",
        (TextKey::ChatPlaceholderSubtitle, En) => "Upload a product image to get started.",
        (TextKey::ChatPlaceholderSubtitle, Id) => "Unggah gambar produk untuk memulai.",
        (TextKey::ChatInputPlaceholder, En) => "Ask for revisions or new ideas...",
        (TextKey::ChatInputPlaceholder, Id) => "Minta revisi atau ide baru...",
        (TextKey::ToggleSearchTooltip, En) => "Toggle Google Search",
        (TextKey::ToggleSearchTooltip, Id) => "Aktifkan/Nonaktifkan Pencarian Google",
        (TextKey::SourcesTitle, En) => "Sources:",
        (TextKey::SourcesTitle, Id) => "Sumber:",
        (TextKey::ErrorAnalyze, En) => "Failed to analyze the image. Please try again.",
        (TextKey::ErrorAnalyze, Id) => "Gagal menganalisis gambar. Silakan coba lagi.",
        (TextKey::ErrorResponse, En) => "Failed to get a response. Please try again.",
        (TextKey::ErrorResponse, Id) => "Gagal mendapatkan respons. Silakan coba lagi.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_has_a_string_in_every_language() {
        for key in TextKey::ALL {
            for language in Language::ALL {
                assert!(!translate(key, language).is_empty(), "{:?}/{}", key, language);
            }
        }
    }

    #[test]
    fn test_error_strings() {
        assert_eq!(
            translate(TextKey::ErrorResponse, Language::En),
            "Failed to get a response. Please try again."
        );
        assert_eq!(
            translate(TextKey::ErrorAnalyze, Language::Id),
            "Gagal menganalisis gambar. Silakan coba lagi."
        );
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("EN".parse::<Language>(), Ok(Language::En));
        assert_eq!(" id ".parse::<Language>(), Ok(Language::Id));
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::default(), Language::Id);
    }

    #[test]
    fn test_language_serde() {
        let json = serde_json::to_string(&Language::En).unwrap();
        assert_eq!(json, "\"en\"");
        let parsed: Language = serde_json::from_str("\"id\"").unwrap();
        assert_eq!(parsed, Language::Id);
    }
}
