use std::collections::BTreeMap;

use crate::types::{
    Translation,
    TranslationKey,
};

/// `(locale, value, updated_at, updated_by)`
type Row<'a> = (&'a str, &'a str, &'a str, &'a str);

fn translations(rows: &[Row<'_>]) -> BTreeMap<String, Translation> {
    rows.iter()
        .map(|(locale, value, updated_at, updated_by)| {
            (
                (*locale).to_string(),
                Translation {
                    value: (*value).to_string(),
                    updated_at: (*updated_at).to_string(),
                    updated_by: (*updated_by).to_string(),
                },
            )
        })
        .collect()
}

/// Demo dataset: two buttons, one form label and an untranslated notification.
#[must_use]
pub fn sample_translations() -> Vec<TranslationKey> {
    vec![
        TranslationKey {
            id: "1".to_string(),
            key: "button.save".to_string(),
            category: "buttons".to_string(),
            description: Some("Save button text".to_string()),
            created_at: "2024-01-15T10:00:00Z".to_string(),
            created_by: "admin@example.com".to_string(),
            last_modified: "2024-01-20T14:30:00Z".to_string(),
            translations: translations(&[
                ("en", "Save", "2024-01-15T10:00:00Z", "admin@example.com"),
                ("es", "Guardar", "2024-01-16T09:15:00Z", "translator@example.com"),
                ("fr", "Sauvegarder", "2024-01-17T11:20:00Z", "translator@example.com"),
            ]),
        },
        TranslationKey {
            id: "2".to_string(),
            key: "button.cancel".to_string(),
            category: "buttons".to_string(),
            description: Some("Cancel button text".to_string()),
            created_at: "2024-01-15T10:05:00Z".to_string(),
            created_by: "admin@example.com".to_string(),
            last_modified: "2024-01-18T16:45:00Z".to_string(),
            translations: translations(&[
                ("en", "Cancel", "2024-01-15T10:05:00Z", "admin@example.com"),
                ("es", "Cancelar", "2024-01-16T09:20:00Z", "translator@example.com"),
                ("fr", "Annuler", "2024-01-17T11:25:00Z", "translator@example.com"),
            ]),
        },
        TranslationKey {
            id: "3".to_string(),
            key: "form.email.label".to_string(),
            category: "forms".to_string(),
            description: Some("Email field label".to_string()),
            created_at: "2024-01-16T14:20:00Z".to_string(),
            created_by: "developer@example.com".to_string(),
            last_modified: "2024-01-19T10:10:00Z".to_string(),
            translations: translations(&[
                ("en", "Email Address", "2024-01-16T14:20:00Z", "developer@example.com"),
                ("es", "Dirección de Correo", "2024-01-17T08:30:00Z", "translator@example.com"),
                ("fr", "Adresse E-mail", "2024-01-18T13:15:00Z", "translator@example.com"),
            ]),
        },
        TranslationKey {
            id: "4".to_string(),
            key: "notification.welcome".to_string(),
            category: "notifications".to_string(),
            description: Some("Welcome notification message".to_string()),
            created_at: "2024-01-20T09:00:00Z".to_string(),
            created_by: "developer@example.com".to_string(),
            last_modified: "2024-01-20T09:00:00Z".to_string(),
            translations: BTreeMap::new(),
        },
    ]
}
