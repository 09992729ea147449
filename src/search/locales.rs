//! Locale index: every locale code present in a dataset.

use std::collections::BTreeSet;

use crate::types::TranslationKey;

/// Returns the distinct locale codes used by any record, sorted ascending.
///
/// Feed it the full dataset, not a filtered view, so that the locale choices
/// don't shrink as filters are applied.
#[must_use]
pub fn available_locales(dataset: &[TranslationKey]) -> Vec<String> {
    dataset
        .iter()
        .flat_map(|item| item.translations.keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::test_utils::translation_key;

    #[rstest]
    fn empty_dataset_has_no_locales() {
        assert_that!(available_locales(&[]), is_empty());
    }

    #[rstest]
    fn locales_are_deduplicated_and_sorted() {
        let dataset = vec![
            translation_key("1", "button.save", "buttons", None, &[("fr", "Sauvegarder"), ("en", "Save")]),
            translation_key("2", "form.email", "forms", None, &[]),
            translation_key("3", "button.cancel", "buttons", None, &[("es", "Cancelar"), ("en", "Cancel")]),
        ];

        assert_that!(available_locales(&dataset), elements_are![eq("en"), eq("es"), eq("fr")]);
    }

    #[rstest]
    fn result_does_not_depend_on_input_order() {
        let mut dataset = vec![
            translation_key("1", "a", "buttons", None, &[("ja", "保存")]),
            translation_key("2", "b", "buttons", None, &[("de", "Speichern")]),
        ];
        let forward = available_locales(&dataset);

        dataset.reverse();

        assert_eq!(available_locales(&dataset), forward);
        assert_eq!(available_locales(&dataset), available_locales(&dataset));
    }
}
