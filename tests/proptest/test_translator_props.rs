//! Property tests for token substitution

use hanlua::{Translator, Vocabulary};
use proptest::prelude::*;

fn surfaces() -> Vec<&'static str> {
    Vocabulary::korean_lua()
        .entries()
        .iter()
        .map(|e| e.surface.as_str())
        .collect()
}

/// Source-like text: vocabulary tokens mixed with identifiers and punctuation
fn source_text() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        prop::sample::select(surfaces()).prop_map(str::to_string),
        "[a-z_]{1,6}",
        "[가-힣]{1,3}",
        prop::sample::select(vec![" ", "\n", "(", ")", ",", ".", "=", "\"", "--"])
            .prop_map(str::to_string),
    ];
    prop::collection::vec(piece, 0..24).prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn prop_ascii_text_unchanged(source in "[ -~\t\n]{0,200}") {
        prop_assert_eq!(Translator::korean_lua().translate(&source), source);
    }

    #[test]
    fn prop_translation_idempotent(source in source_text()) {
        let translator = Translator::korean_lua();
        let once = translator.translate(&source);
        let twice = translator.translate(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_separated_tokens_all_substituted(
        indices in prop::collection::vec(0usize..53, 1..16),
        separator in prop::sample::select(vec![" ", "\n", "(", ")", ", ", "\t"]),
    ) {
        let vocab = Vocabulary::korean_lua();
        let entries = vocab.entries();
        let source: Vec<&str> = indices.iter().map(|&i| entries[i % entries.len()].surface.as_str()).collect();
        let expected: Vec<&str> = indices.iter().map(|&i| entries[i % entries.len()].canonical.as_str()).collect();

        prop_assert_eq!(
            Translator::korean_lua().translate(&source.join(separator)),
            expected.join(separator)
        );
    }

    #[test]
    fn prop_matches_cover_only_vocabulary(source in source_text()) {
        let translator = Translator::korean_lua();
        let mut last_end = 0;
        for m in translator.matches(&source) {
            prop_assert!(m.span.start >= last_end);
            prop_assert_eq!(&source[m.span.clone()], m.surface);
            prop_assert_eq!(translator.vocabulary().lookup(m.surface), Some(m.canonical));
            last_end = m.span.end;
        }
    }
}
