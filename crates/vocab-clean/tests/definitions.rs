use vocab_clean::{Normalizer, NormalizerConfig};

fn normalizer() -> Normalizer {
    Normalizer::new(&NormalizerConfig::default()).expect("default patterns compile")
}

#[test]
fn typical_stardict_definitions() {
    let n = normalizer();
    let cases: [(&str, &[&str], Option<&str>); 4] = [
        (
            "<b>1.</b> գ. Дом, жилище. 2. Семья ◊ Հայրական տուն отчий дом",
            &["дом", "жилище", "семья"],
            Some("Հայրական տուն отчий дом"),
        ),
        ("ած. Красивый, прекрасный", &["красивый", "прекрасный"], None),
        ("1. вода 2. (перен.) воды", &["вода", "воды"], None),
        ("• бегать; • бег", &["бегать", "бег"], None),
    ];
    for (raw, meanings, usage) in cases {
        let out = n.normalize(raw);
        assert_eq!(out.meanings, meanings, "input {raw:?}");
        assert_eq!(out.usage.as_deref(), usage, "input {raw:?}");
    }
}

#[test]
fn custom_sentence_patterns() {
    let config = NormalizerConfig {
        sentence_patterns: vec![r"(?i)^очень\s".into()],
        ..NormalizerConfig::default()
    };
    let n = Normalizer::new(&config).unwrap();
    let out = n.normalize("1. очень большой 2. огромный");
    assert_eq!(out.meanings, vec!["огромный"]);
}

#[test]
fn invalid_pattern_is_an_error() {
    let config = NormalizerConfig {
        sentence_patterns: vec!["(unclosed".into()],
        ..NormalizerConfig::default()
    };
    let err = Normalizer::new(&config).unwrap_err();
    assert!(format!("{err:#}").contains("(unclosed"));
}
