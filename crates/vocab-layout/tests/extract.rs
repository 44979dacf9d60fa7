use vocab_layout::{LayoutConfig, SpanSource, TableExtractor, extract, parse_bbox_layout};
use vocab_types::{Page, Span};

fn row(y: f64, word: &str, pron: Option<&str>, gloss: &str) -> Vec<Span> {
    let mut spans = vec![
        Span::new(45.0, y, 150.0, y + 11.0, word),
        Span::new(360.0, y, 520.0, y + 11.0, gloss),
    ];
    if let Some(p) = pron {
        spans.push(Span::new(210.0, y, 300.0, y + 11.0, p));
    }
    spans
}

fn page(number: usize, rows: Vec<Vec<Span>>) -> Page {
    Page {
        number,
        spans: rows.into_iter().flatten().collect(),
    }
}

#[test]
fn extracts_table_from_span_source() {
    let source: Vec<Page> = vec![
        page(
            1,
            vec![
                vec![Span::new(45.0, 20.0, 150.0, 40.0, "Ա")],
                row(60.0, "աղ", Some("[agh]"), "salt"),
                row(80.0, "ամառ", Some("[amar]"), "summer"),
                row(100.0, "ամպ", None, "cloud, cloudy weather"),
            ],
        ),
        page(2, vec![row(60.0, "Աղ", None, "salt, Salt")]),
    ];

    let pages = source.pages().unwrap();
    let out = extract(&LayoutConfig::default(), &pages);

    assert_eq!(out.stats.pages, 2);
    assert_eq!(out.record.len(), 3);
    let words: Vec<&str> = out.record.words().collect();
    assert_eq!(words, vec!["աղ", "ամառ", "ամպ"]);

    let salt = out.record.get("աղ").unwrap();
    assert_eq!(salt.glosses, vec!["salt", "Salt"]);
    assert_eq!(salt.pronunciation.as_deref(), Some("agh"));
    assert_eq!(
        out.record.get("ամպ").unwrap().glosses,
        vec!["cloud", "cloudy weather"]
    );
}

#[test]
fn incremental_and_batch_extraction_agree() {
    let pages = vec![
        page(1, vec![row(60.0, "աղ", Some("[agh]"), "salt")]),
        page(2, vec![row(60.0, "ամառ", None, "summer")]),
    ];
    let config = LayoutConfig::default();
    let mut extractor = TableExtractor::new(&config);
    for p in &pages {
        extractor.add_page(p);
    }
    let incremental = extractor.finish();
    let batch = extract(&config, &pages);
    assert_eq!(incremental.record, batch.record);
    assert_eq!(incremental.stats, batch.stats);
}

#[test]
fn bbox_layout_feeds_extractor() {
    let xhtml = r#"<doc><page>
      <block xMin="45" yMin="60" xMax="150" yMax="71"><line><word>ջուր</word></line></block>
      <block xMin="210" yMin="60" xMax="300" yMax="71"><line><word>[dj0ur]</word></line></block>
      <block xMin="360" yMin="60" xMax="520" yMax="71"><line><word>water</word></line></block>
    </page></doc>"#;
    let pages = parse_bbox_layout(xhtml).unwrap();
    let out = extract(&LayoutConfig::default(), &pages);
    let water = out.record.get("ջուր").unwrap();
    assert_eq!(water.glosses, vec!["water"]);
    assert_eq!(water.pronunciation.as_deref(), Some("djour"));
}
